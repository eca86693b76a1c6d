use std::io::{self, Write};
use std::process::{Command, ExitStatus};

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("{program}: {source}")]
    Launch { program: String, source: io::Error },
    #[error("writing {program} output: {source}")]
    Output { program: String, source: io::Error },
}

/// External block-device lister used when a device cannot be read directly.
#[derive(Debug, Clone)]
pub struct Fallback {
    program: String,
    args: Vec<String>,
}

impl Fallback {
    pub fn new(program: &str) -> Self {
        Fallback {
            program: program.to_string(),
            args: vec!["-f".to_string()],
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs the lister on `device` and copies whatever it printed to `out` and `err`.
    ///
    /// Blocks until the child exits. The exit status is handed back but not judged,
    /// and nothing besides the child's own bytes is written.
    pub fn run(
        &self,
        device: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<ExitStatus, FallbackError> {
        debug!(program = %self.program, device, "listing device with external tool");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(device)
            .output()
            .map_err(|source| FallbackError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let copy = |w: &mut dyn Write, bytes: &[u8]| {
            w.write_all(bytes)
                .and_then(|_| w.flush())
                .map_err(|source| FallbackError::Output {
                    program: self.program.clone(),
                    source,
                })
        };
        copy(out, &output.stdout)?;
        copy(err, &output.stderr)?;

        debug!(program = %self.program, status = %output.status, "external tool finished");
        Ok(output.status)
    }
}
