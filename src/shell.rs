pub mod builtin;
pub mod exec;
pub mod history;

use std::io::{self, BufRead, ErrorKind, IsTerminal, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::fallback::Fallback;
use crate::inspect::{self, Outcome};
use crate::signal;

use self::builtin::split_args;
use self::history::History;

const PROMPT: &str = "$ ";
const LIST_USAGE: &str = "Usage: \\l /dev/device (e.g., \\l /dev/sda)";

#[derive(Debug, Clone)]
pub struct Config {
    pub history_path: PathBuf,
    pub fallback: Fallback,
    /// Print a prompt before each line.
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

pub struct Shell {
    config: Config,
    history: History,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        let history = History::load(&config.history_path);
        info!(
            path = %config.history_path.display(),
            entries = history.entries().len(),
            "history loaded"
        );
        Shell { config, history }
    }

    /// Reads commands until EOF or `\q`, then writes the history file.
    pub fn run<R: BufRead>(
        &mut self,
        mut input: R,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<()> {
        let mut buf = String::new();
        loop {
            if self.config.interactive {
                out.write_all(PROMPT.as_bytes())?;
                out.flush()?;
            }

            buf.clear();
            match input.read_line(&mut buf) {
                Ok(0) => break,
                Ok(_) => (),
                Err(e) if matches!(e.kind(), ErrorKind::InvalidData | ErrorKind::Interrupted) => {
                    warn!(error = %e, "unreadable input line skipped");
                    continue;
                }
                Err(e) => return Err(e),
            }
            let line = buf.strip_suffix('\n').unwrap_or(&buf);
            if line.is_empty() {
                continue;
            }
            self.history.push(line);

            // a pending reload does not swallow the line just read
            if signal::take_reload() {
                info!(count = signal::received(), "configuration reload requested");
            }

            let flow = self.execute(line, out, err)?;
            out.flush()?;
            if flow == Flow::Quit {
                break;
            }
        }

        self.history.save_or_warn();
        Ok(())
    }

    pub fn execute(
        &mut self,
        line: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<Flow> {
        if line == "\\q" {
            return Ok(Flow::Quit);
        }

        if line == "history" {
            self.history.print(out)?;
        } else if line.starts_with("\\e") {
            builtin::env(line, out, err)?;
        } else if line.starts_with("echo") {
            builtin::echo(line, out)?;
        } else if line.starts_with("\\l") {
            match split_args(line).as_slice() {
                [_, device] => {
                    let fallback = &self.config.fallback;
                    match inspect::inspect(device, fallback, out, err)? {
                        Outcome::Decoded(layout) => info!(device, ?layout, "disk classified"),
                        Outcome::Delegated(status) => {
                            info!(device, %status, "listed by {}", fallback.program())
                        }
                        Outcome::Missing => debug!(device, "no such device"),
                        Outcome::ToolFailed => debug!(device, "device not listed"),
                    }
                }
                _ => writeln!(out, "{}", LIST_USAGE)?,
            }
        } else if line.starts_with("debug") {
            builtin::debug(line, out)?;
        } else {
            exec::run_external(line, out)?;
        }
        Ok(Flow::Continue)
    }
}
