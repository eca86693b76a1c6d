use std::io::{self, Write};
use std::process::{Command, ExitStatus};

use tracing::debug;

use super::builtin::split_args;

/// Runs `line` as a program with the shell's own stdio and waits for it.
pub fn run_external(line: &str, out: &mut dyn Write) -> io::Result<Option<ExitStatus>> {
    let args = split_args(line);
    let Some((cmd, rest)) = args.split_first() else {
        return Ok(None);
    };

    match Command::new(cmd).args(rest).status() {
        Ok(status) => {
            debug!(cmd, %status, "command finished");
            Ok(Some(status))
        }
        Err(e) => {
            debug!(cmd, error = %e, "spawn failed");
            writeln!(out, "{}: command not found", cmd)?;
            Ok(None)
        }
    }
}
