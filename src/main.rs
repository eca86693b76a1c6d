mod device;
mod fallback;
mod inspect;
mod report;
mod shell;
mod signal;
mod table;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::fallback::Fallback;
use crate::shell::{history, Config, Shell};

/// Small interactive shell with a raw partition table viewer (`\l /dev/sda`)
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// History file [default: $HOME/.kubsh_history]
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Tool used to list devices that cannot be read directly
    #[arg(long, default_value = "lsblk")]
    fallback_tool: String,

    /// Log filter for diagnostics on stderr, overrides RUST_LOG
    #[arg(long)]
    log: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = signal::install() {
        warn!(error = %e, "SIGHUP handler not installed");
    }

    let config = Config {
        history_path: args.history_file.unwrap_or_else(history::default_path),
        fallback: Fallback::new(&args.fallback_tool),
        interactive: shell::stdin_is_tty(),
    };
    let mut shell = Shell::new(config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    shell
        .run(stdin.lock(), &mut stdout.lock(), &mut stderr.lock())
        .context("reading commands")?;
    Ok(())
}
