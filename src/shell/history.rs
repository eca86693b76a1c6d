use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

const FILE_NAME: &str = ".kubsh_history";

/// `$HOME/.kubsh_history`, or the working directory when `HOME` is unset.
pub fn default_path() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(FILE_NAME),
        None => PathBuf::from(".").join(FILE_NAME),
    }
}

#[derive(Debug)]
pub struct History {
    path: PathBuf,
    entries: Vec<String>,
}

impl History {
    /// A missing or unreadable file just gives an empty history.
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(text) => text
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no history loaded");
                Vec::new()
            }
        };
        History {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn print(&self, out: &mut dyn Write) -> io::Result<()> {
        for (i, line) in self.entries.iter().enumerate() {
            writeln!(out, "{}: {}", i + 1, line)?;
        }
        Ok(())
    }

    pub fn save(&self) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(&self.path)?);
        for line in &self.entries {
            writeln!(w, "{}", line)?;
        }
        w.flush()
    }

    pub fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            warn!(path = %self.path.display(), error = %e, "history not saved");
        }
    }
}
