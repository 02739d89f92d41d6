//! Sends saved documents to the local printer

use std::path::Path;
use std::process::{Command, Stdio};

/// Fire-and-forget print command
#[derive(Debug, Clone)]
pub struct Printer {
    command: String,
}

impl Printer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Starts the print command with `path` as its only argument
    ///
    /// The child is neither waited on nor checked; a command that cannot be
    /// started is logged and otherwise ignored.
    pub fn print(&self, path: &Path) {
        tracing::info!("Printing {}", path.display());

        let spawned = Command::new(&self.command)
            .arg(path)
            .stdin(Stdio::null())
            .spawn();

        if let Err(e) = spawned {
            tracing::warn!("Could not run '{}' for {}: {}", self.command, path.display(), e);
        }
    }
}
