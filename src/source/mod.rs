//! View input sources.
//!
//! - [`CommandTemplate`]: `%s`-slotted command lines resolved per view
//! - [`ViewCommands`]: the template bound to each command-backed view kind
//! - [`StreamReader`]: non-blocking line reader over a spawned command
//!   (or any `Read`, e.g. piped stdin)

pub mod command;
pub mod process;

pub use command::{
    CommandTemplate, TemplateError, ViewCommands, DEFAULT_DIFF_CMD, DEFAULT_LOG_CMD,
    DEFAULT_LS_REMOTE_CMD, DEFAULT_MAIN_CMD, MAX_SLOTS,
};
pub use process::{StreamEvent, StreamReader, QUEUE_CAPACITY};

use crate::model::CommandError;
use std::time::Duration;
use tracing::{debug, warn};

/// Where a view's raw records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Resolved shell command line.
    Command(String),
    /// Standard input of this process (pager mode).
    Stdin,
}

impl SourceSpec {
    /// Start streaming from this source.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Spawn` if the command or reader thread cannot start.
    pub fn open(&self) -> Result<StreamReader, CommandError> {
        match self {
            SourceSpec::Command(command) => StreamReader::start(command),
            SourceSpec::Stdin => StreamReader::from_reader("stdin", std::io::stdin()),
        }
    }

    /// Human-readable label for titles and logs.
    pub fn label(&self) -> &str {
        match self {
            SourceSpec::Command(command) => command,
            SourceSpec::Stdin => "stdin",
        }
    }
}

/// Run a command to completion and collect its output.
///
/// Used once at startup for the reference listing; polls the same
/// [`StreamReader`] the views use, sleeping briefly between empty polls.
///
/// # Errors
///
/// Returns the command's spawn, exit or read error.
pub fn read_to_end(command: &str, poll_interval: Duration) -> Result<String, CommandError> {
    let mut reader = StreamReader::start(command)?;
    let mut output = String::new();
    loop {
        match reader.poll() {
            StreamEvent::Record(line) => {
                output.push_str(&line);
                output.push('\n');
            }
            StreamEvent::Pending => std::thread::sleep(poll_interval),
            StreamEvent::Eof => {
                debug!(command, bytes = output.len(), "Command output collected");
                return Ok(output);
            }
            StreamEvent::Error(err) => {
                warn!(command, %err, "Command failed while collecting output");
                return Err(err);
            }
        }
    }
}
