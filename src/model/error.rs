//! Error types for tigview.
//!
//! # Error Hierarchy
//!
//! - [`CommandError`] - Failures of a view's backing command (spawn, exit, read)
//! - `config::ConfigError` - Config file and command template failures
//! - `logging::LoggingError` - Tracing setup failures
//! - `view::TuiError` - Terminal failures
//!
//! # Error Recovery Strategy
//!
//! Command errors are **non-fatal**: a `View` absorbs them and enters the
//! `Failed` state, keeping any output it already received. Classification
//! has no error path at all; unrecognized text degrades to `LineType::Default`.

use thiserror::Error;

/// Failure of a view's backing command.
///
/// Every variant carries the resolved command line so the status line can
/// tell the user exactly what failed.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command could not be launched at all.
    ///
    /// **When this occurs**: `sh` is missing, the process table is full, or
    /// pipe creation failed.
    ///
    /// **Recovery**: The view shows a single error line and enters `Failed`.
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        /// Resolved command line.
        command: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    ///
    /// **Recovery**: Output already read stays visible; the title bar shows
    /// the failure.
    #[error("`{command}` exited with {}", exit_label(.code))]
    Exit {
        /// Resolved command line.
        command: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// Reading the command's output failed mid-stream.
    #[error("Failed reading output of `{command}`: {reason}")]
    Read {
        /// Resolved command line.
        command: String,
        /// I/O error description.
        reason: String,
    },
}

impl CommandError {
    /// Short label for the title bar, e.g. `exit 128`.
    pub fn short_label(&self) -> String {
        match self {
            CommandError::Spawn { .. } => "spawn failed".to_string(),
            CommandError::Exit { code, .. } => exit_label(code),
            CommandError::Read { .. } => "read error".to_string(),
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit {code}"),
        None => "signal".to_string(),
    }
}
