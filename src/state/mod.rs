//! Engine state machine.
//!
//! Everything here is testable without a terminal: views stream from real
//! subprocesses, but nothing draws.

pub mod action_handler;
pub mod engine;

pub use action_handler::{handle_action, ActionOutcome};
pub use engine::{
    EngineStatus, ViewEngine, CHROME_ROWS, REPORT_LOADING, REPORT_NO_PREVIOUS, REPORT_STOPPED,
};
