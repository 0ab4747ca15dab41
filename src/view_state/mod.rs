//! View-state layer - line storage, scrolling, and per-kind view behavior
//!
//! Everything here is terminal-independent: views produce ratatui `Line`s
//! for their visible rows but never touch a backend.
//!
//! # Module Structure
//!
//! - `line_store`: LineStore - append-only ordered lines of one view
//! - `scroll`: ScrollState - cursor/offset with clamping invariants
//! - `text`: tab expansion and display-width truncation
//! - `kind`: ViewKind, ViewOps - per-kind read/draw/enter dispatch
//! - `pager`: PagerOps - log, diff and pager behavior
//! - `main_log`: MainOps - commit summary folding for the main view
//! - `styles`: LineStyles - colors per line type and for the chrome
//! - `view`: View - one view with its stream and load state

pub mod kind;
pub mod line_store;
pub mod main_log;
pub mod pager;
pub mod scroll;
pub mod styles;
pub mod text;
pub mod view;

pub use kind::{DrawContext, EnterAction, ViewKind, ViewOps};
pub use line_store::LineStore;
pub use main_log::MainOps;
pub use pager::PagerOps;
pub use scroll::{Movement, ScrollState};
pub use styles::{ColorConfig, LineStyles};
pub use text::DEFAULT_TAB_SIZE;
pub use view::{LoadState, ReadOutcome, View, ELAPSED_THRESHOLD};
