//! tigview - terminal browser for git history
//!
//! Streams the output of git commands into typed, colored lines and lets
//! the user page through them, pivoting from a commit to its diff and back.
//!
//! Pure core (`model`, `parser`, `view_state`, `state`) and impure shell
//! (`source` subprocesses, `view` terminal).

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;
