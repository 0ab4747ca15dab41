//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod commit;
pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod line;

// Re-export for convenience
pub use commit::Commit;
pub use error::CommandError;
pub use identifiers::{CommitId, InvalidCommitId, SHORT_ID_LEN};
pub use key_action::KeyAction;
pub use line::{Line, LineType};
