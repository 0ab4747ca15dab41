//! Core identifier newtypes with smart constructors.
//!
//! Raw constructors are never exported - use smart constructors only.

use std::fmt;
use thiserror::Error;

/// Number of hex digits shown for an abbreviated commit id.
pub const SHORT_ID_LEN: usize = 7;

/// Full hexadecimal object id of a commit (e.g. "4a3f1e...").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

/// Error returned when a string is not a hexadecimal object id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid commit id: {0:?}")]
pub struct InvalidCommitId(pub String);

impl CommitId {
    /// Smart constructor: validates a non-empty, all-hex id.
    ///
    /// Abbreviated ids are accepted; git itself resolves them.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidCommitId> {
        let raw = raw.into();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidCommitId(raw));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Parse the id at the start of `text`, ignoring anything after the
    /// first whitespace (e.g. `--decorate` suffixes).
    pub fn from_prefix(text: &str) -> Option<Self> {
        text.split_whitespace().next().and_then(|id| Self::new(id).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in summary rows.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(SHORT_ID_LEN);
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
