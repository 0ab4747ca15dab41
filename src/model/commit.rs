//! Commit summary record shown by the main view.

use super::identifiers::CommitId;
use chrono::{DateTime, FixedOffset};

/// Structured summary of one commit, folded from `--pretty=raw` output.
///
/// Immutable once built; see `parser::commit::CommitBuilder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    id: CommitId,
    author: String,
    time: Option<DateTime<FixedOffset>>,
    title: String,
}

impl Commit {
    pub fn new(
        id: CommitId,
        author: impl Into<String>,
        time: Option<DateTime<FixedOffset>>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            time,
            title: title.into(),
        }
    }

    pub fn id(&self) -> &CommitId {
        &self.id
    }

    /// Author name without the email address.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Author time in the author's own timezone.
    pub fn time(&self) -> Option<&DateTime<FixedOffset>> {
        self.time.as_ref()
    }

    /// First line of the commit message.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Timestamp formatted as `YYYY-MM-DD HH:MM`, or blanks of equal width.
    pub fn date_label(&self) -> String {
        match &self.time {
            Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
            None => " ".repeat(16),
        }
    }
}
