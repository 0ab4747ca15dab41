//! Typed display lines.

use super::commit::Commit;

/// Semantic classification of a display line.
///
/// Drives coloring only; never affects what a line contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    /// `diff --git a/... b/...`
    DiffHeader,
    /// `@@ -1,3 +1,4 @@`
    DiffChunk,
    /// `+added`
    DiffAdd,
    /// `-removed`
    DiffDel,
    /// `index 1234..5678 100644`
    DiffIndex,
    /// `--- a/file`
    DiffOldFile,
    /// `+++ b/file`
    DiffNewFile,
    /// Mode, rename, copy and similarity lines of an extended diff header.
    DiffMeta,
    /// `commit <sha>`
    Commit,
    /// `Merge: a b`
    Merge,
    /// `parent <sha>`
    Parent,
    /// `tree <sha>`
    Tree,
    /// `Author:` / `author `
    Author,
    /// `Commit:` / `committer `
    Committer,
    /// `Date:` / `AuthorDate:`
    Date,
    /// `CommitDate:`
    CommitDate,
    /// `Signed-off-by:` / `Acked-by:` trailers.
    Signoff,
    /// Command failure shown in place of content.
    Error,
    /// Anything not matched by a structural rule.
    Default,
}

/// Data owned by a [`Line`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum LinePayload {
    /// Raw record text, tabs preserved.
    Text(String),
    /// Folded commit summary (main view).
    Commit(Box<Commit>),
}

/// One immutable display unit within a view.
///
/// Selection state is derived from the cursor at draw time and never
/// stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    line_type: LineType,
    payload: LinePayload,
}

impl Line {
    pub fn text(line_type: LineType, text: impl Into<String>) -> Self {
        Self {
            line_type,
            payload: LinePayload::Text(text.into()),
        }
    }

    pub fn commit(commit: Commit) -> Self {
        Self {
            line_type: LineType::Commit,
            payload: LinePayload::Commit(Box::new(commit)),
        }
    }

    pub fn line_type(&self) -> LineType {
        self.line_type
    }

    /// Raw text for text lines, `None` for structured payloads.
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            LinePayload::Text(text) => Some(text),
            LinePayload::Commit(_) => None,
        }
    }

    pub fn as_commit(&self) -> Option<&Commit> {
        match &self.payload {
            LinePayload::Commit(commit) => Some(commit),
            LinePayload::Text(_) => None,
        }
    }

    /// True for a text line with no content.
    pub fn is_blank(&self) -> bool {
        self.as_text().is_some_and(str::is_empty)
    }
}
