//! Folding of `git log --pretty=raw` output into commit summaries.
//!
//! ```text
//! commit 4a3f1e9c...
//! tree 9a8b7c...
//! parent 1a2b3c...
//! author Jonas Fonseca <fonseca@diku.dk> 1143391349 +0200
//! committer Jonas Fonseca <fonseca@diku.dk> 1143391349 +0200
//!
//!     Subject line
//! ```

use crate::model::{Commit, CommitId};
use chrono::{DateTime, FixedOffset, TimeZone};

/// What a single raw record contributes to a commit summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRecord {
    /// `commit <id>` starts a new commit.
    Start(CommitId),
    /// `author <name> <email> <secs> <tz>`
    Author {
        name: String,
        time: Option<DateTime<FixedOffset>>,
    },
    /// Indented, non-blank message line.
    Message(String),
    /// Anything else (tree, parent, committer, stat output, blanks).
    Other,
}

/// Categorize one raw record of `--pretty=raw` output.
pub fn parse_record(text: &str) -> CommitRecord {
    if let Some(rest) = text.strip_prefix("commit ") {
        if let Some(id) = CommitId::from_prefix(rest) {
            return CommitRecord::Start(id);
        }
        return CommitRecord::Other;
    }

    if let Some(rest) = text.strip_prefix("author ") {
        let (name, time) = parse_ident(rest);
        return CommitRecord::Author { name, time };
    }

    if let Some(message) = text.strip_prefix("    ") {
        let message = message.trim();
        if !message.is_empty() {
            return CommitRecord::Message(message.to_string());
        }
    }

    CommitRecord::Other
}

/// Split `Name <email> 1143391349 +0200` into name and timestamp.
fn parse_ident(ident: &str) -> (String, Option<DateTime<FixedOffset>>) {
    let (name, after_email) = match ident.find('<') {
        Some(lt) => {
            let rest = &ident[lt..];
            let after = rest.find('>').map(|gt| &rest[gt + 1..]).unwrap_or("");
            (ident[..lt].trim(), after)
        }
        None => (ident.trim(), ""),
    };

    (name.to_string(), parse_time(after_email))
}

fn parse_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let mut parts = text.split_whitespace();
    let secs: i64 = parts.next()?.parse().ok()?;
    let offset = parts.next().and_then(parse_tz).unwrap_or(0);
    FixedOffset::east_opt(offset)?.timestamp_opt(secs, 0).single()
}

/// `+0200` → 7200 seconds east.
fn parse_tz(tz: &str) -> Option<i32> {
    let (sign, digits) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    Some(sign * (hours * 3600 + minutes * 60))
}

/// A commit whose header has been seen but whose summary is still being
/// collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitBuilder {
    id: CommitId,
    author: String,
    time: Option<DateTime<FixedOffset>>,
    title: Option<String>,
}

impl CommitBuilder {
    pub fn new(id: CommitId) -> Self {
        Self {
            id,
            author: String::new(),
            time: None,
            title: None,
        }
    }

    pub fn set_author(&mut self, name: String, time: Option<DateTime<FixedOffset>>) {
        self.author = name;
        self.time = time;
    }

    /// Record the subject. Only the first message line counts.
    pub fn set_title(&mut self, title: String) {
        if self.title.is_none() {
            self.title = Some(title);
        }
    }

    pub fn build(self) -> Commit {
        Commit::new(self.id, self.author, self.time, self.title.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "4a3f1e9c0d2b7a8e6f5c4b3a2d1e0f9a8b7c6d5e";

    #[test]
    fn commit_line_starts_commit() {
        let record = parse_record(&format!("commit {SHA}"));
        assert_eq!(record, CommitRecord::Start(CommitId::new(SHA).unwrap()));
    }

    #[test]
    fn commit_line_without_id_is_other() {
        assert_eq!(parse_record("commit xyz"), CommitRecord::Other);
    }

    #[test]
    fn author_line_parses_name_and_time() {
        let record = parse_record("author Jonas Fonseca <fonseca@diku.dk> 1143391349 +0200");
        let CommitRecord::Author { name, time } = record else {
            panic!("expected author record");
        };
        assert_eq!(name, "Jonas Fonseca");
        let time = time.expect("time should parse");
        assert_eq!(time.offset().local_minus_utc(), 7200);
        assert_eq!(time.timestamp(), 1_143_391_349);
    }

    #[test]
    fn author_line_with_negative_offset() {
        let CommitRecord::Author { time, .. } = parse_record("author A <a@b> 0 -0130") else {
            panic!("expected author record");
        };
        assert_eq!(time.unwrap().offset().local_minus_utc(), -5400);
    }

    #[test]
    fn author_line_without_email_keeps_name() {
        let CommitRecord::Author { name, time } = parse_record("author Someone") else {
            panic!("expected author record");
        };
        assert_eq!(name, "Someone");
        assert!(time.is_none());
    }

    #[test]
    fn malformed_timestamp_is_none() {
        let CommitRecord::Author { time, .. } = parse_record("author A <a@b> soon +0200") else {
            panic!("expected author record");
        };
        assert!(time.is_none());
    }

    #[test]
    fn indented_line_is_message() {
        assert_eq!(
            parse_record("    Add pager view"),
            CommitRecord::Message("Add pager view".to_string())
        );
    }

    #[test]
    fn blank_indented_line_is_other() {
        assert_eq!(parse_record("    "), CommitRecord::Other);
        assert_eq!(parse_record(""), CommitRecord::Other);
    }

    #[test]
    fn headers_and_stats_are_other() {
        assert_eq!(parse_record("tree 9a8b7c"), CommitRecord::Other);
        assert_eq!(parse_record("committer A <a@b> 0 +0000"), CommitRecord::Other);
        assert_eq!(parse_record(" tig.c |  4 ++--"), CommitRecord::Other);
    }

    #[test]
    fn builder_keeps_first_title() {
        let mut builder = CommitBuilder::new(CommitId::new(SHA).unwrap());
        builder.set_title("First".to_string());
        builder.set_title("Second".to_string());
        assert_eq!(builder.build().title(), "First");
    }

    #[test]
    fn builder_without_title_builds_empty_subject() {
        let mut builder = CommitBuilder::new(CommitId::new(SHA).unwrap());
        builder.set_author("A".to_string(), None);
        let commit = builder.build();
        assert_eq!(commit.title(), "");
        assert_eq!(commit.author(), "A");
    }
}
