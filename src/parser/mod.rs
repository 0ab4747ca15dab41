//! Pure parsers for git command output.
//!
//! - [`classify`]: raw text record → [`LineType`] (pager views)
//! - [`commit`]: folding `--pretty=raw` records into [`crate::model::Commit`]
//! - [`refs`]: `git ls-remote` output → reference names per commit
//!
//! Nothing here can fail. Unrecognized input degrades to
//! `LineType::Default` (or is skipped) so a view never aborts on odd output.

pub mod commit;
pub mod refs;

pub use commit::{CommitBuilder, CommitRecord};
pub use refs::RefMap;

use crate::model::LineType;
use tracing::trace;

/// One ordered classification rule.
struct Rule {
    prefix: &'static str,
    line_type: LineType,
    /// Rule only matches when the prefix is followed by a hex object id.
    needs_id: bool,
}

const fn rule(prefix: &'static str, line_type: LineType) -> Rule {
    Rule {
        prefix,
        line_type,
        needs_id: false,
    }
}

const fn id_rule(prefix: &'static str, line_type: LineType) -> Rule {
    Rule {
        prefix,
        line_type,
        needs_id: true,
    }
}

/// First match wins. File headers come before the bare `+`/`-` rules.
const RULES: &[Rule] = &[
    rule("diff --git ", LineType::DiffHeader),
    rule("diff --cc ", LineType::DiffHeader),
    rule("diff --combined ", LineType::DiffHeader),
    rule("index ", LineType::DiffIndex),
    rule("@@", LineType::DiffChunk),
    rule("--- ", LineType::DiffOldFile),
    rule("+++ ", LineType::DiffNewFile),
    rule("+", LineType::DiffAdd),
    rule("-", LineType::DiffDel),
    rule("old mode ", LineType::DiffMeta),
    rule("new mode ", LineType::DiffMeta),
    rule("new file mode ", LineType::DiffMeta),
    rule("deleted file mode ", LineType::DiffMeta),
    rule("copy from ", LineType::DiffMeta),
    rule("copy to ", LineType::DiffMeta),
    rule("rename from ", LineType::DiffMeta),
    rule("rename to ", LineType::DiffMeta),
    rule("similarity index ", LineType::DiffMeta),
    rule("dissimilarity index ", LineType::DiffMeta),
    rule("Author: ", LineType::Author),
    rule("Commit: ", LineType::Committer),
    rule("Merge: ", LineType::Merge),
    rule("Date:   ", LineType::Date),
    rule("AuthorDate: ", LineType::Date),
    rule("CommitDate: ", LineType::CommitDate),
    id_rule("commit ", LineType::Commit),
    id_rule("parent ", LineType::Parent),
    id_rule("tree ", LineType::Tree),
    rule("author ", LineType::Author),
    rule("committer ", LineType::Committer),
    rule("    Signed-off-by: ", LineType::Signoff),
    rule("    Acked-by: ", LineType::Signoff),
];

/// Classify one raw output record.
///
/// Pure: the same text always yields the same type. Tabs are left intact;
/// expansion happens at draw time.
pub fn classify(text: &str) -> LineType {
    for rule in RULES {
        let Some(rest) = text.strip_prefix(rule.prefix) else {
            continue;
        };
        if rule.needs_id && !starts_with_object_id(rest) {
            trace!(prefix = rule.prefix, "header keyword without object id");
            continue;
        }
        return rule.line_type;
    }
    LineType::Default
}

/// True when `text` begins with a run of hex digits ending at whitespace or
/// end of input.
fn starts_with_object_id(text: &str) -> bool {
    let token = text.split_whitespace().next().unwrap_or("");
    !token.is_empty()
        && text.starts_with(token)
        && token.bytes().all(|b| b.is_ascii_hexdigit())
}
