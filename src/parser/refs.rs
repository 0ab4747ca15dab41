//! Repository references from `git ls-remote` output.
//!
//! Each line maps an object id to a reference name:
//!
//! ```text
//! 4a3f1e9c...	HEAD
//! 4a3f1e9c...	refs/heads/master
//! 9f8e7d6c...	refs/tags/tig-0.1
//! 4a3f1e9c...	refs/tags/tig-0.1^{}
//! ```
//!
//! Annotated tags appear twice; the peeled `^{}` line names the commit.

use crate::model::CommitId;
use std::collections::HashMap;

const PEELED_SUFFIX: &str = "^{}";

/// Prefixes stripped from displayed reference names. Refs outside these
/// namespaces (HEAD, notes, stash) are not shown.
const SHOWN_NAMESPACES: &[&str] = &["refs/tags/", "refs/heads/", "refs/remotes/"];

/// Reference names keyed by the commit they point at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefMap {
    refs: HashMap<CommitId, Vec<String>>,
}

impl RefMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from complete `ls-remote` output. Malformed lines are
    /// ignored.
    pub fn parse(output: &str) -> Self {
        let mut listing = RefListing::default();
        for line in output.lines() {
            listing.add_line(line);
        }
        listing.into_map()
    }

    /// Names pointing at `id`, in listing order.
    pub fn names_for(&self, id: &CommitId) -> &[String] {
        self.refs.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Where one full reference name points.
#[derive(Debug)]
struct RefTarget {
    short: String,
    id: CommitId,
    peeled: bool,
}

/// Collects `ls-remote` lines keyed by full reference name, so that a
/// branch and a tag sharing a short name stay distinct.
#[derive(Debug, Default)]
struct RefListing {
    index: HashMap<String, usize>,
    targets: Vec<RefTarget>,
}

impl RefListing {
    fn add_line(&mut self, line: &str) {
        let Some((id, name)) = line.split_once('\t') else {
            return;
        };
        let Ok(id) = CommitId::new(id.trim()) else {
            return;
        };

        let name = name.trim();
        let (full, peeled) = match name.strip_suffix(PEELED_SUFFIX) {
            Some(tag) => (tag, true),
            None => (name, false),
        };
        let Some(short) = SHOWN_NAMESPACES
            .iter()
            .find_map(|namespace| full.strip_prefix(namespace))
        else {
            return;
        };

        if let Some(&slot) = self.index.get(full) {
            // The peeled line names the commit; the tag object is dropped.
            if let Some(target) = self.targets.get_mut(slot) {
                if peeled && !target.peeled {
                    target.id = id;
                    target.peeled = true;
                }
            }
            return;
        }

        self.index.insert(full.to_string(), self.targets.len());
        self.targets.push(RefTarget {
            short: short.to_string(),
            id,
            peeled,
        });
    }

    fn into_map(self) -> RefMap {
        let mut refs: HashMap<CommitId, Vec<String>> = HashMap::new();
        for target in self.targets {
            let names = refs.entry(target.id).or_default();
            if !names.contains(&target.short) {
                names.push(target.short);
            }
        }
        RefMap { refs }
    }
}
