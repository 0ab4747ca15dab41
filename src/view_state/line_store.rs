//! Append-only store of typed display lines.

use crate::model::Line;
use std::ops::Index;

/// Ordered, append-only sequence of [`Line`]s. Position is the only address.
///
/// Lines are never edited or removed individually; a reload replaces the
/// whole store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn last(&self) -> Option<&Line> {
        self.lines.last()
    }

    /// Lines in `[start, start + count)`, clipped to the store.
    pub fn window(&self, start: usize, count: usize) -> &[Line] {
        let start = start.min(self.lines.len());
        let end = start.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }
}

impl Index<usize> for LineStore {
    type Output = Line;

    fn index(&self, index: usize) -> &Line {
        &self.lines[index]
    }
}

impl<'a> IntoIterator for &'a LineStore {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
