//! View kinds and their read/draw/enter operations.
//!
//! [`ViewKind`] names what the user opened; [`ViewOps`] is the behavior set
//! chosen from it when the view is created. `Log`, `Diff` and `Pager` share
//! the pager operations, `Main` folds raw commit records into summaries.

use super::main_log::MainOps;
use super::pager::PagerOps;
use crate::model::Line;
use crate::parser::RefMap;
use super::styles::LineStyles;
use std::fmt;

/// The kinds of view the engine can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// One summary row per commit.
    Main,
    /// Raw `git log` output.
    Log,
    /// Patch of a single commit.
    Diff,
    /// Arbitrary text piped on stdin.
    Pager,
}

impl ViewKind {
    /// Name shown in the title bar.
    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Main => "main",
            ViewKind::Log => "log",
            ViewKind::Diff => "diff",
            ViewKind::Pager => "pager",
        }
    }

    /// What one line of this view represents, for "N of M" in the title.
    pub fn item_label(self) -> &'static str {
        match self {
            ViewKind::Main => "commit",
            ViewKind::Log | ViewKind::Diff | ViewKind::Pager => "line",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the engine should do after `enter` on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterAction {
    /// Nothing to do for this line.
    None,
    /// Push a new view scoped to `reference`.
    Open { kind: ViewKind, reference: String },
    /// Scroll the current view down one line.
    ScrollLineDown,
}

/// Everything a draw call needs besides the line itself.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    /// Row width in columns.
    pub width: u16,
    pub tab_size: usize,
    /// Row is under the cursor.
    pub selected: bool,
    pub refs: &'a RefMap,
    pub styles: &'a LineStyles,
}

/// Per-kind behavior, selected once when the view opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOps {
    Pager(PagerOps),
    Main(MainOps),
}

impl ViewOps {
    pub fn for_kind(kind: ViewKind) -> Self {
        match kind {
            ViewKind::Main => ViewOps::Main(MainOps::new()),
            ViewKind::Log | ViewKind::Diff | ViewKind::Pager => ViewOps::Pager(PagerOps::new(kind)),
        }
    }

    /// Turn one raw record into at most one new line.
    ///
    /// `prev` is the last line already in the store.
    pub fn read(&mut self, prev: Option<&Line>, raw: &str) -> Option<Line> {
        match self {
            ViewOps::Pager(ops) => ops.read(prev, raw),
            ViewOps::Main(ops) => ops.read(prev, raw),
        }
    }

    /// Flush any partially folded record once the stream has ended.
    pub fn finish(&mut self) -> Option<Line> {
        match self {
            ViewOps::Pager(_) => None,
            ViewOps::Main(ops) => ops.finish(),
        }
    }

    /// Render one line as a single display row.
    pub fn draw(&self, line: &Line, ctx: &DrawContext<'_>) -> ratatui::text::Line<'static> {
        match self {
            ViewOps::Pager(ops) => ops.draw(line, ctx),
            ViewOps::Main(ops) => ops.draw(line, ctx),
        }
    }

    pub fn enter(&self, line: &Line) -> EnterAction {
        match self {
            ViewOps::Pager(ops) => ops.enter(line),
            ViewOps::Main(ops) => ops.enter(line),
        }
    }
}
