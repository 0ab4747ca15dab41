//! Pager operations: one classified line per raw record.

use super::kind::{DrawContext, EnterAction, ViewKind};
use super::text::{expand_tabs, fit_to_width, truncate_to_width};
use crate::model::{CommitId, Line, LineType};
use crate::parser::classify;
use ratatui::text::Span;

const COMMIT_PREFIX: &str = "commit ";

/// Read/draw/enter behavior of the log, diff and pager views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerOps {
    kind: ViewKind,
}

impl PagerOps {
    pub fn new(kind: ViewKind) -> Self {
        Self { kind }
    }

    /// Classify `raw` into a new line.
    ///
    /// A blank record directly after a blank line is folded away.
    pub fn read(&mut self, prev: Option<&Line>, raw: &str) -> Option<Line> {
        if raw.is_empty() && prev.is_some_and(Line::is_blank) {
            return None;
        }
        Some(Line::text(classify(raw), raw))
    }

    /// Text from column 0 with tabs expanded, truncated at the row width.
    pub fn draw(&self, line: &Line, ctx: &DrawContext<'_>) -> ratatui::text::Line<'static> {
        let text = expand_tabs(line.as_text().unwrap_or_default(), ctx.tab_size);
        let width = usize::from(ctx.width);

        if ctx.selected {
            let row = fit_to_width(&text, width);
            return ratatui::text::Line::from(Span::styled(row, ctx.styles.cursor()));
        }

        let row = truncate_to_width(&text, width).to_string();
        ratatui::text::Line::from(Span::styled(row, ctx.styles.for_type(line.line_type())))
    }

    /// A commit header in the log or pager view opens that commit's diff;
    /// any other line scrolls down.
    pub fn enter(&self, line: &Line) -> EnterAction {
        let opens_commits = matches!(self.kind, ViewKind::Log | ViewKind::Pager);
        if opens_commits && line.line_type() == LineType::Commit {
            let commit = line
                .as_text()
                .and_then(|text| text.strip_prefix(COMMIT_PREFIX))
                .and_then(CommitId::from_prefix);
            if let Some(id) = commit {
                return EnterAction::Open {
                    kind: ViewKind::Diff,
                    reference: id.to_string(),
                };
            }
        }
        EnterAction::ScrollLineDown
    }
}
