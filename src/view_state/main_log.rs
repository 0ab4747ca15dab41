//! Main view operations: folds `--pretty=raw` records into one summary line
//! per commit.

use super::kind::{DrawContext, EnterAction, ViewKind};
use super::text::{display_width, expand_tabs, fit_to_width, truncate_to_width};
use crate::model::{Commit, Line};
use crate::parser::commit::{parse_record, CommitBuilder, CommitRecord};
use ratatui::style::Style;
use ratatui::text::Span;

/// Columns reserved for the author name.
pub const AUTHOR_COLS: usize = 20;

/// Read/draw/enter behavior of the main view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainOps {
    partial: Option<CommitBuilder>,
}

impl MainOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one raw record into the commit being collected.
    ///
    /// A commit is emitted as soon as its subject is known, or when the next
    /// commit starts without one. Records outside any commit are ignored.
    pub fn read(&mut self, _prev: Option<&Line>, raw: &str) -> Option<Line> {
        match parse_record(raw) {
            CommitRecord::Start(id) => self
                .partial
                .replace(CommitBuilder::new(id))
                .map(|done| Line::commit(done.build())),
            CommitRecord::Author { name, time } => {
                if let Some(partial) = self.partial.as_mut() {
                    partial.set_author(name, time);
                }
                None
            }
            CommitRecord::Message(message) => {
                let mut partial = self.partial.take()?;
                partial.set_title(message);
                Some(Line::commit(partial.build()))
            }
            CommitRecord::Other => None,
        }
    }

    /// Emit a trailing commit that never got a subject.
    pub fn finish(&mut self) -> Option<Line> {
        self.partial.take().map(|done| Line::commit(done.build()))
    }

    /// `date  id  author  [refs] subject` on one row.
    pub fn draw(&self, line: &Line, ctx: &DrawContext<'_>) -> ratatui::text::Line<'static> {
        let Some(commit) = line.as_commit() else {
            // Not produced by `read`; show whatever text there is.
            let text = expand_tabs(line.as_text().unwrap_or_default(), ctx.tab_size);
            let style = if ctx.selected {
                ctx.styles.cursor()
            } else {
                ctx.styles.for_type(line.line_type())
            };
            return ratatui::text::Line::from(Span::styled(
                fit_to_width(&text, usize::from(ctx.width)),
                style,
            ));
        };

        let mut row = RowBuilder::new(usize::from(ctx.width), ctx.selected.then(|| ctx.styles.cursor()));
        row.push(format!("{} ", commit.date_label()), ctx.styles.main_date());
        row.push(format!("{} ", commit.id().short()), ctx.styles.main_id());
        row.push(
            format!("{} ", fit_to_width(commit.author(), AUTHOR_COLS)),
            ctx.styles.main_author(),
        );
        for name in ctx.refs.names_for(commit.id()) {
            row.push(format!("[{name}]"), ctx.styles.main_ref());
            row.push(" ".to_string(), ctx.styles.main_title());
        }
        row.push(expand_tabs(commit.title(), ctx.tab_size), ctx.styles.main_title());
        row.finish()
    }

    /// Open the diff of the commit under the cursor.
    pub fn enter(&self, line: &Line) -> EnterAction {
        match line.as_commit().map(Commit::id) {
            Some(id) => EnterAction::Open {
                kind: ViewKind::Diff,
                reference: id.to_string(),
            },
            None => EnterAction::None,
        }
    }
}

/// Accumulates styled spans, cutting off at the row width.
struct RowBuilder {
    spans: Vec<Span<'static>>,
    remaining: usize,
    /// Overrides every span's style (cursor row) and pads to full width.
    highlight: Option<Style>,
}

impl RowBuilder {
    fn new(width: usize, highlight: Option<Style>) -> Self {
        Self {
            spans: Vec::new(),
            remaining: width,
            highlight,
        }
    }

    fn push(&mut self, text: String, style: Style) {
        if self.remaining == 0 || text.is_empty() {
            return;
        }
        let text = if display_width(&text) > self.remaining {
            truncate_to_width(&text, self.remaining).to_string()
        } else {
            text
        };
        self.remaining -= display_width(&text);
        self.spans
            .push(Span::styled(text, self.highlight.unwrap_or(style)));
    }

    fn finish(mut self) -> ratatui::text::Line<'static> {
        if let Some(style) = self.highlight {
            if self.remaining > 0 {
                self.spans.push(Span::styled(" ".repeat(self.remaining), style));
            }
        }
        ratatui::text::Line::from(self.spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommitId, LineType};
    use crate::parser::RefMap;
    use crate::view_state::styles::{ColorConfig, LineStyles};

    const SHA1: &str = "1111111aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SHA2: &str = "2222222bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn raw_commit(sha: &str, subject: &str) -> Vec<String> {
        vec![
            format!("commit {sha}"),
            "tree 9a8b7c6d5e4f".to_string(),
            "author Jonas Fonseca <fonseca@diku.dk> 1143391349 +0200".to_string(),
            "committer Jonas Fonseca <fonseca@diku.dk> 1143391349 +0200".to_string(),
            String::new(),
            format!("    {subject}"),
            String::new(),
            "    More details.".to_string(),
            " tig.c | 2 +-".to_string(),
        ]
    }

    fn feed(ops: &mut MainOps, records: &[String]) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        for record in records {
            if let Some(line) = ops.read(lines.last(), record) {
                lines.push(line);
            }
        }
        lines.extend(ops.finish());
        lines
    }

    fn rendered(line: &ratatui::text::Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn folds_each_commit_into_one_line() {
        let mut ops = MainOps::new();
        let mut records = raw_commit(SHA1, "First");
        records.extend(raw_commit(SHA2, "Second"));

        let lines = feed(&mut ops, &records);

        assert_eq!(lines.len(), 2);
        let first = lines[0].as_commit().unwrap();
        assert_eq!(first.id().as_str(), SHA1);
        assert_eq!(first.author(), "Jonas Fonseca");
        assert_eq!(first.title(), "First");
        assert_eq!(lines[1].as_commit().unwrap().title(), "Second");
        assert!(lines.iter().all(|l| l.line_type() == LineType::Commit));
    }

    #[test]
    fn records_before_first_commit_ignored() {
        let mut ops = MainOps::new();
        let records = vec!["garbage".to_string(), "    indented".to_string()];
        assert!(feed(&mut ops, &records).is_empty());
    }

    #[test]
    fn commit_without_subject_flushed_by_next_commit() {
        let mut ops = MainOps::new();
        let records = vec![format!("commit {SHA1}"), format!("commit {SHA2}"), "    Two".to_string()];
        let lines = feed(&mut ops, &records);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_commit().unwrap().title(), "");
        assert_eq!(lines[1].as_commit().unwrap().title(), "Two");
    }

    #[test]
    fn trailing_commit_without_subject_flushed_at_finish() {
        let mut ops = MainOps::new();
        let lines = feed(&mut ops, &[format!("commit {SHA1}")]);
        assert_eq!(lines.len(), 1);
        assert!(ops.finish().is_none(), "nothing left after flush");
    }

    #[test]
    fn draw_summary_row() {
        let mut ops = MainOps::new();
        let lines = feed(&mut ops, &raw_commit(SHA1, "Cogito 0.17.1"));
        let refs = RefMap::parse(&format!("{SHA1}\trefs/tags/cogito-0.17.1\n"));
        let styles = LineStyles::with_color_config(ColorConfig::new(true));
        let ctx = DrawContext {
            width: 100,
            tab_size: 8,
            selected: false,
            refs: &refs,
            styles: &styles,
        };

        let row = rendered(&ops.draw(&lines[0], &ctx));
        assert_eq!(
            row,
            "2006-03-26 18:42 1111111 Jonas Fonseca        [cogito-0.17.1] Cogito 0.17.1"
        );
    }

    #[test]
    fn draw_truncates_and_highlights() {
        let mut ops = MainOps::new();
        let lines = feed(&mut ops, &raw_commit(SHA1, "Subject"));
        let refs = RefMap::new();
        let styles = LineStyles::with_color_config(ColorConfig::new(true));
        let ctx = DrawContext {
            width: 20,
            tab_size: 8,
            selected: true,
            refs: &refs,
            styles: &styles,
        };

        let row = ops.draw(&lines[0], &ctx);
        assert_eq!(rendered(&row), "2006-03-26 18:42 111");
        assert!(row.spans.iter().all(|span| span.style == styles.cursor()));
    }

    #[test]
    fn selected_short_row_is_padded() {
        let mut ops = MainOps::new();
        let lines = feed(&mut ops, &raw_commit(SHA1, "S"));
        let refs = RefMap::new();
        let styles = LineStyles::with_color_config(ColorConfig::new(false));
        let ctx = DrawContext {
            width: 80,
            tab_size: 8,
            selected: true,
            refs: &refs,
            styles: &styles,
        };
        let row = rendered(&ops.draw(&lines[0], &ctx));
        assert_eq!(display_width(&row), 80);
    }

    #[test]
    fn enter_opens_diff_for_commit() {
        let commit = Commit::new(CommitId::new(SHA2).unwrap(), "a", None, "t");
        let ops = MainOps::new();
        assert_eq!(
            ops.enter(&Line::commit(commit)),
            EnterAction::Open {
                kind: ViewKind::Diff,
                reference: SHA2.to_string()
            }
        );
    }

    #[test]
    fn enter_on_text_line_does_nothing() {
        let ops = MainOps::new();
        assert_eq!(
            ops.enter(&Line::text(LineType::Error, "failed")),
            EnterAction::None
        );
    }
}
