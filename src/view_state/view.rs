//! One navigable view: line store, scroll state and its live stream.

use super::kind::{DrawContext, EnterAction, ViewKind, ViewOps};
use super::line_store::LineStore;
use super::scroll::{percentage, Movement, ScrollState};
use crate::model::{CommandError, Line, LineType};
use crate::parser::RefMap;
use crate::source::{SourceSpec, StreamEvent, StreamReader};
use super::styles::LineStyles;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Elapsed time is only shown once loading has taken longer than this.
pub const ELAPSED_THRESHOLD: Duration = Duration::from_secs(2);

/// Loading state of a view.
///
/// `Loading → Static` on successful EOF or stop, `Loading → Failed` on
/// spawn failure or unsuccessful exit. Both end states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Static,
    Failed,
}

/// Result of reading at most one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A record produced a new line.
    Appended,
    /// A record was consumed without producing a line.
    Folded,
    /// No record available yet.
    Pending,
    /// Stream ended successfully; the view is now static.
    Finished,
    /// Stream failed; the view is now failed.
    Failed,
    /// The view has no stream.
    Idle,
}

impl ReadOutcome {
    /// Whether the display may have changed.
    pub fn changed(self) -> bool {
        matches!(
            self,
            ReadOutcome::Appended | ReadOutcome::Finished | ReadOutcome::Failed
        )
    }
}

/// A view backed by a line store and optionally a live command.
#[derive(Debug)]
pub struct View {
    kind: ViewKind,
    reference: String,
    source: SourceSpec,
    ops: ViewOps,
    lines: LineStore,
    scroll: ScrollState,
    stream: Option<StreamReader>,
    state: LoadState,
    error: Option<CommandError>,
    start_time: Instant,
}

impl View {
    /// Create a view and start its source.
    ///
    /// A source that cannot be started yields a `Failed` view showing the
    /// error in place of content.
    pub fn open(
        kind: ViewKind,
        reference: impl Into<String>,
        source: SourceSpec,
        width: u16,
        height: usize,
    ) -> Self {
        let reference = reference.into();
        let mut view = Self {
            kind,
            reference,
            ops: ViewOps::for_kind(kind),
            lines: LineStore::new(),
            scroll: ScrollState::new(width, height),
            stream: None,
            state: LoadState::Loading,
            error: None,
            start_time: Instant::now(),
            source,
        };

        match view.source.open() {
            Ok(stream) => {
                debug!(kind = %kind, source = view.source.label(), "Opened view");
                view.stream = Some(stream);
            }
            Err(err) => {
                warn!(kind = %kind, %err, "Failed to open view");
                view.lines.push(Line::text(LineType::Error, err.to_string()));
                view.fail(err);
            }
        }
        view
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Revision or commit the view is scoped to.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Resolved command line, or the source label for stdin.
    pub fn command(&self) -> &str {
        self.source.label()
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn error(&self) -> Option<&CommandError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Process id of the backing command while it runs.
    pub fn child_id(&self) -> Option<u32> {
        self.stream.as_ref().and_then(StreamReader::child_id)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Consume at most one record from the stream.
    pub fn read_once(&mut self) -> ReadOutcome {
        let Some(stream) = self.stream.as_mut() else {
            return ReadOutcome::Idle;
        };

        match stream.poll() {
            StreamEvent::Record(raw) => match self.ops.read(self.lines.last(), &raw) {
                Some(line) => {
                    self.lines.push(line);
                    ReadOutcome::Appended
                }
                None => ReadOutcome::Folded,
            },
            StreamEvent::Pending => ReadOutcome::Pending,
            StreamEvent::Eof => {
                self.end_stream();
                self.state = LoadState::Static;
                debug!(kind = %self.kind, lines = self.lines.len(), "View loaded");
                ReadOutcome::Finished
            }
            StreamEvent::Error(err) => {
                self.end_stream();
                self.fail(err);
                ReadOutcome::Failed
            }
        }
    }

    /// Terminate the backing command and discard unread records.
    ///
    /// Returns `false` if the view was not loading.
    pub fn stop(&mut self) -> bool {
        let Some(mut stream) = self.stream.take() else {
            return false;
        };
        stream.stop();
        self.state = LoadState::Static;
        debug!(kind = %self.kind, lines = self.lines.len(), "Stopped loading");
        true
    }

    fn end_stream(&mut self) {
        if let Some(line) = self.ops.finish() {
            self.lines.push(line);
        }
        self.stream = None;
    }

    fn fail(&mut self, err: CommandError) {
        self.state = LoadState::Failed;
        self.error = Some(err);
    }

    pub fn move_cursor(&mut self, movement: Movement) {
        self.scroll.move_cursor(movement, self.lines.len());
    }

    pub fn scroll_lines(&mut self, delta: isize) {
        self.scroll.scroll_lines(delta, self.lines.len());
    }

    pub fn resize(&mut self, width: u16, height: usize) {
        self.scroll.resize(width, height, self.lines.len());
    }

    /// Line under the cursor.
    pub fn cursor_line(&self) -> Option<&Line> {
        self.lines.get(self.scroll.cursor())
    }

    pub fn enter(&self) -> EnterAction {
        self.cursor_line()
            .map_or(EnterAction::None, |line| self.ops.enter(line))
    }

    /// Title bar text using the view's own elapsed time.
    pub fn title(&self) -> String {
        self.title_with_elapsed(self.elapsed())
    }

    /// Title bar text split into the plain head and the failure marker,
    /// which is `None` unless the command failed.
    pub fn title_parts(&self) -> (String, Option<String>) {
        (self.title_head(self.elapsed()), self.failure_marker())
    }

    /// `[kind] ref - item N of M (P%)`, plus elapsed seconds while loading
    /// slowly and a failure marker.
    pub fn title_with_elapsed(&self, elapsed: Duration) -> String {
        let mut title = self.title_head(elapsed);
        if let Some(marker) = self.failure_marker() {
            title.push_str(&marker);
        }
        title
    }

    fn title_head(&self, elapsed: Duration) -> String {
        let mut title = format!("[{}] {}", self.kind, self.reference);

        let total = self.lines.len();
        if total > 0 || self.is_loading() {
            let line_number = if total == 0 { 0 } else { self.scroll.cursor() + 1 };
            title.push_str(&format!(
                " - {} {} of {} ({}%)",
                self.kind.item_label(),
                line_number,
                total,
                percentage(self.scroll.cursor(), total)
            ));
        }

        if self.is_loading() && elapsed > ELAPSED_THRESHOLD {
            title.push_str(&format!(" {}s", elapsed.as_secs()));
        }

        title
    }

    fn failure_marker(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|err| format!(" [failed: {}]", err.short_label()))
    }

    /// Draw the rows currently inside the viewport, top to bottom.
    pub fn draw_rows(
        &self,
        refs: &RefMap,
        styles: &LineStyles,
        tab_size: usize,
    ) -> Vec<ratatui::text::Line<'static>> {
        let visible = self.scroll.visible(self.lines.len());
        let cursor = self.scroll.cursor();
        self.lines
            .window(visible.start, visible.len())
            .iter()
            .enumerate()
            .map(|(row, line)| {
                let ctx = DrawContext {
                    width: self.scroll.width(),
                    tab_size,
                    selected: visible.start + row == cursor,
                    refs,
                    styles,
                };
                self.ops.draw(line, &ctx)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_state::styles::ColorConfig;
    use std::thread;

    fn drain(view: &mut View) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while view.is_loading() && Instant::now() < deadline {
            if view.read_once() == ReadOutcome::Pending {
                thread::sleep(Duration::from_millis(2));
            }
        }
        assert!(!view.is_loading(), "view did not finish loading");
    }

    fn command(cmd: &str) -> SourceSpec {
        SourceSpec::Command(cmd.to_string())
    }

    #[test]
    fn loads_classified_lines_and_becomes_static() {
        let mut view = View::open(
            ViewKind::Diff,
            "abc",
            command("printf 'diff --git a/x b/x\\n+new\\n-old\\n'"),
            80,
            10,
        );
        assert!(view.is_loading());
        drain(&mut view);

        assert_eq!(view.state(), LoadState::Static);
        let types: Vec<_> = view.lines().iter().map(Line::line_type).collect();
        assert_eq!(
            types,
            [LineType::DiffHeader, LineType::DiffAdd, LineType::DiffDel]
        );
        assert!(view.child_id().is_none());
    }

    #[test]
    fn blank_runs_fold_to_one() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("printf 'a\\n\\n\\n\\nb\\n'"), 80, 10);
        drain(&mut view);
        let texts: Vec<_> = view.lines().iter().filter_map(Line::as_text).collect();
        assert_eq!(texts, ["a", "", "b"]);
    }

    #[test]
    fn nonzero_exit_fails_but_keeps_output() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("echo kept; exit 1"), 80, 10);
        drain(&mut view);

        assert_eq!(view.state(), LoadState::Failed);
        assert_eq!(view.lines().len(), 1);
        assert_eq!(view.lines()[0].as_text(), Some("kept"));
        assert!(view.title().ends_with("[failed: exit 1]"), "{}", view.title());
    }

    #[test]
    fn title_parts_separate_failure_marker() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("echo kept; exit 1"), 80, 10);
        drain(&mut view);

        let (head, marker) = view.title_parts();
        assert_eq!(head, "[log] HEAD - line 1 of 1 (100%)");
        assert_eq!(marker.as_deref(), Some(" [failed: exit 1]"));
    }

    #[test]
    fn marker_text_in_reference_is_not_a_failure() {
        let mut view = View::open(ViewKind::Log, "a [failed: b", command("echo ok"), 80, 10);
        drain(&mut view);

        let (head, marker) = view.title_parts();
        assert_eq!(head, "[log] a [failed: b - line 1 of 1 (100%)");
        assert_eq!(marker, None);
    }

    #[test]
    fn failed_view_still_scrolls() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("printf 'a\\nb\\nc\\n'; exit 1"), 80, 2);
        drain(&mut view);
        view.move_cursor(Movement::Last);
        assert_eq!(view.scroll().cursor(), 2);
        assert_eq!(view.scroll().offset(), 1);
    }

    #[test]
    fn title_shows_position_and_percentage() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("seq 1 10"), 80, 5);
        drain(&mut view);
        view.move_cursor(Movement::Down);
        assert_eq!(view.title(), "[log] HEAD - line 2 of 10 (20%)");
    }

    #[test]
    fn title_shows_elapsed_only_while_loading_slowly() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("sleep 5"), 80, 5);
        assert_eq!(
            view.title_with_elapsed(Duration::from_secs(1)),
            "[log] HEAD - line 0 of 0 (0%)"
        );
        assert_eq!(
            view.title_with_elapsed(Duration::from_secs(3)),
            "[log] HEAD - line 0 of 0 (0%) 3s"
        );
        view.stop();
        assert_eq!(view.title_with_elapsed(Duration::from_secs(3)), "[log] HEAD");
    }

    #[test]
    fn stop_discards_unread_records() {
        let mut view = View::open(ViewKind::Pager, "yes", command("yes line"), 80, 5);
        let deadline = Instant::now() + Duration::from_secs(5);
        while view.lines().len() < 3 && Instant::now() < deadline {
            view.read_once();
        }
        let before = view.lines().len();

        assert!(view.stop());
        assert_eq!(view.state(), LoadState::Static);
        assert_eq!(view.read_once(), ReadOutcome::Idle);
        assert_eq!(view.lines().len(), before);
        assert!(!view.stop(), "second stop is a no-op");
    }

    #[test]
    fn enter_on_empty_view_does_nothing() {
        let mut view = View::open(ViewKind::Main, "HEAD", command("true"), 80, 5);
        drain(&mut view);
        assert_eq!(view.enter(), EnterAction::None);
    }

    #[test]
    fn draw_rows_covers_viewport_and_marks_cursor() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("seq 1 10"), 8, 3);
        drain(&mut view);
        view.move_cursor(Movement::Down);

        let styles = LineStyles::with_color_config(ColorConfig::new(true));
        let rows = view.draw_rows(&RefMap::new(), &styles, 8);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].spans[0].style, styles.cursor());
        assert_eq!(rows[0].spans[0].content, "1");
    }

    #[test]
    fn draw_rows_start_at_scroll_offset() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("seq 1 10"), 8, 3);
        drain(&mut view);
        view.move_cursor(Movement::Last);

        let styles = LineStyles::with_color_config(ColorConfig::new(true));
        let rows = view.draw_rows(&RefMap::new(), &styles, 8);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].spans[0].content, "8");
        assert_eq!(rows[2].spans[0].content, "10");
        assert_eq!(rows[2].spans[0].style, styles.cursor());
        assert_ne!(rows[0].spans[0].style, styles.cursor());
    }

    #[test]
    fn resize_reclamps_cursor() {
        let mut view = View::open(ViewKind::Log, "HEAD", command("seq 1 10"), 80, 10);
        drain(&mut view);
        view.move_cursor(Movement::Last);
        view.resize(40, 3);
        assert_eq!(view.scroll().offset(), 7);
        assert_eq!(view.scroll().cursor(), 9);
        assert_eq!(view.scroll().width(), 40);
    }
}
