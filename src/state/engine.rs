//! The view engine: one active view plus a navigation history.
//!
//! The engine is driven from outside. The event loop calls [`ViewEngine::tick`]
//! to pull records into the active view and forwards user intent through the
//! `handle_*` entry points. Views in the history are inert: their streams are
//! not polled until they become active again.

use crate::parser::RefMap;
use crate::source::{SourceSpec, ViewCommands};
use crate::view_state::{
    EnterAction, LoadState, Movement, ReadOutcome, View, ViewKind, DEFAULT_TAB_SIZE,
    ELAPSED_THRESHOLD,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Rows taken by the title bar and status line below the view.
pub const CHROME_ROWS: u16 = 2;

/// Report shown while a freshly opened view loads.
pub const REPORT_LOADING: &str = "Loading...";
/// Report after the user stopped the active view's command.
pub const REPORT_STOPPED: &str = "Stopped loading";
/// Report when going back with an empty history.
pub const REPORT_NO_PREVIOUS: &str = "No previous view";

/// Snapshot of the engine for the surrounding chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    /// Kind of the active view, `None` before any view was opened.
    pub kind: Option<ViewKind>,
    /// Title bar text of the active view.
    pub title: String,
    pub state: Option<LoadState>,
    /// Last status-line message.
    pub report: Option<String>,
    /// Number of views in the history.
    pub depth: usize,
}

/// Owns the active view and the views it was entered from.
#[derive(Debug)]
pub struct ViewEngine {
    active: Option<View>,
    history: Vec<View>,
    commands: ViewCommands,
    refs: RefMap,
    tab_size: usize,
    width: u16,
    height: u16,
    report: Option<String>,
    dirty: bool,
    /// Elapsed seconds last shown in the title, to redraw once per second.
    shown_elapsed: u64,
}

impl ViewEngine {
    /// Create an engine for a terminal of `width` x `height` cells.
    pub fn new(commands: ViewCommands, refs: RefMap, width: u16, height: u16) -> Self {
        Self {
            active: None,
            history: Vec::new(),
            commands,
            refs,
            tab_size: DEFAULT_TAB_SIZE,
            width,
            height,
            report: None,
            dirty: true,
            shown_elapsed: 0,
        }
    }

    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    pub fn active(&self) -> Option<&View> {
        self.active.as_ref()
    }

    /// Views the active one was entered from, oldest first.
    pub fn history(&self) -> &[View] {
        &self.history
    }

    pub fn refs(&self) -> &RefMap {
        &self.refs
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Rows available to the view itself.
    pub fn view_height(&self) -> usize {
        usize::from(self.height.saturating_sub(CHROME_ROWS))
    }

    /// Whether the active view still has a running command.
    pub fn is_loading(&self) -> bool {
        self.active.as_ref().is_some_and(View::is_loading)
    }

    /// Whether anything visible changed since the last [`take_dirty`](Self::take_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the redraw flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            kind: self.active.as_ref().map(View::kind),
            title: self.active.as_ref().map(View::title).unwrap_or_default(),
            state: self.active.as_ref().map(View::state),
            report: self.report.clone(),
            depth: self.history.len(),
        }
    }

    /// Open a view of `kind` scoped to `reference`, running its command.
    ///
    /// The current view moves into the history. Re-opening the view that is
    /// already active only reports it.
    pub fn open_view(&mut self, kind: ViewKind, reference: &str) -> EngineStatus {
        if let Some(view) = &self.active {
            if view.kind() == kind
                && view.reference() == reference
                && view.state() != LoadState::Failed
            {
                self.set_report(format!("Already in {kind} view"));
                return self.status();
            }
        }

        let source = match self.commands.for_kind(kind) {
            Some(template) => SourceSpec::Command(template.resolve(reference)),
            None => SourceSpec::Stdin,
        };
        self.open_source(kind, reference, source)
    }

    /// Open a view reading from an explicit source.
    pub fn open_source(
        &mut self,
        kind: ViewKind,
        reference: &str,
        source: SourceSpec,
    ) -> EngineStatus {
        info!(kind = %kind, reference, command = source.label(), "Opening view");

        let view = View::open(kind, reference, source, self.width, self.view_height());
        match view.error() {
            Some(err) => self.set_report(err.to_string()),
            None => self.set_report(REPORT_LOADING),
        }

        if let Some(previous) = self.active.replace(view) {
            debug!(kind = %previous.kind(), depth = self.history.len() + 1, "Pushed view");
            self.history.push(previous);
        }
        self.shown_elapsed = 0;
        self.dirty = true;
        self.status()
    }

    /// Consume at most one record for the active view.
    pub fn tick(&mut self) -> ReadOutcome {
        let Some(view) = self.active.as_mut() else {
            return ReadOutcome::Idle;
        };

        let outcome = view.read_once();
        match outcome {
            ReadOutcome::Finished => self.report = None,
            ReadOutcome::Failed => {
                if let Some(err) = view.error() {
                    warn!(kind = %view.kind(), %err, "View command failed");
                    self.report = Some(err.to_string());
                }
            }
            ReadOutcome::Appended | ReadOutcome::Folded | ReadOutcome::Pending | ReadOutcome::Idle => {}
        }

        if view.is_loading() {
            let elapsed = view.elapsed();
            if elapsed > ELAPSED_THRESHOLD && elapsed.as_secs() != self.shown_elapsed {
                self.shown_elapsed = elapsed.as_secs();
                self.dirty = true;
            }
        }

        if outcome.changed() {
            self.dirty = true;
        }
        outcome
    }

    /// Tick repeatedly until the stream has nothing ready or `budget` is spent.
    ///
    /// Returns the number of records consumed.
    pub fn tick_for(&mut self, budget: Duration) -> usize {
        let start = Instant::now();
        let mut consumed = 0;
        loop {
            match self.tick() {
                ReadOutcome::Appended | ReadOutcome::Folded => consumed += 1,
                ReadOutcome::Pending
                | ReadOutcome::Finished
                | ReadOutcome::Failed
                | ReadOutcome::Idle => break,
            }
            if start.elapsed() >= budget {
                break;
            }
        }
        consumed
    }

    pub fn handle_cursor_move(&mut self, movement: Movement) -> EngineStatus {
        if let Some(view) = self.active.as_mut() {
            view.move_cursor(movement);
            self.dirty = true;
        }
        self.status()
    }

    /// Scroll the viewport by `delta` lines without moving the cursor
    /// unless it would leave the screen.
    pub fn handle_scroll(&mut self, delta: isize) -> EngineStatus {
        if let Some(view) = self.active.as_mut() {
            view.scroll_lines(delta);
            self.dirty = true;
        }
        self.status()
    }

    /// Act on the line under the cursor.
    pub fn handle_enter(&mut self) -> EngineStatus {
        let action = self
            .active
            .as_ref()
            .map_or(EnterAction::None, View::enter);

        match action {
            EnterAction::Open { kind, reference } => self.open_view(kind, &reference),
            EnterAction::ScrollLineDown => self.handle_scroll(1),
            EnterAction::None => self.status(),
        }
    }

    /// Discard the active view and resume the previous one.
    ///
    /// Returns `None` when there is no previous view; the active view is
    /// left in place and a report is set.
    pub fn handle_back(&mut self) -> Option<EngineStatus> {
        let Some(previous) = self.history.pop() else {
            self.set_report(REPORT_NO_PREVIOUS);
            return None;
        };

        if let Some(mut closed) = self.active.replace(previous) {
            closed.stop();
            debug!(kind = %closed.kind(), lines = closed.lines().len(), "Closed view");
        }
        self.report = None;
        self.shown_elapsed = 0;
        self.dirty = true;
        Some(self.status())
    }

    /// Apply a new terminal size to every retained view.
    pub fn handle_resize(&mut self, width: u16, height: u16) -> EngineStatus {
        debug!(width, height, "Handling resize");
        self.width = width;
        self.height = height;
        let view_height = self.view_height();
        for view in self.active.iter_mut().chain(self.history.iter_mut()) {
            view.resize(width, view_height);
        }
        self.dirty = true;
        self.status()
    }

    /// Terminate the active view's command, keeping what was read.
    pub fn stop_loading(&mut self) -> EngineStatus {
        if self.active.as_mut().is_some_and(View::stop) {
            self.set_report(REPORT_STOPPED);
            self.dirty = true;
        }
        self.status()
    }

    fn set_report(&mut self, message: impl Into<String>) {
        self.report = Some(message.into());
        self.dirty = true;
    }
}
