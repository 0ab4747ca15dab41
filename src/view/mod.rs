//! TUI rendering and terminal management (impure shell)

mod layout;

pub use crate::view_state::styles::{ColorConfig, LineStyles};
pub use layout::render_layout;

use crate::config::keybindings::KeyBindings;
use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::state::{handle_action, ActionOutcome, ViewEngine};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Input poll timeout while the active view is loading.
const LOADING_POLL: Duration = Duration::from_millis(10);
/// Input poll timeout when nothing is streaming.
const IDLE_POLL: Duration = Duration::from_millis(500);
/// Time spent reading records between input polls.
const TICK_BUDGET: Duration = Duration::from_millis(15);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be resolved
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Log file setup failed
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    engine: ViewEngine,
    key_bindings: KeyBindings,
    styles: LineStyles,
    /// Revision given on the command line.
    reference: String,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Put the terminal in raw mode on the alternate screen and wrap `engine`.
    pub fn new(engine: ViewEngine, reference: String, styles: LineStyles) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, engine, reference, styles)
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. While the active view loads, input is
    /// polled with a short timeout so records keep flowing; otherwise the
    /// loop sleeps in `event::poll`.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = if self.engine.is_loading() {
                LOADING_POLL
            } else {
                IDLE_POLL
            };

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) == ActionOutcome::Quit {
                            return Ok(());
                        }
                    }
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height);
                    }
                    _ => {}
                }
            }

            self.engine.tick_for(TICK_BUDGET);
            if self.engine.take_dirty() {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Wrap an existing terminal, sizing every view to it.
    pub fn with_terminal(
        terminal: Terminal<B>,
        mut engine: ViewEngine,
        reference: String,
        styles: LineStyles,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        engine.handle_resize(size.width, size.height);
        Ok(Self {
            terminal,
            engine,
            key_bindings: KeyBindings::default(),
            styles,
            reference,
        })
    }

    pub fn engine(&self) -> &ViewEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ViewEngine {
        &mut self.engine
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Handle a single keyboard event
    pub fn handle_key(&mut self, key: KeyEvent) -> ActionOutcome {
        match self.key_bindings.get(key) {
            Some(action) => handle_action(&mut self.engine, action, &self.reference),
            None => ActionOutcome::Continue,
        }
    }

    /// Handle a terminal resize event
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.engine.handle_resize(width, height);
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), TuiError> {
        self.terminal.draw(|frame| {
            render_layout(frame, &self.engine, &self.styles);
        })?;
        Ok(())
    }
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(engine: ViewEngine, reference: String, styles: LineStyles) -> Result<(), TuiError> {
    let mut app = TuiApp::new(engine, reference, styles)?;
    info!("Entering event loop");

    let result = app.run();

    restore_terminal()?;
    debug!("Terminal restored");
    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
