//! Keyboard action dispatch onto the view engine.

use crate::model::{KeyAction, Line};
use crate::state::engine::ViewEngine;
use crate::view_state::{Movement, ViewKind};
use tracing::debug;

/// What the event loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Continue,
    Quit,
}

/// Apply `action` to the engine.
///
/// `reference` is the revision given on the command line; view switches
/// that are not tied to a selected commit are scoped to it.
pub fn handle_action(engine: &mut ViewEngine, action: KeyAction, reference: &str) -> ActionOutcome {
    debug!(?action, "Handling key action");
    match action {
        KeyAction::MoveUp => {
            engine.handle_cursor_move(Movement::Up);
        }
        KeyAction::MoveDown => {
            engine.handle_cursor_move(Movement::Down);
        }
        KeyAction::PageUp => {
            engine.handle_cursor_move(Movement::PageUp);
        }
        KeyAction::PageDown => {
            engine.handle_cursor_move(Movement::PageDown);
        }
        KeyAction::MoveFirst => {
            engine.handle_cursor_move(Movement::First);
        }
        KeyAction::MoveLast => {
            engine.handle_cursor_move(Movement::Last);
        }
        KeyAction::ScrollLineUp => {
            engine.handle_scroll(-1);
        }
        KeyAction::ScrollLineDown => {
            engine.handle_scroll(1);
        }
        KeyAction::Enter => {
            engine.handle_enter();
        }
        KeyAction::Back => {
            if engine.handle_back().is_none() {
                return ActionOutcome::Quit;
            }
        }
        KeyAction::ViewMain => {
            engine.open_view(ViewKind::Main, reference);
        }
        KeyAction::ViewLog => {
            engine.open_view(ViewKind::Log, reference);
        }
        KeyAction::ViewDiff => {
            let target = selected_commit(engine).unwrap_or_else(|| reference.to_string());
            engine.open_view(ViewKind::Diff, &target);
        }
        KeyAction::StopLoading => {
            engine.stop_loading();
        }
        KeyAction::Quit => return ActionOutcome::Quit,
    }
    ActionOutcome::Continue
}

/// Id of the commit under the cursor in a main view.
fn selected_commit(engine: &ViewEngine) -> Option<String> {
    engine
        .active()
        .and_then(|view| view.cursor_line())
        .and_then(Line::as_commit)
        .map(|commit| commit.id().to_string())
}
