//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Defaults follow tig's pager keys with vim-style j/k added.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };
        let none = KeyModifiers::NONE;

        // Cursor movement
        keys.bind(KeyCode::Char('k'), none, KeyAction::MoveUp);
        keys.bind(KeyCode::Up, none, KeyAction::MoveUp);
        keys.bind(KeyCode::Char('j'), none, KeyAction::MoveDown);
        keys.bind(KeyCode::Down, none, KeyAction::MoveDown);

        // Page navigation
        keys.bind(KeyCode::PageUp, none, KeyAction::PageUp);
        keys.bind(KeyCode::Char('b'), none, KeyAction::PageUp);
        keys.bind(KeyCode::Char('-'), none, KeyAction::PageUp);
        keys.bind(KeyCode::PageDown, none, KeyAction::PageDown);
        keys.bind(KeyCode::Char(' '), none, KeyAction::PageDown);
        keys.bind(KeyCode::Home, none, KeyAction::MoveFirst);
        keys.bind(KeyCode::End, none, KeyAction::MoveLast);

        // Scrolling without moving the cursor
        keys.bind(KeyCode::Insert, none, KeyAction::ScrollLineUp);
        keys.bind(KeyCode::Delete, none, KeyAction::ScrollLineDown);

        // View navigation
        keys.bind(KeyCode::Enter, none, KeyAction::Enter);
        keys.bind(KeyCode::Char('q'), none, KeyAction::Back);
        keys.bind(KeyCode::Char('m'), none, KeyAction::ViewMain);
        keys.bind(KeyCode::Char('l'), none, KeyAction::ViewLog);
        keys.bind(KeyCode::Char('d'), none, KeyAction::ViewDiff);

        // Loading and application controls
        keys.bind(KeyCode::Char('z'), none, KeyAction::StopLoading);
        // Terminals disagree on whether shifted letters carry SHIFT.
        keys.bind(KeyCode::Char('Q'), KeyModifiers::SHIFT, KeyAction::Quit);
        keys.bind(KeyCode::Char('Q'), none, KeyAction::Quit);
        keys.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings_move_with_vim_and_arrows() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Char('j'))), Some(KeyAction::MoveDown));
        assert_eq!(bindings.get(key(KeyCode::Down)), Some(KeyAction::MoveDown));
        assert_eq!(bindings.get(key(KeyCode::Char('k'))), Some(KeyAction::MoveUp));
        assert_eq!(bindings.get(key(KeyCode::Up)), Some(KeyAction::MoveUp));
    }

    #[test]
    fn default_bindings_page_with_space_and_b() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Char(' '))), Some(KeyAction::PageDown));
        assert_eq!(bindings.get(key(KeyCode::Char('b'))), Some(KeyAction::PageUp));
        assert_eq!(bindings.get(key(KeyCode::Char('-'))), Some(KeyAction::PageUp));
    }

    #[test]
    fn lowercase_q_goes_back_uppercase_quits() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Char('q'))), Some(KeyAction::Back));
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn view_switch_keys() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Char('m'))), Some(KeyAction::ViewMain));
        assert_eq!(bindings.get(key(KeyCode::Char('l'))), Some(KeyAction::ViewLog));
        assert_eq!(bindings.get(key(KeyCode::Char('d'))), Some(KeyAction::ViewDiff));
        assert_eq!(bindings.get(key(KeyCode::Char('z'))), Some(KeyAction::StopLoading));
    }

    #[test]
    fn unbound_key_has_no_action() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Char('x'))), None);
    }
}
