//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Cursor movement
    /// Move the cursor up one line. Default: k/↑
    MoveUp,
    /// Move the cursor down one line. Default: j/↓
    MoveDown,
    /// Move the cursor up one page. Default: Page Up/b/-
    PageUp,
    /// Move the cursor down one page. Default: Page Down/Space
    PageDown,
    /// Jump to the first line. Default: Home
    MoveFirst,
    /// Jump to the last line. Default: End
    MoveLast,

    // Scrolling without moving the cursor
    /// Scroll the view up one line. Default: Insert
    ScrollLineUp,
    /// Scroll the view down one line. Default: Delete
    ScrollLineDown,

    // Navigation
    /// Act on the line under the cursor. Default: Enter
    Enter,
    /// Close the current view and return to the previous one. Default: q
    Back,
    /// Open the main (commit summary) view. Default: m
    ViewMain,
    /// Open the log view. Default: l
    ViewLog,
    /// Open the diff view for the current reference. Default: d
    ViewDiff,

    // Loading
    /// Stop the active view's command. Default: z
    StopLoading,

    /// Quit the application. Default: Q/Ctrl+C
    Quit,
}
