//! Cursor and scroll offset of a view.
//!
//! # Invariants
//!
//! After every operation, with `total` lines and a viewport of `height` rows:
//!
//! - `offset <= max(0, total - height)`
//! - `cursor < total` (or `cursor == 0` when empty)
//! - `offset <= cursor < offset + height` whenever `height > 0`
//!
//! A zero-height viewport shows nothing and never moves the offset.

use std::ops::Range;

/// Cursor movement requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
}

/// Largest valid offset for `total` lines in a `height`-row viewport.
pub fn max_offset(total: usize, height: usize) -> usize {
    total.saturating_sub(height)
}

/// Position of the cursor through the view, `floor((cursor+1)*100/total)`.
///
/// Zero for an empty view.
pub fn percentage(cursor: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (cursor + 1).saturating_mul(100) / total
}

/// Scroll/cursor state of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    offset: usize,
    cursor: usize,
    width: u16,
    height: usize,
}

impl ScrollState {
    pub fn new(width: u16, height: usize) -> Self {
        Self {
            offset: 0,
            cursor: 0,
            width,
            height,
        }
    }

    /// Index of the first visible line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Index of the highlighted line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Line indices currently on screen.
    pub fn visible(&self, total: usize) -> Range<usize> {
        let start = self.offset.min(total);
        let end = self.offset.saturating_add(self.height).min(total);
        start..end
    }

    /// Move the cursor, scrolling only as far as needed to keep it visible.
    pub fn move_cursor(&mut self, movement: Movement, total: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        let last = total - 1;

        match movement {
            Movement::Up => {
                self.cursor = self.cursor.saturating_sub(1).min(last);
                self.follow_cursor(total);
            }
            Movement::Down => {
                self.cursor = self.cursor.saturating_add(1).min(last);
                self.follow_cursor(total);
            }
            Movement::PageUp => {
                self.offset = self.offset.saturating_sub(self.height);
                self.cursor = self.cursor.saturating_sub(self.height).min(last);
                self.keep_cursor_in_window(total);
            }
            Movement::PageDown => {
                self.offset = self
                    .offset
                    .saturating_add(self.height)
                    .min(max_offset(total, self.height));
                self.cursor = self.cursor.saturating_add(self.height).min(last);
                self.keep_cursor_in_window(total);
            }
            Movement::First => {
                self.cursor = 0;
                self.offset = 0;
            }
            Movement::Last => {
                self.cursor = last;
                self.follow_cursor(total);
            }
        }
    }

    /// Scroll the viewport by `delta` lines, dragging the cursor along when
    /// it would leave the screen.
    pub fn scroll_lines(&mut self, delta: isize, total: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        if self.height == 0 {
            return;
        }
        let target = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        self.offset = target.min(max_offset(total, self.height));
        self.keep_cursor_in_window(total);
    }

    /// Apply a new viewport size and re-clamp against `total`.
    pub fn resize(&mut self, width: u16, height: usize, total: usize) {
        self.width = width;
        self.height = height;
        self.clamp(total);
    }

    /// Re-establish the invariants for `total` lines.
    ///
    /// Called after resizes; never assumes the previous state was valid.
    pub fn clamp(&mut self, total: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        self.cursor = self.cursor.min(total - 1);
        self.offset = self.offset.min(max_offset(total, self.height));
        self.follow_cursor(total);
    }

    fn reset(&mut self) {
        self.offset = 0;
        self.cursor = 0;
    }

    /// Shift the offset just enough for the cursor to be visible.
    fn follow_cursor(&mut self, total: usize) {
        if self.height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
        self.offset = self.offset.min(max_offset(total, self.height));
    }

    /// Pull the cursor into the visible window without moving the offset.
    fn keep_cursor_in_window(&mut self, total: usize) {
        if self.height == 0 {
            return;
        }
        let first = self.offset;
        let last = (self.offset + self.height).min(total).saturating_sub(1);
        self.cursor = self.cursor.clamp(first, last.max(first));
    }
}
