//! Line type styling configuration.
//!
//! Maps each [`LineType`] and each piece of chrome (cursor, title bar,
//! main view columns) to a ratatui [`Style`].

use crate::model::LineType;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== LineStyles =====

/// Styles for view rows and chrome.
///
/// With colors disabled every style is plain except the cursor and title
/// bar, which fall back to reverse video so they stay visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStyles {
    colors: bool,
}

impl LineStyles {
    pub fn with_color_config(config: ColorConfig) -> Self {
        Self {
            colors: config.colors_enabled(),
        }
    }

    fn fg(&self, color: Color) -> Style {
        if self.colors {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    /// Style for a classified text line.
    pub fn for_type(&self, line_type: LineType) -> Style {
        match line_type {
            LineType::DiffHeader | LineType::DiffMeta | LineType::Date => self.fg(Color::Yellow),
            LineType::CommitDate | LineType::Signoff => self.fg(Color::Yellow),
            LineType::DiffChunk | LineType::Committer => self.fg(Color::Magenta),
            LineType::DiffAdd | LineType::DiffNewFile | LineType::Commit => self.fg(Color::Green),
            LineType::DiffDel | LineType::DiffOldFile | LineType::Error => self.fg(Color::Red),
            LineType::DiffIndex | LineType::Merge | LineType::Parent | LineType::Tree => {
                self.fg(Color::Blue)
            }
            LineType::Author => self.fg(Color::Cyan),
            LineType::Default => Style::default(),
        }
    }

    /// Row under the cursor.
    pub fn cursor(&self) -> Style {
        if self.colors {
            Style::default()
                .fg(Color::White)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    /// Title bar of the active view.
    pub fn title(&self) -> Style {
        if self.colors {
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    /// Failure marker in the title bar.
    pub fn title_failed(&self) -> Style {
        if self.colors {
            self.title().fg(Color::Red)
        } else {
            self.title().add_modifier(Modifier::BOLD)
        }
    }

    /// Bottom status line.
    pub fn status(&self) -> Style {
        Style::default()
    }

    /// Main view date column.
    pub fn main_date(&self) -> Style {
        self.fg(Color::Blue)
    }

    /// Main view abbreviated id column.
    pub fn main_id(&self) -> Style {
        self.fg(Color::Yellow)
    }

    /// Main view author column.
    pub fn main_author(&self) -> Style {
        self.fg(Color::Green)
    }

    /// `[ref]` annotations in the main view.
    pub fn main_ref(&self) -> Style {
        if self.colors {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }

    /// Commit subject in the main view.
    pub fn main_title(&self) -> Style {
        Style::default()
    }
}

// ===== Tests =====
