//! Command-line templates with `%s` reference slots.

use crate::view_state::kind::ViewKind;
use std::fmt;
use thiserror::Error;

/// Maximum number of `%s` slots a template may contain.
pub const MAX_SLOTS: usize = 5;

/// Errors in a command template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// More `%s` slots than [`MAX_SLOTS`].
    #[error("Command template has {found} %s slots, at most {MAX_SLOTS} are allowed: {template}")]
    TooManySlots { template: String, found: usize },

    /// Template is empty or whitespace.
    #[error("Command template is empty")]
    Empty,
}

/// A shell command line with up to five `%s` slots for the reference
/// (revision, commit id) the view is scoped to.
///
/// `%%` is a literal percent sign. Every slot receives the same reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate(String);

impl CommandTemplate {
    /// Smart constructor: validates slot count.
    pub fn new(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();
        if template.trim().is_empty() {
            return Err(TemplateError::Empty);
        }
        let found = count_slots(&template);
        if found > MAX_SLOTS {
            return Err(TemplateError::TooManySlots { template, found });
        }
        Ok(Self(template))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute `reference` into every slot.
    pub fn resolve(&self, reference: &str) -> String {
        let mut resolved = String::with_capacity(self.0.len() + reference.len());
        let mut chars = self.0.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                resolved.push(ch);
                continue;
            }
            match chars.peek() {
                Some('s') => {
                    chars.next();
                    resolved.push_str(reference);
                }
                Some('%') => {
                    chars.next();
                    resolved.push('%');
                }
                _ => resolved.push('%'),
            }
        }
        resolved
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default main view command.
pub const DEFAULT_MAIN_CMD: &str = "git log --topo-order --stat --pretty=raw %s";
/// Default log view command.
pub const DEFAULT_LOG_CMD: &str = "git log --cc --stat -n100 %s";
/// Default diff view command.
pub const DEFAULT_DIFF_CMD: &str = "git show --patch-with-stat --find-copies-harder -B -C %s";
/// Default reference listing command.
pub const DEFAULT_LS_REMOTE_CMD: &str = "git ls-remote . 2>/dev/null";

/// Command templates bound to the view kinds that run a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCommands {
    pub main: CommandTemplate,
    pub log: CommandTemplate,
    pub diff: CommandTemplate,
}

impl ViewCommands {
    /// Template for `kind`, `None` for the stdin pager.
    pub fn for_kind(&self, kind: ViewKind) -> Option<&CommandTemplate> {
        match kind {
            ViewKind::Main => Some(&self.main),
            ViewKind::Log => Some(&self.log),
            ViewKind::Diff => Some(&self.diff),
            ViewKind::Pager => None,
        }
    }
}

impl CommandTemplate {
    /// Reference listing command used when none is configured.
    pub fn default_ls_remote() -> Self {
        Self(DEFAULT_LS_REMOTE_CMD.to_string())
    }
}

impl Default for ViewCommands {
    fn default() -> Self {
        Self {
            main: CommandTemplate(DEFAULT_MAIN_CMD.to_string()),
            log: CommandTemplate(DEFAULT_LOG_CMD.to_string()),
            diff: CommandTemplate(DEFAULT_DIFF_CMD.to_string()),
        }
    }
}

fn count_slots(template: &str) -> usize {
    let mut count = 0;
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch == '%' {
            match chars.next() {
                Some('s') => count += 1,
                Some(_) | None => {}
            }
        }
    }
    count
}
