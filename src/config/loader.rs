//! Configuration file loading with precedence handling.

use crate::source::{CommandTemplate, TemplateError, ViewCommands};
use crate::view_state::DEFAULT_TAB_SIZE;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TIGVIEW_CONFIG";
/// Environment override for the main view command.
pub const MAIN_CMD_ENV: &str = "TIG_MAIN_CMD";
/// Environment override for the log view command.
pub const LOG_CMD_ENV: &str = "TIG_LOG_CMD";
/// Environment override for the diff view command.
pub const DIFF_CMD_ENV: &str = "TIG_DIFF_CMD";
/// Environment override for the reference listing command.
pub const LS_REMOTE_ENV: &str = "TIG_LS_REMOTE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A command template from the file or environment is unusable.
    #[error("Invalid {name} command: {source}")]
    Template {
        /// Which command (`main`, `log`, `diff`, `ls_remote`).
        name: &'static str,
        #[source]
        source: TemplateError,
    },

    /// Tab size must be at least one column.
    #[error("Invalid tab size {0}, must be at least 1")]
    InvalidTabSize(usize),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/tigview/config.toml`.
///
/// ```toml
/// tab_size = 4
///
/// [commands]
/// main = "git log --topo-order --pretty=raw %s"
/// diff = "git show %s"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Columns per tab stop.
    #[serde(default)]
    pub tab_size: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Command templates per view.
    #[serde(default)]
    pub commands: Option<CommandsSection>,
}

/// `[commands]` section of the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct CommandsSection {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub log: Option<String>,
    #[serde(default)]
    pub diff: Option<String>,
    #[serde(default)]
    pub ls_remote: Option<String>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Columns per tab stop.
    pub tab_size: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Command template per view kind.
    pub commands: ViewCommands,
    /// Reference listing command.
    pub ls_remote: CommandTemplate,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            log_file_path: default_log_path(),
            commands: ViewCommands::default(),
            ls_remote: CommandTemplate::default_ls_remote(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/tigview/tigview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("tigview").join("tigview.log")
    } else {
        PathBuf::from("tigview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/tigview/config.toml` on Unix, appropriate path on other platforms.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tigview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `TIGVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/tigview/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// # Errors
///
/// Returns error if a command template or the tab size is invalid.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let mut config = ResolvedConfig::default();

    let Some(file) = config_file else {
        return Ok(config);
    };

    if let Some(tab_size) = file.tab_size {
        config.tab_size = validate_tab_size(tab_size)?;
    }
    if let Some(path) = file.log_file_path {
        config.log_file_path = path;
    }
    if let Some(commands) = file.commands {
        apply_commands(&mut config, commands)?;
    }

    Ok(config)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `TIG_MAIN_CMD`, `TIG_LOG_CMD`, `TIG_DIFF_CMD` and `TIG_LS_REMOTE`.
///
/// # Errors
///
/// Returns error if an overriding template is invalid.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    let env = CommandsSection {
        main: std::env::var(MAIN_CMD_ENV).ok(),
        log: std::env::var(LOG_CMD_ENV).ok(),
        diff: std::env::var(DIFF_CMD_ENV).ok(),
        ls_remote: std::env::var(LS_REMOTE_ENV).ok(),
    };
    apply_commands(&mut config, env)?;
    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
///
/// # Errors
///
/// Returns error if the tab size override is zero.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    tab_size_override: Option<usize>,
) -> Result<ResolvedConfig, ConfigError> {
    if let Some(tab_size) = tab_size_override {
        config.tab_size = validate_tab_size(tab_size)?;
    }
    Ok(config)
}

fn validate_tab_size(tab_size: usize) -> Result<usize, ConfigError> {
    if tab_size == 0 {
        return Err(ConfigError::InvalidTabSize(tab_size));
    }
    Ok(tab_size)
}

fn apply_commands(config: &mut ResolvedConfig, section: CommandsSection) -> Result<(), ConfigError> {
    if let Some(main) = section.main {
        config.commands.main = template("main", main)?;
    }
    if let Some(log) = section.log {
        config.commands.log = template("log", log)?;
    }
    if let Some(diff) = section.diff {
        config.commands.diff = template("diff", diff)?;
    }
    if let Some(ls_remote) = section.ls_remote {
        config.ls_remote = template("ls_remote", ls_remote)?;
    }
    Ok(())
}

fn template(name: &'static str, text: String) -> Result<CommandTemplate, ConfigError> {
    CommandTemplate::new(text).map_err(|source| ConfigError::Template { name, source })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
