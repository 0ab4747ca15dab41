//! Configuration module.
//!
//! Precedence: defaults → config file → `TIG_*` environment → CLI flags.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, CommandsSection, ConfigError,
    ConfigFile, ResolvedConfig,
};

/// Resolve the full configuration chain.
///
/// # Errors
///
/// Returns the first config file or template error encountered.
pub fn resolve(
    config_path: Option<std::path::PathBuf>,
    tab_size_override: Option<usize>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let merged = merge_config(file)?;
    let with_env = apply_env_overrides(merged)?;
    apply_cli_overrides(with_env, tab_size_override)
}
