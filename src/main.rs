//! tigview - Entry Point

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tigview::parser::RefMap;
use tigview::source::CommandTemplate;
use tigview::state::ViewEngine;
use tigview::view::{ColorConfig, LineStyles};
use tigview::view_state::ViewKind;
use tracing::{info, warn};

/// Reference shown when no revisions are given.
const DEFAULT_REFERENCE: &str = "HEAD";

/// tigview - browse git history in the terminal
#[derive(Parser, Debug)]
#[command(name = "tigview")]
#[command(version)]
#[command(about = "Terminal browser for git repository history")]
pub struct Args {
    /// Start in the log view
    #[arg(short, long, conflicts_with = "diff")]
    pub log: bool,

    /// Start in the diff view
    #[arg(short, long)]
    pub diff: bool,

    /// Columns per tab stop
    #[arg(long)]
    pub tab_size: Option<usize>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Revisions for the view command (default: HEAD)
    pub revs: Vec<String>,
}

impl Args {
    /// View opened on startup when stdin is a terminal.
    fn initial_kind(&self) -> ViewKind {
        if self.log {
            ViewKind::Log
        } else if self.diff {
            ViewKind::Diff
        } else {
            ViewKind::Main
        }
    }

    /// Revisions joined into the reference substituted into command slots.
    fn reference(&self) -> String {
        if self.revs.is_empty() {
            DEFAULT_REFERENCE.to_string()
        } else {
            self.revs.join(" ")
        }
    }
}

/// Run the reference listing command; failures leave commits unannotated.
fn load_refs(ls_remote: &CommandTemplate, reference: &str) -> RefMap {
    let command = ls_remote.resolve(reference);
    match tigview::source::read_to_end(&command, Duration::from_millis(1)) {
        Ok(output) => {
            let refs = RefMap::parse(&output);
            info!(command = %command, empty = refs.is_empty(), "Loaded references");
            refs
        }
        Err(err) => {
            warn!(%err, "Failed to load references");
            RefMap::new()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = tigview::config::resolve(args.config.clone(), args.tab_size)?;

    tigview::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let reference = args.reference();
    let refs = load_refs(&config.ls_remote, &reference);

    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut engine = ViewEngine::new(config.commands.clone(), refs, width, height)
        .with_tab_size(config.tab_size);

    if std::io::stdin().is_terminal() {
        engine.open_view(args.initial_kind(), &reference);
    } else {
        engine.open_view(ViewKind::Pager, "stdin");
    }

    let styles = LineStyles::with_color_config(ColorConfig::from_env_and_args(args.no_color));
    tigview::view::run(engine, reference, styles)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["tigview", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["tigview", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_opens_main_view_on_head() {
        let args = Args::parse_from(["tigview"]);
        assert_eq!(args.initial_kind(), ViewKind::Main);
        assert_eq!(args.reference(), "HEAD");
        assert_eq!(args.tab_size, None);
    }

    #[test]
    fn test_log_and_diff_flags() {
        assert_eq!(Args::parse_from(["tigview", "-l"]).initial_kind(), ViewKind::Log);
        assert_eq!(Args::parse_from(["tigview", "--log"]).initial_kind(), ViewKind::Log);
        assert_eq!(Args::parse_from(["tigview", "-d"]).initial_kind(), ViewKind::Diff);
    }

    #[test]
    fn test_log_conflicts_with_diff() {
        let err = Args::try_parse_from(["tigview", "-l", "-d"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_revs_join_into_reference() {
        let args = Args::parse_from(["tigview", "-l", "v0.1", "master"]);
        assert_eq!(args.reference(), "v0.1 master");
    }

    #[test]
    fn test_revs_after_separator_may_look_like_flags() {
        let args = Args::parse_from(["tigview", "--", "--all", "-n5"]);
        assert_eq!(args.reference(), "--all -n5");
    }

    #[test]
    fn test_config_and_tab_size() {
        let args = Args::parse_from(["tigview", "--config", "/custom/config.toml", "--tab-size", "4"]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(args.tab_size, Some(4));
    }

    #[test]
    fn test_no_color_flag() {
        let args = Args::parse_from(["tigview", "--no-color"]);
        assert!(args.no_color);
    }

    #[test]
    fn test_failed_ls_remote_yields_empty_refs() {
        let template = CommandTemplate::new("exit 1").unwrap();
        assert!(load_refs(&template, "HEAD").is_empty());
    }

    #[test]
    fn test_ls_remote_output_is_parsed() {
        let template = CommandTemplate::new(
            "printf '1111111111111111111111111111111111111111\\trefs/heads/master\\n'",
        )
        .unwrap();
        assert!(!load_refs(&template, "HEAD").is_empty());
    }
}
