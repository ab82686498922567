//! CLI argument definitions.

use crate::utils::date::parse_day;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Finds baby shorebird photos on Flickr, checks them with Cloud Vision and
/// posts them to Twitter.
#[derive(Debug, Parser)]
#[command(name = "birbybot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Suppress progress output and informational logs.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable progress bars.
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Record store file (overrides config).
    #[arg(long, global = true, env = "BIRBYBOT_STORE")]
    pub store: Option<PathBuf>,

    /// Image cache directory (overrides config).
    #[arg(long, global = true, env = "BIRBYBOT_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search Flickr and store new photos.
    Search(SearchArgs),
    /// Classify stored photos that have not been classified yet.
    Classify(ClassifyArgs),
    /// Post one random target photo.
    Post(PostArgs),
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for the search command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Only photos uploaded on or after this date (YYYY-MM-DD).
    /// Default: first day of the previous month.
    #[arg(long, value_parser = parse_day, env = "BIRBYBOT_SINCE")]
    pub since: Option<DateTime<Utc>>,

    /// Search term; repeat for several (overrides config).
    #[arg(short, long = "term")]
    pub terms: Vec<String>,

    /// Maximum result pages per term (overrides config).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), env = "BIRBYBOT_MAX_PAGES")]
    pub max_pages: Option<u32>,
}

/// Arguments for the classify command.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Target labels, comma-separated (overrides config).
    #[arg(short, long, value_delimiter = ',', env = "BIRBYBOT_TARGETS")]
    pub targets: Option<Vec<String>>,
}

/// Arguments for the post command.
#[derive(Debug, Args)]
pub struct PostArgs {
    /// Print the message instead of posting it.
    #[arg(long)]
    pub dry_run: bool,

    /// Months before a photo may be posted again (overrides config).
    #[arg(long, env = "BIRBYBOT_COOLDOWN_MONTHS")]
    pub cooldown_months: Option<u32>,
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::try_parse_from(["birbybot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_search() {
        let cli = Cli::try_parse_from([
            "birbybot",
            "search",
            "--since",
            "2018-02-01",
            "-t",
            "plover chick",
            "--term",
            "killdeer chick",
        ])
        .unwrap();
        let Some(Command::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.since.unwrap().to_rfc3339(), "2018-02-01T00:00:00+00:00");
        assert_eq!(args.terms, vec!["plover chick", "killdeer chick"]);
    }

    #[test]
    fn test_cli_parse_bad_since() {
        assert!(Cli::try_parse_from(["birbybot", "search", "--since", "Feb 1"]).is_err());
    }

    #[test]
    fn test_cli_parse_classify_targets() {
        let cli = Cli::try_parse_from(["birbybot", "classify", "--targets", "bat,wing"]).unwrap();
        let Some(Command::Classify(args)) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.targets.unwrap(), vec!["bat", "wing"]);
    }

    #[test]
    fn test_cli_parse_post_with_global_flags() {
        let cli = Cli::try_parse_from(["birbybot", "post", "--dry-run", "-q", "--no-progress"])
            .unwrap();
        assert!(cli.global.quiet);
        assert!(cli.global.no_progress);
        assert!(matches!(cli.command, Some(Command::Post(PostArgs { dry_run: true, .. }))));
    }

    #[test]
    fn test_cli_parse_verbosity_count() {
        let cli = Cli::try_parse_from(["birbybot", "-vv", "classify"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["birbybot", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }
}
