use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::formatting::ColorMode;
use crate::output::OutputFormat;
use crate::runs::DEFAULT_PAGE_SIZE;

#[derive(Parser, Debug)]
#[command(name = "qorex")]
#[command(about = "Compare quality-of-results metrics across design runs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare selected runs against a base run
    Compare {
        /// CSV run table
        #[arg(long)]
        csv: PathBuf,

        /// Group config (searched upwards from the CSV directory when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run positions from `qorex runs`; the first is the base
        #[arg(short, long, value_delimiter = ',')]
        runs: Vec<usize>,

        /// Groups to display (comma-separated, case-insensitive)
        #[arg(short, long, value_delimiter = ',', conflicts_with = "all_groups")]
        groups: Option<Vec<String>>,

        /// Display every visible group
        #[arg(long = "all-groups")]
        all_groups: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colors
        #[arg(long)]
        plain: bool,

        /// Color mode
        #[arg(long, value_enum, env = "QOREX_COLOR")]
        color: Option<ColorMode>,
    },

    /// List the runs in a CSV table, newest first
    Runs {
        /// CSV run table
        #[arg(long)]
        csv: PathBuf,

        /// Group config (searched upwards from the CSV directory when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only show runs whose identity values contain this text
        #[arg(long)]
        filter: Option<String>,

        /// Page to show (0-based)
        #[arg(long, default_value = "0")]
        page: usize,

        /// Runs per page
        #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Disable colors
        #[arg(long)]
        plain: bool,
    },

    /// Check a group config, and optionally that a CSV table enriches cleanly
    Validate {
        /// Group config
        #[arg(short, long)]
        config: PathBuf,

        /// CSV run table to enrich against the config
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the resolved config as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_comma_separated_runs_and_groups() {
        let cli = Cli::parse_from([
            "qorex", "compare", "--csv", "runs.csv", "--runs", "2,0", "--groups", "Timing,Power",
        ]);
        match cli.command {
            Commands::Compare { runs, groups, .. } => {
                assert_eq!(runs, vec![2, 0]);
                assert_eq!(groups, Some(vec!["Timing".to_string(), "Power".to_string()]));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn groups_conflict_with_all_groups() {
        let result = Cli::try_parse_from([
            "qorex", "compare", "--csv", "runs.csv", "--groups", "Timing", "--all-groups",
        ]);
        assert!(result.is_err());
    }
}
