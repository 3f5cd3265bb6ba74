use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use qorex::cli::{Cli, Commands};
use qorex::commands::{compare_runs, list_runs, validate_config};
use qorex::commands::{CompareConfig, ListRunsConfig, ValidateConfig};
use qorex::formatting::FormattingConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Compare {
            csv,
            config,
            runs,
            groups,
            all_groups,
            format,
            output,
            plain,
            color,
        } => compare_runs(CompareConfig {
            csv,
            config,
            runs,
            groups,
            all_groups,
            format,
            output,
            formatting: formatting_config(plain, color),
        }),
        Commands::Runs {
            csv,
            config,
            filter,
            page,
            page_size,
            format,
            plain,
        } => list_runs(ListRunsConfig {
            csv,
            config,
            filter,
            page,
            page_size,
            format,
            formatting: formatting_config(plain, None),
        }),
        Commands::Validate { config, csv, json } => validate_config(ValidateConfig {
            config,
            csv,
            json,
            formatting: FormattingConfig::from_env(),
        }),
    }
}

// RUST_LOG, when set, overrides the -v count
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn formatting_config(
    plain: bool,
    color: Option<qorex::formatting::ColorMode>,
) -> FormattingConfig {
    if plain {
        return FormattingConfig::plain();
    }
    match color {
        Some(mode) => FormattingConfig::new(mode),
        None => FormattingConfig::from_env(),
    }
}
