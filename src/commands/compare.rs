use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use super::{open_output, resolve_config_path};
use crate::comparison::{Comparator, ComparisonOutcome};
use crate::derive::DerivationRegistry;
use crate::formatting::FormattingConfig;
use crate::load::{load_workspace, Workspace};
use crate::output::{create_writer, OutputFormat};
use crate::runs::RunIndex;
use crate::selection::{resolve_config_keys, GroupSelection};

pub struct CompareConfig {
    pub csv: PathBuf,
    pub config: Option<PathBuf>,
    /// Listing positions; the first is the base run
    pub runs: Vec<usize>,
    pub groups: Option<Vec<String>>,
    pub all_groups: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

// =============================================================================
// I/O Shell
// =============================================================================

pub fn compare_runs(config: CompareConfig) -> Result<()> {
    let config_path = resolve_config_path(config.config.as_deref(), &config.csv)?;
    let registry = DerivationRegistry::new();
    let workspace = load_workspace(&config.csv, &config_path, &registry).with_context(|| {
        format!(
            "Failed to load {} with {}",
            config.csv.display(),
            config_path.display()
        )
    })?;

    let selection = select_groups(&workspace, config.groups.as_deref(), config.all_groups)?;
    let outcome = build_comparison(&workspace, &config.runs, &selection)?;

    if let ComparisonOutcome::Table(table) = &outcome {
        log::info!(
            "Compared {} runs over {} metrics ({} regressed cells)",
            table.columns.len(),
            table.rows.len(),
            table.regression_count()
        );
    }

    // files never get escape codes
    let formatting = if config.output.is_some() {
        FormattingConfig::plain()
    } else {
        config.formatting
    };
    let sink = open_output(config.output.as_deref())?;
    let mut writer = create_writer(config.format, sink, formatting);
    writer.write_comparison(&outcome)?;
    Ok(())
}

// =============================================================================
// Pure Core
// =============================================================================

/// Explicit names, every visible group, or the default preselection.
pub fn select_groups(
    workspace: &Workspace,
    names: Option<&[String]>,
    all_groups: bool,
) -> Result<GroupSelection> {
    if all_groups {
        return Ok(GroupSelection::All);
    }
    match names {
        Some(names) => GroupSelection::by_names(&workspace.config, names).or_else(|unknown| {
            let known: Vec<&str> = workspace
                .config
                .visible_groups()
                .iter()
                .map(|g| g.name())
                .collect();
            bail!(
                "Unknown group(s): {} (available: {})",
                unknown.join(", "),
                known.join(", ")
            )
        }),
        None => Ok(GroupSelection::default_for(&workspace.config)),
    }
}

/// Resolve run positions against the sorted listing and compare them.
pub fn build_comparison(
    workspace: &Workspace,
    positions: &[usize],
    selection: &GroupSelection,
) -> Result<ComparisonOutcome> {
    let index = RunIndex::new(&workspace.dataset, &workspace.config);
    let records = match index.records(&workspace.dataset, positions) {
        Ok(records) => records,
        Err(position) => bail!(
            "Run {position} does not exist ({} runs available)",
            index.len()
        ),
    };

    let keys = resolve_config_keys(&workspace.config, selection);
    Ok(Comparator::from_config(&workspace.config).compare(&records, &keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Group, Metric};
    use crate::data::{Dataset, FieldValue, Record};

    fn workspace() -> Workspace {
        let config = Config::new(vec![
            Group::new("Run Info", vec![Metric::new("Timestamp"), Metric::new("Run")]).run_identity(),
            Group::new("Timing", vec![Metric::new("wns").renamed("WNS (ps)")]),
            Group::new("Power", vec![Metric::new("power").inverted()]),
        ])
        .unwrap();
        let records = vec![
            Record::from_iter::<[(&str, FieldValue); 4]>([
                ("Timestamp", "2024-01-01 09:00:00".into()),
                ("Run", "old".into()),
                ("wns", 100.0.into()),
                ("power", 200.0.into()),
            ]),
            Record::from_iter::<[(&str, FieldValue); 4]>([
                ("Timestamp", "2024-01-02 09:00:00".into()),
                ("Run", "new".into()),
                ("wns", 80.0.into()),
                ("power", 150.0.into()),
            ]),
        ];
        let columns = ["Timestamp", "Run", "wns", "power"].map(String::from).to_vec();
        Workspace {
            config,
            dataset: Dataset::new(columns, records),
        }
    }

    #[test]
    fn default_selection_skips_run_identity_group() {
        let ws = workspace();
        let selection = select_groups(&ws, None, false).unwrap();
        assert_eq!(selection, GroupSelection::indices([1]));
    }

    #[test]
    fn unknown_group_lists_available_groups() {
        let ws = workspace();
        let err = select_groups(&ws, Some(&["Area".to_string()]), false).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Area"));
        assert!(message.contains("Timing"));
    }

    #[test]
    fn positions_follow_newest_first_listing() {
        let ws = workspace();
        // position 1 is the older run, used as the base
        let outcome = build_comparison(&ws, &[1, 0], &GroupSelection::All).unwrap();
        let table = outcome.table().unwrap();
        assert_eq!(table.columns[0], "2024-01-01 09:00:00 / old");
        assert!(table.row("wns").unwrap().compare[0].is_regressed());
        assert!(!table.row("power").unwrap().compare[0].is_regressed());
    }

    #[test]
    fn no_positions_yields_prompt_outcome() {
        let ws = workspace();
        let outcome = build_comparison(&ws, &[], &GroupSelection::All).unwrap();
        assert_eq!(outcome, ComparisonOutcome::NoRunsSelected);
    }

    #[test]
    fn out_of_range_position_is_an_error() {
        let ws = workspace();
        assert!(build_comparison(&ws, &[0, 7], &GroupSelection::All).is_err());
    }
}
