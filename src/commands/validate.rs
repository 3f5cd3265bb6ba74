use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::derive::DerivationRegistry;
use crate::formatting::FormattingConfig;
use crate::load::{load_checked_config, load_dataset};

pub struct ValidateConfig {
    pub config: PathBuf,
    pub csv: Option<PathBuf>,
    pub json: bool,
    pub formatting: FormattingConfig,
}

/// What a config declares, for the validation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSummary {
    pub groups: usize,
    pub visible_groups: Vec<String>,
    pub run_identity: Vec<String>,
    pub inverted: Vec<String>,
    pub renames: Vec<(String, String)>,
    pub derived: Vec<String>,
}

impl ConfigSummary {
    pub fn of(config: &Config) -> Self {
        let mut renames: Vec<(String, String)> = config.rename_map().into_iter().collect();
        renames.sort();

        Self {
            groups: config.groups().len(),
            visible_groups: config
                .visible_groups()
                .iter()
                .map(|g| g.name().to_string())
                .collect(),
            run_identity: config.run_identity_keys(),
            inverted: config.inverted_metrics().into_iter().collect(),
            renames,
            derived: config
                .derived_metrics()
                .iter()
                .map(|m| m.name().to_string())
                .collect(),
        }
    }
}

/// Errors propagate, so an invalid config exits non-zero.
pub fn validate_config(config: ValidateConfig) -> Result<()> {
    let registry = DerivationRegistry::new();
    let loaded = load_checked_config(&config.config, &registry)
        .with_context(|| format!("Invalid config {}", config.config.display()))?;

    let rows = match &config.csv {
        Some(csv) => {
            let dataset = load_dataset(csv, &loaded, &registry)
                .with_context(|| format!("Failed to enrich {}", csv.display()))?;
            Some(dataset.len())
        }
        None => None,
    };

    let mut out = io::stdout().lock();
    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&loaded)?)?;
        return Ok(());
    }

    let formatter = config.formatting.formatter();
    let summary = ConfigSummary::of(&loaded);

    writeln!(
        out,
        "{} {}",
        formatter.header("Config OK:"),
        config.config.display()
    )?;
    writeln!(
        out,
        "  groups: {} ({} visible: {})",
        summary.groups,
        summary.visible_groups.len(),
        summary.visible_groups.join(", ")
    )?;
    writeln!(out, "  run identity: {}", list_or_none(&summary.run_identity))?;
    writeln!(out, "  inverted: {}", list_or_none(&summary.inverted))?;
    let renames: Vec<String> = summary
        .renames
        .iter()
        .map(|(from, to)| format!("{from} -> {to}"))
        .collect();
    writeln!(out, "  renamed: {}", list_or_none(&renames))?;
    writeln!(out, "  derived: {}", list_or_none(&summary.derived))?;

    if let (Some(csv), Some(rows)) = (&config.csv, rows) {
        writeln!(
            out,
            "{} {} ({rows} runs enriched)",
            formatter.bold("Data OK:"),
            csv.display()
        )?;
    }
    Ok(())
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Group, Metric};
    use crate::derive::Derivation;
    use pretty_assertions::assert_eq;

    #[test]
    fn summarizes_config() {
        let config = Config::new(vec![
            Group::new("Run Info", vec![Metric::new("Run")]).run_identity(),
            Group::new(
                "Power",
                vec![
                    Metric::new("pwr").renamed("Power (mW)").inverted(),
                    Metric::new("total").derived(Derivation::Sum {
                        fields: vec!["dyn".into(), "leak".into()],
                    }),
                ],
            ),
            Group::new("Hidden", vec![Metric::new("Date")]).hidden(),
        ])
        .unwrap();

        assert_eq!(
            ConfigSummary::of(&config),
            ConfigSummary {
                groups: 3,
                visible_groups: vec!["Run Info".into(), "Power".into()],
                run_identity: vec!["Run".into()],
                inverted: vec!["pwr".into()],
                renames: vec![("pwr".into(), "Power (mW)".into())],
                derived: vec!["total".into()],
            }
        );
    }

    #[test]
    fn empty_lists_print_none() {
        assert_eq!(list_or_none(&[]), "none");
        assert_eq!(list_or_none(&["a".into(), "b".into()]), "a, b");
    }
}
