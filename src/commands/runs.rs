use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;

use super::resolve_config_path;
use crate::derive::DerivationRegistry;
use crate::formatting::FormattingConfig;
use crate::load::load_workspace;
use crate::output::{create_writer, OutputFormat};
use crate::runs::{page, RunEntry, RunIndex};

pub struct ListRunsConfig {
    pub csv: PathBuf,
    pub config: Option<PathBuf>,
    pub filter: Option<String>,
    pub page: usize,
    pub page_size: usize,
    pub format: OutputFormat,
    pub formatting: FormattingConfig,
}

pub fn list_runs(config: ListRunsConfig) -> Result<()> {
    let config_path = resolve_config_path(config.config.as_deref(), &config.csv)?;
    let workspace = load_workspace(&config.csv, &config_path, &DerivationRegistry::new())
        .with_context(|| format!("Failed to load {}", config.csv.display()))?;

    let index = RunIndex::new(&workspace.dataset, &workspace.config);
    let shown = visible_entries(&index, config.filter.as_deref(), config.page, config.page_size);

    let mut writer = create_writer(config.format, io::stdout().lock(), config.formatting);
    writer.write_runs(&index, &shown)?;
    Ok(())
}

/// Filter, then cut out one page.
pub fn visible_entries<'i>(
    index: &'i RunIndex,
    filter: Option<&str>,
    page_number: usize,
    page_size: usize,
) -> Vec<&'i RunEntry> {
    let matching = index.filter(filter.unwrap_or_default());
    page(&matching, page_number, page_size).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Group, Metric};
    use crate::data::parse_csv;

    fn index() -> RunIndex {
        let config = Config::new(vec![Group::new(
            "Run Info",
            vec![Metric::new("Timestamp"), Metric::new("Run")],
        )
        .run_identity()])
        .unwrap();
        let mut csv = String::from("Timestamp,Run\n");
        for day in 1..=12 {
            let tag = if day % 2 == 0 { "ecoA" } else { "base" };
            csv.push_str(&format!("2024-01-{day:02} 09:00:00,{tag}{day}\n"));
        }
        RunIndex::new(&parse_csv(&csv).unwrap(), &config)
    }

    #[test]
    fn pages_after_filtering() {
        let index = index();
        let first = visible_entries(&index, None, 0, 10);
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].values[1], "ecoA12");

        let second = visible_entries(&index, None, 1, 10);
        assert_eq!(second.len(), 2);

        let eco = visible_entries(&index, Some("ECOA"), 0, 10);
        assert_eq!(eco.len(), 6);
        assert!(eco.iter().all(|e| e.values[1].starts_with("ecoA")));
    }
}
