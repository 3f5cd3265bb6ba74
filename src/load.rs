//! Startup acquisition: read the config and the run table, enrich once, and
//! hand back immutable values. Any failure aborts before a report is built.

use std::path::Path;

use crate::config::{load_config, Config};
use crate::data::{read_csv, Dataset};
use crate::derive::{enrich, validate_derivations, DerivationRegistry};
use crate::errors::Result;

/// Config plus enriched dataset, shared read-only by every comparison.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: Config,
    pub dataset: Dataset,
}

/// Load the config at `config_path` and check its derivations.
pub fn load_checked_config(config_path: &Path, registry: &DerivationRegistry) -> Result<Config> {
    let config = load_config(config_path)?;
    validate_derivations(&config, registry)?;
    Ok(config)
}

/// Load a run table and enrich it against `config`.
pub fn load_dataset(csv_path: &Path, config: &Config, registry: &DerivationRegistry) -> Result<Dataset> {
    let raw = read_csv(csv_path)?;
    warn_missing_identity_fields(&raw, config);
    Ok(enrich(&raw, config, registry)?)
}

/// Load everything needed to serve comparisons.
pub fn load_workspace(
    csv_path: &Path,
    config_path: &Path,
    registry: &DerivationRegistry,
) -> Result<Workspace> {
    let config = load_checked_config(config_path, registry)?;
    let dataset = load_dataset(csv_path, &config, registry)?;
    Ok(Workspace { config, dataset })
}

fn warn_missing_identity_fields(dataset: &Dataset, config: &Config) {
    let derived: Vec<&str> = config.derived_metrics().iter().map(|m| m.name()).collect();
    for key in config.run_identity_keys() {
        if !dataset.has_column(&key) && !derived.contains(&key.as_str()) {
            log::warn!("Run-identity field `{key}` is neither a data column nor derived");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConfigError, QorexError};
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = indoc! {r#"
        [[groups]]
        name = "Run Info"
        run_identity = true
        metrics = [
            { name = "Timestamp", derive = { kind = "timestamp", date = "Date", time = "Time" } },
            { name = "Run" },
        ]

        [[groups]]
        name = "Power"
        metrics = [{ name = "total", inverted = true, derive = { kind = "sum", fields = ["dyn", "leak"] } }]
    "#};

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_and_enriches() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "qorex.toml", CONFIG);
        let csv = write(&dir, "runs.csv", "Date,Time,Run,dyn,leak\n2024-05-01,10:00:00,a,1,2\n");

        let ws = load_workspace(&csv, &config, &DerivationRegistry::new()).unwrap();
        let record = ws.dataset.get(0).unwrap();
        assert_eq!(record.get("Timestamp").unwrap().to_string(), "2024-05-01 10:00:00");
        assert_eq!(record.get("total").unwrap().to_string(), "3");
        assert!(ws.dataset.is_enriched());
    }

    #[test]
    fn derivation_failure_aborts_load() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "qorex.toml", CONFIG);
        let csv = write(&dir, "runs.csv", "Date,Time,Run,dyn\n2024-05-01,10:00:00,a,1\n");

        let err = load_workspace(&csv, &config, &DerivationRegistry::new()).unwrap_err();
        assert!(matches!(err, QorexError::Derivation(_)));
    }

    #[test]
    fn unknown_named_derivation_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let config = write(
            &dir,
            "qorex.toml",
            indoc! {r#"
                [[groups]]
                name = "Stats"
                metrics = [{ name = "score", derive = { kind = "named", function = "custom" } }]
            "#},
        );
        let err = load_checked_config(&config, &DerivationRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            QorexError::Config(ConfigError::UnknownDerivation { .. })
        ));
    }
}
