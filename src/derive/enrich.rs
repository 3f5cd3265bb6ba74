use rayon::prelude::*;

use super::DerivationRegistry;
use crate::config::{Config, Metric};
use crate::data::{Dataset, Record};
use crate::errors::DerivationError;

/// Extend every record with one field per derived metric.
///
/// Rows are processed in parallel; any failure aborts the whole pass so a
/// partially enriched dataset is never produced. A dataset that has already
/// been enriched is returned as is.
pub fn enrich(
    dataset: &Dataset,
    config: &Config,
    registry: &DerivationRegistry,
) -> Result<Dataset, DerivationError> {
    if dataset.is_enriched() {
        log::debug!("Dataset already enriched, skipping derivation pass");
        return Ok(dataset.clone());
    }

    let derived = config.derived_metrics();
    if derived.is_empty() {
        return Ok(dataset.clone().into_enriched());
    }

    let records = dataset
        .records()
        .par_iter()
        .enumerate()
        .map(|(row, record)| enrich_record(record, &derived, registry).map_err(|e| e.at_row(row)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns = dataset.columns().to_vec();
    for metric in &derived {
        if !columns.iter().any(|c| c == metric.name()) {
            columns.push(metric.name().to_string());
        }
    }

    log::info!(
        "Derived {} metrics for {} runs",
        derived.len(),
        records.len()
    );
    Ok(Dataset::new(columns, records).into_enriched())
}

/// Apply derivations in declaration order so later ones see earlier results.
fn enrich_record(
    record: &Record,
    derived: &[&Metric],
    registry: &DerivationRegistry,
) -> Result<Record, DerivationError> {
    derived.iter().try_fold(record.clone(), |acc, metric| {
        let Some(derivation) = metric.derivation() else {
            return Ok(acc);
        };
        let value = derivation.evaluate(metric.name(), &acc, registry)?;
        Ok(acc.with_field(metric.name(), value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Group;
    use crate::data::{parse_csv, FieldValue};
    use crate::derive::Derivation;

    fn config() -> Config {
        Config::new(vec![Group::new(
            "Power",
            vec![
                Metric::new("dynamic").derived(Derivation::Sum {
                    fields: vec!["internal".into(), "switching".into()],
                }),
                Metric::new("total").derived(Derivation::Sum {
                    fields: vec!["dynamic".into(), "leakage".into()],
                }),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn later_derivations_see_earlier_ones() {
        let data = parse_csv("internal,switching,leakage\n1,2,0.5\n10,20,5\n").unwrap();
        let enriched = enrich(&data, &config(), &DerivationRegistry::new()).unwrap();

        assert_eq!(enriched.get(0).unwrap().get("total"), Some(&FieldValue::Number(3.5)));
        assert_eq!(enriched.get(1).unwrap().get("dynamic"), Some(&FieldValue::Number(30.0)));
        assert_eq!(
            enriched.columns(),
            &["internal", "switching", "leakage", "dynamic", "total"]
        );
    }

    #[test]
    fn source_dataset_is_untouched() {
        let data = parse_csv("internal,switching,leakage\n1,2,0.5\n").unwrap();
        let _ = enrich(&data, &config(), &DerivationRegistry::new()).unwrap();
        assert!(!data.get(0).unwrap().contains("dynamic"));
        assert!(!data.is_enriched());
    }

    #[test]
    fn missing_dependency_aborts_with_row() {
        let data = parse_csv("internal,switching,leakage\n1,2,0.5\n1,2,\n").unwrap();
        let err = enrich(&data, &config(), &DerivationRegistry::new()).unwrap_err();
        assert_eq!(
            err,
            DerivationError::MissingField {
                metric: "total".into(),
                field: "leakage".into(),
                row: 1,
            }
        );
    }

    #[test]
    fn enrichment_is_applied_once() {
        let data = parse_csv("internal,switching,leakage\n1,2,0.5\n").unwrap();
        let registry = DerivationRegistry::new();
        let once = enrich(&data, &config(), &registry).unwrap();
        let twice = enrich(&once, &config(), &registry).unwrap();
        assert_eq!(once.records(), twice.records());
        assert!(twice.is_enriched());
    }
}
