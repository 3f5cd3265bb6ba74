use std::collections::{BTreeSet, HashMap};

use crate::comparison::types::*;
use crate::config::Config;
use crate::data::Record;
use crate::runs::run_label;
use crate::value::{classify, format_delta, round_half_even, CellValue, Number, Percent};

/// Builds direction-aware comparison tables.
///
/// Holds only the config-derived lookup tables; every call to
/// [`Comparator::compare`] is an independent pure computation, so one
/// comparator can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    renames: HashMap<String, String>,
    inverted: BTreeSet<String>,
    identity_keys: Vec<String>,
}

impl Comparator {
    pub fn new(renames: HashMap<String, String>, inverted: BTreeSet<String>) -> Self {
        Self {
            renames,
            inverted,
            identity_keys: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            renames: config.rename_map(),
            inverted: config.inverted_metrics(),
            identity_keys: config.run_identity_keys(),
        }
    }

    /// Compare `records` (base first) over `keys`.
    pub fn compare(&self, records: &[&Record], keys: &[String]) -> ComparisonOutcome {
        let Some((base, others)) = records.split_first() else {
            return ComparisonOutcome::NoRunsSelected;
        };

        let columns = records
            .iter()
            .enumerate()
            .map(|(i, r)| run_label(r, &self.identity_keys).unwrap_or_else(|| format!("run {}", i + 1)))
            .collect();

        let rows = keys
            .iter()
            .map(|key| self.compare_row(key, base, others))
            .collect();

        ComparisonOutcome::Table(ComparisonTable { columns, rows })
    }

    fn compare_row(&self, key: &str, base: &Record, others: &[&Record]) -> ComparisonRow {
        let base_value = classify(base.get(key));
        let compare = others
            .iter()
            .map(|record| self.compare_cell(key, &base_value, classify(record.get(key))))
            .collect();

        ComparisonRow {
            key: key.to_string(),
            label: self.label(key).to_string(),
            base: base_value,
            compare,
        }
    }

    fn compare_cell(&self, key: &str, base: &CellValue, value: CellValue) -> CompareCell {
        match (base.as_number(), value.as_number()) {
            (Some(base), Some(current)) => self.delta_cell(key, base, current),
            _ => CompareCell::Plain { value },
        }
    }

    fn delta_cell(&self, key: &str, base: Number, current: Number) -> CompareCell {
        let change = round_half_even(current.as_f64() - base.as_f64()) as i64;
        CompareCell::Delta {
            value: current,
            delta: format_delta(change),
            change,
            percent: Percent::of(change, base),
            regressed: is_regression(change, self.inverted.contains(key)),
        }
    }

    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.renames.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Metrics are higher-is-better unless inverted: a decrease regresses a
/// plain metric, an increase regresses an inverted one. No change is never
/// a regression.
pub fn is_regression(change: i64, inverted: bool) -> bool {
    (change < 0 && !inverted) || (change > 0 && inverted)
}

/// One-shot comparison using the config's rename and inversion tables.
pub fn compare(records: &[&Record], keys: &[String], config: &Config) -> ComparisonOutcome {
    Comparator::from_config(config).compare(records, keys)
}
