//! Run listing: the runs of a dataset, labelled by their run-identity
//! fields and ordered newest first, for picking base and compare runs.

use std::cmp::Ordering;

use serde::Serialize;

use crate::config::Config;
use crate::data::{Dataset, Record};
use crate::value::{classify, CellValue};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Label a run by joining its run-identity values. `None` if the record has
/// none of the keys.
pub fn run_label(record: &Record, identity_keys: &[String]) -> Option<String> {
    let parts: Vec<String> = identity_keys
        .iter()
        .filter_map(|key| record.get(key))
        .map(ToString::to_string)
        .collect();
    (!parts.is_empty()).then(|| parts.join(" / "))
}

/// One listed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunEntry {
    /// Position in the sorted listing; this is what users select by
    pub position: usize,
    /// Index of the record in the dataset
    pub row: usize,
    /// Run-identity values, aligned with [`RunIndex::keys`]; empty when absent
    pub values: Vec<String>,
}

impl RunEntry {
    fn matches(&self, needle: &str) -> bool {
        self.values
            .iter()
            .any(|v| v.to_lowercase().contains(needle))
    }
}

/// Sorted, filterable run listing over a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RunIndex {
    keys: Vec<String>,
    entries: Vec<RunEntry>,
}

impl RunIndex {
    pub fn new(dataset: &Dataset, config: &Config) -> Self {
        let keys = config.run_identity_keys();
        let sort_key = config.sort_key();

        let mut rows: Vec<usize> = (0..dataset.len()).collect();
        // stable: ties keep table order
        rows.sort_by(|&a, &b| {
            let left = classify(dataset.records()[a].get(sort_key));
            let right = classify(dataset.records()[b].get(sort_key));
            newest_first(&left, &right)
        });

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(position, row)| RunEntry {
                position,
                row,
                values: keys
                    .iter()
                    .map(|k| {
                        dataset.records()[row]
                            .get(k)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    })
                    .collect(),
            })
            .collect();

        Self { keys, entries }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn entries(&self) -> &[RunEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&RunEntry> {
        self.entries.get(position)
    }

    /// Case-insensitive substring match over run-identity values. An empty
    /// filter keeps every run.
    pub fn filter(&self, text: &str) -> Vec<&RunEntry> {
        let needle = text.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || e.matches(&needle))
            .collect()
    }

    /// Resolve listing positions to records, in the given order. Returns the
    /// first unknown position as the error.
    pub fn records<'d>(
        &self,
        dataset: &'d Dataset,
        positions: &[usize],
    ) -> Result<Vec<&'d Record>, usize> {
        positions
            .iter()
            .map(|&p| {
                self.get(p)
                    .and_then(|entry| dataset.get(entry.row))
                    .ok_or(p)
            })
            .collect()
    }
}

/// 0-based page of a listing.
pub fn page<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let size = size.max(1);
    let start = page.saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Descending order; missing values sort last.
fn newest_first(left: &CellValue, right: &CellValue) -> Ordering {
    match (left, right) {
        (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
        (CellValue::Missing, _) => Ordering::Greater,
        (_, CellValue::Missing) => Ordering::Less,
        (CellValue::Numeric(a), CellValue::Numeric(b)) => b
            .as_f64()
            .partial_cmp(&a.as_f64())
            .unwrap_or(Ordering::Equal),
        (a, b) => b.to_string().cmp(&a.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Group, Metric, RunsConfig};
    use crate::data::parse_csv;
    use indoc::indoc;

    fn config() -> Config {
        Config::with_runs(
            vec![
                Group::new("Run Info", vec![Metric::new("Date"), Metric::new("Run")])
                    .run_identity(),
                Group::new("Timing", vec![Metric::new("wns")]),
            ],
            RunsConfig {
                sort_by: "Date".into(),
            },
        )
        .unwrap()
    }

    fn dataset() -> Dataset {
        parse_csv(indoc! {"
            Date,Run,wns
            2024-01-02,beta,1
            ,orphan,2
            2024-03-09,Gamma,3
            2024-01-02,alpha,4
        "})
        .unwrap()
    }

    #[test]
    fn sorts_newest_first_with_missing_last() {
        let index = RunIndex::new(&dataset(), &config());
        let runs: Vec<&str> = index.entries().iter().map(|e| e.values[1].as_str()).collect();
        assert_eq!(runs, vec!["Gamma", "beta", "alpha", "orphan"]);
        assert_eq!(index.keys(), &["Date", "Run"]);
        assert_eq!(index.get(3).unwrap().values[0], "");
    }

    #[test]
    fn filter_is_case_insensitive() {
        let index = RunIndex::new(&dataset(), &config());
        let hits: Vec<usize> = index.filter("gAmMa").iter().map(|e| e.position).collect();
        assert_eq!(hits, vec![0]);
        assert_eq!(index.filter("  ").len(), 4);
    }

    #[test]
    fn positions_resolve_to_records_in_order() {
        let data = dataset();
        let index = RunIndex::new(&data, &config());
        let records = index.records(&data, &[2, 0]).unwrap();
        assert_eq!(records[0].get("Run").unwrap().to_string(), "alpha");
        assert_eq!(records[1].get("Run").unwrap().to_string(), "Gamma");
        assert_eq!(index.records(&data, &[0, 7]), Err(7));
    }

    #[test]
    fn pages_clamp_to_bounds() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(page(&items, 0, 10).len(), 10);
        assert_eq!(page(&items, 2, 10), &[20, 21, 22, 23, 24]);
        assert!(page(&items, 5, 10).is_empty());
    }

    #[test]
    fn label_joins_identity_values() {
        let record: Record = [("Date", "2024-01-02"), ("Run", "r7")].into_iter().collect();
        let keys = vec!["Date".to_string(), "Run".to_string(), "stage".to_string()];
        assert_eq!(run_label(&record, &keys), Some("2024-01-02 / r7".into()));
        assert_eq!(run_label(&Record::new(), &keys), None);
    }
}
