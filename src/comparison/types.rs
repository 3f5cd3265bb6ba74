use serde::Serialize;

use crate::value::{CellValue, Number, Percent};

/// One compare-column cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompareCell {
    /// Shown as is: one side was text or missing, so no delta applies.
    Plain { value: CellValue },
    /// Both sides numeric.
    Delta {
        value: Number,
        /// Signed, possibly `k`-suffixed rendering of `change`
        delta: String,
        /// Rounded `compare - base`
        change: i64,
        percent: Percent,
        regressed: bool,
    },
}

impl CompareCell {
    pub fn is_regressed(&self) -> bool {
        matches!(self, Self::Delta { regressed: true, .. })
    }
}

/// One metric across all selected runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Raw metric name
    pub key: String,
    /// Display label (renamed when configured)
    pub label: String,
    pub base: CellValue,
    pub compare: Vec<CompareCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonTable {
    /// Run labels, base run first
    pub columns: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    pub fn regression_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.compare.iter())
            .filter(|c| c.is_regressed())
            .count()
    }
}

/// Result of a comparison request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "table", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    /// No runs were chosen; callers show a prompt instead of a table.
    NoRunsSelected,
    Table(ComparisonTable),
}

impl ComparisonOutcome {
    pub fn table(&self) -> Option<&ComparisonTable> {
        match self {
            Self::Table(table) => Some(table),
            Self::NoRunsSelected => None,
        }
    }
}
