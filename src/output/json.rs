use serde::Serialize;
use std::io::Write;

use super::OutputWriter;
use crate::comparison::ComparisonOutcome;
use crate::runs::{RunEntry, RunIndex};

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
struct RunListing<'a> {
    keys: &'a [String],
    total: usize,
    runs: &'a [&'a RunEntry],
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_comparison(&mut self, outcome: &ComparisonOutcome) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(outcome)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }

    fn write_runs(&mut self, index: &RunIndex, entries: &[&RunEntry]) -> anyhow::Result<()> {
        let listing = RunListing {
            keys: index.keys(),
            total: index.len(),
            runs: entries,
        };
        let json = serde_json::to_string_pretty(&listing)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{CompareCell, ComparisonRow, ComparisonTable};
    use crate::value::{CellValue, Number, Percent};

    #[test]
    fn serializes_cells_with_kind_tags() {
        let outcome = ComparisonOutcome::Table(ComparisonTable {
            columns: vec!["a".into(), "b".into()],
            rows: vec![ComparisonRow {
                key: "cells".into(),
                label: "Cells".into(),
                base: CellValue::Numeric(Number::Integer(0)),
                compare: vec![CompareCell::Delta {
                    value: Number::Integer(10),
                    delta: "+10".into(),
                    change: 10,
                    percent: Percent::Infinite,
                    regressed: false,
                }],
            }],
        });

        let mut buf = Vec::new();
        JsonWriter::new(&mut buf).write_comparison(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["status"], "table");
        let row = &value["table"]["rows"][0];
        assert_eq!(row["base"]["kind"], "numeric");
        assert_eq!(row["base"]["value"], 0);
        assert_eq!(row["compare"][0]["kind"], "delta");
        assert_eq!(row["compare"][0]["percent"], "Inf");
    }

    #[test]
    fn no_runs_serializes_status_only() {
        let mut buf = Vec::new();
        JsonWriter::new(&mut buf)
            .write_comparison(&ComparisonOutcome::NoRunsSelected)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["status"], "no_runs_selected");
    }
}
