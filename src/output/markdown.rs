use std::io::Write;

use super::{cell_text, OutputWriter, NO_METRICS_MESSAGE, NO_RUNS_PROMPT};
use crate::comparison::{ComparisonOutcome, ComparisonTable};
use crate::runs::{RunEntry, RunIndex};

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_row(&mut self, cells: &[String]) -> anyhow::Result<()> {
        writeln!(self.writer, "| {} |", cells.join(" | "))?;
        Ok(())
    }

    fn write_separator(&mut self, columns: usize) -> anyhow::Result<()> {
        let dashes = vec!["---"; columns];
        writeln!(self.writer, "|{}|", dashes.join("|"))?;
        Ok(())
    }

    fn write_table(&mut self, table: &ComparisonTable) -> anyhow::Result<()> {
        let mut header = vec!["Metric".to_string()];
        header.extend(table.columns.iter().map(|c| escape(c)));
        self.write_row(&header)?;
        self.write_separator(header.len())?;

        for row in &table.rows {
            let mut cells = vec![escape(&row.label), escape(&row.base.to_string())];
            cells.extend(row.compare.iter().map(|cell| {
                let text = escape(&cell_text(cell));
                if cell.is_regressed() {
                    format!("**{text}**")
                } else {
                    text
                }
            }));
            self.write_row(&cells)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_comparison(&mut self, outcome: &ComparisonOutcome) -> anyhow::Result<()> {
        match outcome {
            ComparisonOutcome::NoRunsSelected => {
                writeln!(self.writer, "_{NO_RUNS_PROMPT}_")?;
            }
            ComparisonOutcome::Table(table) if table.is_empty() => {
                writeln!(self.writer, "_{NO_METRICS_MESSAGE}_")?;
            }
            ComparisonOutcome::Table(table) => {
                writeln!(self.writer, "# Run Comparison")?;
                writeln!(self.writer)?;
                self.write_table(table)?;
            }
        }
        Ok(())
    }

    fn write_runs(&mut self, index: &RunIndex, entries: &[&RunEntry]) -> anyhow::Result<()> {
        let mut header = vec!["#".to_string()];
        header.extend(index.keys().iter().map(|k| escape(k)));
        self.write_row(&header)?;
        self.write_separator(header.len())?;

        for entry in entries {
            let mut cells = vec![entry.position.to_string()];
            cells.extend(entry.values.iter().map(|v| escape(v)));
            self.write_row(&cells)?;
        }
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
