use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use std::io::Write;

use super::{cell_text, OutputWriter, NO_METRICS_MESSAGE, NO_RUNS_PROMPT};
use crate::comparison::{ComparisonOutcome, ComparisonTable};
use crate::formatting::{FormattingConfig, OutputFormatter};
use crate::runs::{RunEntry, RunIndex};

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatting: FormattingConfig,
    formatter: Box<dyn OutputFormatter>,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self {
            writer,
            formatting,
            formatter: formatting.formatter(),
        }
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if self.formatting.color.should_use_color() {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }

    fn build_table(&self, comparison: &ComparisonTable) -> Table {
        let mut table = self.new_table();

        let mut header = vec![Cell::new("Metric")];
        header.extend(comparison.columns.iter().map(Cell::new));
        table.set_header(header);

        for row in &comparison.rows {
            let mut cells = vec![
                Cell::new(&row.label),
                Cell::new(row.base.to_string()).set_alignment(CellAlignment::Right),
            ];
            cells.extend(row.compare.iter().map(|cell| {
                let styled = Cell::new(cell_text(cell)).set_alignment(CellAlignment::Right);
                if cell.is_regressed() {
                    styled.fg(Color::Red)
                } else {
                    styled
                }
            }));
            table.add_row(cells);
        }
        table
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_comparison(&mut self, outcome: &ComparisonOutcome) -> anyhow::Result<()> {
        match outcome {
            ComparisonOutcome::NoRunsSelected => {
                writeln!(self.writer, "{}", self.formatter.info(NO_RUNS_PROMPT))?;
            }
            ComparisonOutcome::Table(table) if table.is_empty() => {
                writeln!(self.writer, "{}", self.formatter.info(NO_METRICS_MESSAGE))?;
            }
            ComparisonOutcome::Table(table) => {
                writeln!(self.writer, "{}", self.formatter.header("Run Comparison"))?;
                writeln!(self.writer, "{}", self.build_table(table))?;

                let regressions = table.regression_count();
                if regressions > 0 {
                    let note = format!("{regressions} regressed cell(s)");
                    writeln!(self.writer, "{}", self.formatter.regressed(&note))?;
                }
            }
        }
        Ok(())
    }

    fn write_runs(&mut self, index: &RunIndex, entries: &[&RunEntry]) -> anyhow::Result<()> {
        let mut table = self.new_table();
        let mut header = vec![Cell::new("#")];
        header.extend(index.keys().iter().map(Cell::new));
        table.set_header(header);

        for entry in entries {
            let mut cells = vec![Cell::new(entry.position)];
            cells.extend(entry.values.iter().map(Cell::new));
            table.add_row(cells);
        }

        writeln!(self.writer, "{table}")?;
        writeln!(
            self.writer,
            "{}",
            self.formatter
                .dim(&format!("{} of {} runs shown", entries.len(), index.len()))
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{CompareCell, ComparisonRow};
    use crate::value::{CellValue, Number, Percent};

    fn render(outcome: &ComparisonOutcome) -> String {
        let mut buf = Vec::new();
        TerminalWriter::new(&mut buf, FormattingConfig::plain())
            .write_comparison(outcome)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn renders_labels_values_and_deltas() {
        let outcome = ComparisonOutcome::Table(ComparisonTable {
            columns: vec!["base".into(), "next".into()],
            rows: vec![ComparisonRow {
                key: "power".into(),
                label: "Total Power (mW)".into(),
                base: CellValue::Numeric(Number::Integer(200)),
                compare: vec![CompareCell::Delta {
                    value: Number::Integer(150),
                    delta: "-50".into(),
                    change: -50,
                    percent: Percent::Finite(25),
                    regressed: false,
                }],
            }],
        });

        let out = render(&outcome);
        assert!(out.contains("Total Power (mW)"));
        assert!(out.contains("150  -50 (25%)"));
        assert!(!out.contains("regressed cell"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn prompt_when_no_runs() {
        assert!(render(&ComparisonOutcome::NoRunsSelected).contains(NO_RUNS_PROMPT));
    }
}
