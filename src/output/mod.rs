//! Rendering of comparison tables and run listings.

pub mod json;
pub mod markdown;
pub mod terminal;

use clap::ValueEnum;
use std::io::Write;

use crate::comparison::{CompareCell, ComparisonOutcome};
use crate::formatting::FormattingConfig;
use crate::runs::{RunEntry, RunIndex};

pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;

/// Shown instead of a table when no runs are selected
pub const NO_RUNS_PROMPT: &str = "Select runs to compare (see `qorex runs`), e.g. --runs 0,1";
/// Shown when the selected groups resolve to no metrics
pub const NO_METRICS_MESSAGE: &str = "No metric groups selected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

pub trait OutputWriter {
    fn write_comparison(&mut self, outcome: &ComparisonOutcome) -> anyhow::Result<()>;
    fn write_runs(&mut self, index: &RunIndex, entries: &[&RunEntry]) -> anyhow::Result<()>;
}

pub fn create_writer<'w, W: Write + 'w>(
    format: OutputFormat,
    writer: W,
    formatting: FormattingConfig,
) -> Box<dyn OutputWriter + 'w> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, formatting)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
    }
}

/// `value  delta (pct)` for numeric pairs, the raw value otherwise.
pub(crate) fn cell_text(cell: &CompareCell) -> String {
    match cell {
        CompareCell::Plain { value } => value.to_string(),
        CompareCell::Delta {
            value,
            delta,
            percent,
            ..
        } => format!("{value}  {delta} ({percent})"),
    }
}
