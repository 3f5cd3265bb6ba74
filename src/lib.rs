// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod data;
pub mod derive;
pub mod errors;
pub mod formatting;
pub mod load;
pub mod output;
pub mod runs;
pub mod selection;
pub mod value;

// Re-export commonly used types
pub use crate::comparison::{
    compare, is_regression, Comparator, CompareCell, ComparisonOutcome, ComparisonRow,
    ComparisonTable,
};

pub use crate::config::{find_config, load_config, parse_config, Config, Group, Metric};

pub use crate::data::{parse_csv, read_csv, Dataset, FieldValue, Record};

pub use crate::derive::{enrich, Derivation, DerivationRegistry};

pub use crate::errors::{ConfigError, DataError, DerivationError, QorexError};

pub use crate::load::{load_workspace, Workspace};

pub use crate::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::runs::{RunEntry, RunIndex};

pub use crate::selection::{resolve_config_keys, resolve_keys, GroupSelection};

pub use crate::value::{classify, format_delta, CellValue, Number, Percent};
