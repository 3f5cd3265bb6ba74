//! CLI command implementations.
//!
//! Each submodule keeps I/O at its edges: load inputs, call into the pure
//! comparison core, hand the result to an output writer.
//!
//! Available commands:
//! - **compare**: Compare selected runs against a base run
//! - **runs**: List the runs of a CSV table
//! - **validate**: Check a group config and optionally a CSV table

pub mod compare;
pub mod runs;
pub mod validate;

pub use compare::{compare_runs, CompareConfig};
pub use runs::{list_runs, ListRunsConfig};
pub use validate::{validate_config, ValidateConfig};

use anyhow::{bail, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{find_config, CONFIG_FILE_NAME};

/// Use the explicit config path, or search upwards from the CSV's directory.
pub(crate) fn resolve_config_path(explicit: Option<&Path>, csv: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let start = match csv.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    match find_config(&start) {
        Some(path) => {
            log::debug!("Using config {}", path.display());
            Ok(path)
        }
        None => bail!(
            "No {CONFIG_FILE_NAME} found above {}; pass --config",
            start.display()
        ),
    }
}

/// Output file when given, stdout otherwise.
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}
