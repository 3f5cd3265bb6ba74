//! Metric configuration: which raw fields exist, how they are labelled,
//! which are derived or inverted, and how they group for display.
//!
//! A [`Config`] is built once at startup (usually via [`load_config`]) and
//! never mutated afterwards. Metric names are the only join key between a
//! config and the run records it describes.

mod core;
mod loader;
mod validation;

pub use self::core::{Config, Group, Metric, RunsConfig, DEFAULT_SORT_KEY};
pub use self::loader::{find_config, load_config, parse_config, CONFIG_FILE_NAME};
