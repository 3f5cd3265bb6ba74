use serde::Deserialize;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::{Config, Group, RunsConfig};
use crate::errors::ConfigError;

/// File name searched for when no config path is given
pub const CONFIG_FILE_NAME: &str = "qorex.toml";

/// On-disk shape of a config file, before validation
#[derive(Debug, Deserialize)]
struct ConfigFile {
    groups: Option<Vec<Group>>,
    #[serde(default)]
    runs: RunsConfig,
}

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from a TOML string
pub fn parse_config(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    let file = toml::from_str::<ConfigFile>(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let groups = file.groups.ok_or(ConfigError::MissingGroups)?;
    Config::with_runs(groups, file.runs)
}

/// Load and validate the config at `path`
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = read_config_file(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents, path)?;
    log::debug!(
        "Loaded config from {} ({} groups)",
        path.display(),
        config.groups().len()
    );
    Ok(config)
}

/// Pure function to generate directory ancestors up to a depth limit
pub(crate) fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a `qorex.toml`
pub fn find_config(start: &Path) -> Option<PathBuf> {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
        .or_else(|| {
            log::debug!(
                "No {} found after checking {} directories",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            None
        })
}
