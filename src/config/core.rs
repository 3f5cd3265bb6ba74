use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::validation::validate_groups;
use crate::derive::Derivation;
use crate::errors::ConfigError;

/// Default key used to order the run listing, newest first.
pub const DEFAULT_SORT_KEY: &str = "Timestamp";

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single comparable quantity, identified by its raw field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    name: String,

    /// Display label used instead of the raw name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rename: Option<String>,

    /// Lower values are improvements (power, runtime, ...)
    #[serde(default, skip_serializing_if = "is_false")]
    inverted: bool,

    /// Synthesize the field at load time instead of reading it raw
    #[serde(default, skip_serializing_if = "Option::is_none")]
    derive: Option<Derivation>,
}

impl Metric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rename: None,
            inverted: false,
            derive: None,
        }
    }

    #[must_use]
    pub fn renamed(mut self, label: impl Into<String>) -> Self {
        self.rename = Some(label.into());
        self
    }

    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    #[must_use]
    pub fn derived(mut self, derivation: Derivation) -> Self {
        self.derive = Some(derivation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&self) -> Option<&str> {
        self.rename.as_deref()
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn derivation(&self) -> Option<&Derivation> {
        self.derive.as_ref()
    }
}

/// A named, ordered bundle of metrics controlling selective display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    name: String,
    metrics: Vec<Metric>,

    /// Metric values of this group jointly label a run
    #[serde(default, skip_serializing_if = "is_false")]
    run_identity: bool,

    /// Excluded from group selection; metrics stay addressable by key
    #[serde(default, skip_serializing_if = "is_false")]
    hidden: bool,
}

impl Group {
    pub fn new(name: impl Into<String>, metrics: Vec<Metric>) -> Self {
        Self {
            name: name.into(),
            metrics,
            run_identity: false,
            hidden: false,
        }
    }

    #[must_use]
    pub fn run_identity(mut self) -> Self {
        self.run_identity = true;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(Metric::name)
    }

    pub fn is_run_identity(&self) -> bool {
        self.run_identity
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// Run listing options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunsConfig {
    /// Field used to order runs (descending)
    #[serde(default = "default_sort_key")]
    pub sort_by: String,
}

fn default_sort_key() -> String {
    DEFAULT_SORT_KEY.to_string()
}

impl Default for RunsConfig {
    fn default() -> Self {
        Self {
            sort_by: default_sort_key(),
        }
    }
}

/// Validated, immutable metric configuration.
///
/// Every derived view (`run_identity_keys`, `inverted_metrics`,
/// `rename_map`, `derived_metrics`) is recomputed from the group list on
/// each call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    groups: Vec<Group>,
    runs: RunsConfig,
}

impl Config {
    pub fn new(groups: Vec<Group>) -> Result<Self, ConfigError> {
        Self::with_runs(groups, RunsConfig::default())
    }

    pub fn with_runs(groups: Vec<Group>, runs: RunsConfig) -> Result<Self, ConfigError> {
        validate_groups(&groups)?;
        Ok(Self { groups, runs })
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Groups offered for selection, in declaration order.
    pub fn visible_groups(&self) -> Vec<&Group> {
        self.groups.iter().filter(|g| !g.is_hidden()).collect()
    }

    pub fn all_metrics(&self) -> impl Iterator<Item = &Metric> {
        self.groups.iter().flat_map(|g| g.metrics.iter())
    }

    /// Metric names of all run-identity groups, group order then metric
    /// order, without repeats.
    pub fn run_identity_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for name in self
            .groups
            .iter()
            .filter(|g| g.is_run_identity())
            .flat_map(Group::metric_names)
        {
            if !keys.iter().any(|k| k == name) {
                keys.push(name.to_string());
            }
        }
        keys
    }

    /// Names marked inverted on any of their declarations.
    pub fn inverted_metrics(&self) -> BTreeSet<String> {
        self.all_metrics()
            .filter(|m| m.is_inverted())
            .map(|m| m.name().to_string())
            .collect()
    }

    /// Raw name to display label; the last declared rename wins.
    pub fn rename_map(&self) -> HashMap<String, String> {
        self.all_metrics()
            .filter_map(|m| m.rename().map(|r| (m.name().to_string(), r.to_string())))
            .collect()
    }

    /// Every metric declaration carrying a derivation, in declaration order.
    pub fn derived_metrics(&self) -> Vec<&Metric> {
        self.all_metrics()
            .filter(|m| m.derivation().is_some())
            .collect()
    }

    pub fn sort_key(&self) -> &str {
        &self.runs.sort_by
    }
}
