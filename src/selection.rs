//! Resolve a group selection into an ordered, deduplicated metric key list.

use std::collections::BTreeSet;

use crate::config::{Config, Group};

/// Which visible groups to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSelection {
    All,
    /// 0-based indices into the visible (non-hidden) group list
    Indices(BTreeSet<usize>),
}

impl GroupSelection {
    pub fn none() -> Self {
        Self::Indices(BTreeSet::new())
    }

    pub fn indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::Indices(indices.into_iter().collect())
    }

    /// Preselect the first visible group that does not identify runs,
    /// falling back to the first visible group.
    pub fn default_for(config: &Config) -> Self {
        let visible = config.visible_groups();
        let index = visible
            .iter()
            .position(|g| !g.is_run_identity())
            .unwrap_or(0);
        if visible.is_empty() {
            Self::none()
        } else {
            Self::indices([index])
        }
    }

    /// Select visible groups by name. Unknown names are returned as the error.
    pub fn by_names<S: AsRef<str>>(config: &Config, names: &[S]) -> Result<Self, Vec<String>> {
        let visible = config.visible_groups();
        let mut indices = BTreeSet::new();
        let mut unknown = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            match visible.iter().position(|g| g.name().eq_ignore_ascii_case(name)) {
                Some(index) => {
                    indices.insert(index);
                }
                None => unknown.push(name.to_string()),
            }
        }

        if unknown.is_empty() {
            Ok(Self::Indices(indices))
        } else {
            Err(unknown)
        }
    }

    pub fn includes(&self, index: usize) -> bool {
        match self {
            Self::All => true,
            Self::Indices(set) => set.contains(&index),
        }
    }
}

/// Metric keys of the selected groups in declaration order. A name seen in
/// an earlier selected group is not repeated.
pub fn resolve_keys(visible: &[&Group], selection: &GroupSelection) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for (_, group) in visible
        .iter()
        .enumerate()
        .filter(|(index, _)| selection.includes(*index))
    {
        for name in group.metric_names() {
            if !keys.iter().any(|k| k == name) {
                keys.push(name.to_string());
            }
        }
    }
    log::debug!("Resolved {} metric keys for {:?}", keys.len(), selection);
    keys
}

/// [`resolve_keys`] over the config's visible groups.
pub fn resolve_config_keys(config: &Config, selection: &GroupSelection) -> Vec<String> {
    resolve_keys(&config.visible_groups(), selection)
}
