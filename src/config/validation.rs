//! Structural validation of group declarations.
//!
//! Duplicate metric names are rejected only within a single group; the same
//! name may appear in any number of groups.

use std::collections::HashSet;

use super::core::Group;
use crate::errors::ConfigError;

pub(crate) fn validate_groups(groups: &[Group]) -> Result<(), ConfigError> {
    if groups.is_empty() {
        return Err(ConfigError::NoGroups);
    }
    groups
        .iter()
        .enumerate()
        .try_for_each(|(index, group)| validate_group(index, group))
}

fn validate_group(index: usize, group: &Group) -> Result<(), ConfigError> {
    if group.name().trim().is_empty() {
        return Err(ConfigError::EmptyName { index });
    }
    if group.metrics().is_empty() {
        return Err(ConfigError::EmptyGroup {
            group: group.name().to_string(),
        });
    }

    let mut seen = HashSet::new();
    for name in group.metric_names() {
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyMetricName {
                group: group.name().to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateMetric {
                group: group.name().to_string(),
                metric: name.to_string(),
            });
        }
    }
    Ok(())
}
