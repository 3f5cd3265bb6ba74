//! Property-based tests for run comparison
//!
//! These tests verify invariants that should hold for all inputs:
//! - Comparing the same runs twice gives the same table
//! - Rendered deltas always carry a sign
//! - Inverting a metric flips its regression flag on any non-zero change
//! - Selected metric keys are unique and keep first-seen order

use proptest::prelude::*;
use qorex::comparison::{is_regression, CompareCell};
use qorex::config::{Config, Group, Metric};
use qorex::data::{FieldValue, Record};
use qorex::selection::{resolve_config_keys, GroupSelection};
use qorex::{compare, format_delta};
use std::collections::HashSet;

/// Small metric names so groups overlap often
fn metric_name() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn group_metrics() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(metric_name(), 1..5).prop_map(|set| set.into_iter().collect())
}

fn record(value: f64) -> Record {
    Record::from_iter([("m", FieldValue::Number(value))])
}

proptest! {
    /// Property: the rendered delta starts with `+` or `-`
    #[test]
    fn prop_delta_is_signed(delta in -5_000_000i64..5_000_000) {
        let rendered = format_delta(delta);
        prop_assert!(rendered.starts_with('+') || rendered.starts_with('-'));
        if delta < 0 {
            prop_assert!(rendered.starts_with('-'));
        }
    }

    /// Property: inversion flips the verdict for every non-zero change
    #[test]
    fn prop_inversion_flips_regression(change in -100_000i64..100_000) {
        prop_assume!(change != 0);
        prop_assert_ne!(is_regression(change, false), is_regression(change, true));
    }

    /// Property: no change is never a regression
    #[test]
    fn prop_zero_change_never_regresses(inverted in any::<bool>()) {
        prop_assert!(!is_regression(0, inverted));
    }

    /// Property: comparing is deterministic for identical inputs
    #[test]
    fn prop_comparison_is_idempotent(
        base in -1.0e6f64..1.0e6,
        current in -1.0e6f64..1.0e6,
        inverted in any::<bool>(),
    ) {
        let metric = if inverted { Metric::new("m").inverted() } else { Metric::new("m") };
        let config = Config::new(vec![Group::new("G", vec![metric])]).unwrap();
        let (a, b) = (record(base), record(current));
        let keys = vec!["m".to_string()];

        let first = compare(&[&a, &b], &keys, &config);
        let second = compare(&[&a, &b], &keys, &config);
        prop_assert_eq!(&first, &second);

        let cell = &first.table().unwrap().rows[0].compare[0];
        if let CompareCell::Delta { change, regressed, .. } = cell {
            prop_assert_eq!(*regressed, is_regression(*change, inverted));
        } else {
            prop_assert!(false, "numeric pair should produce a delta cell");
        }
    }

    /// Property: resolved keys are unique and ordered by first appearance
    #[test]
    fn prop_resolved_keys_are_deduplicated(groups in prop::collection::vec(group_metrics(), 1..5)) {
        let config = Config::new(
            groups
                .iter()
                .enumerate()
                .map(|(i, names)| {
                    Group::new(format!("G{i}"), names.iter().map(Metric::new).collect())
                })
                .collect(),
        )
        .unwrap();

        let keys = resolve_config_keys(&config, &GroupSelection::All);

        let unique: HashSet<&String> = keys.iter().collect();
        prop_assert_eq!(unique.len(), keys.len());

        let mut expected = Vec::new();
        for name in groups.iter().flatten() {
            if !expected.contains(name) {
                expected.push(name.clone());
            }
        }
        prop_assert_eq!(keys, expected);
    }
}
