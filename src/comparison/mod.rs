//! Comparison engine: turns selected run records and a resolved metric key
//! list into a direction-aware table of values, deltas and percentages.
//!
//! The first record is the base; every other record becomes a compare
//! column. Numeric pairs get a signed delta, a percentage (or the
//! `Infinite` sentinel for a zero base) and a regression flag. Anything else
//! is shown raw.

pub mod comparator;
pub mod types;

pub use comparator::{compare, is_regression, Comparator};
pub use types::{CompareCell, ComparisonOutcome, ComparisonRow, ComparisonTable};
