//! Cell classification and delta rendering.
//!
//! Every raw value is classified exactly once into [`CellValue`]:
//! `Numeric`, `Text` or `Missing`. Downstream code matches on that
//! outcome instead of guessing types.
//!
//! # Rounding
//!
//! All rounding is round-half-to-even: `2.5 -> 2`, `3.5 -> 4`, `-2.5 -> -2`.
//! This applies to deltas, percentages and the `k` magnitude division.

use crate::data::FieldValue;
use serde::{Serialize, Serializer};
use std::fmt;

/// Deltas at or above this magnitude are shown in thousands with a `k` suffix.
pub const MAGNITUDE_THRESHOLD: i64 = 1000;

/// A parsed numeric value, normalised to an integer when it has no
/// fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    /// Normalise a float. Non-finite values are not numbers for comparison
    /// purposes and yield `None`.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound
        let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
        if value.trunc() == value && in_range {
            Some(Self::Integer(value as i64))
        } else {
            Some(Self::Real(value))
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Real(r) => r,
        }
    }

    pub fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
        }
    }
}

/// Three-way classification of a record cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Numeric(Number),
    /// Anything that is not a number, holding the original text.
    Text(String),
    /// The key is absent from the record.
    Missing,
}

impl CellValue {
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(_) | Self::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => n.fmt(f),
            Self::Text(s) => f.write_str(s),
            Self::Missing => Ok(()),
        }
    }
}

/// Classify a (possibly absent) raw value.
pub fn classify(value: Option<&FieldValue>) -> CellValue {
    match value {
        None => CellValue::Missing,
        Some(FieldValue::Number(n)) => Number::from_f64(*n)
            .map(CellValue::Numeric)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        Some(FieldValue::Text(s)) => parse_number(s)
            .map(CellValue::Numeric)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
    }
}

/// Parse text as a number: one trailing `%` is dropped, surrounding
/// whitespace is ignored.
pub fn parse_number(raw: &str) -> Option<Number> {
    let unsuffixed = raw.strip_suffix('%').unwrap_or(raw);
    unsuffixed
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
}

pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Render a rounded delta with an explicit sign and, for large magnitudes,
/// a `k` suffix: `2500 -> "+2k"`, `-999 -> "-999"`, `0 -> "+0"`.
pub fn format_delta(delta: i64) -> String {
    let rendered = if delta.unsigned_abs() >= MAGNITUDE_THRESHOLD as u64 {
        let thousands = round_half_even(delta as f64 / 1000.0) as i64;
        format!("{thousands}k")
    } else {
        delta.to_string()
    };

    if rendered.starts_with('-') {
        rendered
    } else {
        format!("+{rendered}")
    }
}

/// Relative change against the base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Percent {
    Finite(u64),
    /// The base value was zero.
    Infinite,
}

impl Percent {
    /// `abs(round(delta * 100 / base))`, or `Infinite` for a zero base.
    pub fn of(delta: i64, base: Number) -> Self {
        if base.is_zero() {
            return Self::Infinite;
        }
        let pct = round_half_even(delta as f64 * 100.0 / base.as_f64()).abs();
        Self::Finite(pct as u64)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(p) => write!(f, "{p}%"),
            Self::Infinite => f.write_str("Inf%"),
        }
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(p) => serializer.serialize_u64(*p),
            Self::Infinite => serializer.serialize_str("Inf"),
        }
    }
}
