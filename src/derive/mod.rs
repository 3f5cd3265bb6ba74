//! Derived fields, computed once per record at load time.
//!
//! A derivation is a declaration ([`Derivation`]) rather than a stored
//! closure, so configs stay serializable. Functions that cannot be expressed
//! declaratively are registered by name in a [`DerivationRegistry`] and
//! referenced with `kind = "named"`.
//!
//! Derived metrics are applied in declaration order, so a later derivation
//! may read a field produced by an earlier one. A referenced field that is
//! absent is an error, never a silent default.

mod enrich;
mod registry;

pub use enrich::enrich;
pub use registry::{DeriveFn, DerivationRegistry};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{FieldValue, Record};
use crate::errors::{ConfigError, DerivationError};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d.%m.%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn default_separator() -> String {
    " ".to_string()
}

/// How a derived metric is computed from the other fields of its record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Derivation {
    /// Join the textual values of `fields` with `separator`
    Concat {
        fields: Vec<String>,
        #[serde(default = "default_separator")]
        separator: String,
    },
    /// Combine a date and a time field into `YYYY-MM-DD HH:MM:SS`
    Timestamp { date: String, time: String },
    Sum { fields: Vec<String> },
    Product { fields: Vec<String> },
    Difference { minuend: String, subtrahend: String },
    Ratio { numerator: String, denominator: String },
    /// Call a function registered in the [`DerivationRegistry`]
    Named { function: String },
}

/// Read access to a record on behalf of one derived metric.
///
/// Lookups fail with errors naming the metric being derived.
pub struct DerivationInput<'a> {
    metric: &'a str,
    record: &'a Record,
}

impl<'a> DerivationInput<'a> {
    pub fn new(metric: &'a str, record: &'a Record) -> Self {
        Self { metric, record }
    }

    pub fn metric(&self) -> &str {
        self.metric
    }

    pub fn record(&self) -> &Record {
        self.record
    }

    pub fn field(&self, name: &str) -> Result<&'a FieldValue, DerivationError> {
        self.record
            .get(name)
            .ok_or_else(|| DerivationError::MissingField {
                metric: self.metric.to_string(),
                field: name.to_string(),
                row: 0,
            })
    }

    pub fn number(&self, name: &str) -> Result<f64, DerivationError> {
        let value = self.field(name)?;
        value.as_number().ok_or_else(|| DerivationError::NonNumeric {
            metric: self.metric.to_string(),
            field: name.to_string(),
            value: value.to_string(),
            row: 0,
        })
    }

    pub fn invalid(&self, message: impl Into<String>) -> DerivationError {
        DerivationError::InvalidValue {
            metric: self.metric.to_string(),
            message: message.into(),
            row: 0,
        }
    }
}

impl Derivation {
    /// Compute the value for `metric` from `record`.
    pub fn evaluate(
        &self,
        metric: &str,
        record: &Record,
        registry: &DerivationRegistry,
    ) -> Result<FieldValue, DerivationError> {
        let input = DerivationInput::new(metric, record);
        match self {
            Self::Concat { fields, separator } => {
                let parts = fields
                    .iter()
                    .map(|f| input.field(f).map(ToString::to_string))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FieldValue::Text(parts.join(separator)))
            }
            Self::Timestamp { date, time } => timestamp(&input, date, time),
            Self::Sum { fields } => fields
                .iter()
                .try_fold(0.0, |acc, f| Ok::<_, DerivationError>(acc + input.number(f)?))
                .map(FieldValue::Number),
            Self::Product { fields } => fields
                .iter()
                .try_fold(1.0, |acc, f| Ok::<_, DerivationError>(acc * input.number(f)?))
                .map(FieldValue::Number),
            Self::Difference {
                minuend,
                subtrahend,
            } => Ok(FieldValue::Number(
                input.number(minuend)? - input.number(subtrahend)?,
            )),
            Self::Ratio {
                numerator,
                denominator,
            } => {
                let num = input.number(numerator)?;
                let den = input.number(denominator)?;
                if den == 0.0 {
                    return Err(input.invalid(format!("`{denominator}` is zero")));
                }
                Ok(FieldValue::Number(num / den))
            }
            Self::Named { function } => match registry.get(function) {
                Some(f) => f(&input),
                None => Err(input.invalid(format!("function `{function}` is not registered"))),
            },
        }
    }
}

fn timestamp(
    input: &DerivationInput<'_>,
    date_field: &str,
    time_field: &str,
) -> Result<FieldValue, DerivationError> {
    let date_raw = input.field(date_field)?.to_string();
    let time_raw = input.field(time_field)?.to_string();

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_raw.trim(), fmt).ok())
        .ok_or_else(|| input.invalid(format!("unrecognised date `{date_raw}`")))?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time_raw.trim(), fmt).ok())
        .ok_or_else(|| input.invalid(format!("unrecognised time `{time_raw}`")))?;

    let stamp = NaiveDateTime::new(date, time).format(TIMESTAMP_FORMAT);
    Ok(FieldValue::Text(stamp.to_string()))
}

/// Check that every `named` derivation in `config` is registered.
pub fn validate_derivations(
    config: &Config,
    registry: &DerivationRegistry,
) -> Result<(), ConfigError> {
    config
        .derived_metrics()
        .into_iter()
        .try_for_each(|metric| match metric.derivation() {
            Some(Derivation::Named { function }) if !registry.contains(function) => {
                Err(ConfigError::UnknownDerivation {
                    metric: metric.name().to_string(),
                    function: function.clone(),
                })
            }
            _ => Ok(()),
        })
}
