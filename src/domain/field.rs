//! Validated fields.
//!
//! A field is described by a [`FieldSpec`]: a name plus an ordered list of
//! [`Constraint`]s. The same spec is checked at construction and on every
//! later assignment through [`Validated::set`], and is also used to parse raw
//! configuration text so that file input and API input obey identical rules.

use std::cell::Cell;
use std::fmt;

use super::error::LookbackError;

/// A value presented to a field for validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Real(f64),
    Integer(i64),
    Text(&'a str),
}

impl Value<'_> {
    fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value<'static> {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<i64> for Value<'static> {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Text(v)
    }
}

/// One rule in a field's constraint list. Type constraints come first so
/// that content checks only ever see the expected kind of value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// A finite real number (integers are accepted as reals).
    Real,
    Integer,
    Text,
    NonNegative,
    Positive,
    NonEmpty,
    FixedLength(usize),
}

impl Constraint {
    pub fn check(&self, field: &'static str, value: Value<'_>) -> Result<(), LookbackError> {
        match (self, value) {
            (Constraint::Real, Value::Real(v)) if !v.is_finite() => {
                Err(LookbackError::InvalidValue {
                    field,
                    reason: format!("expected a finite number, got {v}"),
                })
            }
            (Constraint::Real, Value::Real(_) | Value::Integer(_))
            | (Constraint::Integer, Value::Integer(_))
            | (Constraint::Text, Value::Text(_)) => Ok(()),
            (Constraint::Real, other) => Err(invalid_type(field, "real", other)),
            (Constraint::Integer, other) => Err(invalid_type(field, "integer", other)),
            (Constraint::Text, other) => Err(invalid_type(field, "text", other)),
            (Constraint::NonNegative, v) => match v.as_real() {
                Some(x) if x < 0.0 => Err(LookbackError::InvalidValue {
                    field,
                    reason: format!("expected >= 0, got {x}"),
                }),
                Some(_) => Ok(()),
                None => Err(invalid_type(field, "number", v)),
            },
            (Constraint::Positive, v) => match v.as_real() {
                Some(x) if x <= 0.0 => Err(LookbackError::InvalidValue {
                    field,
                    reason: format!("expected > 0, got {x}"),
                }),
                Some(_) => Ok(()),
                None => Err(invalid_type(field, "number", v)),
            },
            (Constraint::NonEmpty, Value::Text(s)) => {
                if s.is_empty() {
                    Err(LookbackError::InvalidValue {
                        field,
                        reason: "must not be empty".to_string(),
                    })
                } else {
                    Ok(())
                }
            }
            (Constraint::FixedLength(size), Value::Text(s)) => {
                let len = s.chars().count();
                if len != *size {
                    Err(LookbackError::InvalidValue {
                        field,
                        reason: format!("size must be = {size}, got {len} ({s:?})"),
                    })
                } else {
                    Ok(())
                }
            }
            (Constraint::NonEmpty | Constraint::FixedLength(_), other) => {
                Err(invalid_type(field, "text", other))
            }
        }
    }
}

fn invalid_type(field: &'static str, expected: &'static str, found: Value<'_>) -> LookbackError {
    LookbackError::InvalidType {
        field,
        expected,
        found: found.to_string(),
    }
}

/// A named, ordered list of constraints.
#[derive(Debug)]
pub struct FieldSpec {
    name: &'static str,
    constraints: &'static [Constraint],
}

impl FieldSpec {
    pub const fn new(name: &'static str, constraints: &'static [Constraint]) -> Self {
        FieldSpec { name, constraints }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn check<'a>(&self, value: impl Into<Value<'a>>) -> Result<(), LookbackError> {
        let value = value.into();
        for constraint in self.constraints {
            constraint.check(self.name, value)?;
        }
        Ok(())
    }

    /// Parse configuration text as a real and validate it.
    pub fn parse_real(&self, raw: &str) -> Result<f64, LookbackError> {
        let trimmed = raw.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| invalid_type(self.name, "real", Value::Text(trimmed)))?;
        self.check(value)?;
        Ok(value)
    }

    /// Parse configuration text as an integer and validate it.
    pub fn parse_integer(&self, raw: &str) -> Result<i64, LookbackError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| invalid_type(self.name, "integer", Value::Text(trimmed)))?;
        self.check(value)?;
        Ok(value)
    }

    /// Validate text and return an owned copy.
    pub fn text(&self, raw: &str) -> Result<String, LookbackError> {
        self.check(raw)?;
        Ok(raw.to_string())
    }
}

pub static PRICE: FieldSpec = FieldSpec::new("price", &[Constraint::Real, Constraint::NonNegative]);
pub static RATE: FieldSpec = FieldSpec::new("rate", &[Constraint::Real, Constraint::Positive]);
pub static UNITS: FieldSpec = FieldSpec::new("units", &[Constraint::Integer]);
pub static CONSIDERATION: FieldSpec = FieldSpec::new("consideration", &[Constraint::Real]);
pub static ASSET_CODE: FieldSpec =
    FieldSpec::new("code", &[Constraint::Text, Constraint::NonEmpty]);
pub static CURRENCY_CODE: FieldSpec =
    FieldSpec::new("currency_code", &[Constraint::Text, Constraint::FixedLength(3)]);
pub static BASE_CURRENCY_CODE: FieldSpec = FieldSpec::new(
    "base_currency_code",
    &[Constraint::Text, Constraint::FixedLength(3)],
);
pub static CURRENCY_PAIR: FieldSpec =
    FieldSpec::new("currency_pair", &[Constraint::Text, Constraint::FixedLength(6)]);

/// A mutable value that is re-validated against its spec on every assignment.
#[derive(Debug)]
pub struct Validated<T: Copy> {
    spec: &'static FieldSpec,
    value: Cell<T>,
}

impl<T> Validated<T>
where
    T: Copy + Into<Value<'static>>,
{
    pub fn new(spec: &'static FieldSpec, value: T) -> Result<Self, LookbackError> {
        spec.check(value)?;
        Ok(Validated {
            spec,
            value: Cell::new(value),
        })
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Validate and store. On failure the previous value is kept.
    pub fn set(&self, value: T) -> Result<(), LookbackError> {
        self.spec.check(value)?;
        self.value.set(value);
        Ok(())
    }

    pub fn spec(&self) -> &'static FieldSpec {
        self.spec
    }
}
