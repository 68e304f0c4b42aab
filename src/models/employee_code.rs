//! Employee identifier model.
//!
//! Payroll exports identify employees with whatever the source system uses:
//! plain integers (`1115`) in some exports, text codes (`E1`) in others.
//! [`EmployeeCode`] keeps that distinction so numeric codes sort numerically.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifies the employee a pay line or disbursement belongs to.
///
/// Numeric codes order before text codes; within each kind the natural
/// ordering applies.
///
/// # Example
///
/// ```
/// use super_variance::models::EmployeeCode;
///
/// assert_eq!(EmployeeCode::parse("1115"), EmployeeCode::Numeric(1115));
/// assert_eq!(EmployeeCode::parse("1115.0"), EmployeeCode::Numeric(1115));
/// assert_eq!(EmployeeCode::parse("E1"), EmployeeCode::Text("E1".to_string()));
/// assert!(EmployeeCode::parse("9") < EmployeeCode::parse("10"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmployeeCode {
    /// An integer employee number.
    Numeric(i64),
    /// Any other identifier.
    Text(String),
}

impl EmployeeCode {
    /// Parses a raw cell value into an employee code.
    ///
    /// Integral values are numeric, including the `"1115.0"` form that
    /// spreadsheet number cells produce. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(number) = trimmed.parse::<i64>() {
            return EmployeeCode::Numeric(number);
        }
        if let Some(number) = trimmed
            .strip_suffix(".0")
            .and_then(|int_part| int_part.parse::<i64>().ok())
        {
            return EmployeeCode::Numeric(number);
        }
        EmployeeCode::Text(trimmed.to_string())
    }
}

impl fmt::Display for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeCode::Numeric(number) => write!(f, "{}", number),
            EmployeeCode::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<&str> for EmployeeCode {
    fn from(raw: &str) -> Self {
        EmployeeCode::parse(raw)
    }
}

impl From<i64> for EmployeeCode {
    fn from(number: i64) -> Self {
        EmployeeCode::Numeric(number)
    }
}

impl Serialize for EmployeeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EmployeeCode::Numeric(number) => serializer.serialize_i64(*number),
            EmployeeCode::Text(text) => serializer.serialize_str(text),
        }
    }
}

struct EmployeeCodeVisitor;

impl Visitor<'_> for EmployeeCodeVisitor {
    type Value = EmployeeCode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or string employee code")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(EmployeeCode::Numeric(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .map(EmployeeCode::Numeric)
            .map_err(|_| E::custom(format!("employee code {} is out of range", value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(EmployeeCode::parse(value))
    }
}

impl<'de> Deserialize<'de> for EmployeeCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EmployeeCodeVisitor)
    }
}
