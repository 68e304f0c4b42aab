//! Quarter labels and the aggregation key.
//!
//! This module contains the [`Quarter`] label shared by both quarter
//! conventions and the [`QuarterKey`] every aggregate is grouped on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EmployeeCode;

/// A quarter label.
///
/// The label carries no calendar meaning by itself: whether `Q1` means
/// January to March or January 29 to April 28 depends on which classifier
/// produced it. Ordering follows the labels, so `Q1 < Q2 < Q3 < Q4`.
///
/// # Example
///
/// ```
/// use super_variance::models::Quarter;
///
/// assert_eq!(Quarter::Q3.to_string(), "Q3");
/// assert_eq!("Q2".parse::<Quarter>().unwrap(), Quarter::Q2);
/// assert!(Quarter::Q1 < Quarter::Q4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quarter {
    /// First quarter.
    Q1,
    /// Second quarter.
    Q2,
    /// Third quarter.
    Q3,
    /// Fourth quarter.
    Q4,
}

impl Quarter {
    /// All quarters in label order.
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Returns the label as written in reports.
    pub fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quarter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quarter::ALL
            .into_iter()
            .find(|q| q.label() == s.trim())
            .ok_or_else(|| format!("Unknown quarter label: {}", s))
    }
}

/// The (employee, year, quarter) identity used for grouping and joining.
///
/// Field order matters: the derived ordering sorts by employee, then year,
/// then quarter, which is the report order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuarterKey {
    /// The employee the bucket belongs to.
    pub employee_code: EmployeeCode,
    /// The year the bucket belongs to (calendar or fiscal, per classifier).
    pub year: i32,
    /// The quarter within that year.
    pub quarter: Quarter,
}

impl QuarterKey {
    /// Creates a new key.
    pub fn new(employee_code: EmployeeCode, year: i32, quarter: Quarter) -> Self {
        Self {
            employee_code,
            year,
            quarter,
        }
    }
}

impl fmt::Display for QuarterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.employee_code, self.year, self.quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_labels() {
        let labels: Vec<&str> = Quarter::ALL.iter().map(|q| q.label()).collect();
        assert_eq!(labels, vec!["Q1", "Q2", "Q3", "Q4"]);
    }

    #[test]
    fn test_quarter_order_matches_label_order() {
        let mut by_enum = Quarter::ALL.to_vec();
        by_enum.sort();
        let mut by_label = Quarter::ALL.to_vec();
        by_label.sort_by_key(|q| q.label());
        assert_eq!(by_enum, by_label);
    }

    #[test]
    fn test_parse_unknown_quarter_fails() {
        assert!("Q5".parse::<Quarter>().is_err());
        assert!("q1".parse::<Quarter>().is_err());
    }

    #[test]
    fn test_quarter_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Quarter::Q4).unwrap(), "\"Q4\"");
    }

    #[test]
    fn test_key_orders_by_employee_then_year_then_quarter() {
        let mut keys = vec![
            QuarterKey::new(EmployeeCode::Numeric(1118), 2023, Quarter::Q1),
            QuarterKey::new(EmployeeCode::Numeric(1115), 2023, Quarter::Q3),
            QuarterKey::new(EmployeeCode::Numeric(1115), 2022, Quarter::Q4),
            QuarterKey::new(EmployeeCode::Numeric(1115), 2023, Quarter::Q1),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["1115/2022/Q4", "1115/2023/Q1", "1115/2023/Q3", "1118/2023/Q1"]
        );
    }
}
