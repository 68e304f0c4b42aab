//! Configuration types for variance runs.
//!
//! This module contains the strongly-typed configuration structure that is
//! deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The statutory superannuation guarantee rate applied to OTE (9.5%).
pub const DEFAULT_OTE_SUPER_RATE: Decimal = Decimal::from_parts(95, 0, 0, false, 3);

/// Superannuation settings injected into the OTE aggregator.
///
/// # Example
///
/// ```
/// use super_variance::config::{SuperConfig, DEFAULT_OTE_SUPER_RATE};
///
/// let config = SuperConfig::default();
/// assert_eq!(config.ote_super_rate, DEFAULT_OTE_SUPER_RATE);
/// assert_eq!(config.ote_super_rate.to_string(), "0.095");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuperConfig {
    /// Fraction of each OTE amount that is payable as super.
    #[serde(default = "default_ote_super_rate")]
    pub ote_super_rate: Decimal,
}

fn default_ote_super_rate() -> Decimal {
    DEFAULT_OTE_SUPER_RATE
}

impl Default for SuperConfig {
    fn default() -> Self {
        Self {
            ote_super_rate: DEFAULT_OTE_SUPER_RATE,
        }
    }
}
