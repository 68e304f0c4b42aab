//! Configuration loading and management for the variance engine.
//!
//! This module provides functionality to load superannuation settings from a
//! YAML file. The only recognised option is the rate applied to ordinary time
//! earnings; everything else about a run is fixed by its inputs.
//!
//! # Example
//!
//! ```no_run
//! use super_variance::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/super.yaml").unwrap();
//! println!("OTE super rate: {}", config.ote_super_rate());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DEFAULT_OTE_SUPER_RATE, SuperConfig};
