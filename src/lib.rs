//! Superannuation Guarantee Variance Reporting
//!
//! This crate reconciles the superannuation an employer owes on ordinary time
//! earnings against the superannuation it actually disbursed, per employee and
//! quarter, and publishes the difference as a metrics report.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
