//! Core domain types for the ticket dashboard.
//!
//! Holds the ticket model, year selection and cutoff rules, the error type,
//! CLI settings, per-locale chart labels and number formatting shared by the
//! data, runtime and UI crates.

pub mod error;
pub mod formatting;
pub mod labels;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
