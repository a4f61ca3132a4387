//! Data layer of the ticket dashboard.
//!
//! Loads and cleans the ticket CSV, filters it by year selection, computes
//! the five grouped aggregates and turns them into chart specifications.

pub mod aggregator;
pub mod figures;
pub mod pipeline;
pub mod reader;
pub mod selection;

pub use dashboard_core as core;
