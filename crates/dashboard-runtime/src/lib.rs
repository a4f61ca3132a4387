//! Runtime layer of the ticket dashboard.
//!
//! Owns the shared [`service::DashboardService`] that recomputes the charts
//! for a year selection, and the axum HTTP surface built on top of it.

pub mod server;
pub mod service;

pub use dashboard_core as core;
pub use dashboard_data as data;
