//! Terminal UI layer of the ticket dashboard.
//!
//! Provides themes, the header and year-picker components, chart widgets
//! for the five dashboard figures, and the application event loop built on
//! top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod themes;

pub use dashboard_core as core;
