//! The dashboard's reactive callback: year selection in, five figures out.
//!
//! [`DashboardService`] holds the read-only dataset behind an [`Arc`] and is
//! cheap to clone, so the HTTP handlers and the terminal UI share one
//! instance without locking.

use std::sync::Arc;
use std::time::Instant;

use dashboard_core::labels::ChartLabels;
use dashboard_core::models::{Dataset, YearCutoff, YearSelection};
use dashboard_data::figures::DashboardFigures;
use dashboard_data::pipeline;
use serde::Serialize;

/// Year options offered by the picker together with the initial selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearOptions {
    pub options: Vec<String>,
    pub default: YearSelection,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    dataset: Arc<Dataset>,
    cutoff: Option<YearCutoff>,
    labels: Arc<ChartLabels>,
    initial: YearSelection,
}

impl DashboardService {
    pub fn new(dataset: Arc<Dataset>, cutoff: Option<YearCutoff>, labels: ChartLabels) -> Self {
        let initial = dataset.default_selection();
        Self {
            dataset,
            cutoff,
            labels: Arc::new(labels),
            initial,
        }
    }

    /// Replace the initial selection (e.g. from `--years`).
    ///
    /// An empty selection falls back to the dataset's latest year.
    pub fn with_initial_selection(mut self, selection: YearSelection) -> Self {
        if !selection.is_empty() {
            self.initial = selection;
        }
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn labels(&self) -> &ChartLabels {
        &self.labels
    }

    pub fn cutoff(&self) -> Option<&YearCutoff> {
        self.cutoff.as_ref()
    }

    /// Distinct years of the dataset, ascending.
    pub fn year_options(&self) -> &[String] {
        self.dataset.years()
    }

    /// Selection shown before the user picks anything.
    pub fn default_selection(&self) -> &YearSelection {
        &self.initial
    }

    pub fn options(&self) -> YearOptions {
        YearOptions {
            options: self.year_options().to_vec(),
            default: self.initial.clone(),
        }
    }

    /// Recompute all five figures for `selection`.
    pub fn update(&self, selection: &YearSelection) -> DashboardFigures {
        let started = Instant::now();
        let update = pipeline::run(&self.dataset, selection, self.cutoff.as_ref());
        let no_data = update.is_no_data();
        let figures = update.into_figures(&self.labels, selection);

        tracing::debug!(
            years = %selection.joined(),
            no_data,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dashboard figures recomputed"
        );
        figures
    }
}
