//! Serializable chart specifications built from the aggregate tables.
//!
//! A [`Figure`] carries everything a renderer needs: kind, titles, the x-axis
//! layout and one series per year. The terminal UI draws them with ratatui
//! and the HTTP surface returns them as JSON.

use chrono::NaiveDate;
use dashboard_core::labels::{AxisLabels, ChartLabels};
use dashboard_core::models::YearSelection;
use serde::Serialize;

use crate::aggregator::{
    CustomerAverage, DashboardTables, MonthlySpend, PurchaseFrequency, TicketVolume,
    YearlyComparison,
};

// ── Figure parts ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureKind {
    Bar,
    Scatter,
    Line,
}

/// Layout of the x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum XAxis {
    /// Calendar months, always ticked 1..=12 in order.
    Months {
        tickvals: Vec<u32>,
        ticktext: Vec<String>,
    },
    /// Discrete labels in the order they appear.
    Category,
    /// Continuous dates.
    Timeline,
}

impl XAxis {
    fn months(labels: &ChartLabels) -> Self {
        XAxis::Months {
            tickvals: (1..=12).collect(),
            ticktext: labels.months().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Month(u32),
    Category(String),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: XValue,
    pub y: f64,
}

/// One trace of a figure; `name` is the legend entry (a year for every
/// per-year chart).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

// ── Figure ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// `None` for the empty placeholder.
    pub kind: Option<FigureKind>,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Legend title; empty when the figure has a single unnamed series.
    pub legend_title: String,
    pub x_axis: XAxis,
    pub series: Vec<Series>,
}

impl Figure {
    /// Blank placeholder shown when a selection has no data.
    pub fn empty() -> Self {
        Self {
            kind: None,
            title: String::new(),
            x_title: String::new(),
            y_title: String::new(),
            legend_title: String::new(),
            x_axis: XAxis::Category,
            series: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Smallest and largest y value over all series.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.points().map(|p| p.y).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }

    /// Every point of every series.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.series.iter().flat_map(|s| s.points.iter())
    }

    fn new(kind: FigureKind, axis: &AxisLabels, title: String, x_axis: XAxis) -> Self {
        Self {
            kind: Some(kind),
            title,
            x_title: axis.x.clone(),
            y_title: axis.y.clone(),
            legend_title: String::new(),
            x_axis,
            series: Vec::new(),
        }
    }

    fn with_year_series(mut self, legend: &str, series: Vec<Series>) -> Self {
        self.legend_title = legend.to_string();
        self.series = series;
        self
    }
}

/// Split rows into one series per year, in first-appearance order.
fn series_by_year<T>(
    rows: &[T],
    year_of: impl Fn(&T) -> &str,
    point_of: impl Fn(&T) -> Point,
) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for row in rows {
        let year = year_of(row);
        let point = point_of(row);
        match series.iter_mut().find(|s| s.name == year) {
            Some(s) => s.points.push(point),
            None => series.push(Series {
                name: year.to_string(),
                points: vec![point],
            }),
        }
    }
    series
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// Grouped bar chart of monthly spend, one bar group per month.
pub fn monthly_spend_figure(
    rows: &[MonthlySpend],
    labels: &ChartLabels,
    selection: &YearSelection,
) -> Figure {
    let axis = &labels.monthly_spend;
    let series = series_by_year(
        rows,
        |r| r.year.as_str(),
        |r| Point {
            x: XValue::Month(r.month),
            y: r.total,
        },
    );
    Figure::new(
        FigureKind::Bar,
        axis,
        ChartLabels::with_years(&axis.title, selection),
        XAxis::months(labels),
    )
    .with_year_series(&labels.year_legend, series)
}

/// Scatter of the mean ticket per customer, coloured by year.
pub fn average_ticket_figure(
    rows: &[CustomerAverage],
    labels: &ChartLabels,
    selection: &YearSelection,
) -> Figure {
    let axis = &labels.average_ticket;
    let series = series_by_year(
        rows,
        |r| r.year.as_str(),
        |r| Point {
            x: XValue::Category(r.customer_id.clone()),
            y: r.average,
        },
    );
    Figure::new(
        FigureKind::Scatter,
        axis,
        ChartLabels::with_years(&axis.title, selection),
        XAxis::Category,
    )
    .with_year_series(&labels.year_legend, series)
}

/// Line of purchases per customer, one line per year.
pub fn purchase_frequency_figure(
    rows: &[PurchaseFrequency],
    labels: &ChartLabels,
    selection: &YearSelection,
) -> Figure {
    let axis = &labels.purchase_frequency;
    let series = series_by_year(
        rows,
        |r| r.year.as_str(),
        |r| Point {
            x: XValue::Category(r.customer_id.clone()),
            y: r.purchases as f64,
        },
    );
    Figure::new(
        FigureKind::Line,
        axis,
        ChartLabels::with_years(&axis.title, selection),
        XAxis::Category,
    )
    .with_year_series(&labels.year_legend, series)
}

/// Monthly totals, one line per year over a shared month axis.
pub fn yearly_comparison_figure(rows: &[YearlyComparison], labels: &ChartLabels) -> Figure {
    let axis = &labels.yearly_comparison;
    let series = series_by_year(
        rows,
        |r| r.year.as_str(),
        |r| Point {
            x: XValue::Month(r.month),
            y: r.total,
        },
    );
    Figure::new(FigureKind::Line, axis, axis.title.clone(), XAxis::months(labels))
        .with_year_series(&labels.year_legend, series)
}

/// Ticket count per month on a continuous timeline.
pub fn ticket_volume_figure(rows: &[TicketVolume], labels: &ChartLabels) -> Figure {
    let axis = &labels.ticket_volume;
    let mut figure = Figure::new(FigureKind::Line, axis, axis.title.clone(), XAxis::Timeline);
    figure.series.push(Series {
        name: axis.y.clone(),
        points: rows
            .iter()
            .map(|r| Point {
                x: XValue::Date(r.period),
                y: r.tickets as f64,
            })
            .collect(),
    });
    figure
}

// ── DashboardFigures ──────────────────────────────────────────────────────────

/// The five charts of the dashboard, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardFigures {
    pub monthly_spend: Figure,
    pub average_ticket: Figure,
    pub purchase_frequency: Figure,
    pub yearly_comparison: Figure,
    pub ticket_volume: Figure,
}

impl DashboardFigures {
    /// Five blank placeholders.
    pub fn empty() -> Self {
        Self {
            monthly_spend: Figure::empty(),
            average_ticket: Figure::empty(),
            purchase_frequency: Figure::empty(),
            yearly_comparison: Figure::empty(),
            ticket_volume: Figure::empty(),
        }
    }

    pub fn from_tables(
        tables: &DashboardTables,
        labels: &ChartLabels,
        selection: &YearSelection,
    ) -> Self {
        Self {
            monthly_spend: monthly_spend_figure(&tables.monthly_spend, labels, selection),
            average_ticket: average_ticket_figure(&tables.average_ticket, labels, selection),
            purchase_frequency: purchase_frequency_figure(
                &tables.purchase_frequency,
                labels,
                selection,
            ),
            yearly_comparison: yearly_comparison_figure(&tables.yearly_comparison, labels),
            ticket_volume: ticket_volume_figure(&tables.ticket_volume, labels),
        }
    }

    /// The five figures in display order.
    pub fn as_array(&self) -> [&Figure; 5] {
        [
            &self.monthly_spend,
            &self.average_ticket,
            &self.purchase_frequency,
            &self.yearly_comparison,
            &self.ticket_volume,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(|f| f.is_empty())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
