use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ── Ticket ────────────────────────────────────────────────────────────────────

/// A single purchase ticket read from the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Customer identifier; `None` when the source cell was blank.
    pub customer_id: Option<String>,
    /// Ticket identifier; `None` when the source cell was blank.
    pub ticket_id: Option<String>,
    /// When the purchase happened.
    pub date: NaiveDateTime,
    /// Monetary value in euros (negative for refunds); `None` when the
    /// source cell was blank or not a number.
    pub amount: Option<f64>,
    /// Calendar year of `date`, as text.
    pub year: String,
}

impl Ticket {
    /// Build a ticket, deriving `year` from `date`.
    pub fn new(
        customer_id: Option<String>,
        ticket_id: Option<String>,
        date: NaiveDateTime,
        amount: impl Into<Option<f64>>,
    ) -> Self {
        Self {
            customer_id,
            ticket_id,
            year: date.year().to_string(),
            date,
            amount: amount.into(),
        }
    }

    /// Calendar month of the ticket date (1–12).
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// First day of the ticket's calendar month.
    pub fn month_period(&self) -> NaiveDate {
        // Day 1 exists in every month, so the fallback is never taken.
        NaiveDate::from_ymd_opt(self.date.year(), self.date.month(), 1)
            .unwrap_or_else(|| self.date.date())
    }
}

// ── LoadReport ────────────────────────────────────────────────────────────────

/// Row counts collected while cleaning the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Data rows read from the file (header excluded).
    pub total_rows: usize,
    /// Rows that survived cleaning.
    pub kept_rows: usize,
    /// Rows dropped because the ticket date could not be parsed.
    pub invalid_dates: usize,
    /// Kept rows whose amount was blank or not a number.
    pub invalid_amounts: usize,
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// The cleaned, read-only ticket dataset.
///
/// Tickets keep their source row order; several aggregates rely on it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tickets: Vec<Ticket>,
    years: Vec<String>,
    report: LoadReport,
}

impl Dataset {
    /// Wrap cleaned tickets together with the report produced while loading.
    pub fn new(tickets: Vec<Ticket>, report: LoadReport) -> Self {
        let mut years: Vec<String> = tickets.iter().map(|t| t.year.clone()).collect();
        years.sort();
        years.dedup();
        Self {
            tickets,
            years,
            report,
        }
    }

    /// Build a dataset from tickets that did not come from a file.
    pub fn from_tickets(tickets: Vec<Ticket>) -> Self {
        let report = LoadReport {
            total_rows: tickets.len(),
            kept_rows: tickets.len(),
            ..Default::default()
        };
        Self::new(tickets, report)
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Distinct years present in the dataset, ascending.
    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Sum of every known ticket amount.
    pub fn total_amount(&self) -> f64 {
        self.tickets.iter().filter_map(|t| t.amount).sum()
    }

    /// Most recent year in the dataset.
    pub fn latest_year(&self) -> Option<&str> {
        self.years.last().map(String::as_str)
    }

    /// The selection shown before the user picks anything: the latest year.
    pub fn default_selection(&self) -> YearSelection {
        YearSelection::new(self.latest_year())
    }
}

// ── YearSelection ─────────────────────────────────────────────────────────────

/// Ordered, de-duplicated set of selected years.
///
/// The order is the order in which years were picked; chart titles list
/// the years in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearSelection(Vec<String>);

impl YearSelection {
    /// Build a selection, trimming values and dropping blanks and repeats.
    pub fn new<I, S>(years: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for year in years {
            let year = year.as_ref().trim();
            if !year.is_empty() && !out.iter().any(|y| y == year) {
                out.push(year.to_string());
            }
        }
        Self(out)
    }

    /// Parse a comma-separated list such as `"2022, 2023"`.
    ///
    /// Every entry must be a four-digit year.
    pub fn parse_list(list: &str) -> Result<Self> {
        let selection = Self::new(list.split(','));
        if let Some(bad) = selection
            .0
            .iter()
            .find(|y| y.len() != 4 || !y.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(DashboardError::InvalidSelection(bad.clone()));
        }
        Ok(selection)
    }

    pub fn contains(&self, year: &str) -> bool {
        self.0.iter().any(|y| y == year)
    }

    /// Add `year` at the end of the selection, or remove it if present.
    pub fn toggle(&mut self, year: &str) {
        if let Some(pos) = self.0.iter().position(|y| y == year) {
            self.0.remove(pos);
        } else {
            self.0.push(year.to_string());
        }
    }

    pub fn years(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Years joined with `", "`, in selection order.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

// ── YearCutoff ────────────────────────────────────────────────────────────────

/// Truncates one year to its first months when that year is selected.
///
/// The data for the most recent year is only complete up to a given month;
/// later tickets of that year are left out of every chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCutoff {
    /// Year the cutoff applies to.
    pub year: String,
    /// Last month (inclusive) kept for `year`.
    pub last_month: u32,
}

impl Default for YearCutoff {
    fn default() -> Self {
        Self {
            year: "2023".to_string(),
            last_month: 5,
        }
    }
}

impl YearCutoff {
    pub fn new(year: impl Into<String>, last_month: u32) -> Self {
        Self {
            year: year.into(),
            last_month,
        }
    }

    /// `true` when `ticket` falls after the cutoff month of the cutoff year.
    pub fn excludes(&self, ticket: &Ticket) -> bool {
        ticket.year == self.year && ticket.month() > self.last_month
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
