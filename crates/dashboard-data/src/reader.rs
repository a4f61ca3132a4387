//! Ticket file loading and cleaning.
//!
//! Reads the CSV export of the ticket table, drops rows whose ticket date
//! cannot be parsed and returns the read-only [`Dataset`]. A blank or
//! non-numeric amount keeps the row with an unknown amount.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{Dataset, LoadReport, Ticket};
use serde::Deserialize;
use tracing::{debug, info, warn};

pub const DATE_COLUMN: &str = "Fecha_tiquet";
pub const AMOUNT_COLUMN: &str = "Importe_tiquet";
pub const CUSTOMER_COLUMN: &str = "Id_cliente";
pub const TICKET_COLUMN: &str = "Id_tiquet";

const REQUIRED_COLUMNS: [&str; 4] = [DATE_COLUMN, AMOUNT_COLUMN, CUSTOMER_COLUMN, TICKET_COLUMN];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_ONLY_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

#[derive(Debug, Deserialize)]
struct RawTicketRow {
    #[serde(rename = "Fecha_tiquet")]
    date: Option<String>,
    #[serde(rename = "Importe_tiquet")]
    amount: Option<String>,
    #[serde(rename = "Id_cliente")]
    customer_id: Option<String>,
    #[serde(rename = "Id_tiquet")]
    ticket_id: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and clean the ticket file at `path`.
pub fn load_tickets(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_tickets(file)?;

    if dataset.is_empty() {
        warn!("No valid tickets in {}", path.display());
    }
    info!(
        total = dataset.report().total_rows,
        kept = dataset.report().kept_rows,
        years = ?dataset.years(),
        "Loaded {}",
        path.display()
    );
    Ok(dataset)
}

/// Read tickets from any CSV source with a header row.
pub fn read_tickets<R: Read>(source: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn(column.to_string()));
        }
    }

    let mut report = LoadReport::default();
    let mut tickets: Vec<Ticket> = Vec::new();

    for result in rdr.deserialize::<RawTicketRow>() {
        let row = result?;
        report.total_rows += 1;

        let Some(date) = row.date.as_deref().and_then(parse_ticket_date) else {
            debug!("Dropping row {}: invalid date {:?}", report.total_rows, row.date);
            report.invalid_dates += 1;
            continue;
        };
        let amount = row.amount.as_deref().and_then(parse_amount);
        if amount.is_none() {
            debug!("Row {}: unknown amount {:?}", report.total_rows, row.amount);
            report.invalid_amounts += 1;
        }

        tickets.push(Ticket::new(
            non_blank(row.customer_id),
            non_blank(row.ticket_id),
            date,
            amount,
        ));
    }

    if report.invalid_amounts > 0 {
        warn!(
            "{} rows kept without an amount because {} is blank or not numeric",
            report.invalid_amounts, AMOUNT_COLUMN
        );
    }

    report.kept_rows = tickets.len();
    Ok(Dataset::new(tickets, report))
}

/// Parse a ticket date cell; `None` when no known format matches.
///
/// Offsets are honoured by keeping the wall-clock time of the offset, so the
/// year and month are the ones written in the file.
pub fn parse_ticket_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let normalised = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.naive_local());
    }

    for fmt in DATE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }
    for fmt in DATE_ONLY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse an amount cell, accepting a decimal comma (`"12,50"`).
pub fn parse_amount(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let value = match s.parse::<f64>() {
        Ok(v) => v,
        Err(_) if s.matches(',').count() == 1 && !s.contains('.') => {
            s.replace(',', ".").parse::<f64>().ok()?
        }
        Err(_) => return None,
    };
    value.is_finite().then_some(value)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
