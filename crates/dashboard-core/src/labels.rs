//! Display strings for the dashboard, per locale.
//!
//! Chart titles that mention the selected years carry a `{years}`
//! placeholder which [`ChartLabels::with_years`] fills in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::models::YearSelection;

const MONTHS_ES: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
];

const MONTHS_EN: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

// ── Locale ────────────────────────────────────────────────────────────────────

/// Language of every user-facing label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Es => write!(f, "es"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            other => Err(DashboardError::Config(format!("unknown locale: {other}"))),
        }
    }
}

// ── AxisLabels ────────────────────────────────────────────────────────────────

/// Title and axis names of one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLabels {
    pub title: String,
    pub x: String,
    pub y: String,
}

impl AxisLabels {
    fn new(title: &str, x: &str, y: &str) -> Self {
        Self {
            title: title.to_string(),
            x: x.to_string(),
            y: y.to_string(),
        }
    }
}

// ── SummaryLabels / HelpLabels ────────────────────────────────────────────────

/// Field names of the header's load summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLabels {
    pub tickets: String,
    pub spend: String,
    pub dropped: String,
    /// Kept rows whose amount is unknown.
    pub no_amount: String,
    pub cutoff: String,
}

/// Action names shown next to each key in the help line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpLabels {
    pub move_cursor: String,
    pub toggle: String,
    pub all: String,
    pub reset: String,
    pub zoom: String,
    pub grid: String,
    pub quit: String,
}

// ── ChartLabels ───────────────────────────────────────────────────────────────

/// Every label the dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLabels {
    pub locale: Locale,
    /// Page heading.
    pub page_title: String,
    /// Prompt above the year picker.
    pub picker_prompt: String,
    /// Legend title for the per-year series.
    pub year_legend: String,
    /// Placeholder text for charts without data.
    pub no_data: String,
    pub monthly_spend: AxisLabels,
    pub average_ticket: AxisLabels,
    pub purchase_frequency: AxisLabels,
    pub yearly_comparison: AxisLabels,
    pub ticket_volume: AxisLabels,
    pub summary: SummaryLabels,
    pub help: HelpLabels,
    months: [String; 12],
}

impl Default for ChartLabels {
    fn default() -> Self {
        Self::spanish()
    }
}

impl ChartLabels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Es => Self::spanish(),
            Locale::En => Self::english(),
        }
    }

    pub fn spanish() -> Self {
        Self {
            locale: Locale::Es,
            page_title: "Dashboard Interactivo - Análisis de Clientes".to_string(),
            picker_prompt: "Selecciona uno o más años:".to_string(),
            year_legend: "Año".to_string(),
            no_data: "Sin datos para los años seleccionados".to_string(),
            monthly_spend: AxisLabels::new(
                "Valor total de compras por mes en {years}",
                "Mes",
                "Valor total (€)",
            ),
            average_ticket: AxisLabels::new(
                "Ticket medio por cliente en {years}",
                "ID Cliente",
                "Ticket Medio (€)",
            ),
            purchase_frequency: AxisLabels::new(
                "Frecuencia de compra por cliente en {years}",
                "ID Cliente",
                "Número de Compras",
            ),
            yearly_comparison: AxisLabels::new(
                "Comparativa del valor total de compras por año",
                "Mes",
                "Valor total (€)",
            ),
            ticket_volume: AxisLabels::new(
                "Evolución de la cantidad de tickets a lo largo del tiempo",
                "Fecha",
                "Cantidad",
            ),
            summary: SummaryLabels {
                tickets: "tickets".to_string(),
                spend: "gasto".to_string(),
                dropped: "descartadas".to_string(),
                no_amount: "sin importe".to_string(),
                cutoff: "corte".to_string(),
            },
            help: HelpLabels {
                move_cursor: "mover".to_string(),
                toggle: "marcar".to_string(),
                all: "todos".to_string(),
                reset: "reiniciar".to_string(),
                zoom: "ampliar".to_string(),
                grid: "cuadrícula".to_string(),
                quit: "salir".to_string(),
            },
            months: MONTHS_ES.map(String::from),
        }
    }

    pub fn english() -> Self {
        Self {
            locale: Locale::En,
            page_title: "Interactive Dashboard - Customer Analysis".to_string(),
            picker_prompt: "Select one or more years:".to_string(),
            year_legend: "Year".to_string(),
            no_data: "No data for the selected years".to_string(),
            monthly_spend: AxisLabels::new(
                "Total purchase value per month in {years}",
                "Month",
                "Total value (€)",
            ),
            average_ticket: AxisLabels::new(
                "Average ticket per customer in {years}",
                "Customer ID",
                "Average Ticket (€)",
            ),
            purchase_frequency: AxisLabels::new(
                "Purchase frequency per customer in {years}",
                "Customer ID",
                "Number of Purchases",
            ),
            yearly_comparison: AxisLabels::new(
                "Total purchase value by year",
                "Month",
                "Total value (€)",
            ),
            ticket_volume: AxisLabels::new(
                "Ticket count over time",
                "Date",
                "Count",
            ),
            summary: SummaryLabels {
                tickets: "tickets".to_string(),
                spend: "spend".to_string(),
                dropped: "dropped".to_string(),
                no_amount: "no amount".to_string(),
                cutoff: "cutoff".to_string(),
            },
            help: HelpLabels {
                move_cursor: "move".to_string(),
                toggle: "toggle".to_string(),
                all: "all".to_string(),
                reset: "reset".to_string(),
                zoom: "zoom".to_string(),
                grid: "grid".to_string(),
                quit: "quit".to_string(),
            },
            months: MONTHS_EN.map(String::from),
        }
    }

    /// Three-letter abbreviation for `month` (1–12); empty when out of range.
    pub fn month(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All twelve abbreviations in calendar order.
    pub fn months(&self) -> &[String; 12] {
        &self.months
    }

    /// Fill the `{years}` placeholder of `template` from `selection`.
    pub fn with_years(template: &str, selection: &YearSelection) -> String {
        template.replace("{years}", &selection.joined())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
