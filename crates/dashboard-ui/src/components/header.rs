use dashboard_core::formatting::{format_count, format_euros};
use dashboard_core::labels::ChartLabels;
use dashboard_core::models::{LoadReport, YearCutoff};
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Dashboard header rendering three lines:
///
/// 1. The page title.
/// 2. A separator as wide as the title (at least 60 columns).
/// 3. Load summary: `[ tickets N | spend € | dropped N | cutoff YEAR ≤ MON ]`,
///    in the words of the active locale. Rows kept without an amount are
///    listed only when there are any.
pub struct Header<'a> {
    pub labels: &'a ChartLabels,
    pub report: &'a LoadReport,
    /// Sum of every loaded ticket amount.
    pub total_amount: f64,
    pub cutoff: Option<&'a YearCutoff>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        labels: &'a ChartLabels,
        report: &'a LoadReport,
        total_amount: f64,
        cutoff: Option<&'a YearCutoff>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            labels,
            report,
            total_amount,
            cutoff,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let title = self.labels.page_title.as_str();
        let width = title.chars().count().max(60);
        let words = &self.labels.summary;

        let mut info = vec![
            Span::styled(format!("[ {} ", words.tickets), self.theme.label),
            Span::styled(
                format_count(self.report.kept_rows, self.labels.locale),
                self.theme.value,
            ),
            Span::styled(format!(" | {} ", words.spend), self.theme.label),
            Span::styled(
                format_euros(self.total_amount, self.labels.locale),
                self.theme.value,
            ),
            Span::styled(format!(" | {} ", words.dropped), self.theme.label),
            Span::styled(
                format_count(self.report.invalid_dates, self.labels.locale),
                self.theme.value,
            ),
        ];
        if self.report.invalid_amounts > 0 {
            info.push(Span::styled(format!(" | {} ", words.no_amount), self.theme.label));
            info.push(Span::styled(
                format_count(self.report.invalid_amounts, self.labels.locale),
                self.theme.warning,
            ));
        }
        if let Some(cutoff) = self.cutoff {
            info.push(Span::styled(format!(" | {} ", words.cutoff), self.theme.label));
            info.push(Span::styled(
                format!(
                    "{} ≤ {}",
                    cutoff.year,
                    self.labels.month(cutoff.last_month)
                ),
                self.theme.value,
            ));
        }
        info.push(Span::styled(" ]", self.theme.label));

        vec![
            Line::from(Span::styled(title, self.theme.header)),
            Line::from(Span::styled("=".repeat(width), self.theme.separator)),
            Line::from(info),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
