//! ratatui rendering of [`Figure`] specifications.
//!
//! Bar figures become a grouped [`BarChart`] (one group per month, one bar
//! per year); scatter and line figures become a [`Chart`] with one dataset
//! per series. Empty figures show the localised "no data" placeholder.

use chrono::{Datelike, NaiveDate};
use dashboard_core::formatting::format_compact;
use dashboard_core::labels::ChartLabels;
use dashboard_data::figures::{Figure, FigureKind, Series, XAxis, XValue};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

/// Widest category label drawn under the x axis.
const MAX_TICK_WIDTH: usize = 10;

/// Render `figure` into `area`, numbered `index` (1-based) in the title.
pub fn render_figure(
    frame: &mut Frame,
    area: Rect,
    index: usize,
    figure: &Figure,
    labels: &ChartLabels,
    theme: &Theme,
) {
    if figure.is_empty() {
        render_no_data(frame, area, index, &labels.no_data, theme);
        return;
    }

    let title_width = area.width.saturating_sub(8) as usize;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.chart_border)
        .title(Span::styled(
            format!(" {index} {} ", truncate(&figure.title, title_width)),
            theme.chart_title,
        ));

    match figure.kind {
        Some(FigureKind::Bar) => render_bars(frame, area, block, figure, labels, theme),
        Some(kind) => render_chart(frame, area, block, kind, figure, labels, theme),
        None => render_no_data(frame, area, index, &labels.no_data, theme),
    }
}

/// Placeholder for a chart without data.
pub fn render_no_data(frame: &mut Frame, area: Rect, index: usize, message: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.chart_border)
        .title(Span::styled(format!(" {index} "), theme.chart_title));
    let inner_height = area.height.saturating_sub(2);
    let mut text: Vec<Line> = (0..inner_height / 2).map(|_| Line::from("")).collect();
    text.push(Line::from(Span::styled(message.to_string(), theme.warning)));
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

// ── Bar charts ────────────────────────────────────────────────────────────────

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    figure: &Figure,
    labels: &ChartLabels,
    theme: &Theme,
) {
    let months: Vec<u32> = (1..=12)
        .filter(|m| {
            figure
                .points()
                .any(|p| matches!(p.x, XValue::Month(x) if x == *m))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let (bar_width, group_gap) = bar_layout(inner_width, months.len(), figure.series.len());

    let block = block.title_bottom(legend_line(&figure.series, theme));
    let mut chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(group_gap)
        .label_style(theme.axis)
        .value_style(theme.value);

    for month in months {
        let bars: Vec<Bar> = figure
            .series
            .iter()
            .enumerate()
            .map(|(i, series)| {
                let total: f64 = series
                    .points
                    .iter()
                    .filter(|p| matches!(p.x, XValue::Month(x) if x == month))
                    .map(|p| p.y)
                    .sum();
                Bar::default()
                    .value(total.max(0.0).round() as u64)
                    .text_value(format_compact(total))
                    .style(Style::default().fg(theme.series_color(i)))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(labels.month(month).to_string()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

/// Bar width and group gap that fit `groups` groups of `bars` bars into
/// `width` columns.
fn bar_layout(width: u16, groups: usize, bars: usize) -> (u16, u16) {
    if groups == 0 || bars == 0 {
        return (1, 0);
    }
    let group_gap: u16 = if width as usize >= groups * (bars + 1) { 1 } else { 0 };
    let usable = (width as usize).saturating_sub(group_gap as usize * groups.saturating_sub(1));
    let bar_width = (usable / (groups * bars)).clamp(1, 9);
    (bar_width as u16, group_gap)
}

fn legend_line<'a>(series: &[Series], theme: &Theme) -> Line<'a> {
    let mut spans = Vec::with_capacity(series.len() * 2);
    for (i, s) in series.iter().enumerate() {
        spans.push(Span::styled(
            format!(" ■ {}", s.name),
            Style::default().fg(theme.series_color(i)),
        ));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

// ── Line / scatter charts ─────────────────────────────────────────────────────

fn render_chart(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    kind: FigureKind,
    figure: &Figure,
    labels: &ChartLabels,
    theme: &Theme,
) {
    let categories = categories(figure);
    let points: Vec<Vec<(f64, f64)>> = figure
        .series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .filter_map(|p| x_coord(&p.x, &categories).map(|x| (x, p.y)))
                .collect()
        })
        .collect();

    let (marker, graph_type) = match kind {
        FigureKind::Scatter => (symbols::Marker::Dot, GraphType::Scatter),
        _ => (symbols::Marker::Braille, GraphType::Line),
    };

    let datasets: Vec<Dataset> = figure
        .series
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (series, data))| {
            Dataset::default()
                .name(series.name.clone())
                .marker(marker)
                .graph_type(graph_type)
                .style(Style::default().fg(theme.series_color(i)))
                .data(data)
        })
        .collect();

    let inner_width = area.width.saturating_sub(2) as usize;
    let (x_bounds, x_labels) = x_axis(figure, &categories, &points, labels, inner_width);
    let (y_bounds, y_labels) = y_axis(figure);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled(figure.x_title.clone(), theme.label))
                .style(theme.axis)
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(figure.y_title.clone(), theme.label))
                .style(theme.axis)
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Distinct category values in first-appearance order.
fn categories(figure: &Figure) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for point in figure.points() {
        if let XValue::Category(c) = &point.x {
            if !out.contains(&c.as_str()) {
                out.push(c);
            }
        }
    }
    out
}

fn x_coord(x: &XValue, categories: &[&str]) -> Option<f64> {
    match x {
        XValue::Month(m) => Some(*m as f64),
        XValue::Category(c) => categories.iter().position(|k| *k == c.as_str()).map(|i| i as f64),
        XValue::Date(d) => Some(d.num_days_from_ce() as f64),
    }
}

fn x_axis(
    figure: &Figure,
    categories: &[&str],
    points: &[Vec<(f64, f64)>],
    labels: &ChartLabels,
    width: usize,
) -> ([f64; 2], Vec<String>) {
    match &figure.x_axis {
        XAxis::Months { ticktext, .. } => {
            let ticks = if width >= ticktext.len() * 4 {
                ticktext.clone()
            } else {
                vec![labels.month(1).to_string(), labels.month(12).to_string()]
            };
            ([1.0, 12.0], ticks)
        }
        XAxis::Category => {
            let n = categories.len();
            let ticks: Vec<String> = match n {
                0 => Vec::new(),
                1 | 2 => categories.iter().map(|c| truncate(c, MAX_TICK_WIDTH)).collect(),
                _ => [categories[0], categories[(n - 1) / 2], categories[n - 1]]
                    .iter()
                    .map(|c| truncate(c, MAX_TICK_WIDTH))
                    .collect(),
            };
            let hi = (n.saturating_sub(1) as f64).max(1.0);
            ([0.0, hi], ticks)
        }
        XAxis::Timeline => {
            let xs = points.iter().flatten().map(|(x, _)| *x);
            let lo = xs.clone().fold(f64::INFINITY, f64::min);
            let hi = xs.fold(f64::NEG_INFINITY, f64::max);
            if !lo.is_finite() {
                return ([0.0, 1.0], Vec::new());
            }
            let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 15.0, hi + 15.0) };
            let ticks = [lo, (lo + hi) / 2.0, hi]
                .iter()
                .map(|d| month_label(*d))
                .collect();
            ([lo, hi], ticks)
        }
    }
}

fn y_axis(figure: &Figure) -> ([f64; 2], Vec<String>) {
    let (lo, hi) = figure.y_bounds().unwrap_or((0.0, 1.0));
    let lo = lo.min(0.0);
    let hi = if hi > lo { hi * 1.05 } else { lo + 1.0 };
    let ticks = [lo, (lo + hi) / 2.0, hi]
        .iter()
        .map(|v| format_compact(*v))
        .collect();
    ([lo, hi], ticks)
}

/// `YYYY-MM` for a day number counted from the common era.
fn month_label(days_from_ce: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(days_from_ce.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Cut `s` to at most `max` display columns, ending with `…` when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
