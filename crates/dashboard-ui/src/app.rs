//! Application state and TUI event loop for the ticket dashboard.
//!
//! [`App`] owns the theme, the year picker and the figures of the current
//! selection. Every change to the selection recomputes the figures through
//! the shared [`DashboardService`].

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::labels::HelpLabels;
use dashboard_data::figures::{DashboardFigures, Figure};
use dashboard_runtime::service::DashboardService;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::charts;
use crate::components::header::Header;
use crate::components::year_picker::YearPicker;
use crate::themes::Theme;

/// Number of charts on the dashboard.
pub const CHART_COUNT: usize = 5;

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    service: DashboardService,
    pub theme: Theme,
    pub picker: YearPicker,
    figures: DashboardFigures,
    /// Index of the maximised chart, `None` for the grid.
    pub focus: Option<usize>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Build the app and compute the figures of the default selection.
    pub fn new(service: DashboardService, theme_name: &str) -> Self {
        let picker = YearPicker::new(
            service.year_options().to_vec(),
            service.default_selection().clone(),
        );
        let figures = service.update(picker.selection());
        Self {
            service,
            theme: Theme::from_name(theme_name),
            picker,
            figures,
            focus: None,
            should_quit: false,
        }
    }

    pub fn figures(&self) -> &DashboardFigures {
        &self.figures
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Polls the terminal every 250 ms; the screen is redrawn after each
    /// event. Terminal failures surface as [`DashboardError::Terminal`].
    pub fn run(self) -> Result<()> {
        self.run_terminal().map_err(terminal_error)
    }

    fn run_terminal(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key)
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let changed = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                false
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.picker.move_left();
                false
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.picker.move_right();
                false
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.picker.toggle_current(),
            KeyCode::Char('a') => self.picker.select_all(),
            KeyCode::Char('r') => self.picker.reset(),
            KeyCode::Char('0') | KeyCode::Esc => {
                self.focus = None;
                false
            }
            KeyCode::Char(c @ '1'..='5') => {
                self.focus = c.to_digit(10).map(|d| d as usize - 1);
                false
            }
            _ => false,
        };

        if changed {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        tracing::debug!(years = %self.picker.selection().joined(), "selection changed");
        self.figures = self.service.update(self.picker.selection());
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let labels = self.service.labels();
        let dataset = self.service.dataset();

        let [header_area, picker_area, charts_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(
            labels,
            dataset.report(),
            dataset.total_amount(),
            self.service.cutoff(),
            &self.theme,
        );
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        let picker_line = self.picker.to_line(&labels.picker_prompt, &self.theme);
        frame.render_widget(Paragraph::new(picker_line), picker_area);

        let figures = self.figures.as_array();
        match self.focus {
            Some(i) if i < CHART_COUNT => self.render_chart(frame, charts_area, i, figures[i]),
            _ => self.render_grid(frame, charts_area, &figures),
        }

        frame.render_widget(Paragraph::new(help_line(&labels.help, &self.theme)), help_area);
    }

    /// Two rows of two charts, then the timeline across the full width.
    fn render_grid(&self, frame: &mut Frame, area: Rect, figures: &[&Figure; CHART_COUNT]) {
        let rows = Layout::vertical([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
        let halves = |r: Rect| {
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(r)
        };
        let top = halves(rows[0]);
        let middle = halves(rows[1]);

        let cells = [top[0], top[1], middle[0], middle[1], rows[2]];
        for (i, cell) in cells.into_iter().enumerate() {
            self.render_chart(frame, cell, i, figures[i]);
        }
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect, index: usize, figure: &Figure) {
        charts::render_figure(
            frame,
            area,
            index + 1,
            figure,
            self.service.labels(),
            &self.theme,
        );
    }
}

fn terminal_error(e: io::Error) -> DashboardError {
    DashboardError::Terminal(e.to_string())
}

fn help_line(words: &HelpLabels, theme: &Theme) -> Line<'static> {
    let keys = [
        ("←/→", &words.move_cursor),
        ("space", &words.toggle),
        ("a", &words.all),
        ("r", &words.reset),
        ("1-5", &words.zoom),
        ("0", &words.grid),
        ("q", &words.quit),
    ];
    let mut spans = Vec::with_capacity(keys.len() * 3);
    for (i, (key, action)) in keys.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("·", theme.dim));
        }
        spans.push(Span::styled(format!(" {key}"), theme.info));
        spans.push(Span::styled(format!(" {action} "), theme.text));
    }
    Line::from(spans)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
