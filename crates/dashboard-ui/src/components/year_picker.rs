use dashboard_core::models::YearSelection;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Multi-select year picker state.
///
/// The selection keeps the order in which years were picked, so chart
/// titles list them the same way.
#[derive(Debug, Clone)]
pub struct YearPicker {
    options: Vec<String>,
    selection: YearSelection,
    default: YearSelection,
    cursor: usize,
}

impl YearPicker {
    /// Create a picker over `options` starting from `default`.
    ///
    /// The cursor starts on the first selected option.
    pub fn new(options: Vec<String>, default: YearSelection) -> Self {
        let cursor = default
            .years()
            .first()
            .and_then(|y| options.iter().position(|o| o == y))
            .unwrap_or(0);
        Self {
            options,
            selection: default.clone(),
            default,
            cursor,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selection(&self) -> &YearSelection {
        &self.selection
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Year under the cursor, `None` when there are no options.
    pub fn current(&self) -> Option<&str> {
        self.options.get(self.cursor).map(String::as_str)
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.options.len() {
            self.cursor += 1;
        }
    }

    /// Toggle the year under the cursor. Returns `true` if the selection
    /// changed.
    pub fn toggle_current(&mut self) -> bool {
        let Some(year) = self.options.get(self.cursor) else {
            return false;
        };
        self.selection.toggle(year);
        true
    }

    /// Select every option, appending the missing ones in option order.
    pub fn select_all(&mut self) -> bool {
        let before = self.selection.len();
        for year in &self.options {
            if !self.selection.contains(year) {
                self.selection.toggle(year);
            }
        }
        self.selection.len() != before
    }

    /// Go back to the initial selection.
    pub fn reset(&mut self) -> bool {
        if self.selection == self.default {
            return false;
        }
        self.selection = self.default.clone();
        true
    }

    /// Render as one line: the prompt followed by a checkbox per year.
    pub fn to_line<'a>(&self, prompt: &'a str, theme: &Theme) -> Line<'a> {
        let mut spans = vec![Span::styled(prompt, theme.label), Span::raw(" ")];
        for (i, year) in self.options.iter().enumerate() {
            let selected = self.selection.contains(year);
            let mark = if selected { "[x]" } else { "[ ]" };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("{mark} {year}"),
                theme.picker_style(selected, i == self.cursor),
            ));
        }
        Line::from(spans)
    }
}
