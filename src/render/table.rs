//! Usage table widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Padding, Widget},
};

use super::{format_currency, format_number};
use crate::types::{DateBucket, ModelBucket, Report};

const COLUMN_GAP: usize = 2;

const VALUE_HEADERS: [&str; 7] = [
    "Requests",
    "Input Tokens",
    "Output Tokens",
    "Total Tokens",
    "Input Cost",
    "Output Cost",
    "Total Cost",
];

/// One formatted table row: a label followed by seven value cells
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRow {
    label: String,
    cells: [String; 7],
}

impl UsageRow {
    #[allow(clippy::too_many_arguments)]
    fn new(
        label: impl Into<String>,
        requests: u64,
        input_tokens: u64,
        output_tokens: u64,
        total_tokens: u64,
        input_cost: f64,
        output_cost: f64,
        total_cost: f64,
    ) -> Self {
        Self {
            label: label.into(),
            cells: [
                format_number(requests),
                format_number(input_tokens),
                format_number(output_tokens),
                format_number(total_tokens),
                format_currency(input_cost),
                format_currency(output_cost),
                format_currency(total_cost),
            ],
        }
    }

    fn from_day(day: &DateBucket) -> Self {
        Self::new(
            day.date.format("%Y-%m-%d").to_string(),
            day.total_requests,
            day.total_input_tokens,
            day.total_output_tokens,
            day.total_tokens,
            day.total_input_cost,
            day.total_output_cost,
            day.total_cost,
        )
    }

    fn from_model(model: &str, bucket: &ModelBucket) -> Self {
        Self::new(
            model,
            bucket.requests,
            bucket.input_tokens,
            bucket.output_tokens,
            bucket.total_tokens,
            bucket.input_cost,
            bucket.output_cost,
            bucket.total_cost,
        )
    }
}

/// Bordered table of usage rows with an optional total row
#[derive(Debug, Clone)]
pub struct UsageTable {
    title: String,
    label_header: &'static str,
    rows: Vec<UsageRow>,
    total: Option<UsageRow>,
}

impl UsageTable {
    /// One row per day plus a grand total row
    pub fn summary(report: &Report) -> Self {
        let totals = report.totals();
        Self {
            title: "Daily Usage Statistics Summary".to_string(),
            label_header: "Date",
            rows: report.days.iter().map(UsageRow::from_day).collect(),
            total: Some(UsageRow::new(
                "Total",
                totals.requests,
                totals.input_tokens,
                totals.output_tokens,
                totals.total_tokens,
                totals.input_cost,
                totals.output_cost,
                totals.total_cost,
            )),
        }
    }

    /// One row per model for a single day
    pub fn model_details(day: &DateBucket) -> Self {
        Self {
            title: format!("{} - Model Usage Details", day.date.format("%Y-%m-%d")),
            label_header: "Model",
            rows: day
                .models
                .iter()
                .map(|(model, bucket)| UsageRow::from_model(model, bucket))
                .collect(),
            total: None,
        }
    }

    fn column_widths(&self) -> [usize; 8] {
        let mut widths = [0usize; 8];
        widths[0] = self.label_header.chars().count();
        for (i, header) in VALUE_HEADERS.iter().enumerate() {
            widths[i + 1] = header.len();
        }
        for row in self.rows.iter().chain(self.total.iter()) {
            widths[0] = widths[0].max(row.label.chars().count());
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i + 1] = widths[i + 1].max(cell.len());
            }
        }
        widths
    }

    fn content_width(&self) -> usize {
        let widths = self.column_widths();
        widths.iter().sum::<usize>() + COLUMN_GAP * (widths.len() - 1)
    }

    /// Rendered width including borders and padding
    pub fn width(&self) -> u16 {
        let inner = self.content_width().max(self.title.chars().count());
        u16::try_from(inner + 4).unwrap_or(u16::MAX)
    }

    /// Rendered height including borders
    pub fn height(&self) -> u16 {
        // header + separator + rows (+ separator + total) + 2 borders
        let total_rows = if self.total.is_some() { 2 } else { 0 };
        u16::try_from(self.rows.len() + total_rows + 4).unwrap_or(u16::MAX)
    }

    fn format_line(&self, widths: &[usize; 8], label: &str, cells: &[&str]) -> String {
        let gap = " ".repeat(COLUMN_GAP);
        let mut line = format!("{:<width$}", label, width = widths[0]);
        for (cell, width) in cells.iter().zip(&widths[1..]) {
            line.push_str(&gap);
            line.push_str(&format!("{:>width$}", cell, width = *width));
        }
        line
    }

    fn lines(&self) -> Vec<String> {
        let widths = self.column_widths();
        let separator = "─".repeat(self.content_width());

        let mut lines = vec![
            self.format_line(&widths, self.label_header, &VALUE_HEADERS),
            separator.clone(),
        ];
        for row in &self.rows {
            let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
            lines.push(self.format_line(&widths, &row.label, &cells));
        }
        if let Some(total) = &self.total {
            let cells: Vec<&str> = total.cells.iter().map(String::as_str).collect();
            lines.push(separator);
            lines.push(self.format_line(&widths, &total.label, &cells));
        }
        lines
    }

    /// Render into an off-screen buffer and return plain text lines
    pub fn to_text(&self) -> String {
        let area = Rect::new(0, 0, self.width(), self.height());
        let mut buf = Buffer::empty(area);
        self.render(area, &mut buf);
        buffer_to_string(&buf)
    }
}

impl Widget for &UsageTable {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.title.as_str())
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);

        for (i, text) in self.lines().into_iter().enumerate() {
            let Ok(offset) = u16::try_from(i) else {
                break;
            };
            if offset >= inner.height {
                break;
            }
            let row_area = Rect::new(inner.x, inner.y + offset, inner.width, 1);
            Line::from(text).render(row_area, buf);
        }
    }
}

/// Buffer contents as text, trailing spaces trimmed on each line
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buf[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn model(requests: u64, input: u64, output: u64, input_cost: f64, output_cost: f64) -> ModelBucket {
        ModelBucket {
            requests,
            input_tokens: input,
            output_tokens: output,
            total_tokens: input + output,
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
        }
    }

    fn sample_report() -> Report {
        let mut day1 = BTreeMap::new();
        day1.insert("gpt-x".to_string(), model(2, 300, 150, 0.0003, 0.001125));
        let mut day2 = BTreeMap::new();
        day2.insert("glm-4.6".to_string(), model(1, 1_234_567, 1000, 0.7407, 0.0022));
        day2.insert("gpt-x".to_string(), model(3, 10, 10, 0.0, 0.0));
        Report {
            days: vec![
                DateBucket::from_models(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), day1),
                DateBucket::from_models(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), day2),
            ],
        }
    }

    #[test]
    fn test_summary_table_contents() {
        let text = UsageTable::summary(&sample_report()).to_text();

        assert!(text.contains("Daily Usage Statistics Summary"));
        assert!(text.contains("Date"));
        assert!(text.contains("Total Cost"));
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("2024-01-02"));
        // day 2 input: 1,234,567 + 10
        assert!(text.contains("1,234,577"));
        assert!(!text.contains("1,234,567"));
        assert!(text.contains("$0.0014"));
        assert!(text.contains("Total"));
        // grand total requests: 2 + 1 + 3
        let total_line = text.lines().find(|l| l.contains("Total ") && l.contains('$')).unwrap();
        assert!(total_line.contains(" 6 "));
    }

    #[test]
    fn test_summary_rows_are_chronological() {
        let text = UsageTable::summary(&sample_report()).to_text();
        let first = text.find("2024-01-01").unwrap();
        let second = text.find("2024-01-02").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_model_details_table() {
        let report = sample_report();
        let text = UsageTable::model_details(&report.days[1]).to_text();

        assert!(text.contains("2024-01-02 - Model Usage Details"));
        assert!(text.contains("Model"));
        assert!(text.contains("glm-4.6"));
        assert!(text.contains("gpt-x"));
        assert!(text.contains("1,234,567"));
        assert!(text.contains("$0.7407"));
        assert!(!text.contains("Total  "));
    }

    #[test]
    fn test_dimensions_fit_every_line() {
        let table = UsageTable::summary(&sample_report());
        let text = table.to_text();

        assert_eq!(text.lines().count(), usize::from(table.height()));
        for line in text.lines() {
            assert!(line.chars().count() <= usize::from(table.width()));
        }
        // nothing truncated: each data row keeps its closing border
        assert!(text.lines().all(|l| l.ends_with('│') || l.ends_with('┐') || l.ends_with('┘')));
    }

    #[test]
    fn test_empty_report_table_has_total_only() {
        let table = UsageTable::summary(&Report::default());
        let text = table.to_text();
        assert!(text.contains("Total"));
        assert!(text.contains("$0.0000"));
    }

    #[test]
    fn test_buffer_to_string_trims_trailing_spaces() {
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);
        Line::from("ab").render(Rect::new(0, 0, 6, 1), &mut buf);

        assert_eq!(buffer_to_string(&buf), "ab\n\n");
    }
}
