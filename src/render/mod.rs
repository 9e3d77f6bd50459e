//! Plain-text report rendering

mod table;

pub use table::{buffer_to_string, UsageTable};

use crate::types::Report;

/// Format number with thousand separators
/// Example: 1234567 → "1,234,567"
pub fn format_number(n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Format a cost with four decimal places: 0.001425 → "$0.0014"
pub fn format_currency(amount: f64) -> String {
    format!("${:.4}", amount)
}

/// Summary table, optionally followed by one model table per day
pub fn render_report(report: &Report, show_details: bool) -> String {
    if report.is_empty() {
        return "No usage data found\n".to_string();
    }

    let mut out = UsageTable::summary(report).to_text();
    if show_details {
        for day in report.days.iter().filter(|d| !d.models.is_empty()) {
            out.push('\n');
            out.push_str(&UsageTable::model_details(day).to_text());
        }
    }
    out
}
