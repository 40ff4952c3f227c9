//! Plain-text rendering of a build outcome.

use crate::model::{BuildOutcome, BuildSummary, VariantRow};
use unicode_width::UnicodeWidthStr;

const SKU_HEADER: &str = "SKU12";
const EAN_HEADER: &str = "EAN13";

/// Aligned table: one column per Parameter key, then the payload and barcode.
pub fn render_table(rows: &[VariantRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let mut headers: Vec<&str> = first.tuple.keys().map(String::as_str).collect();
    headers.push(SKU_HEADER);
    headers.push(EAN_HEADER);

    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            let mut line: Vec<&str> = row.tuple.values().map(String::as_str).collect();
            line.push(row.sku12.as_str());
            line.push(row.ean13.as_str());
            line
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    push_line(&mut out, &rule, &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let pad = width.saturating_sub(display_width(cell));
        line.extend(std::iter::repeat_n(' ', pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

pub fn render_summary(summary: &BuildSummary) -> String {
    let unbound = "(none)";
    let mut out = format!(
        "reference: {}  base: {}\nsize: {}  color: {}  context axes: {}\n",
        summary.reference,
        summary.base,
        summary.size_parameter.as_deref().unwrap_or(unbound),
        summary.color_parameter.as_deref().unwrap_or(unbound),
        summary.context_axes
    );
    for (label, codes) in [("size codes", &summary.size_codes), ("color codes", &summary.color_codes)] {
        if codes.is_empty() {
            continue;
        }
        let pairs: Vec<String> = codes.iter().map(|(v, c)| format!("{}={}", v, c)).collect();
        out.push_str(&format!("{}: {}\n", label, pairs.join(", ")));
    }
    out.push_str(&format!("rows: {}\n", summary.row_count));
    out
}

/// Table, summary and diagnostics, in that order.
pub fn render_outcome(outcome: &BuildOutcome) -> String {
    let mut out = render_table(&outcome.rows);
    if let Some(summary) = &outcome.summary {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&render_summary(summary));
    }
    if !outcome.diagnostics.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        for diagnostic in &outcome.diagnostics {
            out.push_str(&format!("{:?}: {}\n", diagnostic.severity, diagnostic));
        }
    }
    out
}
