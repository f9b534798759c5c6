use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome of validating one customer table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True exactly when `errors` is empty. Warnings never affect it.
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub statistics: Statistics,
}

/// Summary statistics gathered during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_customers: u64,
    /// Distinct non-null identifiers.
    pub unique_customer_ids: u64,
    pub credit_limit_min: Option<i64>,
    pub credit_limit_max: Option<i64>,
    pub credit_limit_avg: Option<f64>,
    /// Share of rows per segment, over rows with a segment.
    pub segment_distribution: BTreeMap<String, f64>,
    pub card_type_distribution: BTreeMap<String, u64>,
    pub employment_distribution: BTreeMap<String, u64>,
}

/// Render a deterministic markdown report.
pub fn render_report(report: &ValidationReport, max_examples: usize) -> String {
    let stats = &report.statistics;
    let mut lines = Vec::new();

    lines.push("# Customer Validation Report".to_string());
    lines.push(String::new());
    lines.push("## Summary".to_string());
    lines.push(format!(
        "- status: {}",
        if report.is_valid { "valid" } else { "invalid" }
    ));
    lines.push(format!("- total_customers: {}", stats.total_customers));
    lines.push(format!("- unique_customer_ids: {}", stats.unique_customer_ids));
    lines.push(format!("- errors: {}", report.errors.len()));
    lines.push(format!("- warnings: {}", report.warnings.len()));
    lines.push(String::new());

    lines.push("## Credit limits".to_string());
    lines.push("| min | max | avg |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    lines.push(format!(
        "| {} | {} | {} |",
        display_or_dash(stats.credit_limit_min),
        display_or_dash(stats.credit_limit_max),
        stats
            .credit_limit_avg
            .map(|avg| format!("{avg:.2}"))
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.push(String::new());

    if !stats.segment_distribution.is_empty() {
        lines.push("## Segments".to_string());
        lines.push("| segment | share |".to_string());
        lines.push("| --- | --- |".to_string());
        for (segment, share) in &stats.segment_distribution {
            lines.push(format!("| {} | {:.1}% |", segment, share * 100.0));
        }
        lines.push(String::new());
    }

    push_counts(&mut lines, "Card types", "card_type", &stats.card_type_distribution);
    push_counts(
        &mut lines,
        "Employment",
        "employment_status",
        &stats.employment_distribution,
    );

    push_messages(&mut lines, "Errors", &report.errors, max_examples);
    push_messages(&mut lines, "Warnings", &report.warnings, max_examples);

    lines.join("\n")
}

fn push_counts(lines: &mut Vec<String>, title: &str, column: &str, counts: &BTreeMap<String, u64>) {
    if counts.is_empty() {
        return;
    }
    lines.push(format!("## {title}"));
    lines.push(format!("| {column} | customers |"));
    lines.push("| --- | --- |".to_string());
    for (value, count) in counts {
        lines.push(format!("| {value} | {count} |"));
    }
    lines.push(String::new());
}

fn push_messages(lines: &mut Vec<String>, title: &str, messages: &[String], max_examples: usize) {
    if messages.is_empty() {
        return;
    }
    lines.push(format!("## {title}"));
    for message in messages.iter().take(max_examples) {
        lines.push(format!("- {message}"));
    }
    if messages.len() > max_examples {
        lines.push(format!("- ... {} more", messages.len() - max_examples));
    }
    lines.push(String::new());
}

fn display_or_dash(value: Option<i64>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValidationReport {
        let mut statistics = Statistics {
            total_customers: 3,
            unique_customer_ids: 2,
            credit_limit_min: Some(5000),
            credit_limit_max: Some(9000),
            credit_limit_avg: Some(7000.0),
            ..Statistics::default()
        };
        statistics
            .segment_distribution
            .insert("Declining".to_string(), 1.0);
        statistics
            .card_type_distribution
            .insert("Standard".to_string(), 3);
        ValidationReport {
            is_valid: false,
            errors: vec![
                "Found 1 duplicate customer_ids".to_string(),
                "Found 2 invalid credit limits".to_string(),
            ],
            warnings: Vec::new(),
            statistics,
        }
    }

    #[test]
    fn markdown_lists_errors_and_tables() {
        let markdown = render_report(&sample(), 20);
        assert!(markdown.starts_with("# Customer Validation Report"));
        assert!(markdown.contains("- status: invalid"));
        assert!(markdown.contains("| 5000 | 9000 | 7000.00 |"));
        assert!(markdown.contains("| Declining | 100.0% |"));
        assert!(markdown.contains("- Found 1 duplicate customer_ids"));
        assert!(!markdown.contains("## Warnings"));
    }

    #[test]
    fn markdown_truncates_long_lists() {
        let markdown = render_report(&sample(), 1);
        assert!(markdown.contains("- Found 1 duplicate customer_ids"));
        assert!(!markdown.contains("invalid credit limits"));
        assert!(markdown.contains("- ... 1 more"));
    }

    #[test]
    fn report_serializes_to_json() {
        let value = serde_json::to_value(sample()).expect("json");
        assert_eq!(value["is_valid"], false);
        assert_eq!(value["statistics"]["credit_limit_min"], 5000);
        assert_eq!(value["statistics"]["card_type_distribution"]["Standard"], 3);
    }
}
