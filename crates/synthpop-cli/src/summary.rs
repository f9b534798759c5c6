use std::path::Path;

use synthpop_eval::{ValidationReport, render_report};

use crate::error::CliError;

pub fn print_statistics(report: &ValidationReport) {
    let stats = &report.statistics;
    println!("\nStatistics:");
    println!("  Total customers: {}", stats.total_customers);
    println!("  Unique IDs: {}", stats.unique_customer_ids);
    if let (Some(min), Some(max)) = (stats.credit_limit_min, stats.credit_limit_max) {
        println!("  Credit limit range: ${min} - ${max}");
    }
    if let Some(avg) = stats.credit_limit_avg {
        println!("  Average credit limit: ${avg:.2}");
    }

    println!("\n  Segment distribution:");
    for (segment, share) in &stats.segment_distribution {
        println!("    {segment}: {:.1}%", share * 100.0);
    }

    println!("\n  Card type distribution:");
    let total = stats.total_customers.max(1) as f64;
    for (card_type, count) in &stats.card_type_distribution {
        println!(
            "    {card_type}: {count} ({:.1}%)",
            *count as f64 / total * 100.0
        );
    }

    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  - {warning}");
        }
    }
}

pub fn print_errors(report: &ValidationReport) {
    eprintln!("\nValidation FAILED:");
    for error in &report.errors {
        eprintln!("  - {error}");
    }
}

/// Markdown for `.md` paths, pretty JSON otherwise.
pub fn write_report(path: &Path, report: &ValidationReport) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if is_markdown {
        std::fs::write(path, render_report(report, usize::MAX))?;
    } else {
        std::fs::write(path, serde_json::to_vec_pretty(report)?)?;
    }
    tracing::info!(path = %path.display(), "validation report written");
    Ok(())
}
