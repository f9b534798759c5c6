use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use regex::Regex;
use tracing::{debug, info};

use synthpop_core::{CustomerRecord, GenerationConfig};

use crate::errors::EvalError;
use crate::model::{CustomerRow, EvaluateOptions};
use crate::report::{Statistics, ValidationReport};

/// Columns that must be present on every row.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "customer_id",
    "email",
    "state",
    "card_type",
    "credit_limit",
    "customer_segment",
    "first_name",
    "last_name",
];

const CUSTOMER_ID_PATTERN: &str = r"^CUST\d{8}$";
const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+$";

/// Checks customer tables against a generation config.
///
/// Stateless between runs; the same engine can validate any number of tables.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    options: EvaluateOptions,
    id_pattern: Regex,
    email_pattern: Regex,
}

impl ValidationEngine {
    pub fn new(options: EvaluateOptions) -> Result<Self, EvalError> {
        Ok(Self {
            options,
            id_pattern: Regex::new(CUSTOMER_ID_PATTERN)?,
            email_pattern: Regex::new(EMAIL_PATTERN)?,
        })
    }

    /// Scan the whole table and collect every error, warning and statistic.
    pub fn run(&self, rows: &[CustomerRow], config: &GenerationConfig) -> ValidationReport {
        let start = Instant::now();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for field in REQUIRED_FIELDS {
            let nulls = rows.iter().filter(|row| row.field(field).is_none()).count();
            if nulls > 0 {
                errors.push(format!("Field '{field}' has {nulls} null values"));
            }
        }

        let mut seen = HashSet::new();
        let mut duplicates = 0usize;
        for id in rows.iter().filter_map(|row| row.customer_id.as_deref()) {
            if !seen.insert(id) {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            errors.push(format!("Found {duplicates} duplicate customer_ids"));
        }

        let bad_ids = count_mismatches(rows, &self.id_pattern, |row| row.customer_id.as_deref());
        if bad_ids > 0 {
            errors.push(format!("Found {bad_ids} customer_ids with invalid format"));
        }

        let segment_distribution = segment_shares(rows);
        for (segment, target) in config.segment_weights() {
            let actual = segment_distribution.get(segment).copied().unwrap_or(0.0);
            let diff = (actual - target).abs();
            if diff > self.options.distribution_tolerance {
                warnings.push(format!(
                    "Segment '{segment}' distribution {:.1}% deviates from target {:.1}% by {:.1}%",
                    actual * 100.0,
                    target * 100.0,
                    diff * 100.0
                ));
            }
        }

        let bad_emails = count_mismatches(rows, &self.email_pattern, |row| row.email.as_deref());
        if bad_emails > 0 {
            errors.push(format!("Found {bad_emails} emails with invalid format"));
        }

        let limits = &config.credit_limit;
        let bad_limits = rows
            .iter()
            .filter_map(|row| row.credit_limit.as_deref())
            .filter(|raw| !parse_integer(raw).is_some_and(|value| limits.accepts(value)))
            .count();
        if bad_limits > 0 {
            errors.push(format!("Found {bad_limits} invalid credit limits"));
        }

        let ages = &config.age;
        let bad_ages = rows
            .iter()
            .filter_map(|row| row.age.as_deref())
            .filter(|raw| !parse_integer(raw).is_some_and(|value| ages.contains(value)))
            .count();
        if bad_ages > 0 {
            errors.push(format!(
                "Found {bad_ages} customers with age outside {}-{}",
                ages.min, ages.max
            ));
        }

        let decline = &config.decline;
        let (declining, others): (Vec<&CustomerRow>, Vec<&CustomerRow>) = rows
            .iter()
            .partition(|row| row.customer_segment.as_deref() == Some(decline.segment.as_str()));
        let missing = declining
            .iter()
            .filter(|row| row.decline_type.is_none())
            .count();
        if missing > 0 {
            errors.push(format!(
                "Found {missing} {} customers without decline_type",
                decline.segment
            ));
        }
        let stray = others
            .iter()
            .filter(|row| row.decline_type.is_some())
            .count();
        if stray > 0 {
            errors.push(format!(
                "Found {stray} non-{} customers with decline_type set",
                decline.segment
            ));
        }
        let unknown_labels = rows
            .iter()
            .filter_map(|row| row.decline_type.as_deref())
            .filter(|label| *label != decline.gradual_label && *label != decline.sudden_label)
            .count();
        if unknown_labels > 0 {
            errors.push(format!(
                "Found {unknown_labels} customers with decline_type other than '{}' or '{}'",
                decline.gradual_label, decline.sudden_label
            ));
        }

        let credit_values: Vec<i64> = rows
            .iter()
            .filter_map(|row| row.credit_limit.as_deref())
            .filter_map(parse_integer)
            .collect();
        let statistics = Statistics {
            total_customers: rows.len() as u64,
            unique_customer_ids: seen.len() as u64,
            credit_limit_min: credit_values.iter().min().copied(),
            credit_limit_max: credit_values.iter().max().copied(),
            credit_limit_avg: mean(&credit_values),
            segment_distribution,
            card_type_distribution: value_counts(rows, |row| row.card_type.as_deref()),
            employment_distribution: value_counts(rows, |row| row.employment_status.as_deref()),
        };

        for error in &errors {
            debug!(error = %error, "validation error");
        }
        info!(
            rows = rows.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "validation completed"
        );

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            statistics,
        }
    }
}

/// Validate a loaded table with default options.
pub fn validate(
    rows: &[CustomerRow],
    config: &GenerationConfig,
) -> Result<ValidationReport, EvalError> {
    Ok(ValidationEngine::new(EvaluateOptions::default())?.run(rows, config))
}

/// Validate records straight from the generator.
pub fn validate_records(
    records: &[CustomerRecord],
    config: &GenerationConfig,
) -> Result<ValidationReport, EvalError> {
    let rows: Vec<CustomerRow> = records.iter().map(CustomerRow::from).collect();
    validate(&rows, config)
}

fn count_mismatches<F>(rows: &[CustomerRow], pattern: &Regex, value: F) -> usize
where
    F: Fn(&CustomerRow) -> Option<&str>,
{
    rows.iter()
        .filter_map(value)
        .filter(|candidate| !pattern.is_match(candidate))
        .count()
}

fn segment_shares(rows: &[CustomerRow]) -> BTreeMap<String, f64> {
    let counts = value_counts(rows, |row| row.customer_segment.as_deref());
    let total: u64 = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    counts
        .into_iter()
        .map(|(segment, count)| (segment, count as f64 / total as f64))
        .collect()
}

fn value_counts<F>(rows: &[CustomerRow], value: F) -> BTreeMap<String, u64>
where
    F: Fn(&CustomerRow) -> Option<&str>,
{
    let mut counts = BTreeMap::new();
    for item in rows.iter().filter_map(value) {
        *counts.entry(item.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Integers, plus floats with no fractional part (`"5000.0"`).
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|value| *value as f64).sum();
    Some(sum / values.len() as f64)
}
