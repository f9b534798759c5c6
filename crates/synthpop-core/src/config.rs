use std::collections::BTreeSet;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::CUSTOMER_ID_DIGITS;

/// Days counted per year when converting the account-open window.
pub const DAYS_PER_YEAR: u32 = 365;

/// Allowed drift of the segment weight sum away from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Upper bound on the account-open window, in years.
pub const MAX_ACCOUNT_AGE_YEARS: u32 = 150;

pub const HIGH_VALUE_TRAVELERS: &str = "High-Value Travelers";
pub const STABLE_MID_SPENDERS: &str = "Stable Mid-Spenders";
pub const BUDGET_CONSCIOUS: &str = "Budget-Conscious";
pub const DECLINING: &str = "Declining";
pub const NEW_AND_GROWING: &str = "New & Growing";

/// Locales supported by the name source.
pub const SUPPORTED_LOCALES: &[&str] = &["en_US", "pt_BR"];

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

const EMPLOYMENT_STATUSES: &[&str] = &["Employed", "Self-Employed", "Retired", "Unemployed"];

/// Immutable configuration for one population generation.
///
/// Every field has a default, so configuration files only need to list the
/// values they override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of customers to generate.
    pub population_size: usize,
    /// Seed for every random stream used by the generator.
    pub seed: u64,
    /// Segments in declaration order. The last one absorbs allocation remainders.
    pub segments: Vec<SegmentSpec>,
    pub card_types: CardTypeRule,
    pub employment_statuses: Vec<String>,
    /// Region codes drawn uniformly for each customer.
    pub regions: Vec<String>,
    pub age: AgeRange,
    pub credit_limit: CreditLimitRange,
    pub account_open: AccountOpenWindow,
    pub decline: DeclineRule,
    /// Locale of the name source (`en_US` or `pt_BR`).
    pub locale: String,
    /// Date that account ages are measured from. Defaults to today (UTC).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub reference_date: Option<NaiveDate>,
}

/// A named population segment with its target share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentSpec {
    pub name: String,
    /// Fraction of the population assigned to this segment.
    pub weight: f64,
    /// Monthly spend band. Informational only; the generator does not enforce it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_spend: Option<SpendRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpendRange {
    pub min: u64,
    pub max: u64,
}

/// Card assignment rule: one segment may receive the premium card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CardTypeRule {
    pub standard: String,
    pub premium: String,
    /// Segment eligible for the premium card.
    pub premium_segment: String,
    /// Probability that an eligible customer receives the premium card.
    pub premium_probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

/// Inclusive credit-limit bounds quantized to `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CreditLimitRange {
    pub min: u64,
    pub max: u64,
    pub step: u64,
}

/// Account-open window, expressed as years before the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AccountOpenWindow {
    /// Youngest account age in years.
    pub newest_years_ago: u32,
    /// Oldest account age in years.
    pub oldest_years_ago: u32,
}

/// Decline labelling for the declining segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeclineRule {
    /// The only segment whose records carry a decline type.
    pub segment: String,
    pub gradual_label: String,
    pub sudden_label: String,
    /// Probability of the gradual label.
    pub gradual_probability: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            population_size: 50_000,
            seed: 42,
            segments: vec![
                SegmentSpec::new(HIGH_VALUE_TRAVELERS, 0.15, 2_000, 8_000),
                SegmentSpec::new(STABLE_MID_SPENDERS, 0.40, 800, 2_500),
                SegmentSpec::new(BUDGET_CONSCIOUS, 0.25, 200, 800),
                SegmentSpec::new(DECLINING, 0.10, 500, 2_000),
                SegmentSpec::new(NEW_AND_GROWING, 0.10, 300, 1_200),
            ],
            card_types: CardTypeRule::default(),
            employment_statuses: EMPLOYMENT_STATUSES.iter().map(|s| s.to_string()).collect(),
            regions: US_STATES.iter().map(|s| s.to_string()).collect(),
            age: AgeRange::default(),
            credit_limit: CreditLimitRange::default(),
            account_open: AccountOpenWindow::default(),
            decline: DeclineRule::default(),
            locale: "en_US".to_string(),
            reference_date: None,
        }
    }
}

impl Default for CardTypeRule {
    fn default() -> Self {
        Self {
            standard: "Standard".to_string(),
            premium: "Premium".to_string(),
            premium_segment: HIGH_VALUE_TRAVELERS.to_string(),
            premium_probability: 0.30,
        }
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self { min: 22, max: 75 }
    }
}

impl Default for CreditLimitRange {
    fn default() -> Self {
        Self {
            min: 5_000,
            max: 50_000,
            step: 1_000,
        }
    }
}

impl Default for AccountOpenWindow {
    fn default() -> Self {
        Self {
            newest_years_ago: 2,
            oldest_years_ago: 5,
        }
    }
}

impl Default for DeclineRule {
    fn default() -> Self {
        Self {
            segment: DECLINING.to_string(),
            gradual_label: "gradual".to_string(),
            sudden_label: "sudden".to_string(),
            gradual_probability: 0.70,
        }
    }
}

impl SegmentSpec {
    pub fn new(name: &str, weight: f64, spend_min: u64, spend_max: u64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            monthly_spend: Some(SpendRange {
                min: spend_min,
                max: spend_max,
            }),
        }
    }
}

impl AgeRange {
    pub fn contains(&self, age: i64) -> bool {
        age >= i64::from(self.min) && age <= i64::from(self.max)
    }
}

impl CreditLimitRange {
    /// Number of distinct quantized values in the range, or `None` when the
    /// range is empty, the step is zero, or the count does not fit in a `u64`.
    pub fn step_count(&self) -> Option<u64> {
        self.max
            .checked_sub(self.min)?
            .checked_div(self.step)?
            .checked_add(1)
    }

    /// Value at the given step index.
    pub fn value_at(&self, index: u64) -> u64 {
        self.min + index * self.step
    }

    /// True when `value` lies in bounds and sits on the quantization grid.
    pub fn accepts(&self, value: i64) -> bool {
        let Ok(value) = u64::try_from(value) else {
            return false;
        };
        value >= self.min && value <= self.max && self.step > 0 && value % self.step == 0
    }
}

impl AccountOpenWindow {
    /// Inclusive `(min, max)` bounds of the days-ago draw.
    pub fn days_ago_bounds(&self) -> (u32, u32) {
        (
            self.newest_years_ago * DAYS_PER_YEAR,
            self.oldest_years_ago * DAYS_PER_YEAR,
        )
    }
}

impl GenerationConfig {
    /// Default configuration with the given size and seed.
    pub fn with_population(population_size: usize, seed: u64) -> Self {
        Self {
            population_size,
            seed,
            ..Self::default()
        }
    }

    /// Segment names and weights in declaration order.
    pub fn segment_weights(&self) -> Vec<(&str, f64)> {
        self.segments
            .iter()
            .map(|segment| (segment.name.as_str(), segment.weight))
            .collect()
    }

    pub fn segment(&self, name: &str) -> Option<&SegmentSpec> {
        self.segments.iter().find(|segment| segment.name == name)
    }

    /// Check every generation precondition, failing on the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig(
                "population_size must be positive".to_string(),
            ));
        }
        let max_population = 10_usize.pow(CUSTOMER_ID_DIGITS as u32) - 1;
        if self.population_size > max_population {
            return Err(Error::InvalidConfig(format!(
                "population_size {} exceeds the {CUSTOMER_ID_DIGITS}-digit id space ({max_population})",
                self.population_size
            )));
        }

        self.validate_segments()?;

        if self.employment_statuses.is_empty() {
            return Err(Error::InvalidConfig(
                "employment_statuses must not be empty".to_string(),
            ));
        }
        if self.regions.is_empty() {
            return Err(Error::InvalidConfig("regions must not be empty".to_string()));
        }

        if self.age.min > self.age.max {
            return Err(Error::InvalidConfig(format!(
                "age range is empty: min {} > max {}",
                self.age.min, self.age.max
            )));
        }

        let limits = &self.credit_limit;
        if limits.step == 0 {
            return Err(Error::InvalidConfig(
                "credit_limit.step must be positive".to_string(),
            ));
        }
        if limits.min > limits.max {
            return Err(Error::InvalidConfig(format!(
                "credit limit range is empty: min {} > max {}",
                limits.min, limits.max
            )));
        }
        if limits.step_count().is_none() {
            return Err(Error::InvalidConfig(format!(
                "credit limit range {}..={} step {} has too many values",
                limits.min, limits.max, limits.step
            )));
        }
        if limits.min % limits.step != 0 {
            return Err(Error::InvalidConfig(format!(
                "credit_limit.min {} is not a multiple of step {}",
                limits.min, limits.step
            )));
        }

        let window = &self.account_open;
        if window.newest_years_ago > window.oldest_years_ago {
            return Err(Error::InvalidConfig(format!(
                "account_open window is empty: newest {} > oldest {} years ago",
                window.newest_years_ago, window.oldest_years_ago
            )));
        }
        if window.oldest_years_ago > MAX_ACCOUNT_AGE_YEARS {
            return Err(Error::InvalidConfig(format!(
                "account_open.oldest_years_ago must be at most {MAX_ACCOUNT_AGE_YEARS}"
            )));
        }

        self.validate_card_types()?;
        self.validate_decline()?;

        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "unsupported locale '{}'",
                self.locale
            )));
        }

        Ok(())
    }

    fn validate_segments(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one segment is required".to_string(),
            ));
        }

        let mut names = BTreeSet::new();
        let mut total = 0.0;
        for segment in &self.segments {
            if segment.name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "segment names must not be empty".to_string(),
                ));
            }
            if !names.insert(segment.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate segment name: {}",
                    segment.name
                )));
            }
            if !segment.weight.is_finite() || segment.weight < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "segment '{}' has invalid weight {}",
                    segment.name, segment.weight
                )));
            }
            if let Some(spend) = segment.monthly_spend
                && spend.min > spend.max
            {
                return Err(Error::InvalidConfig(format!(
                    "segment '{}' monthly spend range is empty",
                    segment.name
                )));
            }
            total += segment.weight;
        }

        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidConfig(format!(
                "segment weights sum to {total}, expected 1.0"
            )));
        }
        Ok(())
    }

    fn validate_card_types(&self) -> Result<()> {
        let cards = &self.card_types;
        if cards.standard.is_empty() || cards.premium.is_empty() {
            return Err(Error::InvalidConfig(
                "card type labels must not be empty".to_string(),
            ));
        }
        if !probability(cards.premium_probability) {
            return Err(Error::InvalidConfig(format!(
                "card_types.premium_probability {} is outside [0, 1]",
                cards.premium_probability
            )));
        }
        if !cards.premium_segment.is_empty() && self.segment(&cards.premium_segment).is_none() {
            return Err(Error::InvalidConfig(format!(
                "premium segment '{}' is not declared",
                cards.premium_segment
            )));
        }
        Ok(())
    }

    fn validate_decline(&self) -> Result<()> {
        let decline = &self.decline;
        if decline.gradual_label.is_empty() || decline.sudden_label.is_empty() {
            return Err(Error::InvalidConfig(
                "decline labels must not be empty".to_string(),
            ));
        }
        if decline.gradual_label == decline.sudden_label {
            return Err(Error::InvalidConfig(
                "decline labels must be distinct".to_string(),
            ));
        }
        if !probability(decline.gradual_probability) {
            return Err(Error::InvalidConfig(format!(
                "decline.gradual_probability {} is outside [0, 1]",
                decline.gradual_probability
            )));
        }
        if !decline.segment.is_empty() && self.segment(&decline.segment).is_none() {
            return Err(Error::InvalidConfig(format!(
                "decline segment '{}' is not declared",
                decline.segment
            )));
        }
        Ok(())
    }
}

fn probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
