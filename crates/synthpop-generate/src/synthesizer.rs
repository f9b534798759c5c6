use chrono::{Days, NaiveDate};
use rand::Rng;
use rand::seq::IndexedRandom;

use synthpop_core::{CustomerRecord, GenerationConfig, customer_id};

use crate::errors::GenerationError;
use crate::faker::NameSource;
use crate::stream::{SeededStreams, StreamKind};

/// One random draw made while synthesizing a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    FirstName,
    LastName,
    EmailDomain,
    Age,
    Region,
    City,
    EmploymentStatus,
    /// Consumes a draw only for the premium-eligible segment.
    PremiumCard,
    CreditLimit,
    AccountAge,
    /// Consumes a draw only for the declining segment.
    DeclineType,
}

/// Draw order for every record. Reordering this changes every generated table
/// for a given seed.
pub const DRAW_ORDER: [DrawStep; 11] = [
    DrawStep::FirstName,
    DrawStep::LastName,
    DrawStep::EmailDomain,
    DrawStep::Age,
    DrawStep::Region,
    DrawStep::City,
    DrawStep::EmploymentStatus,
    DrawStep::PremiumCard,
    DrawStep::CreditLimit,
    DrawStep::AccountAge,
    DrawStep::DeclineType,
];

impl DrawStep {
    pub fn stream(self) -> StreamKind {
        match self {
            Self::FirstName | Self::LastName | Self::EmailDomain | Self::City => StreamKind::Names,
            _ => StreamKind::Attributes,
        }
    }
}

#[derive(Debug, Default)]
struct RecordDraft {
    first_name: String,
    last_name: String,
    email: String,
    age: u32,
    state: String,
    city: String,
    employment_status: String,
    card_type: String,
    credit_limit: u64,
    account_open_date: Option<NaiveDate>,
    decline_type: Option<String>,
}

/// Builds customer records from a config and the run's seeded streams.
#[derive(Debug)]
pub struct RecordSynthesizer<'a> {
    config: &'a GenerationConfig,
    names: NameSource,
    reference_date: NaiveDate,
}

impl<'a> RecordSynthesizer<'a> {
    pub fn new(
        config: &'a GenerationConfig,
        reference_date: NaiveDate,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            config,
            names: NameSource::for_locale(&config.locale)?,
            reference_date,
        })
    }

    /// Synthesize the record at 1-based `ordinal` for `segment`.
    pub fn synthesize(
        &self,
        ordinal: usize,
        segment: &str,
        streams: &mut SeededStreams,
    ) -> Result<CustomerRecord, GenerationError> {
        let mut draft = RecordDraft::default();
        for step in DRAW_ORDER {
            self.draw(step, segment, &mut draft, streams)?;
        }

        let account_open_date = draft.account_open_date.ok_or_else(|| {
            GenerationError::Synthesis(format!("record {ordinal} has no account open date"))
        })?;

        Ok(CustomerRecord {
            customer_id: customer_id(ordinal),
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            age: draft.age,
            state: draft.state,
            city: draft.city,
            employment_status: draft.employment_status,
            card_type: draft.card_type,
            credit_limit: draft.credit_limit,
            account_open_date,
            customer_segment: segment.to_string(),
            decline_type: draft.decline_type,
        })
    }

    fn draw(
        &self,
        step: DrawStep,
        segment: &str,
        draft: &mut RecordDraft,
        streams: &mut SeededStreams,
    ) -> Result<(), GenerationError> {
        let config = self.config;
        let rng = streams.get(step.stream());
        match step {
            DrawStep::FirstName => draft.first_name = self.names.first_name(rng),
            DrawStep::LastName => draft.last_name = self.names.last_name(rng),
            DrawStep::EmailDomain => {
                // Email is derived from the names drawn above.
                let domain = self.names.free_email_domain(rng);
                draft.email = format!(
                    "{}.{}@{}",
                    draft.first_name.to_lowercase(),
                    draft.last_name.to_lowercase(),
                    domain
                );
            }
            DrawStep::Age => draft.age = rng.random_range(config.age.min..=config.age.max),
            DrawStep::Region => draft.state = pick(&config.regions, rng, "regions")?,
            DrawStep::City => draft.city = self.names.city(rng),
            DrawStep::EmploymentStatus => {
                draft.employment_status =
                    pick(&config.employment_statuses, rng, "employment_statuses")?
            }
            DrawStep::PremiumCard => {
                let cards = &config.card_types;
                let premium = segment == cards.premium_segment
                    && rng.random::<f64>() < cards.premium_probability;
                draft.card_type = if premium {
                    cards.premium.clone()
                } else {
                    cards.standard.clone()
                };
            }
            DrawStep::CreditLimit => {
                let limits = &config.credit_limit;
                let count = limits.step_count().ok_or_else(|| {
                    GenerationError::Synthesis(format!(
                        "credit limit range {}..={} step {} cannot be sampled",
                        limits.min, limits.max, limits.step
                    ))
                })?;
                let index = rng.random_range(0..count);
                draft.credit_limit = limits.value_at(index);
            }
            DrawStep::AccountAge => {
                let (min_days, max_days) = config.account_open.days_ago_bounds();
                let days_ago = rng.random_range(min_days..=max_days);
                let date = self
                    .reference_date
                    .checked_sub_days(Days::new(u64::from(days_ago)))
                    .ok_or_else(|| {
                        GenerationError::Synthesis(format!(
                            "{days_ago} days before {} is out of range",
                            self.reference_date
                        ))
                    })?;
                draft.account_open_date = Some(date);
            }
            DrawStep::DeclineType => {
                let decline = &config.decline;
                if segment == decline.segment {
                    let label = if rng.random::<f64>() < decline.gradual_probability {
                        &decline.gradual_label
                    } else {
                        &decline.sudden_label
                    };
                    draft.decline_type = Some(label.clone());
                }
            }
        }
        Ok(())
    }
}

fn pick<R: Rng + ?Sized>(
    values: &[String],
    rng: &mut R,
    field: &str,
) -> Result<String, GenerationError> {
    values
        .choose(rng)
        .cloned()
        .ok_or_else(|| GenerationError::Synthesis(format!("{field} must not be empty")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthpop_core::config::{DECLINING, HIGH_VALUE_TRAVELERS, STABLE_MID_SPENDERS};

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default()
    }

    #[test]
    fn draw_order_lists_each_step_once() {
        for step in DRAW_ORDER {
            assert_eq!(DRAW_ORDER.iter().filter(|other| **other == step).count(), 1);
        }
        assert_eq!(DRAW_ORDER[0], DrawStep::FirstName);
        assert_eq!(DRAW_ORDER[DRAW_ORDER.len() - 1], DrawStep::DeclineType);
    }

    #[test]
    fn identifiers_come_from_the_ordinal() {
        let config = GenerationConfig::default();
        let synthesizer = RecordSynthesizer::new(&config, reference_date()).expect("synthesizer");
        let mut streams = SeededStreams::new(1);
        let record = synthesizer
            .synthesize(12, STABLE_MID_SPENDERS, &mut streams)
            .expect("record");
        assert_eq!(record.customer_id, "CUST00000012");
        assert_eq!(record.customer_segment, STABLE_MID_SPENDERS);
    }

    #[test]
    fn email_is_built_from_drawn_names() {
        let config = GenerationConfig::default();
        let synthesizer = RecordSynthesizer::new(&config, reference_date()).expect("synthesizer");
        let mut streams = SeededStreams::new(3);
        let record = synthesizer
            .synthesize(1, STABLE_MID_SPENDERS, &mut streams)
            .expect("record");
        let expected_prefix = format!(
            "{}.{}@",
            record.first_name.to_lowercase(),
            record.last_name.to_lowercase()
        );
        assert!(record.email.starts_with(&expected_prefix), "{}", record.email);
    }

    #[test]
    fn only_declining_records_get_a_decline_type() {
        let config = GenerationConfig::default();
        let synthesizer = RecordSynthesizer::new(&config, reference_date()).expect("synthesizer");
        let mut streams = SeededStreams::new(9);
        for ordinal in 1..=50 {
            let declining = synthesizer
                .synthesize(ordinal, DECLINING, &mut streams)
                .expect("record");
            let label = declining.decline_type.as_deref();
            assert!(matches!(label, Some("gradual") | Some("sudden")));

            let steady = synthesizer
                .synthesize(ordinal, STABLE_MID_SPENDERS, &mut streams)
                .expect("record");
            assert_eq!(steady.decline_type, None);
        }
    }

    #[test]
    fn premium_cards_only_reach_the_premium_segment() {
        let mut config = GenerationConfig::default();
        config.card_types.premium_probability = 1.0;
        let synthesizer = RecordSynthesizer::new(&config, reference_date()).expect("synthesizer");
        let mut streams = SeededStreams::new(4);

        let eligible = synthesizer
            .synthesize(1, HIGH_VALUE_TRAVELERS, &mut streams)
            .expect("record");
        assert_eq!(eligible.card_type, "Premium");

        let other = synthesizer
            .synthesize(2, DECLINING, &mut streams)
            .expect("record");
        assert_eq!(other.card_type, "Standard");
    }

    #[test]
    fn account_dates_fall_inside_the_window() {
        let config = GenerationConfig::default();
        let synthesizer = RecordSynthesizer::new(&config, reference_date()).expect("synthesizer");
        let mut streams = SeededStreams::new(21);
        let newest = reference_date() - Days::new(730);
        let oldest = reference_date() - Days::new(1825);
        for ordinal in 1..=200 {
            let record = synthesizer
                .synthesize(ordinal, STABLE_MID_SPENDERS, &mut streams)
                .expect("record");
            assert!(record.account_open_date <= newest);
            assert!(record.account_open_date >= oldest);
        }
    }
}
