use std::time::Instant;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use synthpop_core::{CustomerRecord, GenerationConfig};

use crate::allocator::{SegmentAllocation, allocate};
use crate::errors::GenerationError;
use crate::stream::SeededStreams;
use crate::synthesizer::RecordSynthesizer;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub records: Vec<CustomerRecord>,
    pub allocation: SegmentAllocation,
    pub seed: u64,
    /// Date that account ages were measured from.
    pub reference_date: NaiveDate,
}

/// Entry point for assembling a population from a config.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    config: GenerationConfig,
}

impl GenerationEngine {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Validate the config, allocate segments, shuffle, and synthesize every record.
    ///
    /// Nothing is produced when the config is rejected.
    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        self.config.validate()?;

        let start = Instant::now();
        let config = &self.config;
        let n = config.population_size;
        let reference_date = config
            .reference_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());

        info!(
            population = n,
            seed = config.seed,
            segments = config.segments.len(),
            reference_date = %reference_date,
            "generation started"
        );

        let allocation = allocate(n, &config.segment_weights());
        for entry in allocation.counts() {
            debug!(segment = %entry.segment, count = entry.count, "segment allocated");
        }

        let mut streams = SeededStreams::new(config.seed);
        let mut labels = allocation.expand();
        labels.shuffle(&mut streams.attributes);

        let synthesizer = RecordSynthesizer::new(config, reference_date)?;
        let mut records = Vec::with_capacity(n);
        for (index, segment) in labels.iter().enumerate() {
            records.push(synthesizer.synthesize(index + 1, segment, &mut streams)?);
        }

        info!(
            records = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );

        Ok(GenerationResult {
            records,
            allocation,
            seed: config.seed,
            reference_date,
        })
    }
}

/// Generate `n` customers with the default config and the given seed.
pub fn generate(n: usize, seed: u64) -> Result<Vec<CustomerRecord>, GenerationError> {
    generate_with_config(&GenerationConfig::with_population(n, seed))
}

/// Generate customers for an explicit config.
pub fn generate_with_config(
    config: &GenerationConfig,
) -> Result<Vec<CustomerRecord>, GenerationError> {
    GenerationEngine::new(config.clone())
        .run()
        .map(|result| result.records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_population_fails_before_synthesis() {
        let err = generate(0, 42).expect_err("zero population is a config error");
        assert!(matches!(err, GenerationError::InvalidConfig(_)));
    }

    #[test]
    fn run_reports_allocation_and_seed() {
        let mut config = GenerationConfig::with_population(1000, 42);
        config.reference_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        let result = GenerationEngine::new(config).run().expect("generation");
        assert_eq!(result.records.len(), 1000);
        assert_eq!(result.allocation.total(), 1000);
        assert_eq!(result.seed, 42);
        assert_eq!(result.reference_date.to_string(), "2025-01-01");
    }

    #[test]
    fn shuffle_spreads_segments_across_rows() {
        let records = generate(500, 42).expect("generation");
        let first_segment = &records[0].customer_segment;
        let leading_run = records
            .iter()
            .take_while(|record| &record.customer_segment == first_segment)
            .count();
        assert!(leading_run < 50, "rows look clustered by segment: {leading_run}");
    }
}
