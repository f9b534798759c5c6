//! Seeded population generator for synthpop.
//!
//! Allocates the configured population across weighted segments, shuffles
//! the assignments, and synthesizes one customer per slot from explicit
//! random streams. The same config always yields the same records.

pub mod allocator;
pub mod engine;
pub mod errors;
pub mod faker;
pub mod output;
pub mod stream;
pub mod synthesizer;

pub use allocator::{SegmentAllocation, SegmentCount, allocate};
pub use engine::{GenerationEngine, GenerationResult, generate, generate_with_config};
pub use errors::GenerationError;
pub use output::csv::{CsvSummary, write_customers_csv};
pub use synthesizer::{DRAW_ORDER, DrawStep, RecordSynthesizer};
