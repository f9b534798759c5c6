use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    InvalidConfig(#[from] synthpop_core::Error),
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("invalid output path: {0}")]
    InvalidOutput(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
