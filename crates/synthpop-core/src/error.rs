use thiserror::Error;

/// Core error type shared across synthpop crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration violates a generation precondition.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A configuration document could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
    /// The generated JSON Schema could not be compiled.
    #[error("schema error: {0}")]
    Schema(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by synthpop crates.
pub type Result<T> = std::result::Result<T, Error>;
