use synthpop_eval::EvalError;
use synthpop_generate::GenerationError;
use synthpop_upload::UploadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] synthpop_core::Error),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),
    #[error("validation failed with {0} error(s)")]
    ValidationFailed(usize),
    #[error("upload completed but verification failed for '{0}'")]
    VerificationFailed(String),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
