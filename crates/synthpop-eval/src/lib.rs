//! Validation of synthesized customer tables.
//!
//! The validator never mutates the table and never fails on bad rows: every
//! problem becomes an error or warning string in the returned report.

pub mod engine;
pub mod errors;
pub mod loader;
pub mod model;
pub mod report;

pub use engine::{ValidationEngine, validate, validate_records};
pub use errors::EvalError;
pub use loader::{load_customers_csv, read_customers_csv};
pub use model::{CustomerRow, EvaluateOptions};
pub use report::{Statistics, ValidationReport, render_report};
