//! Core contracts for synthpop.
//!
//! This crate defines the generation configuration, the customer record
//! shape shared by the generator and the validator, and the helpers used to
//! load and check configuration files.

pub mod config;
pub mod error;
pub mod loader;
pub mod record;
pub mod schema;

pub use config::{
    AccountOpenWindow, AgeRange, CardTypeRule, CreditLimitRange, DeclineRule, GenerationConfig,
    SegmentSpec, SpendRange,
};
pub use error::{Error, Result};
pub use loader::{ConfigFormat, load_config, parse_config_str};
pub use record::{
    CUSTOMER_COLUMNS, CUSTOMER_ID_DIGITS, CUSTOMER_ID_PREFIX, CustomerRecord, customer_id,
};
pub use schema::{ConfigIssue, check_config_json, config_json_schema};
