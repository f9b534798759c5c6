use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Constant prefix of every customer identifier.
pub const CUSTOMER_ID_PREFIX: &str = "CUST";

/// Zero-padded digit width following the prefix.
pub const CUSTOMER_ID_DIGITS: usize = 8;

/// Column order of the serialized customer table.
pub const CUSTOMER_COLUMNS: [&str; 13] = [
    "customer_id",
    "first_name",
    "last_name",
    "email",
    "age",
    "state",
    "city",
    "employment_status",
    "card_type",
    "credit_limit",
    "account_open_date",
    "customer_segment",
    "decline_type",
];

/// Format the identifier for a 1-based ordinal, e.g. `CUST00000001`.
pub fn customer_id(ordinal: usize) -> String {
    format!("{CUSTOMER_ID_PREFIX}{ordinal:0width$}", width = CUSTOMER_ID_DIGITS)
}

/// One synthesized customer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    /// Region code.
    pub state: String,
    pub city: String,
    pub employment_status: String,
    pub card_type: String,
    pub credit_limit: u64,
    pub account_open_date: NaiveDate,
    pub customer_segment: String,
    /// Set only for the declining segment.
    pub decline_type: Option<String>,
}

impl CustomerRecord {
    /// Field values in [`CUSTOMER_COLUMNS`] order; absent values become empty strings.
    pub fn csv_fields(&self) -> [String; 13] {
        [
            self.customer_id.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.age.to_string(),
            self.state.clone(),
            self.city.clone(),
            self.employment_status.clone(),
            self.card_type.clone(),
            self.credit_limit.to_string(),
            self.account_open_date.format("%Y-%m-%d").to_string(),
            self.customer_segment.clone(),
            self.decline_type.clone().unwrap_or_default(),
        ]
    }
}
