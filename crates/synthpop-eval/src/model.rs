use serde::{Deserialize, Serialize};

use synthpop_core::CustomerRecord;

/// Default allowed gap between empirical and target segment shares.
pub const DEFAULT_DISTRIBUTION_TOLERANCE: f64 = 0.05;

/// Options for table validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateOptions {
    /// Absolute share deviation above which a segment gets a warning.
    pub distribution_tolerance: f64,
    /// Limit the number of errors and warnings listed in the markdown report.
    pub max_examples: usize,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            distribution_tolerance: DEFAULT_DISTRIBUTION_TOLERANCE,
            max_examples: 20,
        }
    }
}

/// One row of a customer table as read from disk.
///
/// Every column is nullable so that edited or truncated files can still be
/// checked; numeric columns stay as text until a check parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerRow {
    pub customer_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub employment_status: Option<String>,
    pub card_type: Option<String>,
    pub credit_limit: Option<String>,
    pub account_open_date: Option<String>,
    pub customer_segment: Option<String>,
    pub decline_type: Option<String>,
}

impl CustomerRow {
    /// Value of a required column by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "customer_id" => &self.customer_id,
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "email" => &self.email,
            "age" => &self.age,
            "state" => &self.state,
            "city" => &self.city,
            "employment_status" => &self.employment_status,
            "card_type" => &self.card_type,
            "credit_limit" => &self.credit_limit,
            "account_open_date" => &self.account_open_date,
            "customer_segment" => &self.customer_segment,
            "decline_type" => &self.decline_type,
            _ => return None,
        };
        value.as_deref()
    }

    /// Mutable cell for a column name; unknown columns yield `None`.
    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        let slot = match name {
            "customer_id" => &mut self.customer_id,
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "email" => &mut self.email,
            "age" => &mut self.age,
            "state" => &mut self.state,
            "city" => &mut self.city,
            "employment_status" => &mut self.employment_status,
            "card_type" => &mut self.card_type,
            "credit_limit" => &mut self.credit_limit,
            "account_open_date" => &mut self.account_open_date,
            "customer_segment" => &mut self.customer_segment,
            "decline_type" => &mut self.decline_type,
            _ => return None,
        };
        Some(slot)
    }
}

impl From<&CustomerRecord> for CustomerRow {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            customer_id: Some(record.customer_id.clone()),
            first_name: Some(record.first_name.clone()),
            last_name: Some(record.last_name.clone()),
            email: Some(record.email.clone()),
            age: Some(record.age.to_string()),
            state: Some(record.state.clone()),
            city: Some(record.city.clone()),
            employment_status: Some(record.employment_status.clone()),
            card_type: Some(record.card_type.clone()),
            credit_limit: Some(record.credit_limit.to_string()),
            account_open_date: Some(record.account_open_date.format("%Y-%m-%d").to_string()),
            customer_segment: Some(record.customer_segment.clone()),
            decline_type: record.decline_type.clone(),
        }
    }
}
