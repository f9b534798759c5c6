use jsonschema::JSONSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};

/// Emit the JSON Schema for generation config documents.
pub fn config_json_schema() -> RootSchema {
    schema_for!(GenerationConfig)
}

/// Structural problem found in a config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// JSON pointer to the offending value.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a config JSON document against the config JSON Schema.
pub fn check_config_json(config_json: &Value, config_schema: &Value) -> Result<Vec<ConfigIssue>> {
    let compiled =
        JSONSchema::compile(config_schema).map_err(|err| Error::Schema(err.to_string()))?;

    let mut issues = Vec::new();
    if let Err(errors) = compiled.validate(config_json) {
        for error in errors {
            issues.push(ConfigIssue {
                path: normalized_json_pointer(&error.instance_path.to_string()),
                message: error.to_string(),
            });
        }
    }

    Ok(issues)
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_value() -> Value {
        serde_json::to_value(config_json_schema()).expect("serialize schema")
    }

    #[test]
    fn default_config_passes_structural_check() {
        let config = serde_json::to_value(GenerationConfig::default()).expect("serialize config");
        let issues = check_config_json(&config, &schema_value()).expect("compile schema");
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn partial_documents_are_accepted() {
        let config = json!({ "population_size": 10, "seed": 7 });
        let issues = check_config_json(&config, &schema_value()).expect("compile schema");
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn wrong_types_are_reported_with_paths() {
        let config = json!({ "population_size": "many", "age": { "min": -3 } });
        let issues = check_config_json(&config, &schema_value()).expect("compile schema");
        assert!(issues.iter().any(|issue| issue.path == "/population_size"));
        assert!(issues.iter().any(|issue| issue.path == "/age/min"));
    }
}
