use std::path::Path;

use serde_json::Value;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use crate::schema::{check_config_json, config_json_schema};

/// Serialization format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Load, structurally check, and semantically validate a config file.
pub fn load_config(path: &Path) -> Result<GenerationConfig> {
    let contents = std::fs::read_to_string(path)?;
    parse_config_str(&contents, ConfigFormat::from_path(path))
}

/// Parse a config document already held in memory.
///
/// The document is checked against the generated JSON Schema before it is
/// deserialized, so type errors are reported with their JSON pointer.
pub fn parse_config_str(contents: &str, format: ConfigFormat) -> Result<GenerationConfig> {
    let document: Value = match format {
        ConfigFormat::Toml => {
            toml::from_str(contents).map_err(|err| Error::Parse(err.to_string()))?
        }
        ConfigFormat::Json => {
            serde_json::from_str(contents).map_err(|err| Error::Parse(err.to_string()))?
        }
    };

    let schema = serde_json::to_value(config_json_schema())
        .map_err(|err| Error::Schema(err.to_string()))?;
    let issues = check_config_json(&document, &schema)?;
    if !issues.is_empty() {
        let joined = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::InvalidConfig(joined));
    }

    let config: GenerationConfig =
        serde_json::from_value(document).map_err(|err| Error::Parse(err.to_string()))?;
    config.validate()?;
    Ok(config)
}
