//! Serialisable field settings.
//!
//! The data-only part of [`FieldOptions`], loadable from JSON:
//!
//! ```json
//! {
//!   "valid_message": "Looks good",
//!   "invalid_messages": { "required": "Required field", "isEmail": "Invalid email" },
//!   "validate_on_type": true,
//!   "typing_delay_ms": 300,
//!   "validator_params": { "isLength": [{ "min": 4 }] }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::field::FieldOptions;

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Field settings as stored on disk. Absent keys stay unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldSettings {
    /// Message attached to passing results.
    pub valid_message: Option<String>,

    /// Invalid messages per validator name.
    pub invalid_messages: Option<HashMap<String, String>>,

    /// Message for failures that carry none.
    pub default_invalid_message: Option<String>,

    pub validate_on_change: Option<bool>,

    pub validate_on_type: Option<bool>,

    /// Debounce delay in milliseconds.
    pub typing_delay_ms: Option<u64>,

    pub trim_enabled: Option<bool>,

    /// Positional parameters per named validator.
    pub validator_params: Option<HashMap<String, Vec<JsonValue>>>,
}

impl FieldSettings {
    /// Parse settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON settings file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Convert into field options. Callbacks and the registry stay unset.
    pub fn into_options(self) -> FieldOptions {
        self.into()
    }
}

impl From<FieldSettings> for FieldOptions {
    fn from(settings: FieldSettings) -> Self {
        FieldOptions {
            valid_message: settings.valid_message,
            invalid_messages: settings.invalid_messages,
            default_invalid_message: settings.default_invalid_message,
            validate_on_change: settings.validate_on_change,
            validate_on_type: settings.validate_on_type,
            typing_delay: settings.typing_delay_ms.map(Duration::from_millis),
            trim_enabled: settings.trim_enabled,
            validator_params: settings.validator_params,
            ..FieldOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings() {
        let settings = FieldSettings::from_json_str(
            r#"{ "validate_on_type": true, "typing_delay_ms": 250 }"#,
        )
        .unwrap();

        let options: FieldOptions = settings.into();
        assert_eq!(options.validate_on_type, Some(true));
        assert_eq!(options.typing_delay, Some(Duration::from_millis(250)));
        assert_eq!(options.valid_message, None);
        assert!(options.registry.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FieldSettings::from_json_str(r#"{ "typing_delay": 250 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = FieldSettings::from_path("/nonexistent/formwork-settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
