//! Field options and the resolved field configuration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as JsonValue;

use crate::binding::{FieldWidgetRef, FormWidgetRef};
use crate::callbacks::{AfterValidateCallback, BeforeValidateCallback, ValueCallback};
use crate::result::ValidationResult;
use crate::validator::ValidatorRegistry;
use crate::value::Value;

/// Debounce delay used when none is configured.
pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(1000);

/// Invalid message used when none is configured.
pub const DEFAULT_INVALID_MESSAGE: &str = "Invalid value.";

/// Caller-supplied field options.
///
/// Every option is optional. A field resolves its options into a
/// [`FieldConfig`] when it is constructed; an owning form overlays its own
/// field options once, when it attaches the field.
#[derive(Clone, Default)]
pub struct FieldOptions {
    /// Message attached to passing results.
    pub valid_message: Option<String>,
    /// Invalid messages per validator name (`"required"` included).
    pub invalid_messages: Option<HashMap<String, String>>,
    /// Message for failures that carry none.
    pub default_invalid_message: Option<String>,
    /// Validate on committed changes.
    pub validate_on_change: Option<bool>,
    /// Validate when typing settles (and on committed changes).
    pub validate_on_type: Option<bool>,
    /// Debounce delay for typing.
    pub typing_delay: Option<Duration>,
    /// Trim free-text values.
    pub trim_enabled: Option<bool>,
    /// Positional parameters per named validator.
    pub validator_params: Option<HashMap<String, Vec<JsonValue>>>,
    /// Registry for named validators.
    pub registry: Option<Arc<ValidatorRegistry>>,
    pub on_typing_start: Option<ValueCallback>,
    pub on_typing_end: Option<ValueCallback>,
    pub on_change: Option<ValueCallback>,
    pub on_before_validate: Option<BeforeValidateCallback>,
    pub on_after_validate: Option<AfterValidateCallback>,
}

impl FieldOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `over` on top of these options; options set in `over` win.
    pub fn overlay(&self, over: &FieldOptions) -> FieldOptions {
        FieldOptions {
            valid_message: over.valid_message.clone().or_else(|| self.valid_message.clone()),
            invalid_messages: over
                .invalid_messages
                .clone()
                .or_else(|| self.invalid_messages.clone()),
            default_invalid_message: over
                .default_invalid_message
                .clone()
                .or_else(|| self.default_invalid_message.clone()),
            validate_on_change: over.validate_on_change.or(self.validate_on_change),
            validate_on_type: over.validate_on_type.or(self.validate_on_type),
            typing_delay: over.typing_delay.or(self.typing_delay),
            trim_enabled: over.trim_enabled.or(self.trim_enabled),
            validator_params: over
                .validator_params
                .clone()
                .or_else(|| self.validator_params.clone()),
            registry: over.registry.clone().or_else(|| self.registry.clone()),
            on_typing_start: over
                .on_typing_start
                .clone()
                .or_else(|| self.on_typing_start.clone()),
            on_typing_end: over.on_typing_end.clone().or_else(|| self.on_typing_end.clone()),
            on_change: over.on_change.clone().or_else(|| self.on_change.clone()),
            on_before_validate: over
                .on_before_validate
                .clone()
                .or_else(|| self.on_before_validate.clone()),
            on_after_validate: over
                .on_after_validate
                .clone()
                .or_else(|| self.on_after_validate.clone()),
        }
    }

    /// Set the message attached to passing results.
    pub fn valid_message(mut self, message: impl Into<String>) -> Self {
        self.valid_message = Some(message.into());
        self
    }

    /// Set the invalid message for one validator name.
    pub fn invalid_message(mut self, validator: impl Into<String>, message: impl Into<String>) -> Self {
        self.invalid_messages
            .get_or_insert_with(HashMap::new)
            .insert(validator.into(), message.into());
        self
    }

    /// Set the fallback invalid message.
    pub fn default_invalid_message(mut self, message: impl Into<String>) -> Self {
        self.default_invalid_message = Some(message.into());
        self
    }

    pub fn validate_on_change(mut self, enabled: bool) -> Self {
        self.validate_on_change = Some(enabled);
        self
    }

    pub fn validate_on_type(mut self, enabled: bool) -> Self {
        self.validate_on_type = Some(enabled);
        self
    }

    /// Set the typing debounce delay.
    pub fn typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = Some(delay);
        self
    }

    pub fn trim_enabled(mut self, enabled: bool) -> Self {
        self.trim_enabled = Some(enabled);
        self
    }

    /// Set positional parameters for one named validator.
    pub fn validator_params(
        mut self,
        validator: impl Into<String>,
        params: impl IntoIterator<Item = JsonValue>,
    ) -> Self {
        self.validator_params
            .get_or_insert_with(HashMap::new)
            .insert(validator.into(), params.into_iter().collect());
        self
    }

    /// Use a specific validator registry.
    pub fn registry(mut self, registry: Arc<ValidatorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn on_typing_start<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync + 'static,
    {
        self.on_typing_start = Some(Arc::new(f));
        self
    }

    pub fn on_typing_end<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync + 'static,
    {
        self.on_typing_end = Some(Arc::new(f));
        self
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn on_before_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync + 'static,
    {
        self.on_before_validate = Some(Arc::new(f));
        self
    }

    pub fn on_after_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValidationResult, &FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync + 'static,
    {
        self.on_after_validate = Some(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldOptions")
            .field("valid_message", &self.valid_message)
            .field("invalid_messages", &self.invalid_messages)
            .field("default_invalid_message", &self.default_invalid_message)
            .field("validate_on_change", &self.validate_on_change)
            .field("validate_on_type", &self.validate_on_type)
            .field("typing_delay", &self.typing_delay)
            .field("trim_enabled", &self.trim_enabled)
            .field("validator_params", &self.validator_params)
            .finish_non_exhaustive()
    }
}

/// Resolved, immutable per-field configuration.
#[derive(Clone)]
pub struct FieldConfig {
    pub valid_message: String,
    pub invalid_messages: HashMap<String, String>,
    pub default_invalid_message: String,
    pub validate_on_change: bool,
    pub validate_on_type: bool,
    pub typing_delay: Duration,
    pub trim_enabled: bool,
    pub validator_params: HashMap<String, Vec<JsonValue>>,
    pub registry: Arc<ValidatorRegistry>,
    pub on_typing_start: Option<ValueCallback>,
    pub on_typing_end: Option<ValueCallback>,
    pub on_change: Option<ValueCallback>,
    pub on_before_validate: Option<BeforeValidateCallback>,
    pub on_after_validate: Option<AfterValidateCallback>,
}

impl FieldConfig {
    /// Resolve options, filling in defaults.
    pub fn from_options(options: &FieldOptions) -> Self {
        Self {
            valid_message: options.valid_message.clone().unwrap_or_default(),
            invalid_messages: options.invalid_messages.clone().unwrap_or_default(),
            default_invalid_message: options
                .default_invalid_message
                .clone()
                .unwrap_or_else(|| DEFAULT_INVALID_MESSAGE.to_string()),
            validate_on_change: options.validate_on_change.unwrap_or(false),
            validate_on_type: options.validate_on_type.unwrap_or(false),
            typing_delay: options.typing_delay.unwrap_or(DEFAULT_TYPING_DELAY),
            trim_enabled: options.trim_enabled.unwrap_or(true),
            validator_params: options.validator_params.clone().unwrap_or_default(),
            registry: options
                .registry
                .clone()
                .unwrap_or_else(ValidatorRegistry::shared_builtin),
            on_typing_start: options.on_typing_start.clone(),
            on_typing_end: options.on_typing_end.clone(),
            on_change: options.on_change.clone(),
            on_before_validate: options.on_before_validate.clone(),
            on_after_validate: options.on_after_validate.clone(),
        }
    }

    /// Invalid message for a validator: specific if configured, else default.
    pub fn invalid_message_for(&self, validator: &str) -> &str {
        self.invalid_messages
            .get(validator)
            .map(String::as_str)
            .unwrap_or(&self.default_invalid_message)
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::from_options(&FieldOptions::default())
    }
}

impl std::fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldConfig")
            .field("valid_message", &self.valid_message)
            .field("invalid_messages", &self.invalid_messages)
            .field("default_invalid_message", &self.default_invalid_message)
            .field("validate_on_change", &self.validate_on_change)
            .field("validate_on_type", &self.validate_on_type)
            .field("typing_delay", &self.typing_delay)
            .field("trim_enabled", &self.trim_enabled)
            .field("validator_params", &self.validator_params)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
