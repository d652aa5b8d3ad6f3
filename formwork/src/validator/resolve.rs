//! Turning validator references into executable checks.

use std::sync::Arc;

use super::reference::{CheckFn, ValidatorRef};
use super::REQUIRED;
use crate::error::ConfigError;
use crate::field::FieldConfig;
use crate::result::ValidationResult;
use crate::value::{Value, WidgetKind};

/// A resolved validator, ready to run against a value.
#[derive(Clone)]
pub struct Check {
    name: String,
    run: CheckFn,
}

impl Check {
    /// Name of the reference this check came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the check.
    pub async fn run(&self, value: Value) -> ValidationResult {
        (self.run)(value).await
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Resolve one reference for a widget of `kind` under `config`.
///
/// `"required"` uses the kind-specific emptiness rule. Named validators are
/// looked up in the configured registry and their boolean outcome is wrapped
/// with the configured messages. Custom checks are used verbatim.
pub fn resolve(
    reference: &ValidatorRef,
    kind: WidgetKind,
    config: &FieldConfig,
) -> Result<Check, ConfigError> {
    let run: CheckFn = match reference {
        ValidatorRef::Required => {
            let valid_message = config.valid_message.clone();
            let invalid_message = config.invalid_message_for(REQUIRED).to_string();

            Arc::new(move |value| {
                let result = if kind.is_empty(&value) {
                    ValidationResult::invalid(invalid_message.clone())
                } else {
                    ValidationResult::valid(valid_message.clone())
                };
                Box::pin(std::future::ready(result))
            })
        }
        ValidatorRef::Named { name, params } => {
            let validator = config
                .registry
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownValidator(name.clone()))?;
            let params = params
                .clone()
                .or_else(|| config.validator_params.get(name).cloned())
                .unwrap_or_default();
            let valid_message = config.valid_message.clone();
            let invalid_message = config.invalid_message_for(name).to_string();

            Arc::new(move |value| {
                let result = if validator(&value, &params) {
                    ValidationResult::valid(valid_message.clone())
                } else {
                    ValidationResult::invalid(invalid_message.clone())
                };
                Box::pin(std::future::ready(result))
            })
        }
        ValidatorRef::Custom(check) => Arc::clone(check),
    };

    Ok(Check {
        name: reference.label().to_string(),
        run,
    })
}

/// Resolve a whole chain, preserving declared order.
pub(crate) fn resolve_chain(
    references: &[ValidatorRef],
    kind: WidgetKind,
    config: &FieldConfig,
) -> Result<Arc<[Check]>, ConfigError> {
    references
        .iter()
        .map(|reference| resolve(reference, kind, config))
        .collect()
}
