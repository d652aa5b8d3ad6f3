//! Validator references as declared on a field.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::REQUIRED;
use crate::callbacks::BoxFuture;
use crate::result::ValidationResult;
use crate::value::Value;

/// Executable check: takes the current value and yields a result.
pub type CheckFn = Arc<dyn Fn(Value) -> BoxFuture<'static, ValidationResult> + Send + Sync>;

/// One entry of a field's validator chain.
///
/// Chains are ordered; evaluation stops at the first failing entry.
///
/// # Example
///
/// ```ignore
/// let chain = vec![
///     ValidatorRef::required(),
///     ValidatorRef::named_with("isLength", [json!({ "min": 3 })]),
///     ValidatorRef::custom(|value| ValidationResult::from(value.to_text() != "admin")),
/// ];
/// ```
#[derive(Clone)]
pub enum ValidatorRef {
    /// Presence check, aware of the widget kind.
    Required,
    /// A validator looked up in the registry.
    Named {
        /// Registry identifier.
        name: String,
        /// Positional parameters. `None` falls back to the field's
        /// configured parameters for this name.
        params: Option<Vec<JsonValue>>,
    },
    /// A caller-supplied check that owns its own result and message.
    Custom(CheckFn),
}

impl ValidatorRef {
    /// The presence check.
    pub fn required() -> Self {
        Self::Required
    }

    /// A registry validator using the field's configured parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: None,
        }
    }

    /// A registry validator with inline parameters.
    pub fn named_with(name: impl Into<String>, params: impl IntoIterator<Item = JsonValue>) -> Self {
        Self::Named {
            name: name.into(),
            params: Some(params.into_iter().collect()),
        }
    }

    /// A synchronous custom check.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(move |value| {
            let result = f(&value);
            Box::pin(std::future::ready(result))
        }))
    }

    /// An asynchronous custom check (e.g. a remote lookup).
    pub fn custom_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ValidationResult> + Send + 'static,
    {
        Self::Custom(Arc::new(move |value| Box::pin(f(value))))
    }

    /// Name used in logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Required => REQUIRED,
            Self::Named { name, .. } => name,
            Self::Custom(_) => "custom",
        }
    }
}

impl std::fmt::Debug for ValidatorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::Named { name, params } => f
                .debug_struct("Named")
                .field("name", name)
                .field("params", params)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for ValidatorRef {
    fn from(name: &str) -> Self {
        if name == REQUIRED {
            Self::Required
        } else {
            Self::named(name)
        }
    }
}

impl From<String> for ValidatorRef {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}
