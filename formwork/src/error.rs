//! Error types.

use std::any::Any;

use thiserror::Error;

/// Boxed error returned by submit handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal configuration errors, raised when a field or form is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No widget matches the field selector.
    #[error("Field element with \"{selector}\" selector not found")]
    FieldNotFound {
        /// The field selector.
        selector: String,
    },

    /// The field selector does not resolve inside the owning form.
    #[error("Field element with \"{selector}\" selector not found in form '{form}'")]
    FieldNotInForm {
        /// The field selector.
        selector: String,
        /// The form widget id.
        form: String,
    },

    /// No widget matches the form selector.
    #[error("Form element with \"{selector}\" selector not found")]
    FormNotFound {
        /// The form selector.
        selector: String,
    },

    /// A named validator is missing from the registry.
    #[error("Unknown validator '{0}'")]
    UnknownValidator(String),

    /// The field already belongs to a form.
    #[error("Field \"{selector}\" is already attached to a form")]
    AlreadyAttached {
        /// The field selector.
        selector: String,
    },
}

/// Failure of the submit handler. Never returned to the caller; reported to
/// the log and turned into a failed `SubmissionResult`.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The handler returned an error.
    #[error("submit handler failed: {0}")]
    Handler(#[source] BoxError),

    /// The handler panicked.
    #[error("submit handler panicked: {0}")]
    Panicked(String),
}

/// Extract a human-readable message from a panic payload.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
