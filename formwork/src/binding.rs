//! Widget binding capability.
//!
//! The engine does not know how widgets are located, read or rendered. The
//! embedding environment implements these traits; see [`crate::memory`] for a
//! headless implementation.

use std::sync::Arc;

use crate::value::{FormData, Value, WidgetKind};

/// Shared handle to a bound field widget.
pub type FieldWidgetRef = Arc<dyn FieldWidget>;

/// Shared handle to a bound form widget.
pub type FormWidgetRef = Arc<dyn FormWidget>;

/// Presentational validation status of a field or a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ValidationStatus {
    /// No marker.
    #[default]
    Idle,
    /// A validation pass is running.
    Validating,
    /// The last pass succeeded.
    Valid,
    /// The last pass failed.
    Invalid,
}

/// Presentational submission status of a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubmitStatus {
    /// No marker.
    #[default]
    Idle,
    /// The submit pipeline is running.
    Submitting,
    /// The submit handler reported success.
    SubmitSuccess,
    /// The submit handler reported failure or failed.
    SubmitError,
}

/// Something field widgets can be looked up in (a document or a form).
pub trait WidgetRoot {
    /// Resolve a live field widget by selector.
    fn find_field(&self, selector: &str) -> Option<FieldWidgetRef>;
}

/// Top-level scope that also contains forms.
pub trait Document: WidgetRoot {
    /// Resolve a live form widget by selector.
    fn find_form(&self, selector: &str) -> Option<FormWidgetRef>;
}

/// A single interactive widget.
pub trait FieldWidget: Send + Sync {
    /// Stable identifier, used in logs.
    fn id(&self) -> String;

    /// Widget kind.
    fn kind(&self) -> WidgetKind;

    /// Read the current raw value.
    fn value(&self) -> Value;

    /// Replace the live text of a free-text widget.
    fn set_text(&self, text: &str);

    /// Apply a presentational status marker.
    fn set_status(&self, status: ValidationStatus);
}

/// A widget group with its own submit action.
pub trait FormWidget: WidgetRoot + Send + Sync {
    /// Stable identifier, used in logs.
    fn id(&self) -> String;

    /// Snapshot the current values of all named widgets.
    fn form_data(&self) -> FormData;

    /// Apply a validation status marker to the form.
    fn set_validation_status(&self, status: ValidationStatus);

    /// Apply a submission status marker to the form.
    fn set_submit_status(&self, status: SubmitStatus);
}
