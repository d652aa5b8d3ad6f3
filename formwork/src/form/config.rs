//! Form options.

use std::future::Future;
use std::sync::Arc;

use crate::binding::{FieldWidgetRef, FormWidgetRef};
use crate::callbacks::{
    AfterSubmitCallback, AfterValidateCallback, BeforeSubmitCallback, BeforeValidateCallback,
    FormAfterValidateCallback, FormBeforeValidateCallback, SubmitHandler, SubmitPayloadCallback,
};
use crate::error::BoxError;
use crate::field::FieldOptions;
use crate::result::{Payload, SubmissionResult, ValidationResult};
use crate::value::FormData;

/// Form-level hooks, the submit handler, and field options pushed into every
/// attached field.
#[derive(Clone, Default)]
pub struct FormOptions {
    /// Overlaid on each field's own options at attach time.
    pub fields: FieldOptions,
    pub on_before_field_validate: Option<BeforeValidateCallback>,
    pub on_after_field_validate: Option<AfterValidateCallback>,
    pub on_before_validate: Option<FormBeforeValidateCallback>,
    pub on_after_validate: Option<FormAfterValidateCallback>,
    pub on_before_submit: Option<BeforeSubmitCallback>,
    pub submit: Option<SubmitHandler>,
    pub on_after_submit: Option<AfterSubmitCallback>,
    pub on_after_submit_success: Option<SubmitPayloadCallback>,
    pub on_after_submit_error: Option<SubmitPayloadCallback>,
}

impl FormOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field options pushed into every attached field.
    pub fn fields(mut self, options: FieldOptions) -> Self {
        self.fields = options;
        self
    }

    /// Called before any attached field validates.
    pub fn on_before_field_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync + 'static,
    {
        self.on_before_field_validate = Some(Arc::new(f));
        self
    }

    /// Called after any attached field validated.
    pub fn on_after_field_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValidationResult, &FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync + 'static,
    {
        self.on_after_field_validate = Some(Arc::new(f));
        self
    }

    pub fn on_before_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&FormWidgetRef) + Send + Sync + 'static,
    {
        self.on_before_validate = Some(Arc::new(f));
        self
    }

    pub fn on_after_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(bool, &FormWidgetRef) + Send + Sync + 'static,
    {
        self.on_after_validate = Some(Arc::new(f));
        self
    }

    pub fn on_before_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(&FormData, &FormWidgetRef) + Send + Sync + 'static,
    {
        self.on_before_submit = Some(Arc::new(f));
        self
    }

    /// Set the submit handler.
    ///
    /// Errors returned by the handler (and panics inside it) are logged and
    /// turned into a failed result with an empty payload.
    pub fn submit<F, Fut, E>(mut self, f: F) -> Self
    where
        F: Fn(FormData, FormWidgetRef) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<SubmissionResult, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.submit = Some(Arc::new(move |data, form| {
            let future = f(data, form);
            Box::pin(async move { future.await.map_err(Into::into) })
        }));
        self
    }

    pub fn on_after_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&SubmissionResult>, &FormWidgetRef) + Send + Sync + 'static,
    {
        self.on_after_submit = Some(Arc::new(f));
        self
    }

    pub fn on_after_submit_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&Payload, &FormWidgetRef) + Send + Sync + 'static,
    {
        self.on_after_submit_success = Some(Arc::new(f));
        self
    }

    pub fn on_after_submit_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&Payload, &FormWidgetRef) + Send + Sync + 'static,
    {
        self.on_after_submit_error = Some(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormOptions")
            .field("fields", &self.fields)
            .field("submit", &self.submit.is_some())
            .finish_non_exhaustive()
    }
}
