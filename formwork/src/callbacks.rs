//! Hook points exposed to the embedding caller.
//!
//! Every hook is optional and only invoked when present.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::binding::{FieldWidgetRef, FormWidgetRef};
use crate::error::BoxError;
use crate::result::{Payload, SubmissionResult, ValidationResult};
use crate::value::{FormData, Value};

/// Type alias for boxed futures used by async validators and submit handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Typing start, typing end and change notifications.
///
/// Receives the value, the field widget and the owning form widget (if any).
pub type ValueCallback = Arc<dyn Fn(&Value, &FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync>;

/// Called before a field validation pass.
pub type BeforeValidateCallback = Arc<dyn Fn(&FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync>;

/// Called after a field validation pass with its final result.
pub type AfterValidateCallback =
    Arc<dyn Fn(&ValidationResult, &FieldWidgetRef, Option<&FormWidgetRef>) + Send + Sync>;

/// Called before a form-level validation pass.
pub type FormBeforeValidateCallback = Arc<dyn Fn(&FormWidgetRef) + Send + Sync>;

/// Called after a form-level validation pass with the aggregate validity.
pub type FormAfterValidateCallback = Arc<dyn Fn(bool, &FormWidgetRef) + Send + Sync>;

/// Called with the form snapshot when a submit attempt starts.
pub type BeforeSubmitCallback = Arc<dyn Fn(&FormData, &FormWidgetRef) + Send + Sync>;

/// Called once the submit pipeline produced a result (`None` without a handler).
pub type AfterSubmitCallback = Arc<dyn Fn(Option<&SubmissionResult>, &FormWidgetRef) + Send + Sync>;

/// Success and error branches of the submit pipeline.
pub type SubmitPayloadCallback = Arc<dyn Fn(&Payload, &FormWidgetRef) + Send + Sync>;

/// The external submit handler.
pub type SubmitHandler = Arc<
    dyn Fn(FormData, FormWidgetRef) -> BoxFuture<'static, Result<SubmissionResult, BoxError>>
        + Send
        + Sync,
>;
