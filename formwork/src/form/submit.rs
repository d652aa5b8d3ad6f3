//! Submit pipeline.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::{debug, error};

use super::FormInner;
use crate::binding::{FormWidgetRef, SubmitStatus};
use crate::callbacks::SubmitHandler;
use crate::error::{SubmissionError, extract_panic_message};
use crate::result::SubmissionResult;
use crate::value::FormData;

/// How a submit attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; the handler was not called.
    Invalid,
    /// The form was valid. Carries the handler's result, or `None` when no
    /// handler is configured.
    Completed(Option<SubmissionResult>),
}

impl SubmitOutcome {
    /// Check if the attempt passed validation.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The handler's result, if one ran.
    pub fn result(&self) -> Option<&SubmissionResult> {
        match self {
            Self::Completed(result) => result.as_ref(),
            Self::Invalid => None,
        }
    }
}

impl FormInner {
    pub(super) async fn submit(&self) -> SubmitOutcome {
        let options = &self.options;
        let data = self.widget.form_data();

        if let Some(hook) = &options.on_before_submit {
            hook(&data, &self.widget);
        }

        self.set_submit_status(SubmitStatus::Idle);
        self.set_submit_status(SubmitStatus::Submitting);

        self.validate().await;
        if !self.is_valid(false).await {
            debug!("Form {} submit rejected: invalid", self.selector);
            self.set_submit_status(SubmitStatus::Idle);
            return SubmitOutcome::Invalid;
        }

        let result = match &options.submit {
            Some(handler) => Some(self.run_handler(handler, data).await),
            None => None,
        };

        self.set_submit_status(SubmitStatus::Idle);

        if let Some(hook) = &options.on_after_submit {
            hook(result.as_ref(), &self.widget);
        }

        if let Some(result) = &result {
            if result.is_success() {
                self.set_submit_status(SubmitStatus::SubmitSuccess);
                if let Some(hook) = &options.on_after_submit_success {
                    hook(result.payload(), &self.widget);
                }
            } else {
                self.set_submit_status(SubmitStatus::SubmitError);
                if let Some(hook) = &options.on_after_submit_error {
                    hook(result.payload(), &self.widget);
                }
            }
        }

        debug!(
            "Form {} submitted: success={:?}",
            self.selector,
            result.as_ref().map(SubmissionResult::is_success)
        );

        SubmitOutcome::Completed(result)
    }

    /// Call the handler with the snapshot taken when the attempt started.
    /// Errors and panics become a failed result with an empty payload.
    async fn run_handler(&self, handler: &SubmitHandler, data: FormData) -> SubmissionResult {
        match call_handler(handler, data, Arc::clone(&self.widget)).await {
            Ok(result) => result,
            Err(e) => {
                error!("Form {}: {}", self.selector, e);
                SubmissionResult::failure()
            }
        }
    }
}

async fn call_handler(
    handler: &SubmitHandler,
    data: FormData,
    widget: FormWidgetRef,
) -> Result<SubmissionResult, SubmissionError> {
    let future = std::panic::catch_unwind(AssertUnwindSafe(|| handler(data, widget)))
        .map_err(|panic| SubmissionError::Panicked(extract_panic_message(&panic)))?;

    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result.map_err(SubmissionError::Handler),
        Err(panic) => Err(SubmissionError::Panicked(extract_panic_message(&panic))),
    }
}
