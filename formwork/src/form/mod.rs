//! Form engine: aggregates field validity, keeps the form status in step
//! with field results and runs the submit pipeline.

mod config;
mod link;
mod submit;

pub use config::FormOptions;
pub use submit::SubmitOutcome;

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::binding::{Document, FormWidgetRef, SubmitStatus, ValidationStatus};
use crate::error::ConfigError;
use crate::field::{Field, FieldObserver};
use link::{AggregationPass, FormLink};

#[derive(Debug, Clone, Copy, Default)]
struct FormStatus {
    validation: ValidationStatus,
    submit: SubmitStatus,
}

pub(crate) struct FormInner {
    selector: String,
    widget: FormWidgetRef,
    fields: Vec<Field>,
    options: FormOptions,
    /// Set for the duration of a full-form validation pass.
    validating_all: Arc<AtomicBool>,
    status: RwLock<FormStatus>,
}

/// Validation and submission engine for a group of fields.
///
/// `Form` is a cheap-to-clone handle; clones share the same state.
///
/// # Example
///
/// ```ignore
/// let form = Form::new(
///     &document,
///     ".js-form",
///     [
///         Field::new(&document, ".js-name", ["required"], FieldOptions::new())?,
///         Field::new(&document, ".js-agree", ["required"], FieldOptions::new())?,
///     ],
///     FormOptions::new()
///         .on_after_validate(|valid, _form| println!("form valid: {valid}"))
///         .submit(|data, _form| async move { send(data).await }),
/// )?;
///
/// form.submit().await;
/// ```
#[derive(Clone)]
pub struct Form {
    inner: Arc<FormInner>,
}

impl Form {
    /// Bind a form to the widget matching `selector` and attach `fields`.
    ///
    /// Each field is re-resolved inside the form and gets the form's field
    /// options overlaid on its own. Fails if the form or any field widget is
    /// missing, a field is attached twice, or a named validator is unknown.
    pub fn new<D, I>(
        document: &D,
        selector: impl Into<String>,
        fields: I,
        options: FormOptions,
    ) -> Result<Self, ConfigError>
    where
        D: Document + ?Sized,
        I: IntoIterator<Item = Field>,
    {
        let selector = selector.into();
        let widget = document
            .find_form(&selector)
            .ok_or_else(|| ConfigError::FormNotFound {
                selector: selector.clone(),
            })?;

        let fields: Vec<Field> = fields.into_iter().collect();
        let mut bindings = Vec::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if fields[..index].iter().any(|other| other.same_as(field)) {
                return Err(ConfigError::AlreadyAttached {
                    selector: field.selector().to_string(),
                });
            }
            bindings.push(field.prepare_attach(&widget, &options.fields)?);
        }

        let validating_all = Arc::new(AtomicBool::new(false));

        let inner = Arc::new_cyclic(|form| {
            for (field, mut binding) in fields.iter().zip(bindings) {
                let observer: Arc<dyn FieldObserver> = Arc::new(FormLink {
                    form: form.clone(),
                    validating_all: Arc::clone(&validating_all),
                });
                binding.observer = Some(observer);
                field.install(binding);
            }

            FormInner {
                selector,
                widget,
                fields,
                options,
                validating_all,
                status: RwLock::default(),
            }
        });

        debug!(
            "Form {} attached {} field(s)",
            inner.selector,
            inner.fields.len()
        );

        Ok(Self { inner })
    }

    /// The selector this form was created with.
    pub fn selector(&self) -> &str {
        &self.inner.selector
    }

    /// The bound form widget.
    pub fn widget(&self) -> FormWidgetRef {
        Arc::clone(&self.inner.widget)
    }

    /// Attached fields, in declared order.
    pub fn fields(&self) -> &[Field] {
        &self.inner.fields
    }

    /// Attached field by selector.
    pub fn field(&self, selector: &str) -> Option<&Field> {
        self.inner.fields.iter().find(|f| f.selector() == selector)
    }

    /// Current validation status of the form.
    pub fn validation_status(&self) -> ValidationStatus {
        self.inner.status().validation
    }

    /// Current submission status of the form.
    pub fn submit_status(&self) -> SubmitStatus {
        self.inner.status().submit
    }

    /// Logical AND of every field's `is_valid`, in declared order, stopping
    /// at the first invalid field.
    pub async fn is_valid(&self, force: bool) -> bool {
        self.inner.is_valid(force).await
    }

    /// Validate every field in order, then refresh the form status once.
    ///
    /// Returns the aggregate validity.
    pub async fn validate(&self) -> bool {
        self.inner.validate().await
    }

    /// Run the submit pipeline.
    ///
    /// The embedding binding is expected to suppress the native submission
    /// before calling this.
    pub async fn submit(&self) -> SubmitOutcome {
        self.inner.submit().await
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("selector", &self.inner.selector)
            .field("fields", &self.inner.fields)
            .field("status", &self.inner.status())
            .finish_non_exhaustive()
    }
}

impl FormInner {
    fn status(&self) -> FormStatus {
        self.status
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }

    fn set_validation_status(&self, status: ValidationStatus) {
        self.status
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .validation = status;
        self.widget.set_validation_status(status);
    }

    fn set_submit_status(&self, status: SubmitStatus) {
        self.status
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .submit = status;
        self.widget.set_submit_status(status);
    }

    async fn is_valid(&self, force: bool) -> bool {
        for field in &self.fields {
            if !field.is_valid(force).await {
                return false;
            }
        }
        true
    }

    /// Clear the status, notify, mark validating.
    fn begin_validation(&self) {
        self.set_validation_status(ValidationStatus::Idle);

        if let Some(hook) = &self.options.on_before_validate {
            hook(&self.widget);
        }

        self.set_validation_status(ValidationStatus::Validating);
    }

    /// Recompute the aggregate, set the status, notify.
    async fn finish_validation(&self) -> bool {
        self.set_validation_status(ValidationStatus::Idle);

        let valid = self.is_valid(false).await;
        self.set_validation_status(if valid {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        });

        debug!("Form {} validated: valid={}", self.selector, valid);

        if let Some(hook) = &self.options.on_after_validate {
            hook(valid, &self.widget);
        }

        valid
    }

    async fn validate(&self) -> bool {
        let _pass = AggregationPass::begin(&self.validating_all);

        self.begin_validation();

        for field in &self.fields {
            field.validate().await;
        }

        self.finish_validation().await
    }
}
