//! Field engine: one widget's validator chain, value extraction, typing
//! debounce and status transitions.

mod config;
mod observer;
mod typing;

pub use config::{DEFAULT_INVALID_MESSAGE, DEFAULT_TYPING_DELAY, FieldConfig, FieldOptions};

pub(crate) use observer::FieldObserver;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, trace};

use crate::binding::{FieldWidgetRef, FormWidgetRef, ValidationStatus, WidgetRoot};
use crate::error::ConfigError;
use crate::result::ValidationResult;
use crate::validator::{Check, ValidatorRef, resolve_chain};
use crate::value::Value;
use typing::Typing;

/// Everything a field needs from its environment, swapped as one unit when a
/// form attaches the field.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) widget: FieldWidgetRef,
    pub(crate) form: Option<FormWidgetRef>,
    pub(crate) config: Arc<FieldConfig>,
    pub(crate) chain: Arc<[Check]>,
    pub(crate) observer: Option<Arc<dyn FieldObserver>>,
}

/// Mutable per-field state.
#[derive(Default)]
struct FieldState {
    /// Last result of `validate()`; `None` until validated or after `reset()`.
    result: Option<ValidationResult>,
    status: ValidationStatus,
    typing: Typing,
    /// Bumped on every keystroke; stale debounce timers compare against it.
    generation: u64,
}

struct FieldInner {
    selector: String,
    validators: Vec<ValidatorRef>,
    options: FieldOptions,
    binding: RwLock<Binding>,
    state: Mutex<FieldState>,
}

/// Validation engine for a single widget.
///
/// `Field` is a cheap-to-clone handle; clones share the same state.
///
/// # Example
///
/// ```ignore
/// let email = Field::new(
///     &document,
///     ".js-email",
///     ["required", "isEmail"],
///     FieldOptions::new()
///         .invalid_message("required", "Email is required")
///         .invalid_message("isEmail", "Invalid email")
///         .validate_on_type(true),
/// )?;
///
/// let result = email.validate().await;
/// if !result.is_valid() {
///     println!("{}", result.message());
/// }
/// ```
#[derive(Clone)]
pub struct Field {
    inner: Arc<FieldInner>,
}

impl Field {
    /// Bind a field to the widget matching `selector` in `root`.
    ///
    /// Fails if no widget matches or a named validator is not registered.
    pub fn new<R, I, V>(
        root: &R,
        selector: impl Into<String>,
        validators: I,
        options: FieldOptions,
    ) -> Result<Self, ConfigError>
    where
        R: WidgetRoot + ?Sized,
        I: IntoIterator<Item = V>,
        V: Into<ValidatorRef>,
    {
        let selector = selector.into();
        let validators: Vec<ValidatorRef> = validators.into_iter().map(Into::into).collect();

        let widget = root
            .find_field(&selector)
            .ok_or_else(|| ConfigError::FieldNotFound {
                selector: selector.clone(),
            })?;
        let config = FieldConfig::from_options(&options);
        let chain = resolve_chain(&validators, widget.kind(), &config)?;

        debug!(
            "Field {} bound to widget {} with {} validator(s)",
            selector,
            widget.id(),
            validators.len()
        );

        Ok(Self {
            inner: Arc::new(FieldInner {
                selector,
                validators,
                options,
                binding: RwLock::new(Binding {
                    widget,
                    form: None,
                    config: Arc::new(config),
                    chain,
                    observer: None,
                }),
                state: Mutex::new(FieldState::default()),
            }),
        })
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// The selector this field was created with.
    pub fn selector(&self) -> &str {
        &self.inner.selector
    }

    /// The declared validator chain.
    pub fn validators(&self) -> &[ValidatorRef] {
        &self.inner.validators
    }

    /// The bound widget.
    pub fn widget(&self) -> FieldWidgetRef {
        self.binding().widget
    }

    /// The owning form's widget, once attached.
    pub fn form_widget(&self) -> Option<FormWidgetRef> {
        self.binding().form
    }

    /// The resolved configuration.
    pub fn config(&self) -> Arc<FieldConfig> {
        self.binding().config
    }

    /// Current value, trimmed when the trim policy applies.
    pub fn value(&self) -> Value {
        extract(&self.binding())
    }

    /// Current value exactly as the widget reports it.
    pub fn raw_value(&self) -> Value {
        self.binding().widget.value()
    }

    /// Result of the last `validate()` pass, if any.
    pub fn result(&self) -> Option<ValidationResult> {
        self.state().result.clone()
    }

    /// Current presentational status.
    pub fn status(&self) -> ValidationStatus {
        self.state().status
    }

    /// Check if a typing burst is in progress (a debounce timer is pending).
    pub fn is_typing(&self) -> bool {
        self.state().typing.is_active()
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Drop the cached result so the next `is_valid(false)` re-runs the chain.
    pub fn reset(&self) {
        self.state().result = None;
    }

    /// Check validity without side effects.
    ///
    /// Unless `force` is set, a cached result from the last `validate()` is
    /// returned as is. Otherwise the chain runs in declared order and stops at
    /// the first failing check. Nothing is cached.
    pub async fn is_valid(&self, force: bool) -> bool {
        if !force {
            let cached = self.state().result.as_ref().map(ValidationResult::is_valid);
            if let Some(valid) = cached {
                return valid;
            }
        }

        let binding = self.binding();
        for check in binding.chain.iter() {
            if check.run(extract(&binding)).await.is_invalid() {
                trace!("Field {} failed check '{}'", self.selector(), check.name());
                return false;
            }
        }

        true
    }

    /// Run the chain, cache the result, update the status and notify hooks.
    pub async fn validate(&self) -> ValidationResult {
        let binding = self.binding();
        let config = &binding.config;
        let form = binding.form.as_ref();

        self.set_status(&binding.widget, ValidationStatus::Idle);

        if let Some(hook) = &config.on_before_validate {
            hook(&binding.widget, form);
        }
        if let Some(observer) = &binding.observer {
            observer.before_validate(&binding.widget);
        }

        self.set_status(&binding.widget, ValidationStatus::Validating);

        let mut result = ValidationResult::valid(config.valid_message.clone());
        for check in binding.chain.iter() {
            result = check.run(extract(&binding)).await;
            if result.is_invalid() {
                trace!("Field {} failed check '{}'", self.selector(), check.name());
                break;
            }
        }

        self.set_status(&binding.widget, ValidationStatus::Idle);

        if result.is_invalid() && !result.has_message() {
            result = result.with_message(config.default_invalid_message.clone());
        }

        self.state().result = Some(result.clone());

        let status = if result.is_valid() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        };
        self.set_status(&binding.widget, status);

        debug!(
            "Field {} validated: valid={} message={:?}",
            self.selector(),
            result.is_valid(),
            result.message()
        );

        if let Some(hook) = &config.on_after_validate {
            hook(&result, &binding.widget, form);
        }
        if let Some(observer) = &binding.observer {
            observer.after_validate(&result, &binding.widget).await;
        }

        result
    }

    // -------------------------------------------------------------------------
    // Form attachment
    // -------------------------------------------------------------------------

    /// Build the binding this field gets inside `form`: the widget re-resolved
    /// in the form's scope and the options overlaid with the form's.
    pub(crate) fn prepare_attach(
        &self,
        form: &FormWidgetRef,
        overrides: &FieldOptions,
    ) -> Result<Binding, ConfigError> {
        if self.binding().form.is_some() {
            return Err(ConfigError::AlreadyAttached {
                selector: self.inner.selector.clone(),
            });
        }

        let widget = form
            .find_field(&self.inner.selector)
            .ok_or_else(|| ConfigError::FieldNotInForm {
                selector: self.inner.selector.clone(),
                form: form.id(),
            })?;
        let config = FieldConfig::from_options(&self.inner.options.overlay(overrides));
        let chain = resolve_chain(&self.inner.validators, widget.kind(), &config)?;

        Ok(Binding {
            widget,
            form: Some(Arc::clone(form)),
            config: Arc::new(config),
            chain,
            observer: None,
        })
    }

    /// Swap in a prepared binding.
    pub(crate) fn install(&self, binding: Binding) {
        let mut guard = self
            .inner
            .binding
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = binding;
    }

    /// Check if two handles refer to the same field.
    pub(crate) fn same_as(&self, other: &Field) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn binding(&self) -> Binding {
        self.inner
            .binding
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn state(&self) -> MutexGuard<'_, FieldState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, widget: &FieldWidgetRef, status: ValidationStatus) {
        self.state().status = status;
        widget.set_status(status);
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("selector", &self.inner.selector)
            .field("validators", &self.inner.validators)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// Read the widget value, applying the trim policy to free text.
fn extract(binding: &Binding) -> Value {
    let value = binding.widget.value();
    if !binding.config.trim_enabled || !binding.widget.kind().allows_trim() {
        return value;
    }

    match value {
        Value::Text(text) => Value::Text(text.trim().to_string()),
        other => other,
    }
}
