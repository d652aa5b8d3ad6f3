//! Tests for the field engine: chain execution, caching, messages, statuses.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use formwork::prelude::*;
use serde_json::json;

fn document_with(widget: MemoryWidget) -> MemoryDocument {
    MemoryDocument::new().with_widget(widget)
}

/// A custom validator that counts its invocations.
fn counting(counter: &Arc<AtomicUsize>, valid: bool) -> ValidatorRef {
    let counter = Arc::clone(counter);
    ValidatorRef::custom(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        ValidationResult::from(valid)
    })
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_missing_widget_is_fatal() {
    let document = MemoryDocument::new();
    let err = Field::new(&document, ".a", ["required"], FieldOptions::new()).unwrap_err();
    assert_eq!(
        err,
        ConfigError::FieldNotFound {
            selector: ".a".to_string()
        }
    );
    assert_eq!(err.to_string(), "Field element with \".a\" selector not found");
}

#[test]
fn test_unknown_validator_is_fatal() {
    let document = document_with(MemoryWidget::text(".a"));
    let err = Field::new(&document, ".a", ["isBogus"], FieldOptions::new()).unwrap_err();
    assert_eq!(err, ConfigError::UnknownValidator("isBogus".to_string()));
}

#[test]
fn test_custom_registry_replaces_builtins() {
    let document = document_with(MemoryWidget::text(".a"));
    let registry = Arc::new(ValidatorRegistry::new().with("isEven", |value, _| {
        value.to_text().parse::<i64>().is_ok_and(|n| n % 2 == 0)
    }));

    let options = FieldOptions::new().registry(registry);
    assert!(Field::new(&document, ".a", ["isEven"], options.clone()).is_ok());
    assert!(Field::new(&document, ".a", ["isEmail"], options).is_err());
}

// =============================================================================
// Chain execution
// =============================================================================

#[tokio::test]
async fn test_empty_chain_is_always_valid() {
    let widget = MemoryWidget::text(".a");
    let document = document_with(widget.clone());
    let field = Field::new(&document, ".a", Vec::<ValidatorRef>::new(), FieldOptions::new()).unwrap();

    for text in ["", "   ", "anything"] {
        widget.set_value(text);
        assert!(field.is_valid(true).await);
        assert!(field.validate().await.is_valid());
    }
}

#[tokio::test]
async fn test_chain_short_circuits() {
    let document = document_with(MemoryWidget::text(".a"));
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let field = Field::new(
        &document,
        ".a",
        [counting(&first, false), counting(&second, true)],
        FieldOptions::new(),
    )
    .unwrap();

    assert!(!field.is_valid(true).await);
    assert!(!field.validate().await.is_valid());

    assert_eq!(first.load(Ordering::SeqCst), 2);
    assert_eq!(second.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chain_runs_in_declared_order() {
    let document = document_with(MemoryWidget::text(".a").with_text("x"));
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let step = |label: &'static str| {
        let order = Arc::clone(&order);
        ValidatorRef::custom_async(move |_| {
            let order = Arc::clone(&order);
            async move {
                tokio::task::yield_now().await;
                order.lock().unwrap().push(label);
                ValidationResult::valid("")
            }
        })
    };

    let field = Field::new(&document, ".a", [step("a"), step("b"), step("c")], FieldOptions::new()).unwrap();
    field.validate().await;

    assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_required_then_email() {
    let widget = MemoryWidget::text(".a").with_text("x@y.com");
    let document = document_with(widget.clone());
    let field = Field::new(&document, ".a", ["required", "isEmail"], FieldOptions::new()).unwrap();

    assert!(field.is_valid(true).await);

    widget.set_value("not-an-email");
    assert!(!field.is_valid(true).await);
}

#[tokio::test]
async fn test_async_custom_validator() {
    let widget = MemoryWidget::text(".login").with_text("admin");
    let document = document_with(widget.clone());
    let field = Field::new(
        &document,
        ".login",
        [ValidatorRef::custom_async(|value: Value| async move {
            tokio::task::yield_now().await;
            if value.to_text() == "admin" {
                ValidationResult::invalid("Login is taken")
            } else {
                ValidationResult::valid("Available")
            }
        })],
        FieldOptions::new(),
    )
    .unwrap();

    let result = field.validate().await;
    assert!(!result.is_valid());
    assert_eq!(result.message(), "Login is taken");

    widget.set_value("ada");
    let result = field.validate().await;
    assert!(result.is_valid());
    assert_eq!(result.message(), "Available");
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_is_valid_uses_cached_result() {
    let widget = MemoryWidget::text(".a");
    let document = document_with(widget.clone());
    let field = Field::new(&document, ".a", ["required"], FieldOptions::new()).unwrap();

    assert!(field.result().is_none());
    assert!(!field.validate().await.is_valid());

    widget.set_value("filled");
    assert!(!field.is_valid(false).await);
    assert!(field.is_valid(true).await);

    // Forced checks do not refresh the cache
    assert!(!field.is_valid(false).await);

    field.reset();
    assert!(field.result().is_none());
    assert!(field.is_valid(false).await);
}

#[tokio::test]
async fn test_is_valid_without_cache_has_no_side_effects() {
    let widget = MemoryWidget::text(".a");
    let document = document_with(widget.clone());
    let field = Field::new(&document, ".a", ["required"], FieldOptions::new()).unwrap();

    assert!(!field.is_valid(false).await);
    assert!(field.result().is_none());
    assert_eq!(field.status(), ValidationStatus::Idle);
    assert!(widget.status_log().is_empty());
}

// =============================================================================
// Messages
// =============================================================================

#[tokio::test]
async fn test_required_on_empty_uses_default_message() {
    let widget = MemoryWidget::text(".a");
    let document = document_with(widget.clone());
    let field = Field::new(&document, ".a", ["required"], FieldOptions::new()).unwrap();

    let result = field.validate().await;

    assert_eq!(result, ValidationResult::invalid("Invalid value."));
    assert_eq!(field.status(), ValidationStatus::Invalid);
    assert_eq!(widget.status(), ValidationStatus::Invalid);
}

#[tokio::test]
async fn test_message_precedence() {
    let widget = MemoryWidget::text(".a");
    let document = document_with(widget.clone());
    let field = Field::new(
        &document,
        ".a",
        ["required", "isEmail"],
        FieldOptions::new()
            .invalid_message("required", "Email is required")
            .default_invalid_message("Something is off")
            .valid_message("Looks good"),
    )
    .unwrap();

    assert_eq!(field.validate().await.message(), "Email is required");

    widget.set_value("nope");
    assert_eq!(field.validate().await.message(), "Something is off");

    widget.set_value("ada@example.com");
    let result = field.validate().await;
    assert!(result.is_valid());
    assert_eq!(result.message(), "Looks good");
}

#[tokio::test]
async fn test_custom_failure_without_message_is_backfilled() {
    let document = document_with(MemoryWidget::text(".a"));
    let field = Field::new(
        &document,
        ".a",
        [ValidatorRef::custom(|_| ValidationResult::from(false))],
        FieldOptions::new().default_invalid_message("Nope"),
    )
    .unwrap();

    assert_eq!(field.validate().await, ValidationResult::invalid("Nope"));
}

#[tokio::test]
async fn test_configured_params_and_inline_params() {
    let widget = MemoryWidget::text(".a").with_text("abc");
    let document = document_with(widget.clone());

    let configured = Field::new(
        &document,
        ".a",
        ["isLength"],
        FieldOptions::new().validator_params("isLength", [json!({ "min": 4 })]),
    )
    .unwrap();
    assert!(!configured.is_valid(true).await);

    let inline = Field::new(
        &document,
        ".a",
        [ValidatorRef::named_with("isLength", [json!({ "min": 2 })])],
        FieldOptions::new().validator_params("isLength", [json!({ "min": 4 })]),
    )
    .unwrap();
    assert!(inline.is_valid(true).await);
}

// =============================================================================
// Widget kinds
// =============================================================================

#[tokio::test]
async fn test_required_per_widget_kind() {
    let agree = MemoryWidget::checkbox(".agree");
    let sex = MemoryWidget::radio(".sex", ["1", "2"]);
    let movie = MemoryWidget::multi_select(".movie", ["a", "b"]);
    let document = MemoryDocument::new()
        .with_widget(agree.clone())
        .with_widget(sex.clone())
        .with_widget(movie.clone());

    let agree_field = Field::new(&document, ".agree", ["required"], FieldOptions::new()).unwrap();
    let sex_field = Field::new(&document, ".sex", ["required"], FieldOptions::new()).unwrap();
    let movie_field = Field::new(&document, ".movie", ["required"], FieldOptions::new()).unwrap();

    assert!(!agree_field.is_valid(true).await);
    assert!(!sex_field.is_valid(true).await);
    assert!(!movie_field.is_valid(true).await);

    agree.set_checked(true);
    sex.choose("2");
    movie.choose("b");

    assert!(agree_field.is_valid(true).await);
    assert!(sex_field.is_valid(true).await);
    assert!(movie_field.is_valid(true).await);
}

#[tokio::test]
async fn test_trim_policy() {
    let text = MemoryWidget::text(".a").with_text("   ");
    let password = MemoryWidget::password(".p").with_text("   ");
    let document = MemoryDocument::new()
        .with_widget(text.clone())
        .with_widget(password.clone());

    let trimmed = Field::new(&document, ".a", ["required"], FieldOptions::new()).unwrap();
    let untrimmed = Field::new(&document, ".a", ["required"], FieldOptions::new().trim_enabled(false)).unwrap();
    let secret = Field::new(&document, ".p", ["required"], FieldOptions::new()).unwrap();

    assert!(!trimmed.is_valid(true).await);
    assert!(untrimmed.is_valid(true).await);
    assert!(secret.is_valid(true).await);

    assert_eq!(trimmed.value(), Value::from(""));
    assert_eq!(trimmed.raw_value(), Value::from("   "));
}

// =============================================================================
// Statuses and hooks
// =============================================================================

#[tokio::test]
async fn test_status_sequence() {
    let widget = MemoryWidget::text(".a").with_text("ok");
    let document = document_with(widget.clone());
    let field = Field::new(&document, ".a", ["required"], FieldOptions::new()).unwrap();

    field.validate().await;

    assert_eq!(
        widget.status_log(),
        vec![
            ValidationStatus::Idle,
            ValidationStatus::Validating,
            ValidationStatus::Idle,
            ValidationStatus::Valid,
        ]
    );
}

#[tokio::test]
async fn test_hooks_see_result_and_no_form() {
    let document = document_with(MemoryWidget::text(".a"));
    let calls = Arc::new(std::sync::Mutex::new(Vec::new()));

    let before = Arc::clone(&calls);
    let after = Arc::clone(&calls);
    let field = Field::new(
        &document,
        ".a",
        ["required"],
        FieldOptions::new()
            .on_before_validate(move |_widget, form| {
                before.lock().unwrap().push(format!("before form={}", form.is_some()));
            })
            .on_after_validate(move |result, _widget, form| {
                after
                    .lock()
                    .unwrap()
                    .push(format!("after valid={} form={}", result.is_valid(), form.is_some()));
            }),
    )
    .unwrap();

    field.validate().await;

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["before form=false", "after valid=false form=false"]
    );
}

// =============================================================================
// Overlapping passes
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_late_slow_pass_overwrites_newer_result() {
    let input = MemoryWidget::text(".user").with_text("slow");
    let field = Field::new(
        &document_with(input.clone()),
        ".user",
        [ValidatorRef::custom_async(|value| async move {
            if value.to_text() == "slow" {
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                ValidationResult::invalid("stale")
            } else {
                ValidationResult::valid("fresh")
            }
        })],
        FieldOptions::new(),
    )
    .unwrap();

    let slow = {
        let field = field.clone();
        tokio::spawn(async move { field.validate().await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(field.status(), ValidationStatus::Validating);

    input.set_value("fast");
    assert_eq!(field.validate().await, ValidationResult::valid("fresh"));
    assert_eq!(field.status(), ValidationStatus::Valid);

    assert_eq!(slow.await.unwrap(), ValidationResult::invalid("stale"));

    // The older pass finished last, so its outcome is what sticks
    assert_eq!(field.result(), Some(ValidationResult::invalid("stale")));
    assert_eq!(field.status(), ValidationStatus::Invalid);
    assert_eq!(input.status(), ValidationStatus::Invalid);
}
