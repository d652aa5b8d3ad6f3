//! Headless demo of the form engine.
//!
//! Builds a contact form, a registration form driven through an event channel
//! and a standalone field with validate-on-type, then prints what happens.
//! Engine logs go to `formwork-sandbox.log`.
//!
//! Usage: `formwork-sandbox [settings.json]`

use std::fs::File;
use std::time::Duration;

use formwork::prelude::*;
use log::LevelFilter;
use serde_json::json;
use simplelog::{Config, WriteLogger};
use tokio::sync::mpsc;

// ============================================================================
// Document
// ============================================================================

fn build_document() -> MemoryDocument {
    let contact = MemoryForm::new(".js-contact-form")
        .with_widget(MemoryWidget::text(".js-email").with_name("email"))
        .with_widget(MemoryWidget::text(".js-secret").with_name("secret"))
        .with_widget(MemoryWidget::radio(".js-sex", ["1", "2"]).with_name("sex"))
        .with_widget(MemoryWidget::checkbox(".js-agree").with_name("agree"))
        .with_widget(MemoryWidget::select(".js-city", ["", "Oslo", "Rome"]).with_name("city"))
        .with_widget(
            MemoryWidget::multi_select(".js-movie", ["Alien", "Heat", "Ran"]).with_name("movie"),
        )
        .with_widget(MemoryWidget::file(".js-file").with_name("file"));

    let register = MemoryForm::new(".js-register-form")
        .with_widget(MemoryWidget::text(".js-login").with_name("login"))
        .with_widget(MemoryWidget::password(".js-password").with_name("password"))
        .with_widget(MemoryWidget::password(".js-confirm").with_name("confirm"))
        .with_widget(
            MemoryWidget::radio(".js-response", ["success", "error", "exception"])
                .with_name("response"),
        );

    MemoryDocument::new()
        .with_widget(MemoryWidget::text(".js-fqdn"))
        .with_form(contact)
        .with_form(register)
}

fn widget(document: &MemoryDocument, selector: &str) -> Result<MemoryWidget, ConfigError> {
    document
        .widget(selector)
        .ok_or_else(|| ConfigError::FieldNotFound {
            selector: selector.to_string(),
        })
}

fn print_fields(form: &Form) {
    for field in form.fields() {
        match field.result() {
            Some(result) if result.is_invalid() => {
                println!("  {:<14} {}", field.selector(), result.message())
            }
            Some(_) => println!("  {:<14} ok", field.selector()),
            None => println!("  {:<14} -", field.selector()),
        }
    }
}

// ============================================================================
// Contact form
// ============================================================================

async fn contact_form(document: &MemoryDocument, settings: &FieldSettings) -> Result<(), ConfigError> {
    println!("== Contact form ==");

    let fields = vec![
        Field::new(
            document,
            ".js-email",
            ["required", "isEmail"],
            FieldOptions::new()
                .invalid_message("required", "Email is required")
                .invalid_message("isEmail", "Invalid email"),
        )?,
        Field::new(
            document,
            ".js-secret",
            [ValidatorRef::named_with("equals", [json!("sun")])],
            FieldOptions::new().invalid_message("equals", "Wrong secret word"),
        )?,
        Field::new(document, ".js-sex", ["required"], FieldOptions::new())?,
        Field::new(document, ".js-agree", ["required"], FieldOptions::new())?,
        Field::new(document, ".js-city", ["required"], FieldOptions::new())?,
        Field::new(document, ".js-movie", ["required"], FieldOptions::new())?,
        Field::new(document, ".js-file", ["required"], FieldOptions::new())?,
    ];

    let form = Form::new(
        document,
        ".js-contact-form",
        fields,
        FormOptions::new()
            .fields(settings.clone().into())
            .on_after_validate(|valid, form| println!("  [{}] valid: {}", form.id(), valid))
            .submit(|data, _form| async move {
                let entries: Vec<String> = data.iter().map(|(key, _)| key.to_string()).collect();
                Ok::<_, std::io::Error>(
                    SubmissionResult::success().with_json(json!({ "received": entries })),
                )
            })
            .on_after_submit_success(|payload, _form| println!("  sent: {}", json!(payload))),
    )?;

    println!("Submitting empty form:");
    println!("  outcome: {:?}", form.submit().await);
    print_fields(&form);

    widget(document, ".js-email")?.set_value("  ada@example.com ");
    widget(document, ".js-secret")?.set_value("sun");
    widget(document, ".js-sex")?.choose("2");
    widget(document, ".js-agree")?.set_checked(true);
    widget(document, ".js-city")?.choose("Oslo");
    widget(document, ".js-movie")?.choose_many(["Heat", "Ran"]);
    widget(document, ".js-file")?.set_file("cv.pdf", 18_432);

    println!("Submitting filled form:");
    let outcome = form.submit().await;
    println!("  outcome: {:?}", outcome.result().map(SubmissionResult::is_success));
    println!("  status: {:?}", form.submit_status());

    Ok(())
}

// ============================================================================
// Register form
// ============================================================================

async fn register_form(document: &MemoryDocument, settings: &FieldSettings) -> Result<(), ConfigError> {
    println!("== Register form ==");

    let password = widget(document, ".js-password")?;

    let fields = vec![
        Field::new(
            document,
            ".js-login",
            [
                ValidatorRef::required(),
                ValidatorRef::custom_async(|value: Value| async move {
                    // Simulated availability lookup
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    if value.to_text() == "admin" {
                        ValidationResult::invalid("Login is taken")
                    } else {
                        ValidationResult::valid("")
                    }
                }),
            ],
            FieldOptions::new().invalid_message("required", "Login is required"),
        )?,
        Field::new(
            document,
            ".js-password",
            [
                ValidatorRef::required(),
                ValidatorRef::named_with("isLength", [json!({ "min": 6 })]),
            ],
            FieldOptions::new().invalid_message("isLength", "At least 6 characters"),
        )?,
        Field::new(
            document,
            ".js-confirm",
            [ValidatorRef::custom(move |value| {
                if value.to_text() == password.text_value() {
                    ValidationResult::valid("")
                } else {
                    ValidationResult::invalid("Passwords do not match")
                }
            })],
            FieldOptions::new(),
        )?,
        Field::new(document, ".js-response", ["required"], FieldOptions::new())?,
    ];

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    let form = Form::new(
        document,
        ".js-register-form",
        fields,
        FormOptions::new()
            .fields(settings.clone().into())
            .submit(|data, _form| async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                match data.get_text("response") {
                    Some("success") => {
                        Ok(SubmissionResult::success().with_json(json!({ "message": "Welcome" })))
                    }
                    Some("error") => Ok(SubmissionResult::failure()
                        .with_json(json!({ "message": "Registration closed" }))),
                    _ => Err(std::io::Error::other("backend unavailable")),
                }
            })
            .on_after_submit(move |result, _form| {
                println!("  result: {:?}", result);
                let _ = done_tx.send(());
            })
            .on_after_submit_error(|payload, _form| println!("  error payload: {}", json!(payload))),
    )?;

    let (events_tx, events_rx) = mpsc::channel(32);
    let listener = {
        let form = form.clone();
        tokio::spawn(async move { form.listen(events_rx).await })
    };

    widget(document, ".js-login")?.set_value("admin");
    println!("Validating taken login:");
    form.validate().await;
    print_fields(&form);

    widget(document, ".js-login")?.set_value("ada");
    widget(document, ".js-password")?.set_value("secret-1");
    widget(document, ".js-confirm")?.set_value("secret-1");

    let response = widget(document, ".js-response")?;
    for option in ["success", "error", "exception"] {
        println!("Submitting with response={}:", option);
        response.choose(option);
        if events_tx.send(FormEvent::change(".js-response")).await.is_err()
            || events_tx.send(FormEvent::Submit).await.is_err()
        {
            break;
        }
        done_rx.recv().await;
        println!("  status: {:?}", form.submit_status());
    }

    drop(events_tx);
    let _ = listener.await;

    Ok(())
}

// ============================================================================
// Standalone field
// ============================================================================

async fn standalone_field(document: &MemoryDocument, settings: &FieldSettings) -> Result<(), ConfigError> {
    println!("== Standalone field ==");

    let delay = Duration::from_millis(settings.typing_delay_ms.unwrap_or(300));
    let field = Field::new(
        document,
        ".js-fqdn",
        ["isFQDN"],
        FieldOptions::from(settings.clone())
            .validate_on_type(true)
            .typing_delay(delay)
            .invalid_message("isFQDN", "Not a domain name")
            .on_typing_start(|value, _widget, _form| println!("  typing started at {:?}", value))
            .on_typing_end(|value, _widget, _form| println!("  typing ended at {:?}", value)),
    )?;

    let input = widget(document, ".js-fqdn")?;
    for chunk in ["exa", "mple", ".c", "om"] {
        input.type_text(chunk);
        field.dispatch(FieldEvent::Keystroke).await;
        tokio::time::sleep(delay / 4).await;
    }

    tokio::time::sleep(delay + Duration::from_millis(50)).await;
    println!("  result: {:?}", field.result());

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match std::env::args().nth(1) {
        Some(path) => FieldSettings::from_path(path)?,
        None => FieldSettings::default(),
    };

    let document = build_document();
    contact_form(&document, &settings).await?;
    register_form(&document, &settings).await?;
    standalone_field(&document, &settings).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Ok(log_file) = File::create("formwork-sandbox.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}
