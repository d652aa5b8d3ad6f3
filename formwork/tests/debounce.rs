//! Tests for the typing debounce and committed changes.
//!
//! All async tests run on a paused clock, so sleeps advance virtual time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use formwork::prelude::*;

const DELAY: Duration = Duration::from_millis(1000);

/// Records hook invocations as `"<hook>:<value>"`.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.entries()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }
}

fn recording_options(recorder: &Recorder) -> FieldOptions {
    let start = recorder.clone();
    let end = recorder.clone();
    let change = recorder.clone();
    let validated = recorder.clone();

    FieldOptions::new()
        .on_typing_start(move |value, _, _| start.push(format!("start:{}", value.to_text())))
        .on_typing_end(move |value, _, _| end.push(format!("end:{}", value.to_text())))
        .on_change(move |value, _, _| change.push(format!("change:{}", value.to_text())))
        .on_after_validate(move |result, _, _| {
            validated.push(format!("validate:{}", result.is_valid()))
        })
}

fn setup(options: FieldOptions) -> (MemoryWidget, Field) {
    let widget = MemoryWidget::text(".a");
    let document = MemoryDocument::new().with_widget(widget.clone());
    let field = Field::new(&document, ".a", ["required"], options).unwrap();
    (widget, field)
}

// =============================================================================
// Keystroke bursts
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_burst_produces_one_cycle() {
    let recorder = Recorder::default();
    let (widget, field) = setup(recording_options(&recorder).validate_on_type(true));

    for ch in ["a", "b", "c", "d"] {
        widget.type_text(ch);
        field.on_keystroke();
        tokio::time::sleep(DELAY / 2).await;
    }

    assert!(field.is_typing());
    assert_eq!(recorder.count("start:"), 1);
    assert_eq!(recorder.count("end:"), 0);

    tokio::time::sleep(DELAY).await;

    assert!(!field.is_typing());
    assert_eq!(
        recorder.entries(),
        vec!["start:a", "end:abcd", "validate:true"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_spaced_keystrokes_produce_one_cycle_each() {
    let recorder = Recorder::default();
    let (widget, field) = setup(recording_options(&recorder).validate_on_type(true));

    for ch in ["a", "b", "c"] {
        widget.type_text(ch);
        field.on_keystroke();
        tokio::time::sleep(DELAY + Duration::from_millis(100)).await;
    }

    assert_eq!(recorder.count("start:"), 3);
    assert_eq!(recorder.count("end:"), 3);
    assert_eq!(recorder.count("validate:"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_custom_typing_delay() {
    let recorder = Recorder::default();
    let (widget, field) = setup(recording_options(&recorder).typing_delay(Duration::from_millis(200)));

    widget.type_text("x");
    field.on_keystroke();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(recorder.count("end:"), 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(recorder.count("end:"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_validation_without_validate_on_type() {
    let recorder = Recorder::default();
    let (widget, field) = setup(recording_options(&recorder));

    widget.type_text("x");
    field.on_keystroke();
    tokio::time::sleep(DELAY * 2).await;

    assert_eq!(recorder.count("end:"), 1);
    assert_eq!(recorder.count("validate:"), 0);
    assert!(field.result().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_typing_start_sees_raw_value_and_end_sees_trimmed() {
    let recorder = Recorder::default();
    let (widget, field) = setup(recording_options(&recorder));

    widget.type_text("  ab ");
    field.on_keystroke();
    tokio::time::sleep(DELAY * 2).await;

    assert_eq!(recorder.entries(), vec!["start:  ab ", "end:ab"]);
    assert_eq!(widget.text_value(), "ab");
}

// =============================================================================
// Committed changes
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_change_cancels_pending_timer() {
    let recorder = Recorder::default();
    let (widget, field) = setup(recording_options(&recorder));

    widget.type_text("abc");
    field.on_keystroke();
    tokio::time::sleep(DELAY / 2).await;

    field.on_change().await;
    assert!(!field.is_typing());
    assert_eq!(
        recorder.entries(),
        vec!["start:abc", "end:abc", "change:abc"]
    );

    tokio::time::sleep(DELAY * 3).await;
    assert_eq!(recorder.count("end:"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_change_without_typing_still_fires_typing_end() {
    let recorder = Recorder::default();
    let (_widget, field) = setup(recording_options(&recorder));

    field.on_change().await;

    assert_eq!(recorder.entries(), vec!["end:", "change:"]);
    assert!(field.result().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_change_validates_with_either_flag() {
    for options in [
        FieldOptions::new().validate_on_change(true),
        FieldOptions::new().validate_on_type(true),
    ] {
        let recorder = Recorder::default();
        let (_widget, field) = setup(recording_options(&recorder).overlay(&options));

        field.on_change().await;

        assert_eq!(recorder.entries(), vec!["end:", "change:", "validate:false"]);
        assert_eq!(field.status(), ValidationStatus::Invalid);
    }
}

#[tokio::test(start_paused = true)]
async fn test_change_trims_free_text() {
    let (widget, field) = setup(FieldOptions::new());

    widget.set_value("  padded  ");
    field.on_change().await;

    assert_eq!(widget.text_value(), "padded");
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_routes_events() {
    let recorder = Recorder::default();
    let (widget, field) = setup(recording_options(&recorder));

    widget.type_text("a");
    field.dispatch(FieldEvent::Keystroke).await;
    assert!(field.is_typing());

    field.dispatch(FieldEvent::Change).await;
    assert!(!field.is_typing());
    assert_eq!(recorder.entries(), vec!["start:a", "end:a", "change:a"]);
}

// =============================================================================
// Runtime
// =============================================================================

#[test]
fn test_keystroke_outside_runtime_is_ignored() {
    let recorder = Recorder::default();
    let (_widget, field) = setup(recording_options(&recorder));

    field.on_keystroke();

    assert!(!field.is_typing());
    assert!(recorder.entries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_field_does_not_fire() {
    let recorder = Recorder::default();
    let (widget, field) = setup(recording_options(&recorder));

    widget.type_text("a");
    field.on_keystroke();
    drop(field);

    tokio::time::sleep(DELAY * 2).await;
    assert_eq!(recorder.entries(), vec!["start:a"]);
}
