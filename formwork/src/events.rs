//! Widget events and event routing.
//!
//! An embedding UI forwards what happens on its widgets as [`FieldEvent`]s
//! (to a standalone field) or [`FormEvent`]s (to a form, usually through a
//! channel consumed by [`Form::listen`]).

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use log::{debug, error, warn};
use tokio::sync::mpsc;

use crate::error::extract_panic_message;
use crate::field::Field;
use crate::form::Form;

/// Something that happened on a field widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// A key was pressed while the widget had focus.
    Keystroke,
    /// The value was committed (selection, toggle, blur).
    Change,
}

/// Something that happened inside a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// An event on the field matching `selector`.
    Field {
        selector: String,
        event: FieldEvent,
    },
    /// The form's submit action was triggered.
    Submit,
}

impl FormEvent {
    /// Shorthand for a field keystroke.
    pub fn keystroke(selector: impl Into<String>) -> Self {
        Self::Field {
            selector: selector.into(),
            event: FieldEvent::Keystroke,
        }
    }

    /// Shorthand for a committed field change.
    pub fn change(selector: impl Into<String>) -> Self {
        Self::Field {
            selector: selector.into(),
            event: FieldEvent::Change,
        }
    }
}

impl Field {
    /// Route a widget event to this field.
    pub async fn dispatch(&self, event: FieldEvent) {
        match event {
            FieldEvent::Keystroke => self.on_keystroke(),
            FieldEvent::Change => self.on_change().await,
        }
    }
}

impl Form {
    /// Route an event to this form or one of its fields and wait for the
    /// resulting work to finish.
    pub async fn dispatch(&self, event: FormEvent) {
        match event {
            FormEvent::Field { selector, event } => match self.field(&selector) {
                Some(field) => field.dispatch(event).await,
                None => warn!(
                    "Form {}: event {:?} for unknown field {}",
                    self.selector(),
                    event,
                    selector
                ),
            },
            FormEvent::Submit => {
                self.submit().await;
            }
        }
    }

    /// Consume events until every sender is dropped.
    ///
    /// Keystrokes are handled inline. Changes and submits are spawned so a
    /// slow validator or submit handler does not hold back later events.
    /// A panic in spawned work is logged and does not stop the listener.
    pub async fn listen(&self, mut events: mpsc::Receiver<FormEvent>) {
        debug!("Form {} listening for events", self.selector());

        while let Some(event) = events.recv().await {
            match event {
                FormEvent::Field {
                    event: FieldEvent::Keystroke,
                    ..
                } => self.dispatch(event).await,
                event => {
                    let form = self.clone();
                    tokio::spawn(async move {
                        let label = format!("{:?}", event);
                        if let Err(panic) = AssertUnwindSafe(form.dispatch(event)).catch_unwind().await {
                            error!(
                                "Form {}: handling {} panicked: {}",
                                form.selector(),
                                label,
                                extract_panic_message(&panic)
                            );
                        }
                    });
                }
            }
        }

        debug!("Form {} event channel closed", self.selector());
    }
}
