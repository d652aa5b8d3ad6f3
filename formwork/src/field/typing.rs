//! Typing debounce and committed changes.
//!
//! A field is `Idle` until the first keystroke, then `Active` while a
//! debounce timer is pending. Every keystroke replaces the timer; only the
//! last keystroke of a burst lets the timer elapse. A committed change cancels
//! the pending timer without a trailing fire.

use std::sync::Arc;

use log::{error, trace};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{Binding, Field, extract};
use crate::value::Value;

/// Debounce state of a field.
#[derive(Debug, Default)]
pub(super) enum Typing {
    #[default]
    Idle,
    Active {
        generation: u64,
        timer: Option<JoinHandle<()>>,
    },
}

impl Typing {
    pub(super) fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Abort any pending timer and go idle. Returns true if already idle.
    fn cancel(&mut self) -> bool {
        match std::mem::take(self) {
            Self::Idle => true,
            Self::Active { timer, .. } => {
                if let Some(timer) = timer {
                    timer.abort();
                }
                false
            }
        }
    }
}

impl Field {
    /// Handle a keystroke.
    ///
    /// Fires `on_typing_start` on the first keystroke of a burst and
    /// (re)starts the debounce timer. Must be called from within a Tokio
    /// runtime; the timer runs as a spawned task.
    pub fn on_keystroke(&self) {
        let Ok(runtime) = Handle::try_current() else {
            error!(
                "Field {}: keystroke ignored, no Tokio runtime available for the debounce timer",
                self.selector()
            );
            return;
        };

        let binding = self.binding();

        let (was_idle, generation) = {
            let mut state = self.state();
            let was_idle = state.typing.cancel();
            state.generation += 1;
            let generation = state.generation;
            state.typing = Typing::Active {
                generation,
                timer: None,
            };
            (was_idle, generation)
        };

        if was_idle {
            trace!("Field {} typing started", self.selector());
            if let Some(hook) = &binding.config.on_typing_start {
                hook(&binding.widget.value(), &binding.widget, binding.form.as_ref());
            }
        }

        let field = Arc::downgrade(&self.inner);
        let delay = binding.config.typing_delay;
        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = field.upgrade() {
                Field { inner }.finish_typing(generation).await;
            }
        });

        let mut state = self.state();
        if let Typing::Active {
            generation: active,
            timer: slot,
        } = &mut state.typing
        {
            if *active == generation {
                *slot = Some(timer);
            }
        }
    }

    /// Handle a committed change (selection, toggle, blur with a final value).
    ///
    /// Cancels any pending debounce timer, applies the trim policy, fires
    /// `on_typing_end` then `on_change`, and validates when either
    /// validate-on-change or validate-on-type is enabled.
    pub async fn on_change(&self) {
        let binding = self.binding();

        self.state().typing.cancel();
        apply_trim(&binding);

        let value = extract(&binding);
        trace!("Field {} changed to {:?}", self.selector(), value);

        notify_typing_end(&binding, &value);
        if let Some(hook) = &binding.config.on_change {
            hook(&value, &binding.widget, binding.form.as_ref());
        }

        if binding.config.validate_on_change || binding.config.validate_on_type {
            self.validate().await;
        }
    }

    /// Debounce timer elapsed for keystroke `generation`.
    async fn finish_typing(&self, generation: u64) {
        {
            let mut state = self.state();
            let current = matches!(
                &state.typing,
                Typing::Active { generation: active, .. } if *active == generation
            );
            if !current {
                return;
            }
            state.typing = Typing::Idle;
        }

        trace!("Field {} typing settled", self.selector());

        let binding = self.binding();
        apply_trim(&binding);
        notify_typing_end(&binding, &extract(&binding));

        if binding.config.validate_on_type {
            self.validate().await;
        }
    }
}

fn notify_typing_end(binding: &Binding, value: &Value) {
    if let Some(hook) = &binding.config.on_typing_end {
        hook(value, &binding.widget, binding.form.as_ref());
    }
}

/// Write the trimmed text back to a free-text widget.
fn apply_trim(binding: &Binding) {
    if !binding.config.trim_enabled || !binding.widget.kind().allows_trim() {
        return;
    }

    if let Value::Text(text) = binding.widget.value() {
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            binding.widget.set_text(trimmed);
        }
    }
}
