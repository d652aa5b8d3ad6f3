//! Per-field wiring installed by a form, and the aggregation guard.

use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::FormInner;
use crate::binding::FieldWidgetRef;
use crate::field::FieldObserver;
use crate::result::ValidationResult;

/// Connects one field to its owning form.
///
/// Field-level hooks are always forwarded. The form status is only refreshed
/// when the field validates on its own; during a full-form pass the guard is
/// set and the form refreshes once at the end.
pub(super) struct FormLink {
    pub(super) form: Weak<FormInner>,
    pub(super) validating_all: Arc<AtomicBool>,
}

impl FormLink {
    fn in_full_pass(&self) -> bool {
        self.validating_all.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FieldObserver for FormLink {
    fn before_validate(&self, widget: &FieldWidgetRef) {
        let Some(form) = self.form.upgrade() else {
            return;
        };

        if let Some(hook) = &form.options.on_before_field_validate {
            hook(widget, Some(&form.widget));
        }

        if self.in_full_pass() {
            return;
        }

        form.begin_validation();
    }

    async fn after_validate(&self, result: &ValidationResult, widget: &FieldWidgetRef) {
        let Some(form) = self.form.upgrade() else {
            return;
        };

        if let Some(hook) = &form.options.on_after_field_validate {
            hook(result, widget, Some(&form.widget));
        }

        if self.in_full_pass() {
            return;
        }

        form.finish_validation().await;
    }
}

/// Marks a full-form validation pass; clears the flag when dropped.
pub(super) struct AggregationPass<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AggregationPass<'a> {
    pub(super) fn begin(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for AggregationPass<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
