//! In-memory document.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{MemoryForm, MemoryWidget};
use crate::binding::{Document, FieldWidgetRef, FormWidgetRef, WidgetRoot};

#[derive(Debug, Default)]
struct DocumentInner {
    widgets: Vec<MemoryWidget>,
    forms: Vec<MemoryForm>,
}

/// Top-level scope holding standalone widgets and forms.
///
/// Field lookups search standalone widgets first, then every form in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    inner: Arc<RwLock<DocumentInner>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_widget(self, widget: MemoryWidget) -> Self {
        self.add_widget(widget);
        self
    }

    pub fn with_form(self, form: MemoryForm) -> Self {
        self.add_form(form);
        self
    }

    pub fn add_widget(&self, widget: MemoryWidget) {
        self.write().widgets.push(widget);
    }

    pub fn add_form(&self, form: MemoryForm) {
        self.write().forms.push(form);
    }

    /// Widget handle by selector, standalone or inside a form.
    pub fn widget(&self, selector: &str) -> Option<MemoryWidget> {
        let guard = self.read();
        guard
            .widgets
            .iter()
            .find(|w| w.selector() == selector)
            .cloned()
            .or_else(|| guard.forms.iter().find_map(|form| form.widget(selector)))
    }

    fn read(&self) -> RwLockReadGuard<'_, DocumentInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DocumentInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Form handle by selector.
    pub fn form(&self, selector: &str) -> Option<MemoryForm> {
        self.read()
            .forms
            .iter()
            .find(|f| f.selector() == selector)
            .cloned()
    }
}

impl WidgetRoot for MemoryDocument {
    fn find_field(&self, selector: &str) -> Option<FieldWidgetRef> {
        self.widget(selector)
            .map(|widget| Arc::new(widget) as FieldWidgetRef)
    }
}

impl Document for MemoryDocument {
    fn find_form(&self, selector: &str) -> Option<FormWidgetRef> {
        self.form(selector).map(|form| Arc::new(form) as FormWidgetRef)
    }
}
