//! In-memory form widget.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::MemoryWidget;
use crate::binding::{FieldWidgetRef, FormWidget, SubmitStatus, ValidationStatus, WidgetRoot};
use crate::value::FormData;

fn next_form_id() -> usize {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Default)]
struct FormInner {
    widgets: Vec<MemoryWidget>,
    validation: ValidationStatus,
    submit: SubmitStatus,
    validation_log: Vec<ValidationStatus>,
    submit_log: Vec<SubmitStatus>,
}

/// A scoped group of [`MemoryWidget`]s.
///
/// Field lookups only see the widgets added to this form. The form data
/// snapshot is built from the named widgets in insertion order.
#[derive(Debug, Clone)]
pub struct MemoryForm {
    id: usize,
    selector: String,
    inner: Arc<RwLock<FormInner>>,
}

impl MemoryForm {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            id: next_form_id(),
            selector: selector.into(),
            inner: Arc::new(RwLock::new(FormInner::default())),
        }
    }

    /// Add a widget (builder style).
    pub fn with_widget(self, widget: MemoryWidget) -> Self {
        self.add_widget(widget);
        self
    }

    /// Add a widget.
    pub fn add_widget(&self, widget: MemoryWidget) {
        self.write().widgets.push(widget);
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Widget handle by selector.
    pub fn widget(&self, selector: &str) -> Option<MemoryWidget> {
        self.read()
            .widgets
            .iter()
            .find(|w| w.selector() == selector)
            .cloned()
    }

    pub fn validation_status(&self) -> ValidationStatus {
        self.read().validation
    }

    pub fn submit_status(&self) -> SubmitStatus {
        self.read().submit
    }

    /// Every validation status applied by the engine, in order.
    pub fn validation_log(&self) -> Vec<ValidationStatus> {
        self.read().validation_log.clone()
    }

    /// Every submit status applied by the engine, in order.
    pub fn submit_log(&self) -> Vec<SubmitStatus> {
        self.read().submit_log.clone()
    }

    pub fn clear_logs(&self) {
        let mut guard = self.write();
        guard.validation_log.clear();
        guard.submit_log.clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, FormInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FormInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WidgetRoot for MemoryForm {
    fn find_field(&self, selector: &str) -> Option<FieldWidgetRef> {
        self.widget(selector)
            .map(|widget| Arc::new(widget) as FieldWidgetRef)
    }
}

impl FormWidget for MemoryForm {
    fn id(&self) -> String {
        format!("__form_{}", self.id)
    }

    fn form_data(&self) -> FormData {
        let mut data = FormData::new();
        for widget in &self.read().widgets {
            widget.append_to(&mut data);
        }
        data
    }

    fn set_validation_status(&self, status: ValidationStatus) {
        let mut guard = self.write();
        guard.validation = status;
        guard.validation_log.push(status);
    }

    fn set_submit_status(&self, status: SubmitStatus) {
        let mut guard = self.write();
        guard.submit = status;
        guard.submit_log.push(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FormValue;

    #[test]
    fn test_lookup_is_scoped() {
        let form = MemoryForm::new(".form").with_widget(MemoryWidget::text(".name"));
        assert!(form.find_field(".name").is_some());
        assert!(form.find_field(".other").is_none());
    }

    #[test]
    fn test_form_data_from_named_widgets() {
        let name = MemoryWidget::text(".name").with_name("name").with_text("Ada");
        let movies = MemoryWidget::multi_select(".movie", ["a", "b"]).with_name("movie");
        movies.choose_many(["a", "b"]);

        let form = MemoryForm::new(".form")
            .with_widget(name)
            .with_widget(movies)
            .with_widget(MemoryWidget::text(".unnamed").with_text("x"));

        let data = form.form_data();
        assert_eq!(data.get_text("name"), Some("Ada"));
        assert_eq!(
            data.get_all("movie"),
            vec![
                &FormValue::Text("a".to_string()),
                &FormValue::Text("b".to_string())
            ]
        );
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_status_logs() {
        let form = MemoryForm::new(".form");
        form.set_submit_status(SubmitStatus::Submitting);
        form.set_submit_status(SubmitStatus::SubmitSuccess);
        form.set_validation_status(ValidationStatus::Valid);

        assert_eq!(form.submit_status(), SubmitStatus::SubmitSuccess);
        assert_eq!(form.submit_log().len(), 2);
        assert_eq!(form.validation_log(), vec![ValidationStatus::Valid]);

        form.clear_logs();
        assert!(form.submit_log().is_empty());
    }

    #[test]
    fn test_poisoned_lock_keeps_recording() {
        let form = MemoryForm::new(".form");
        let inner = Arc::clone(&form.inner);
        let _ = std::thread::spawn(move || {
            let _guard = inner.write().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(form.inner.is_poisoned());

        form.add_widget(MemoryWidget::text(".name").with_name("name").with_text("Ada"));
        form.set_validation_status(ValidationStatus::Invalid);
        form.set_submit_status(SubmitStatus::Submitting);

        assert_eq!(form.validation_log(), vec![ValidationStatus::Invalid]);
        assert_eq!(form.submit_status(), SubmitStatus::Submitting);
        assert_eq!(form.form_data().get_text("name"), Some("Ada"));
    }
}
