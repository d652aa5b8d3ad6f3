//! In-memory field widget.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::binding::{FieldWidget, ValidationStatus};
use crate::value::{FormData, FormValue, Value, WidgetKind};

/// Unique identifier for a memory widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(usize);

impl WidgetId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__widget_{}", self.0)
    }
}

#[derive(Debug, Default)]
struct WidgetInner {
    text: String,
    checked: bool,
    /// Indices into `options`, in selection order.
    selected: Vec<usize>,
    file: Option<(String, u64)>,
    status: ValidationStatus,
    status_log: Vec<ValidationStatus>,
}

/// An in-memory widget of any [`WidgetKind`].
///
/// # Example
///
/// ```ignore
/// let city = MemoryWidget::select(".js-city", ["Oslo", "Rome", "Lima"]).with_name("city");
/// city.choose("Rome");
/// assert_eq!(city.current_value(), Value::from("Rome"));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryWidget {
    id: WidgetId,
    selector: String,
    kind: WidgetKind,
    name: Option<String>,
    options: Arc<[String]>,
    inner: Arc<RwLock<WidgetInner>>,
}

impl MemoryWidget {
    /// Create a widget of `kind` with no options.
    pub fn new(kind: WidgetKind, selector: impl Into<String>) -> Self {
        Self::with_kind_options(kind, selector, Vec::<String>::new())
    }

    fn with_kind_options<I, S>(kind: WidgetKind, selector: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: WidgetId::new(),
            selector: selector.into(),
            kind,
            name: None,
            options: options.into_iter().map(Into::into).collect(),
            inner: Arc::new(RwLock::new(WidgetInner::default())),
        }
    }

    pub fn text(selector: impl Into<String>) -> Self {
        Self::new(WidgetKind::Text, selector)
    }

    pub fn text_area(selector: impl Into<String>) -> Self {
        Self::new(WidgetKind::TextArea, selector)
    }

    pub fn password(selector: impl Into<String>) -> Self {
        Self::new(WidgetKind::Password, selector)
    }

    pub fn checkbox(selector: impl Into<String>) -> Self {
        Self::new(WidgetKind::Checkbox, selector)
    }

    pub fn file(selector: impl Into<String>) -> Self {
        Self::new(WidgetKind::File, selector)
    }

    /// Radio group with the given option values; nothing checked initially.
    pub fn radio<I, S>(selector: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind_options(WidgetKind::Radio, selector, options)
    }

    /// Single select with the given option values. Without an explicit
    /// selection the first option is current.
    pub fn select<I, S>(selector: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind_options(WidgetKind::Select, selector, options)
    }

    /// Multi select with the given option values; nothing selected initially.
    pub fn multi_select<I, S>(selector: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind_options(WidgetKind::MultiSelect, selector, options)
    }

    /// Set the name used as the form data key.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial text.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.write(|inner| inner.text = text.into());
        self
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Get the unique ID for this widget
    pub fn widget_id(&self) -> WidgetId {
        self.id
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn widget_kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Option values of a radio group or select.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Current text (free-text kinds).
    pub fn text_value(&self) -> String {
        self.read().text.clone()
    }

    pub fn is_checked(&self) -> bool {
        self.read().checked
    }

    /// Value as the engine sees it.
    pub fn current_value(&self) -> Value {
        let inner = self.read();

        match self.kind {
            WidgetKind::Text | WidgetKind::TextArea | WidgetKind::Password => {
                Value::Text(inner.text.clone())
            }
            WidgetKind::Checkbox => Value::Bool(inner.checked),
            WidgetKind::Radio => inner
                .selected
                .first()
                .map_or(Value::Null, |&i| Value::Text(self.options[i].clone())),
            WidgetKind::Select => inner
                .selected
                .first()
                .copied()
                .or_else(|| (!self.options.is_empty()).then_some(0))
                .map_or(Value::Null, |i| Value::Text(self.options[i].clone())),
            WidgetKind::MultiSelect => Value::List(
                inner
                    .selected
                    .iter()
                    .map(|&i| self.options[i].clone())
                    .collect(),
            ),
            WidgetKind::File => Value::Text(
                inner
                    .file
                    .as_ref()
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default(),
            ),
        }
    }

    /// Last status applied by the engine.
    pub fn status(&self) -> ValidationStatus {
        self.read().status
    }

    /// Every status applied by the engine, in order.
    pub fn status_log(&self) -> Vec<ValidationStatus> {
        self.read().status_log.clone()
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Replace the text of a free-text widget.
    pub fn set_value(&self, text: impl Into<String>) {
        self.write(|inner| inner.text = text.into());
    }

    /// Append text, as typing would.
    pub fn type_text(&self, text: &str) {
        self.write(|inner| inner.text.push_str(text));
    }

    pub fn set_checked(&self, checked: bool) {
        self.write(|inner| inner.checked = checked);
    }

    /// Select an option by value. Radio groups and single selects replace
    /// the selection; multi selects add to it. Returns false for an unknown
    /// option.
    pub fn choose(&self, option: &str) -> bool {
        let Some(index) = self.options.iter().position(|o| o == option) else {
            return false;
        };

        let multi = self.kind == WidgetKind::MultiSelect;
        self.write(|inner| {
            if !multi {
                inner.selected.clear();
            }
            if !inner.selected.contains(&index) {
                inner.selected.push(index);
            }
        });
        true
    }

    /// Select several options of a multi select. Unknown options are skipped.
    pub fn choose_many<'a>(&self, options: impl IntoIterator<Item = &'a str>) {
        for option in options {
            self.choose(option);
        }
    }

    pub fn deselect_all(&self) {
        self.write(|inner| inner.selected.clear());
    }

    /// Pick a file.
    pub fn set_file(&self, name: impl Into<String>, size: u64) {
        self.write(|inner| inner.file = Some((name.into(), size)));
    }

    pub fn clear_file(&self) {
        self.write(|inner| inner.file = None);
    }

    pub fn clear_status_log(&self) {
        self.write(|inner| inner.status_log.clear());
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn read(&self) -> RwLockReadGuard<'_, WidgetInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, f: impl FnOnce(&mut WidgetInner)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    /// Add this widget's entries to a form snapshot. Unnamed widgets
    /// contribute nothing.
    pub(super) fn append_to(&self, data: &mut FormData) {
        let Some(name) = &self.name else {
            return;
        };

        match (self.kind, self.current_value()) {
            (WidgetKind::Checkbox, Value::Bool(true)) => data.append_text(name, "on"),
            (WidgetKind::Checkbox, _) | (_, Value::Null) => {}
            (WidgetKind::MultiSelect, Value::List(items)) => {
                for item in items {
                    data.append_text(name, item);
                }
            }
            (WidgetKind::File, _) => {
                let file = self.read().file.clone();
                if let Some((file_name, size)) = file {
                    data.append(
                        name,
                        FormValue::File {
                            name: file_name,
                            size,
                        },
                    );
                }
            }
            (_, value) => data.append_text(name, value.to_text()),
        }
    }
}

impl FieldWidget for MemoryWidget {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn kind(&self) -> WidgetKind {
        self.kind
    }

    fn value(&self) -> Value {
        self.current_value()
    }

    fn set_text(&self, text: &str) {
        self.set_value(text);
    }

    fn set_status(&self, status: ValidationStatus) {
        self.write(|inner| {
            inner.status = status;
            inner.status_log.push(status);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_defaults_to_first_option() {
        let select = MemoryWidget::select(".city", ["Oslo", "Rome"]);
        assert_eq!(select.current_value(), Value::from("Oslo"));

        assert!(select.choose("Rome"));
        assert_eq!(select.current_value(), Value::from("Rome"));
        assert!(!select.choose("Paris"));
    }

    #[test]
    fn test_radio_without_choice_is_null() {
        let radio = MemoryWidget::radio(".sex", ["1", "2"]);
        assert_eq!(radio.current_value(), Value::Null);

        radio.choose("2");
        radio.choose("1");
        assert_eq!(radio.current_value(), Value::from("1"));
    }

    #[test]
    fn test_multi_select_accumulates() {
        let multi = MemoryWidget::multi_select(".movie", ["a", "b", "c"]);
        multi.choose_many(["c", "a", "c"]);
        assert_eq!(
            multi.current_value(),
            Value::List(vec!["c".to_string(), "a".to_string()])
        );

        multi.deselect_all();
        assert_eq!(multi.current_value(), Value::List(vec![]));
    }

    #[test]
    fn test_clones_share_state() {
        let text = MemoryWidget::text(".name");
        let handle = text.clone();
        handle.type_text("Ad");
        handle.type_text("a");
        assert_eq!(text.current_value(), Value::from("Ada"));
        assert_eq!(text.widget_id(), handle.widget_id());
    }

    #[test]
    fn test_status_log() {
        let text = MemoryWidget::text(".name");
        text.set_status(ValidationStatus::Validating);
        text.set_status(ValidationStatus::Invalid);
        assert_eq!(text.status(), ValidationStatus::Invalid);
        assert_eq!(
            text.status_log(),
            vec![ValidationStatus::Validating, ValidationStatus::Invalid]
        );

        text.clear_status_log();
        assert!(text.status_log().is_empty());
        assert_eq!(text.status(), ValidationStatus::Invalid);
    }

    #[test]
    fn test_form_entries() {
        let mut data = FormData::new();
        MemoryWidget::checkbox(".agree")
            .with_name("agree")
            .append_to(&mut data);
        assert!(data.is_empty());

        let agree = MemoryWidget::checkbox(".agree").with_name("agree");
        agree.set_checked(true);
        agree.append_to(&mut data);

        let file = MemoryWidget::file(".cv").with_name("cv");
        file.set_file("cv.pdf", 2048);
        file.append_to(&mut data);

        MemoryWidget::text(".anon").with_text("x").append_to(&mut data);

        assert_eq!(data.get_text("agree"), Some("on"));
        assert_eq!(
            data.get("cv"),
            Some(&FormValue::File {
                name: "cv.pdf".to_string(),
                size: 2048
            })
        );
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_poisoned_lock_keeps_recording() {
        let text = MemoryWidget::text(".name");
        let inner = Arc::clone(&text.inner);
        let _ = std::thread::spawn(move || {
            let _guard = inner.write().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(text.inner.is_poisoned());

        text.set_value("Ada");
        text.set_status(ValidationStatus::Valid);
        assert_eq!(text.current_value(), Value::from("Ada"));
        assert_eq!(text.status_log(), vec![ValidationStatus::Valid]);
    }
}
