//! Widget values and form snapshots.

use std::borrow::Cow;

/// The kind of widget a field is bound to.
///
/// The kind decides how a value is extracted, what counts as empty for
/// `"required"`, and whether trimming applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Single-line free text.
    Text,
    /// Multi-line free text.
    TextArea,
    /// Masked single-line text.
    Password,
    /// Boolean toggle.
    Checkbox,
    /// Group of mutually exclusive options.
    Radio,
    /// Single choice list.
    Select,
    /// Multiple choice list.
    MultiSelect,
    /// File picker; the value is the picked file name.
    File,
}

impl WidgetKind {
    /// Only free-text widgets get their value trimmed.
    pub fn allows_trim(self) -> bool {
        matches!(self, Self::Text | Self::TextArea)
    }

    /// Presence check used by the `"required"` validator.
    pub fn is_empty(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Checkbox, Value::Bool(checked)) => !checked,
            (Self::MultiSelect, Value::List(items)) => items.is_empty(),
            (_, Value::Text(text)) => text.is_empty(),
            _ => false,
        }
    }
}

/// Current value of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// Nothing selected (e.g. radio group without a checked option).
    #[default]
    Null,
    /// Toggle state.
    Bool(bool),
    /// Text or a single selected option.
    Text(String),
    /// Multiple selected options.
    List(Vec<String>),
}

impl Value {
    /// Get the text if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the toggle state if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the selections if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text coercion used by string-oriented validators.
    ///
    /// `Null` becomes `""`, booleans become `"true"`/`"false"` and lists are
    /// joined with commas.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Bool(true) => Cow::Borrowed("true"),
            Self::Bool(false) => Cow::Borrowed("false"),
            Self::Text(text) => Cow::Borrowed(text),
            Self::List(items) => Cow::Owned(items.join(",")),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// A single entry of a form snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text value.
    Text(String),
    /// Picked file.
    File {
        /// File name.
        name: String,
        /// Size in bytes.
        size: u64,
    },
}

impl FormValue {
    /// Get the text if this is a text entry.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File { .. } => None,
        }
    }
}

/// Ordered key/value snapshot of a form, as handed to the submit handler.
///
/// Keys may repeat (e.g. one entry per selected option of a multi select).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn append(&mut self, name: impl Into<String>, value: FormValue) {
        self.entries.push((name.into(), value));
    }

    /// Append a text entry.
    pub fn append_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.append(name, FormValue::Text(text.into()));
    }

    /// First entry under `name`.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// First text entry under `name`.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FormValue::as_str)
    }

    /// All entries under `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<&FormValue> {
        self.entries
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value)
            .collect()
    }

    /// Iterate over all entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
