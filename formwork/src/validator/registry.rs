//! Registry of named validators.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde_json::Value as JsonValue;

use super::builtin;
use crate::value::Value;

/// A named validator: `(value, params) -> bool`.
pub type NamedValidator = Arc<dyn Fn(&Value, &[JsonValue]) -> bool + Send + Sync>;

/// Mapping from identifier to named validator.
///
/// Injected into fields through their options; looked up when a chain is
/// resolved. A missing name is a configuration error, not a runtime failure.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, NamedValidator>,
}

impl ValidatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the builtin validators.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Process-wide builtin registry, used when a field has no registry set.
    pub fn shared_builtin() -> Arc<Self> {
        static SHARED: OnceLock<Arc<ValidatorRegistry>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::builtin())))
    }

    /// Register (or replace) a validator.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Value, &[JsonValue]) -> bool + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(f));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[JsonValue]) -> bool + Send + Sync + 'static,
    {
        self.register(name, f);
        self
    }

    /// Look up a validator.
    pub fn get(&self, name: &str) -> Option<&NamedValidator> {
        self.validators.get(name)
    }

    /// Check if a validator is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
