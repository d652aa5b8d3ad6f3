//! Validation and submission orchestration for interactive form widgets.
//!
//! A [`Field`] owns one widget's ordered validator chain, its typing debounce
//! and its presentational status. A [`Form`] owns a group of fields, keeps the
//! form-level status in sync with field-level results and runs the submit
//! pipeline.
//!
//! The engine never touches a UI directly. Widgets are reached through the
//! [`binding`] traits; the [`memory`] module ships a headless implementation.
//!
//! # Example
//!
//! ```ignore
//! use formwork::prelude::*;
//!
//! let form = Form::new(
//!     &document,
//!     ".js-register-form",
//!     [
//!         Field::new(&document, ".js-login", ["required"], FieldOptions::new())?,
//!         Field::new(&document, ".js-email", ["required", "isEmail"], FieldOptions::new())?,
//!     ],
//!     FormOptions::new().submit(|data, _form| async move {
//!         Ok::<_, std::io::Error>(SubmissionResult::success())
//!     }),
//! )?;
//!
//! match form.submit().await {
//!     SubmitOutcome::Invalid => { /* fields show their messages */ }
//!     SubmitOutcome::Completed(result) => { /* ... */ }
//! }
//! ```

pub mod binding;
pub mod callbacks;
pub mod error;
pub mod events;
pub mod field;
pub mod form;
pub mod memory;
pub mod result;
pub mod settings;
pub mod validator;
pub mod value;

pub use error::{ConfigError, SubmissionError};
pub use field::{Field, FieldConfig, FieldOptions};
pub use form::{Form, FormOptions, SubmitOutcome};
pub use result::{Payload, SubmissionResult, ValidationResult};

pub mod prelude {
    pub use crate::binding::{
        Document, FieldWidget, FieldWidgetRef, FormWidget, FormWidgetRef, SubmitStatus,
        ValidationStatus, WidgetRoot,
    };
    pub use crate::error::{ConfigError, SubmissionError};
    pub use crate::events::{FieldEvent, FormEvent};
    pub use crate::field::{Field, FieldConfig, FieldOptions};
    pub use crate::form::{Form, FormOptions, SubmitOutcome};
    pub use crate::memory::{MemoryDocument, MemoryForm, MemoryWidget};
    pub use crate::result::{Payload, SubmissionResult, ValidationResult};
    pub use crate::settings::FieldSettings;
    pub use crate::validator::{ValidatorRef, ValidatorRegistry};
    pub use crate::value::{FormData, FormValue, Value, WidgetKind};
}
