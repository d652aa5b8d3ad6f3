//! Headless widget binding.
//!
//! Plain in-memory widgets, forms and documents implementing the
//! [`binding`](crate::binding) traits. Used by the sandbox binary and the
//! tests, and usable by any embedding that keeps its own widget state.
//!
//! Handles are cheap to clone; clones share state, so a test can keep a
//! widget handle, hand the document to a field, and then drive the widget
//! and inspect the statuses the engine applied to it.

mod document;
mod form;
mod widget;

pub use document::MemoryDocument;
pub use form::MemoryForm;
pub use widget::{MemoryWidget, WidgetId};
