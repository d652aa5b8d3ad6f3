//! Validator references, the named validator registry and their resolution
//! into executable checks.

mod builtin;
mod reference;
mod registry;
mod resolve;

pub use reference::{CheckFn, ValidatorRef};
pub use registry::{NamedValidator, ValidatorRegistry};
pub use resolve::{Check, resolve};

pub(crate) use resolve::resolve_chain;

/// Identifier of the presence check.
pub const REQUIRED: &str = "required";
