use async_trait::async_trait;

use crate::binding::FieldWidgetRef;
use crate::result::ValidationResult;

/// Hook installed by an owning form into each of its fields.
///
/// Runs after the field's own before/after-validate callbacks.
#[async_trait]
pub(crate) trait FieldObserver: Send + Sync {
    fn before_validate(&self, widget: &FieldWidgetRef);

    async fn after_validate(&self, result: &ValidationResult, widget: &FieldWidgetRef);
}
