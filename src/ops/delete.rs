use super::{BatchResult, ReferenceInput};
use crate::error::StowageError;
use crate::registry::StorageRegistry;

/// Options for a delete: purge the stored bytes behind a reference.
#[derive(Debug, Clone)]
pub struct DeleteOptions {
    reference: ReferenceInput,
}

impl DeleteOptions {
    /// Creates delete options from a reference.
    pub fn new(reference: impl Into<ReferenceInput>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

pub(crate) async fn run(
    registry: &StorageRegistry,
    options: DeleteOptions,
) -> Result<BatchResult, StowageError> {
    let reference = options.reference.resolve()?;
    // An already-absent target purges to `false`, which is still a
    // processed delete, not an error.
    let purged = registry.purge(&reference).await?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        kind = reference.kind.as_token(),
        purged = purged,
        "delete: purged reference"
    );

    let mut result = BatchResult::default();
    result.record(reference);
    result.purged = Some(purged);
    Ok(result)
}
