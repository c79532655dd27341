use super::{BatchResult, ReferenceInput};
use crate::definition::StorageDefinition;
use crate::error::StowageError;
use crate::registry::StorageRegistry;

/// Options for a copy: re-save a stored file under another definition.
///
/// The destination may be the same backend kind or a different one; the
/// source is left in place either way.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    reference: ReferenceInput,
    definition: StorageDefinition,
}

impl CopyOptions {
    /// Creates copy options from a source reference and the storage
    /// definition the duplicate should be saved under.
    pub fn new(reference: impl Into<ReferenceInput>, definition: StorageDefinition) -> Self {
        Self {
            reference: reference.into(),
            definition,
        }
    }
}

pub(crate) async fn run(
    registry: &StorageRegistry,
    options: CopyOptions,
) -> Result<BatchResult, StowageError> {
    let reference = options.reference.resolve()?;
    let variable = registry.load(&reference).await?;
    let duplicate = variable.with_definition(options.definition);
    let new_reference = registry.save(duplicate).await?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        from = reference.kind.as_token(),
        to = new_reference.kind.as_token(),
        "copy: duplicated stored file"
    );

    let mut result = BatchResult::default();
    result.record(new_reference);
    Ok(result)
}
