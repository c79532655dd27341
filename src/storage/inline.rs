use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::{variable_from_reference, StorageBackend};
use crate::definition::StorageDefinition;
use crate::error::StorageError;
use crate::reference::FileVariableReference;
use crate::variable::{FileContent, FileVariable};

/// Storage backend that carries the payload inside the reference itself.
///
/// The locator is the base64 encoding of the file bytes, so the
/// reference is self-contained and survives any transport that can move
/// text. Nothing is written anywhere, which also means there is never a
/// stored payload to purge.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStorage;

impl InlineStorage {
    /// Creates an inline storage backend.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl StorageBackend for InlineStorage {
    async fn save(
        &self,
        variable: FileVariable,
        definition: &StorageDefinition,
    ) -> Result<FileVariableReference, StorageError> {
        let name = variable.name().to_owned();
        let original_name = variable.original_name().map(ToOwned::to_owned);
        let mime_type = variable.mime_type().to_string();
        let bytes = variable
            .into_content()
            .into_bytes()
            .await
            .map_err(|err| StorageError::new(format!("cannot drain content stream: {err}")))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name = name.as_str(),
            size = bytes.len(),
            "inline storage: encoded payload into reference"
        );

        let mut reference = FileVariableReference::new(
            definition.kind(),
            STANDARD.encode(&bytes),
            name,
            mime_type,
        );
        reference.original_name = original_name;
        Ok(reference)
    }

    async fn load(
        &self,
        reference: &FileVariableReference,
    ) -> Result<FileVariable, StorageError> {
        let bytes = STANDARD
            .decode(reference.locator.as_bytes())
            .map_err(|err| StorageError::new(format!("corrupt inline payload: {err}")))?;
        variable_from_reference(reference, FileContent::Bytes(bytes.into()))
    }

    async fn purge(&self, _reference: &FileVariableReference) -> Result<bool, StorageError> {
        // The payload lives in the reference; there is no stored copy.
        Ok(false)
    }
}
