use std::path::PathBuf;

use super::{
    open_as_stream, persist_under_root, remove_at_path, variable_from_reference, StorageBackend,
};
use crate::definition::StorageDefinition;
use crate::error::StorageError;
use crate::reference::FileVariableReference;
use crate::variable::{FileContent, FileVariable};

/// Storage backend writing files under a folder named by the definition.
///
/// The target directory comes from the definition complement on every
/// `save`, so one backend instance serves any number of folders.
/// Locators are absolute file paths and resolve on any process that can
/// see the same filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderStorage;

impl FolderStorage {
    /// Creates a shared-folder storage backend.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl StorageBackend for FolderStorage {
    async fn save(
        &self,
        variable: FileVariable,
        definition: &StorageDefinition,
    ) -> Result<FileVariableReference, StorageError> {
        let root = definition
            .complement()
            .map(PathBuf::from)
            .ok_or_else(|| StorageError::new("folder storage definition names no folder"))?;

        let name = variable.name().to_owned();
        let original_name = variable.original_name().map(ToOwned::to_owned);
        let mime_type = variable.mime_type().to_string();
        let path = persist_under_root(&root, &name, variable.into_content()).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name = name.as_str(),
            path = %path.display(),
            "folder storage: persisted file"
        );

        let mut reference = FileVariableReference::new(
            definition.kind(),
            path.to_string_lossy(),
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
        let stream = open_as_stream(&reference.locator).await?;
        variable_from_reference(reference, FileContent::Stream(stream))
    }

    async fn purge(&self, reference: &FileVariableReference) -> Result<bool, StorageError> {
        remove_at_path(&reference.locator).await
    }
}
