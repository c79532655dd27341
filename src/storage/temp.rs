use std::path::{Path, PathBuf};

use super::{
    open_as_stream, persist_under_root, remove_at_path, variable_from_reference, StorageBackend,
};
use crate::definition::StorageDefinition;
use crate::error::StorageError;
use crate::reference::FileVariableReference;
use crate::variable::{FileContent, FileVariable};

/// Storage backend writing files under the process temp directory.
///
/// Locators are absolute file paths, so a reference stays resolvable
/// for as long as the host keeps the temp file around. Lifetime is
/// whatever the operating system grants temp files; nothing here
/// schedules cleanup.
#[derive(Debug, Clone)]
pub struct TempFolderStorage {
    root: PathBuf,
}

impl TempFolderStorage {
    /// Creates a backend rooted at the default temp subdirectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend rooted at an explicit directory.
    ///
    /// Mostly useful for isolating tests; production use keeps the
    /// default root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory new files are written under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for TempFolderStorage {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir().join("stowage"),
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for TempFolderStorage {
    async fn save(
        &self,
        variable: FileVariable,
        definition: &StorageDefinition,
    ) -> Result<FileVariableReference, StorageError> {
        let name = variable.name().to_owned();
        let original_name = variable.original_name().map(ToOwned::to_owned);
        let mime_type = variable.mime_type().to_string();
        let path = persist_under_root(&self.root, &name, variable.into_content()).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name = name.as_str(),
            path = %path.display(),
            "temp folder storage: persisted file"
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
