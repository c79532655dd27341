#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core crate surface for `stowage`.

use std::sync::Arc;

/// Storage definition model and parsing.
pub mod definition;
/// Error types exposed by this crate.
pub mod error;
/// Batch file-lifecycle operations.
pub mod ops;
/// Serializable file reference model.
pub mod reference;
/// Backend registry and dispatch.
pub mod registry;
/// Storage backend trait and implementations.
pub mod storage;
/// In-memory file value model.
pub mod variable;

pub use definition::{RepositoryParameters, StorageDefinition, StorageKind};
pub use error::{DefinitionError, ReferenceError, StorageError, StowageError};
pub use ops::{
    BatchResult, CopyOptions, DeleteOptions, DownloadOptions, ReferenceInput, SourceFilter,
    SourcePolicy, UploadOptions,
};
pub use reference::FileVariableReference;
pub use registry::{RegistryBuilder, StorageRegistry};
pub use storage::{
    FolderStorage, InlineStorage, MemoryStorage, StorageBackend, TempFolderStorage,
};
pub use variable::{ByteStream, FileContent, FileVariable};

/// Main `stowage` entry point.
///
/// Bundles a [`StorageRegistry`] with the four lifecycle operations.
/// Cloning is cheap and clones share the same registry.
#[derive(Debug, Clone)]
pub struct Stowage {
    registry: Arc<StorageRegistry>,
}

impl Stowage {
    /// Creates an entry point over the built-in backends.
    pub fn new() -> Self {
        Self::with_registry(StorageRegistry::with_defaults())
    }

    /// Creates an entry point over an explicitly configured registry.
    pub fn with_registry(registry: StorageRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Returns the registry operations dispatch through.
    pub fn registry(&self) -> &StorageRegistry {
        &self.registry
    }

    /// Ingests matching files from a local folder into storage.
    pub async fn upload(&self, options: UploadOptions) -> Result<BatchResult, StowageError> {
        ops::upload::run(&self.registry, options).await
    }

    /// Materializes a stored reference into a local file.
    pub async fn download(&self, options: DownloadOptions) -> Result<BatchResult, StowageError> {
        ops::download::run(&self.registry, options).await
    }

    /// Duplicates a stored file under another storage definition.
    pub async fn copy(&self, options: CopyOptions) -> Result<BatchResult, StowageError> {
        ops::copy::run(&self.registry, options).await
    }

    /// Purges the stored bytes behind a reference.
    pub async fn delete(&self, options: DeleteOptions) -> Result<BatchResult, StowageError> {
        ops::delete::run(&self.registry, options).await
    }
}

impl Default for Stowage {
    fn default() -> Self {
        Self::new()
    }
}
