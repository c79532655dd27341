use std::{collections::HashMap, fmt, sync::Arc};

use crate::definition::StorageKind;
use crate::error::{DefinitionError, StowageError};
use crate::reference::FileVariableReference;
use crate::storage::{FolderStorage, InlineStorage, StorageBackend, TempFolderStorage};
use crate::variable::FileVariable;

/// Maps storage kinds to backend implementations and dispatches calls.
///
/// The registry is explicitly constructed and injected rather than held
/// in global state, so tests can build an isolated instance per case.
/// It holds no per-call mutable state and is safe to share across
/// concurrent operations behind an `Arc`.
///
/// Save dispatches on the definition kind; load and purge dispatch on
/// the kind recorded in the reference. Adding a backend means
/// registering another [`StorageBackend`] value, never branching here.
#[derive(Clone)]
pub struct StorageRegistry {
    backends: HashMap<StorageKind, Arc<dyn StorageBackend>>,
}

impl fmt::Debug for StorageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&'static str> = self.backends.keys().map(StorageKind::as_token).collect();
        kinds.sort_unstable();
        f.debug_struct("StorageRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl StorageRegistry {
    /// Creates a registry builder preloaded with the built-in backends.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Creates a registry holding only the built-in backends.
    pub fn with_defaults() -> Self {
        Self::builder().build()
    }

    /// Returns `true` when a backend is registered for `kind`.
    pub fn supports(&self, kind: StorageKind) -> bool {
        self.backends.contains_key(&kind)
    }

    /// Persists a file variable through the backend its definition names.
    ///
    /// The variable must carry a storage definition; a variable without
    /// one is a configuration error, not a storage failure.
    pub async fn save(
        &self,
        variable: FileVariable,
    ) -> Result<FileVariableReference, StowageError> {
        let definition = variable
            .storage_definition()
            .cloned()
            .ok_or_else(|| DefinitionError::MissingDefinition {
                name: variable.name().to_owned(),
            })?;
        let kind = definition.kind();
        let backend = self.backend_for(kind)?;
        backend
            .save(variable, &definition)
            .await
            .map_err(|source| StowageError::Save { kind, source })
    }

    /// Resolves a reference back into a file variable.
    pub async fn load(
        &self,
        reference: &FileVariableReference,
    ) -> Result<FileVariable, StowageError> {
        let kind = reference.kind;
        let backend = self.backend_for(kind)?;
        backend
            .load(reference)
            .await
            .map_err(|source| StowageError::Load { kind, source })
    }

    /// Removes the stored bytes behind a reference.
    ///
    /// Returns `false` when the target was already absent; purging twice
    /// is not an error.
    pub async fn purge(&self, reference: &FileVariableReference) -> Result<bool, StowageError> {
        let kind = reference.kind;
        let backend = self.backend_for(kind)?;
        backend
            .purge(reference)
            .await
            .map_err(|source| StowageError::Purge { kind, source })
    }

    fn backend_for(&self, kind: StorageKind) -> Result<&Arc<dyn StorageBackend>, DefinitionError> {
        self.backends
            .get(&kind)
            .ok_or(DefinitionError::UnregisteredKind { kind })
    }
}

/// Builder for [`StorageRegistry`].
#[derive(Clone)]
pub struct RegistryBuilder {
    backends: HashMap<StorageKind, Arc<dyn StorageBackend>>,
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&'static str> = self.backends.keys().map(StorageKind::as_token).collect();
        kinds.sort_unstable();
        f.debug_struct("RegistryBuilder")
            .field("kinds", &kinds)
            .finish()
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        let mut builder = Self::empty();
        builder.insert(StorageKind::Inline, InlineStorage::new());
        builder.insert(StorageKind::TempFolder, TempFolderStorage::new());
        builder.insert(StorageKind::Folder, FolderStorage::new());
        builder
    }
}

impl RegistryBuilder {
    /// Creates a builder preloaded with the built-in backends.
    ///
    /// Inline, temp-folder, and folder storage are covered out of the
    /// box; repository and engine-native kinds stay unregistered until a
    /// backend for them is supplied via [`RegistryBuilder::with_backend`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with no backends registered at all.
    pub fn empty() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Registers or replaces the backend serving `kind`.
    pub fn with_backend(mut self, kind: StorageKind, backend: impl StorageBackend) -> Self {
        self.insert(kind, backend);
        self
    }

    /// Builds the registry.
    pub fn build(self) -> StorageRegistry {
        StorageRegistry {
            backends: self.backends,
        }
    }

    fn insert(&mut self, kind: StorageKind, backend: impl StorageBackend) {
        self.backends.insert(kind, Arc::new(backend));
    }
}
