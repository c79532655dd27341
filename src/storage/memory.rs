use std::{collections::HashMap, sync::Arc};

use bytes::Bytes;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{variable_from_reference, StorageBackend};
use crate::definition::StorageDefinition;
use crate::error::StorageError;
use crate::reference::FileVariableReference;
use crate::variable::{FileContent, FileVariable};

/// In-memory storage backend that keys payloads by random UUID locators.
///
/// Not registered by default. It implements the full save/load/purge
/// contract without touching disk or network, which makes it the
/// natural stand-in to register under the repository or engine-native
/// kinds when no real client is wired up, and the reference double for
/// exercising registry dispatch in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns stored bytes for a previously issued locator.
    pub async fn get(&self, locator: &str) -> Option<Bytes> {
        self.files.read().await.get(locator).cloned()
    }

    /// Returns how many payloads are currently held.
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    /// Returns `true` when the store holds no payloads.
    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryStorage {
    async fn save(
        &self,
        variable: FileVariable,
        definition: &StorageDefinition,
    ) -> Result<FileVariableReference, StorageError> {
        let name = variable.name().to_owned();
        let original_name = variable.original_name().map(ToOwned::to_owned);
        let mime_type = variable.mime_type().to_string();
        let body = variable
            .into_content()
            .into_bytes()
            .await
            .map_err(|err| StorageError::new(format!("cannot drain content stream: {err}")))?;

        let locator = Uuid::new_v4().to_string();
        self.files.write().await.insert(locator.clone(), body);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name = name.as_str(),
            locator = locator.as_str(),
            "memory storage: stored payload"
        );

        let mut reference = FileVariableReference::new(
            definition.kind(),
            locator,
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
        let body = self
            .get(&reference.locator)
            .await
            .ok_or_else(|| {
                StorageError::new(format!("no stored object for locator `{}`", reference.locator))
            })?;
        variable_from_reference(reference, FileContent::Bytes(body))
    }

    async fn purge(&self, reference: &FileVariableReference) -> Result<bool, StorageError> {
        Ok(self
            .files
            .write()
            .await
            .remove(&reference.locator)
            .is_some())
    }
}
