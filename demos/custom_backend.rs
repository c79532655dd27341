#![allow(missing_docs)]

use std::{collections::HashMap, error::Error, sync::Arc};

use bytes::Bytes;
use stowage::{
    FileVariable, FileVariableReference, RepositoryParameters, StorageBackend, StorageDefinition,
    StorageError, StorageKind, StorageRegistry, Stowage,
};
use tokio::sync::RwLock;

/// A repository backend that keeps payloads in a shared hash map.
///
/// A real deployment would talk to a document management system here;
/// the dispatch wiring is the same either way.
#[derive(Debug, Clone, Default)]
struct HashMapRepository {
    files: Arc<RwLock<HashMap<String, Bytes>>>,
}

#[async_trait::async_trait]
impl StorageBackend for HashMapRepository {
    async fn save(
        &self,
        variable: FileVariable,
        definition: &StorageDefinition,
    ) -> Result<FileVariableReference, StorageError> {
        let name = variable.name().to_owned();
        let mime_type = variable.mime_type().to_string();
        let body = variable
            .into_content()
            .into_bytes()
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;

        let mut files = self.files.write().await;
        let locator = format!("node-{}", files.len());
        files.insert(locator.clone(), body);
        Ok(FileVariableReference::new(
            definition.kind(),
            locator,
            name,
            mime_type,
        ))
    }

    async fn load(&self, reference: &FileVariableReference) -> Result<FileVariable, StorageError> {
        let body = self
            .files
            .read()
            .await
            .get(&reference.locator)
            .cloned()
            .ok_or_else(|| {
                StorageError::new(format!("no node for locator `{}`", reference.locator))
            })?;
        FileVariable::from_bytes(&reference.name, body)
            .map_err(|err| StorageError::new(err.to_string()))
    }

    async fn purge(&self, reference: &FileVariableReference) -> Result<bool, StorageError> {
        Ok(self.files.write().await.remove(&reference.locator).is_some())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let repository = HashMapRepository::default();
    let stowage = Stowage::with_registry(
        StorageRegistry::builder()
            .with_backend(StorageKind::Repository, repository.clone())
            .build(),
    );

    let definition =
        StorageDefinition::repository(RepositoryParameters::new("mem://demo-repository"))?;
    let variable = FileVariable::from_bytes("contract.pdf", Bytes::from_static(b"%PDF-1.4"))?
        .with_definition(definition);

    let reference = stowage.registry().save(variable).await?;
    println!("stored under: {}", reference.to_json()?);

    let loaded = stowage.registry().load(&reference).await?;
    let bytes = loaded.into_content().into_bytes().await?;
    println!("loaded {} byte(s) back", bytes.len());

    println!(
        "first purge: {}",
        stowage.registry().purge(&reference).await?
    );
    println!(
        "second purge: {}",
        stowage.registry().purge(&reference).await?
    );
    Ok(())
}
