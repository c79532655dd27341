#![allow(missing_docs)]

use bytes::Bytes;
use stowage::{
    DefinitionError, FileVariable, FileVariableReference, MemoryStorage, RegistryBuilder,
    RepositoryParameters, StorageDefinition, StorageKind, StorageRegistry, StowageError,
};

#[tokio::test]
async fn saving_without_a_definition_is_rejected() {
    let registry = StorageRegistry::with_defaults();
    let variable = FileVariable::from_bytes("orphan.txt", Bytes::from_static(b"x"))
        .expect("variable should build");

    let err = registry.save(variable).await.expect_err("save should fail");
    assert!(matches!(
        err,
        StowageError::Definition(DefinitionError::MissingDefinition { .. })
    ));
    assert_eq!(err.code(), "INVALID_STORAGE_DEFINITION");
}

#[tokio::test]
async fn saving_to_an_unregistered_kind_is_rejected() {
    let registry = StorageRegistry::with_defaults();
    let definition =
        StorageDefinition::repository(RepositoryParameters::new("https://dms.example.com"))
            .expect("repository definition should build");
    let variable = FileVariable::from_bytes("doc.txt", Bytes::from_static(b"x"))
        .expect("variable should build")
        .with_definition(definition);

    let err = registry.save(variable).await.expect_err("save should fail");
    assert!(matches!(
        err,
        StowageError::Definition(DefinitionError::UnregisteredKind {
            kind: StorageKind::Repository,
        })
    ));
    assert_eq!(err.code(), "INVALID_STORAGE_DEFINITION");
}

#[tokio::test]
async fn loading_an_unregistered_kind_is_rejected() {
    let registry = StorageRegistry::with_defaults();
    let reference = FileVariableReference::new(
        StorageKind::EngineNative,
        "engine-blob-17",
        "doc.txt",
        "text/plain",
    );

    let err = registry.load(&reference).await.expect_err("load should fail");
    assert!(matches!(
        err,
        StowageError::Definition(DefinitionError::UnregisteredKind {
            kind: StorageKind::EngineNative,
        })
    ));
}

#[tokio::test]
async fn purging_an_unregistered_kind_is_rejected() {
    let registry = StorageRegistry::with_defaults();
    let reference =
        FileVariableReference::new(StorageKind::Repository, "node/42", "doc.txt", "text/plain");

    let err = registry
        .purge(&reference)
        .await
        .expect_err("purge should fail");
    assert!(matches!(
        err,
        StowageError::Definition(DefinitionError::UnregisteredKind {
            kind: StorageKind::Repository,
        })
    ));
}

#[test]
fn default_registry_covers_the_built_in_kinds() {
    let registry = StorageRegistry::with_defaults();

    assert!(registry.supports(StorageKind::Inline));
    assert!(registry.supports(StorageKind::TempFolder));
    assert!(registry.supports(StorageKind::Folder));
    assert!(!registry.supports(StorageKind::Repository));
    assert!(!registry.supports(StorageKind::EngineNative));
}

#[tokio::test]
async fn a_registered_backend_can_replace_a_default() {
    let store = MemoryStorage::new();
    let registry = StorageRegistry::builder()
        .with_backend(StorageKind::TempFolder, store.clone())
        .build();

    let variable = FileVariable::from_bytes("diverted.txt", Bytes::from_static(b"in memory"))
        .expect("variable should build")
        .with_definition(StorageDefinition::temp_folder());
    let reference = registry.save(variable).await.expect("save should succeed");

    // The reference keeps the dispatch kind even though the backend changed.
    assert_eq!(reference.kind, StorageKind::TempFolder);
    assert_eq!(store.len().await, 1);

    let loaded = registry.load(&reference).await.expect("load should succeed");
    let bytes = loaded
        .into_content()
        .into_bytes()
        .await
        .expect("content should materialize");
    assert_eq!(bytes, Bytes::from_static(b"in memory"));
}

#[tokio::test]
async fn an_empty_registry_dispatches_nothing() {
    let registry = RegistryBuilder::empty().build();
    let variable = FileVariable::from_bytes("nowhere.txt", Bytes::from_static(b"x"))
        .expect("variable should build")
        .with_definition(StorageDefinition::inline());

    let err = registry.save(variable).await.expect_err("save should fail");
    assert!(matches!(
        err,
        StowageError::Definition(DefinitionError::UnregisteredKind {
            kind: StorageKind::Inline,
        })
    ));
}

#[test]
fn debug_output_lists_registered_kinds() {
    let registry = StorageRegistry::with_defaults();
    let rendered = format!("{registry:?}");

    assert!(rendered.contains("INLINE"));
    assert!(rendered.contains("TEMP_FOLDER"));
    assert!(rendered.contains("FOLDER"));
    assert!(!rendered.contains("REPOSITORY"));
}
