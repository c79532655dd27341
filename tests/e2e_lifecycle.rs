#![allow(missing_docs)]

use std::path::PathBuf;

use stowage::{
    CopyOptions, DeleteOptions, DownloadOptions, FileVariableReference, MemoryStorage,
    SourcePolicy, StorageDefinition, StorageKind, StorageRegistry, Stowage, TempFolderStorage,
    UploadOptions,
};
use uuid::Uuid;

const INVOICE: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj";

#[tokio::test]
async fn reference_survives_serialization_between_processes() {
    let source = temp_folder().await;
    let temp_root = temp_folder().await;
    let output = temp_folder().await;
    tokio::fs::write(source.join("invoice.pdf"), INVOICE)
        .await
        .expect("seed file should be written");
    tokio::fs::write(source.join("notes.txt"), b"unrelated")
        .await
        .expect("seed file should be written");

    let producer = Stowage::with_registry(
        StorageRegistry::builder()
            .with_backend(
                StorageKind::TempFolder,
                TempFolderStorage::with_root(&temp_root),
            )
            .build(),
    );

    let result = producer
        .upload(
            UploadOptions::new(&source, StorageDefinition::temp_folder())
                .with_filter("*.pdf")
                .with_policy(SourcePolicy::from_token("UNCHANGE")),
        )
        .await
        .expect("upload should succeed");

    assert_eq!(result.processed, 1);
    assert_eq!(result.last_name.as_deref(), Some("invoice.pdf"));
    assert_eq!(result.last_mime_type.as_deref(), Some("application/pdf"));
    assert!(source.join("invoice.pdf").exists(), "UNCHANGE keeps the source");

    let reference = result.last_reference.expect("upload should yield a reference");
    assert_eq!(reference.kind, StorageKind::TempFolder);

    // The reference travels as text, for example inside a workflow variable.
    let wire = reference.to_json().expect("reference should encode");
    drop(producer);

    // A separate consumer with the same backend wiring resolves it.
    let consumer = Stowage::with_registry(
        StorageRegistry::builder()
            .with_backend(
                StorageKind::TempFolder,
                TempFolderStorage::with_root(&temp_root),
            )
            .build(),
    );
    let revived = FileVariableReference::from_json(&wire).expect("reference should decode");
    assert_eq!(revived, reference);

    let downloaded = consumer
        .download(DownloadOptions::new(wire.as_str(), &output))
        .await
        .expect("download should succeed");
    assert_eq!(downloaded.processed, 1);

    let bytes = tokio::fs::read(output.join("invoice.pdf"))
        .await
        .expect("downloaded file should read back");
    assert_eq!(bytes, INVOICE);

    cleanup(source).await;
    cleanup(temp_root).await;
    cleanup(output).await;
}

#[tokio::test]
async fn upload_copy_download_delete_chain() {
    let source = temp_folder().await;
    let temp_root = temp_folder().await;
    let share = temp_folder().await;
    let output = temp_folder().await;
    tokio::fs::write(source.join("report.csv"), b"a,b\n1,2\n")
        .await
        .expect("seed file should be written");

    let stowage = Stowage::with_registry(
        StorageRegistry::builder()
            .with_backend(
                StorageKind::TempFolder,
                TempFolderStorage::with_root(&temp_root),
            )
            .build(),
    );

    let uploaded = stowage
        .upload(
            UploadOptions::new(&source, StorageDefinition::temp_folder())
                .with_policy(SourcePolicy::Delete),
        )
        .await
        .expect("upload should succeed");
    assert!(!source.join("report.csv").exists(), "DELETE removes the source");
    let original = uploaded.last_reference.expect("upload should yield a reference");

    let copied = stowage
        .copy(CopyOptions::new(
            &original,
            StorageDefinition::folder(share.to_string_lossy().into_owned())
                .expect("folder definition should build"),
        ))
        .await
        .expect("copy should succeed");
    let duplicate = copied.last_reference.expect("copy should yield a reference");
    assert_eq!(duplicate.kind, StorageKind::Folder);

    let downloaded = stowage
        .download(DownloadOptions::new(&duplicate, &output))
        .await
        .expect("download should succeed");
    assert_eq!(downloaded.last_name.as_deref(), Some("report.csv"));
    let bytes = tokio::fs::read(output.join("report.csv"))
        .await
        .expect("downloaded file should read back");
    assert_eq!(bytes, b"a,b\n1,2\n");

    let first = stowage
        .delete(DeleteOptions::new(&original))
        .await
        .expect("delete should succeed");
    assert_eq!(first.purged, Some(true));
    let second = stowage
        .delete(DeleteOptions::new(&duplicate))
        .await
        .expect("delete should succeed");
    assert_eq!(second.purged, Some(true));

    // Both stored copies are gone; only the downloaded file remains.
    let third = stowage
        .delete(DeleteOptions::new(&original))
        .await
        .expect("repeat delete should succeed");
    assert_eq!(third.purged, Some(false));
    assert!(output.join("report.csv").exists());

    cleanup(source).await;
    cleanup(temp_root).await;
    cleanup(share).await;
    cleanup(output).await;
}

#[tokio::test]
async fn custom_backend_serves_engine_native_end_to_end() {
    let source = temp_folder().await;
    let output = temp_folder().await;
    tokio::fs::write(source.join("payload.bin"), [0xAAu8; 512])
        .await
        .expect("seed file should be written");

    let store = MemoryStorage::new();
    let stowage = Stowage::with_registry(
        StorageRegistry::builder()
            .with_backend(StorageKind::EngineNative, store.clone())
            .build(),
    );

    let uploaded = stowage
        .upload(UploadOptions::new(&source, StorageDefinition::engine_native()))
        .await
        .expect("upload should succeed");
    let reference = uploaded.last_reference.expect("upload should yield a reference");
    assert_eq!(reference.kind, StorageKind::EngineNative);
    assert_eq!(store.len().await, 1);

    let downloaded = stowage
        .download(DownloadOptions::new(&reference, &output))
        .await
        .expect("download should succeed");
    assert_eq!(downloaded.processed, 1);
    let bytes = tokio::fs::read(output.join("payload.bin"))
        .await
        .expect("downloaded file should read back");
    assert_eq!(bytes, vec![0xAAu8; 512]);

    let deleted = stowage
        .delete(DeleteOptions::new(&reference))
        .await
        .expect("delete should succeed");
    assert_eq!(deleted.purged, Some(true));
    assert!(store.is_empty().await);

    cleanup(source).await;
    cleanup(output).await;
}

async fn temp_folder() -> PathBuf {
    let root = std::env::temp_dir().join(format!("stowage-test-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&root)
        .await
        .expect("folder should be created");
    root
}

async fn cleanup(path: PathBuf) {
    let _ = tokio::fs::remove_dir_all(path).await;
}
