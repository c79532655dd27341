#![allow(missing_docs)]

use std::{error::Error, path::PathBuf};

use stowage::{
    DeleteOptions, DownloadOptions, SourcePolicy, StorageDefinition, StorageKind, StorageRegistry,
    Stowage, TempFolderStorage, UploadOptions,
};
use uuid::Uuid;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let source = scratch_folder("source").await?;
    let temp_root = scratch_folder("store").await?;
    let output = scratch_folder("output").await?;

    tokio::fs::write(source.join("invoice.pdf"), b"%PDF-1.4 demo body").await?;
    tokio::fs::write(source.join("notes.txt"), b"not part of the batch").await?;

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
                .with_filter("*.pdf")
                .with_policy(SourcePolicy::Unchanged),
        )
        .await?;
    println!("uploaded {} file(s)", uploaded.processed);
    for reference in &uploaded.references {
        println!("- reference: {}", reference.to_json()?);
    }

    let reference = uploaded
        .last_reference
        .expect("upload should yield a reference");

    // The reference text is all a consumer needs to fetch the file back.
    let wire = reference.to_json()?;
    let downloaded = stowage
        .download(DownloadOptions::new(wire.as_str(), &output))
        .await?;
    println!(
        "downloaded {} file(s) into {}",
        downloaded.processed,
        output.display()
    );

    let deleted = stowage.delete(DeleteOptions::new(&reference)).await?;
    println!("stored copy removed: {:?}", deleted.purged);

    for folder in [source, temp_root, output] {
        let _ = tokio::fs::remove_dir_all(folder).await;
    }
    Ok(())
}

async fn scratch_folder(label: &str) -> std::io::Result<PathBuf> {
    let folder = std::env::temp_dir().join(format!("stowage-demo-{label}-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&folder).await?;
    Ok(folder)
}
