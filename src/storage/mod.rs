//! Storage backend abstractions and built-in implementations.

use std::{
    io,
    path::{Path, PathBuf},
};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::definition::StorageDefinition;
use crate::error::StorageError;
use crate::reference::FileVariableReference;
use crate::variable::{ByteStream, FileContent, FileVariable};

/// Shared-folder storage backend implementation.
pub mod folder;
/// Inline storage backend implementation.
pub mod inline;
/// In-memory storage backend implementation.
pub mod memory;
/// Temporary-folder storage backend implementation.
pub mod temp;

pub use folder::FolderStorage;
pub use inline::InlineStorage;
pub use memory::MemoryStorage;
pub use temp::TempFolderStorage;

/// Async trait abstraction for file storage backends.
///
/// Each backend owns the full round trip for one storage kind: `save`
/// persists content and mints the reference that later resolves it,
/// `load` materializes a reference back into a file variable, and
/// `purge` removes the stored payload. Registering an implementation
/// under a [`StorageKind`](crate::definition::StorageKind) is the only
/// extension point; dispatch never branches on the kind itself.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Persists a file variable and returns the reference resolving it.
    ///
    /// The `definition` is the one carried by `variable`, handed over
    /// separately so the backend can read its complement without
    /// re-borrowing the consumed variable.
    async fn save(
        &self,
        variable: FileVariable,
        definition: &StorageDefinition,
    ) -> Result<FileVariableReference, StorageError>;

    /// Resolves a previously issued reference back into a file variable.
    async fn load(
        &self,
        reference: &FileVariableReference,
    ) -> Result<FileVariable, StorageError>;

    /// Removes the stored payload behind a reference.
    ///
    /// Returns `false` when the payload was already gone; only genuine
    /// removal failures are errors.
    async fn purge(&self, reference: &FileVariableReference) -> Result<bool, StorageError>;
}

/// Writes file content under `root`, deriving a collision-free name.
///
/// Returns the final absolute path, suitable as a locator.
pub(crate) async fn persist_under_root(
    root: &Path,
    file_name: &str,
    content: FileContent,
) -> Result<PathBuf, StorageError> {
    tokio::fs::create_dir_all(root).await.map_err(|err| {
        StorageError::new(format!("cannot create storage folder `{}`: {err}", root.display()))
    })?;

    let mut output_path = root.join(sanitize_filename(file_name));
    if tokio::fs::try_exists(&output_path).await.map_err(|err| {
        StorageError::new(format!("cannot probe `{}`: {err}", output_path.display()))
    })? {
        output_path = with_collision_suffix(&output_path);
    }

    write_content(&output_path, content).await.map_err(|err| {
        StorageError::new(format!("cannot write `{}`: {err}", output_path.display()))
    })?;

    let absolute = tokio::fs::canonicalize(&output_path)
        .await
        .unwrap_or(output_path);
    Ok(absolute)
}

/// Streams file content into `path`, creating or truncating the file.
pub(crate) async fn write_content(path: &Path, content: FileContent) -> io::Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = content.into_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        file.write_all(&bytes).await?;
        written = written.saturating_add(bytes.len() as u64);
    }

    file.flush().await?;
    Ok(written)
}

/// Opens the file a path-style locator points at as a byte stream.
pub(crate) async fn open_as_stream(locator: &str) -> Result<ByteStream, StorageError> {
    let file = tokio::fs::File::open(locator)
        .await
        .map_err(|err| StorageError::new(format!("cannot open `{locator}`: {err}")))?;
    Ok(Box::pin(ReaderStream::new(file)))
}

/// Removes the file a path-style locator points at.
///
/// A locator whose target is already absent reports `false` rather
/// than an error, so purges stay idempotent.
pub(crate) async fn remove_at_path(locator: &str) -> Result<bool, StorageError> {
    match tokio::fs::remove_file(locator).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(StorageError::new(format!(
            "cannot remove `{locator}`: {err}"
        ))),
    }
}

/// Rebuilds a file variable from a resolved reference and its content.
pub(crate) fn variable_from_reference(
    reference: &FileVariableReference,
    content: FileContent,
) -> Result<FileVariable, StorageError> {
    let mime = reference
        .mime_type
        .parse::<mime::Mime>()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);

    let variable = match content {
        FileContent::Bytes(bytes) => FileVariable::from_bytes(reference.name.clone(), bytes),
        FileContent::Stream(stream) => FileVariable::from_stream(reference.name.clone(), stream),
    }
    .map_err(|err| StorageError::new(err.to_string()))?
    .with_mime_type(mime);

    Ok(match &reference.original_name {
        Some(original) => variable.with_original_name(original.clone()),
        None => variable,
    })
}

/// Splices a random tag into the file name, ahead of the extension.
fn with_collision_suffix(path: &Path) -> PathBuf {
    let tag = Uuid::new_v4().simple();
    let name = path
        .file_name()
        .and_then(|part| part.to_str())
        .unwrap_or("file");

    let renamed = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{stem}-{tag}.{ext}")
        }
        _ => format!("{name}-{tag}"),
    };
    path.with_file_name(renamed)
}

/// Reduces a client-supplied name to a safe on-disk basename.
///
/// Directory components are dropped so names cannot escape the storage
/// root, and anything outside `[A-Za-z0-9._-]` becomes `_`. A name that
/// sanitizes away entirely falls back to `file`.
pub fn sanitize_filename(input: &str) -> String {
    let base = Path::new(input)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let mut safe = String::with_capacity(base.len());
    for ch in base.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => safe.push(ch),
            _ => safe.push('_'),
        }
    }

    let trimmed = safe.trim_matches(['.', ' ']);
    if trimmed.is_empty() {
        return "file".to_owned();
    }
    trimmed.to_owned()
}
