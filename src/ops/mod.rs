//! Batch file-lifecycle operations: upload, download, copy, delete.
//!
//! Every operation follows the same shape: resolve configuration,
//! enumerate or deserialize its input, persist or retrieve through the
//! registry, then summarize the outcome in a [`BatchResult`]. Failures
//! are terminal for the invocation; a batch never skips a failing file
//! and continues.

use std::path::{Path, PathBuf};

use crate::error::{ReferenceError, StowageError};
use crate::reference::FileVariableReference;

/// Copy operation.
pub mod copy;
/// Delete operation.
pub mod delete;
/// Download operation.
pub mod download;
/// Source-file filtering for uploads.
pub mod filter;
/// Post-action policy applied to uploaded source files.
pub mod policy;
/// Upload operation.
pub mod upload;

pub use copy::CopyOptions;
pub use delete::DeleteOptions;
pub use download::DownloadOptions;
pub use filter::SourceFilter;
pub use policy::SourcePolicy;
pub use upload::UploadOptions;

/// Uniform result summary produced by every lifecycle operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// Number of files this invocation processed.
    pub processed: usize,
    /// Reference of the most recently processed file.
    pub last_reference: Option<FileVariableReference>,
    /// Name of the most recently processed file.
    pub last_name: Option<String>,
    /// MIME type of the most recently processed file.
    pub last_mime_type: Option<String>,
    /// References for every processed file, in processing order.
    pub references: Vec<FileVariableReference>,
    /// Local paths written, for operations that produce files.
    pub destinations: Vec<PathBuf>,
    /// Whether a purge found and removed stored bytes; `None` unless the
    /// operation was a delete.
    pub purged: Option<bool>,
}

impl BatchResult {
    pub(crate) fn record(&mut self, reference: FileVariableReference) {
        self.processed += 1;
        self.last_name = Some(reference.name.clone());
        self.last_mime_type = Some(reference.mime_type.clone());
        self.last_reference = Some(reference.clone());
        self.references.push(reference);
    }
}

/// Reference input accepted by download, copy, and delete.
///
/// Operations take either a typed reference handed along in-process or
/// the JSON text an earlier save produced, possibly in another process.
#[derive(Debug, Clone)]
pub enum ReferenceInput {
    /// Already-deserialized reference.
    Typed(FileVariableReference),
    /// Serialized reference, decoded when the operation runs.
    Json(String),
}

impl ReferenceInput {
    pub(crate) fn resolve(&self) -> Result<FileVariableReference, ReferenceError> {
        match self {
            Self::Typed(reference) => Ok(reference.clone()),
            Self::Json(text) => FileVariableReference::from_json(text),
        }
    }
}

impl From<FileVariableReference> for ReferenceInput {
    fn from(reference: FileVariableReference) -> Self {
        Self::Typed(reference)
    }
}

impl From<&FileVariableReference> for ReferenceInput {
    fn from(reference: &FileVariableReference) -> Self {
        Self::Typed(reference.clone())
    }
}

impl From<String> for ReferenceInput {
    fn from(text: String) -> Self {
        Self::Json(text)
    }
}

impl From<&str> for ReferenceInput {
    fn from(text: &str) -> Self {
        Self::Json(text.to_owned())
    }
}

/// Resolves caller-supplied folder text to an existing directory.
///
/// Surrounding double quotes are tolerated, and a relative path
/// (including the `./` shorthand) is expanded against the current
/// working directory before the existence check.
pub(crate) async fn resolve_folder(raw: &Path) -> Result<PathBuf, StowageError> {
    let text = raw.to_string_lossy();
    let cleaned = text.trim().trim_matches('"').trim();
    if cleaned.is_empty() {
        return Err(StowageError::FolderNotFound {
            path: PathBuf::new(),
        });
    }
    let path = PathBuf::from(cleaned);

    let expanded = if path.is_relative() {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(&path),
            Err(_) => path,
        }
    } else {
        path
    };

    match tokio::fs::metadata(&expanded).await {
        Ok(meta) if meta.is_dir() => Ok(expanded),
        _ => Err(StowageError::FolderNotFound { path: expanded }),
    }
}
