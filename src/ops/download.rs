use std::path::{Path, PathBuf};

use super::{resolve_folder, BatchResult, ReferenceInput};
use crate::error::StowageError;
use crate::registry::StorageRegistry;
use crate::storage::write_content;

/// Options for a download: materialize a reference into a local file.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    reference: ReferenceInput,
    destination_folder: PathBuf,
    file_name: Option<String>,
}

impl DownloadOptions {
    /// Creates download options from a reference and a destination folder.
    pub fn new(
        reference: impl Into<ReferenceInput>,
        destination_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            reference: reference.into(),
            destination_folder: destination_folder.into(),
            file_name: None,
        }
    }

    /// Overrides the output file name.
    ///
    /// Without an override the loaded file's original name is used, then
    /// its logical name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

pub(crate) async fn run(
    registry: &StorageRegistry,
    options: DownloadOptions,
) -> Result<BatchResult, StowageError> {
    let reference = options.reference.resolve()?;
    let variable = registry.load(&reference).await?;
    let destination = resolve_folder(&options.destination_folder).await?;

    let chosen = options
        .file_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or(variable.original_name())
        .unwrap_or(variable.name());
    // Only the base name is honored, so a reference minted elsewhere
    // cannot steer the write outside the destination folder.
    let base = Path::new(chosen)
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "file".into());
    let target = destination.join(&base);

    let mime_type = variable.mime_type().to_string();
    write_content(&target, variable.into_content())
        .await
        .map_err(|err| StowageError::Write {
            path: target.clone(),
            source: err,
        })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        path = %target.display(),
        kind = reference.kind.as_token(),
        "download: wrote file from reference"
    );

    Ok(BatchResult {
        processed: 1,
        last_name: Some(base.to_string_lossy().into_owned()),
        last_mime_type: Some(mime_type),
        last_reference: Some(reference.clone()),
        references: vec![reference],
        destinations: vec![target],
        purged: None,
    })
}
