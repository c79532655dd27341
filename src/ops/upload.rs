use std::path::PathBuf;

use tokio_util::io::ReaderStream;

use super::{resolve_folder, BatchResult, SourceFilter, SourcePolicy};
use crate::definition::StorageDefinition;
use crate::error::StowageError;
use crate::registry::StorageRegistry;
use crate::variable::{ByteStream, FileVariable};

/// Options for an upload: ingest local files into a storage backend.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    source_folder: PathBuf,
    definition: StorageDefinition,
    file_name: Option<String>,
    filter: Option<String>,
    policy: SourcePolicy,
    archive_folder: Option<PathBuf>,
    max_files: Option<usize>,
}

impl UploadOptions {
    /// Creates upload options over a source folder and the storage
    /// definition new references should be saved under.
    pub fn new(source_folder: impl Into<PathBuf>, definition: StorageDefinition) -> Self {
        Self {
            source_folder: source_folder.into(),
            definition,
            file_name: None,
            filter: None,
            policy: SourcePolicy::Unchanged,
            archive_folder: None,
            max_files: None,
        }
    }

    /// Restricts the upload to exactly one file name.
    ///
    /// Takes precedence over any filter pattern.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Restricts the upload to names matching a glob pattern.
    ///
    /// The literal pattern `*.*` and a blank pattern match everything.
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Sets the post-action policy applied to each ingested source file.
    pub fn with_policy(mut self, policy: SourcePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the folder archived source files are moved into.
    pub fn with_archive_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.archive_folder = Some(folder.into());
        self
    }

    /// Caps how many matching files one invocation processes.
    ///
    /// A value of zero or below means no cap; files beyond the cap are
    /// left untouched and unreported.
    pub fn with_max_files(mut self, max_files: i64) -> Self {
        self.max_files = usize::try_from(max_files).ok().filter(|max| *max > 0);
        self
    }
}

pub(crate) async fn run(
    registry: &StorageRegistry,
    options: UploadOptions,
) -> Result<BatchResult, StowageError> {
    let source = resolve_folder(&options.source_folder).await?;
    let filter = SourceFilter::from_parameters(
        options.file_name.as_deref(),
        options.filter.as_deref(),
    )?;

    // Validate the archive target before any file is touched, so a
    // misconfigured archive cannot leave half a batch persisted.
    let archive_root = match (options.policy, &options.archive_folder) {
        (SourcePolicy::Archive, Some(folder)) => Some(resolve_folder(folder).await?),
        (SourcePolicy::Archive, None) => {
            return Err(StowageError::FolderNotFound {
                path: PathBuf::new(),
            })
        }
        _ => None,
    };

    let mut dir = tokio::fs::read_dir(&source)
        .await
        .map_err(|_| StowageError::FolderNotFound {
            path: source.clone(),
        })?;

    let mut matched: Vec<(PathBuf, String)> = Vec::new();
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|_| StowageError::FolderNotFound {
            path: source.clone(),
        })?
    {
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if filter.matches(&name) {
            matched.push((entry.path(), name));
        }
    }

    if let Some(max) = options.max_files {
        matched.truncate(max);
    }

    if matched.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::info!(
            folder = %source.display(),
            "upload: no file in the source folder matched"
        );
        return Ok(BatchResult::default());
    }

    let mut result = BatchResult::default();
    for (path, name) in matched {
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|err| StowageError::SourceRead {
                path: path.clone(),
                source: err,
            })?;
        let stream: ByteStream = Box::pin(ReaderStream::new(file));
        let variable =
            FileVariable::from_stream(name, stream)?.with_definition(options.definition.clone());

        let reference = registry.save(variable).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            path = %path.display(),
            kind = reference.kind.as_token(),
            "upload: persisted source file"
        );

        result.record(reference);
        options
            .policy
            .apply(&path, archive_root.as_deref())
            .await?;
    }

    Ok(result)
}
