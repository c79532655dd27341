use std::io;
use std::path::{Path, PathBuf};

use crate::error::StowageError;

/// Post-processing applied to an upload's source file after its content
/// has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourcePolicy {
    /// Leave the source file where it is.
    #[default]
    Unchanged,
    /// Remove the source file.
    Delete,
    /// Move the source file into the archive folder.
    Archive,
}

impl SourcePolicy {
    /// Resolves a caller-supplied policy token.
    ///
    /// Matching is case-insensitive and accepts both `UNCHANGE` and
    /// `UNCHANGED` spellings. An unrecognized token is logged and falls
    /// back to [`SourcePolicy::Unchanged`] instead of failing the
    /// upload; callers that want strict validation should construct the
    /// variant directly.
    pub fn from_token(token: &str) -> Self {
        let trimmed = token.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "" | "UNCHANGE" | "UNCHANGED" => Self::Unchanged,
            "DELETE" => Self::Delete,
            "ARCHIVE" => Self::Archive,
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    token = trimmed,
                    "unrecognized post-action policy token, leaving source unchanged"
                );
                Self::Unchanged
            }
        }
    }

    /// Applies the policy to `source` after a successful save.
    ///
    /// `archive_folder` is the already-resolved archive directory; it is
    /// only consulted for [`SourcePolicy::Archive`]. Archiving onto an
    /// existing same-named file is a hard failure, never an overwrite.
    pub(crate) async fn apply(
        self,
        source: &Path,
        archive_folder: Option<&Path>,
    ) -> Result<(), StowageError> {
        match self {
            Self::Unchanged => Ok(()),
            Self::Delete => {
                // The payload is already persisted; a source that cannot
                // be removed is worth a warning, not a failed batch.
                if let Err(_err) = tokio::fs::remove_file(source).await {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        path = %source.display(),
                        error = %_err,
                        "could not remove uploaded source file"
                    );
                }
                Ok(())
            }
            Self::Archive => {
                let folder = archive_folder.ok_or_else(|| StowageError::FolderNotFound {
                    path: PathBuf::new(),
                })?;
                let file_name = source
                    .file_name()
                    .map(ToOwned::to_owned)
                    .unwrap_or_else(|| "file".into());
                let target = folder.join(file_name);

                // Hard-link first: link(2) refuses an existing target, so
                // the no-overwrite guarantee holds even when a same-named
                // file appears concurrently. A rename would replace it.
                match tokio::fs::hard_link(source, &target).await {
                    Ok(()) => {
                        if let Err(_err) = tokio::fs::remove_file(source).await {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(
                                path = %source.display(),
                                error = %_err,
                                "archived source file could not be removed"
                            );
                        }
                        Ok(())
                    }
                    Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                        Err(StowageError::Move {
                            from: source.to_path_buf(),
                            to: target,
                            source: err,
                        })
                    }
                    // Cross-device archives cannot hard-link; fall back to
                    // probe-then-rename.
                    Err(_) => {
                        let occupied = tokio::fs::try_exists(&target).await.unwrap_or(false);
                        if occupied {
                            return Err(StowageError::Move {
                                from: source.to_path_buf(),
                                to: target,
                                source: io::Error::new(
                                    io::ErrorKind::AlreadyExists,
                                    "archive target already exists",
                                ),
                            });
                        }
                        tokio::fs::rename(source, &target)
                            .await
                            .map_err(|err| StowageError::Move {
                                from: source.to_path_buf(),
                                to: target,
                                source: err,
                            })
                    }
                }
            }
        }
    }
}
