use std::path::PathBuf;

use thiserror::Error;

use crate::definition::StorageKind;

/// Storage-definition validation and configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DefinitionError {
    /// The definition text was empty or blank.
    #[error("storage definition cannot be empty")]
    Empty,
    /// The definition text does not start with a recognized kind token.
    #[error("unrecognized storage kind `{token}`")]
    UnknownKind {
        /// Leading token found in the definition text.
        token: String,
    },
    /// A kind that requires a complement was declared without one.
    #[error("storage kind `{kind}` requires a non-empty folder complement")]
    MissingComplement {
        /// Kind missing its complement.
        kind: StorageKind,
    },
    /// The structured repository complement could not be decoded.
    #[error("invalid repository parameters: {message}")]
    InvalidRepositoryParameters {
        /// Decode failure detail.
        message: String,
    },
    /// No backend is registered for the requested kind.
    #[error("no storage backend registered for kind `{kind}`")]
    UnregisteredKind {
        /// Kind with no registered backend.
        kind: StorageKind,
    },
    /// A file variable reached the registry without a storage definition.
    #[error("file variable `{name}` carries no storage definition")]
    MissingDefinition {
        /// Logical name of the variable.
        name: String,
    },
    /// A file variable was built with an empty logical name.
    #[error("file variable name cannot be empty")]
    EmptyFileName,
}

/// Reference serialization and decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// Generic decode failure with message context.
    #[error("{message}")]
    Message {
        /// Decode failure message.
        message: String,
    },
}

impl ReferenceError {
    /// Creates a reference error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Storage backend failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Generic backend failure with message context.
    #[error("{message}")]
    Message {
        /// Backend failure message.
        message: String,
    },
}

impl StorageError {
    /// Creates a storage error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Runtime error type used by `stowage`.
///
/// Every failure is terminal for the operation that raised it: nothing is
/// retried internally, and a failing file aborts the batch it belongs to.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StowageError {
    /// Storage definition was missing, malformed, or unresolvable.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    /// Reference could not be deserialized.
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    /// The upload filter pattern could not be compiled.
    #[error("invalid filter pattern `{pattern}`: {source}")]
    InvalidFilter {
        /// Pattern text as supplied by the caller.
        pattern: String,
        /// Glob compilation failure.
        source: glob::PatternError,
    },
    /// Backend write failed while saving a file variable.
    #[error("save to `{kind}` storage failed: {source}")]
    Save {
        /// Kind of the backend that failed.
        kind: StorageKind,
        /// Backend failure detail.
        source: StorageError,
    },
    /// Backend could not resolve a reference locator.
    #[error("load from `{kind}` storage failed: {source}")]
    Load {
        /// Kind of the backend that failed.
        kind: StorageKind,
        /// Backend failure detail.
        source: StorageError,
    },
    /// Backend failed to remove stored bytes for a reason other than
    /// "already absent".
    #[error("purge from `{kind}` storage failed: {source}")]
    Purge {
        /// Kind of the backend that failed.
        kind: StorageKind,
        /// Backend failure detail.
        source: StorageError,
    },
    /// A source, destination, or archive folder is missing or not a
    /// directory.
    #[error("folder `{}` does not exist or is not a directory", path.display())]
    FolderNotFound {
        /// Folder that failed resolution.
        path: PathBuf,
    },
    /// Reading a local source file failed during an upload.
    #[error("cannot read `{}`: {source}", path.display())]
    SourceRead {
        /// Source file that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// Writing a downloaded file to the local destination failed.
    #[error("cannot write `{}`: {source}", path.display())]
    Write {
        /// Destination path of the failed write.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// Moving an uploaded source file to the archive folder failed.
    #[error("cannot move `{}` to `{}`: {source}", from.display(), to.display())]
    Move {
        /// Original path of the source file.
        from: PathBuf,
        /// Archive path the move targeted.
        to: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

impl StowageError {
    /// Returns the stable machine-readable tag for this failure.
    ///
    /// Callers that surface errors outward (for example as BPMN errors in a
    /// workflow engine) key on these tags rather than on display text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Definition(_) | Self::InvalidFilter { .. } => "INVALID_STORAGE_DEFINITION",
            Self::Reference(_) => "INVALID_REFERENCE",
            Self::Save { .. } => "SAVE_FAILED",
            Self::Load { .. } | Self::SourceRead { .. } => "LOAD_FAILED",
            Self::Purge { .. } => "PURGE_FAILED",
            Self::FolderNotFound { .. } => "FOLDER_NOT_FOUND",
            Self::Write { .. } => "WRITE_FAILED",
            Self::Move { .. } => "MOVE_FAILED",
        }
    }
}
