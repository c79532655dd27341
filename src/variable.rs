use std::{fmt, io, pin::Pin};

use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::definition::StorageDefinition;
use crate::error::DefinitionError;

/// Boxed single-use byte stream carried by a file variable.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Raw content of a file variable.
///
/// Exactly one representation exists at a time; a stream is consumed at
/// most once, by whichever save or write drains it.
pub enum FileContent {
    /// Fully materialized payload.
    Bytes(Bytes),
    /// Single-use readable byte stream.
    Stream(ByteStream),
}

impl FileContent {
    /// Materializes the content, draining a stream variant.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Stream(mut stream) => {
                let mut body = Vec::new();
                while let Some(chunk) = stream.next().await {
                    body.extend_from_slice(&chunk?);
                }
                Ok(Bytes::from(body))
            }
        }
    }

    /// Converts the content into a byte stream without materializing it.
    pub fn into_stream(self) -> ByteStream {
        match self {
            Self::Bytes(bytes) => Box::pin(futures::stream::iter([Ok::<Bytes, io::Error>(bytes)])),
            Self::Stream(stream) => stream,
        }
    }

    /// Returns the payload size when it is already materialized.
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            Self::Bytes(bytes) => Some(bytes.len()),
            Self::Stream(_) => None,
        }
    }
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(<stream>)"),
        }
    }
}

/// Returns the MIME type derived from a file name's extension.
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn mime_from_name(name: &str) -> mime::Mime {
    mime_guess::from_path(name).first_or_octet_stream()
}

/// In-memory file value moved between a source and a storage backend.
///
/// Created when an operation ingests a source file or resolves a reference
/// back to bytes; discarded when the operation completes.
#[derive(Debug)]
pub struct FileVariable {
    name: String,
    original_name: Option<String>,
    mime: mime::Mime,
    content: FileContent,
    definition: Option<StorageDefinition>,
}

impl FileVariable {
    /// Creates a file variable over materialized bytes.
    ///
    /// The MIME type is derived from the name's extension; override it
    /// with [`FileVariable::with_mime_type`].
    pub fn from_bytes(
        name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<Self, DefinitionError> {
        Self::new(name, FileContent::Bytes(content.into()))
    }

    /// Creates a file variable over a single-use byte stream.
    pub fn from_stream(
        name: impl Into<String>,
        stream: ByteStream,
    ) -> Result<Self, DefinitionError> {
        Self::new(name, FileContent::Stream(stream))
    }

    fn new(name: impl Into<String>, content: FileContent) -> Result<Self, DefinitionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DefinitionError::EmptyFileName);
        }
        let mime = mime_from_name(&name);
        Ok(Self {
            name,
            original_name: None,
            mime,
            content,
            definition: None,
        })
    }

    /// Sets an explicit MIME type, replacing the derived one.
    pub fn with_mime_type(mut self, mime: mime::Mime) -> Self {
        self.mime = mime;
        self
    }

    /// Records the name the file had at its source, when different.
    pub fn with_original_name(mut self, original_name: impl Into<String>) -> Self {
        self.original_name = Some(original_name.into());
        self
    }

    /// Sets the storage definition used when this variable is saved.
    pub fn with_definition(mut self, definition: StorageDefinition) -> Self {
        self.definition = Some(definition);
        self
    }

    /// Returns the logical file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name the file had at its source, when different.
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Returns the MIME type of the content.
    pub fn mime_type(&self) -> &mime::Mime {
        &self.mime
    }

    /// Returns the storage definition attached to this variable.
    pub fn storage_definition(&self) -> Option<&StorageDefinition> {
        self.definition.as_ref()
    }

    /// Borrows the content without consuming it.
    pub fn content(&self) -> &FileContent {
        &self.content
    }

    /// Consumes the variable and returns its content.
    pub fn into_content(self) -> FileContent {
        self.content
    }
}
