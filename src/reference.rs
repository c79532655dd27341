use serde::{Deserialize, Serialize};

use crate::definition::StorageKind;
use crate::error::ReferenceError;

/// Compact, serializable token identifying stored file bytes.
///
/// Produced by a successful save and consumed read-only by every later
/// load or purge. A reference is self-resolving: `kind` alone decides
/// which backend handles it, and `locator` carries everything that
/// backend needs to find the bytes again. Unknown JSON fields are
/// tolerated on decode so references survive additive format changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVariableReference {
    /// Backend kind that produced this reference.
    ///
    /// Dispatch keys on this field alone; the locator shape is never
    /// inspected to guess the backend.
    pub kind: StorageKind,
    /// Backend-specific location: encoded payload for inline storage, an
    /// absolute path for folder-backed storage, an object identifier for
    /// repository storage.
    pub locator: String,
    /// Logical file name, duplicated here so a reference alone describes
    /// the file without loading it.
    pub name: String,
    /// Name the file had at its source, recorded when it differed from
    /// the logical name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    /// MIME type recorded at save time.
    pub mime_type: String,
}

impl FileVariableReference {
    /// Creates a reference from its parts.
    pub fn new(
        kind: StorageKind,
        locator: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            locator: locator.into(),
            name: name.into(),
            original_name: None,
            mime_type: mime_type.into(),
        }
    }

    /// Records the source-side file name, when it differed.
    pub fn with_original_name(mut self, original_name: impl Into<String>) -> Self {
        self.original_name = Some(original_name.into());
        self
    }

    /// Serializes the reference to its JSON text form.
    pub fn to_json(&self) -> Result<String, ReferenceError> {
        serde_json::to_string(self)
            .map_err(|err| ReferenceError::new(format!("cannot encode file reference: {err}")))
    }

    /// Deserializes a reference from its JSON text form.
    pub fn from_json(text: &str) -> Result<Self, ReferenceError> {
        serde_json::from_str(text)
            .map_err(|err| ReferenceError::new(format!("cannot decode file reference: {err}")))
    }
}
