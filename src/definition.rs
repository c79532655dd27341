use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;

/// Storage backend variant named by definitions and references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    /// Bytes are encoded directly inside the reference itself.
    #[serde(rename = "INLINE")]
    Inline,
    /// Bytes live in the temporary folder of the local machine.
    #[serde(rename = "TEMP_FOLDER")]
    TempFolder,
    /// Bytes live in a caller-designated folder, typically shared.
    #[serde(rename = "FOLDER")]
    Folder,
    /// Bytes live in a remote content-management repository.
    #[serde(rename = "REPOSITORY")]
    Repository,
    /// Bytes are held by the embedding workflow engine itself.
    #[serde(rename = "ENGINE_NATIVE")]
    EngineNative,
}

impl StorageKind {
    /// Returns the canonical text token for this kind.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Inline => "INLINE",
            Self::TempFolder => "TEMP_FOLDER",
            Self::Folder => "FOLDER",
            Self::Repository => "REPOSITORY",
            Self::EngineNative => "ENGINE_NATIVE",
        }
    }

    /// Resolves a text token back to a kind, if recognized.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "INLINE" => Some(Self::Inline),
            "TEMP_FOLDER" => Some(Self::TempFolder),
            "FOLDER" => Some(Self::Folder),
            "REPOSITORY" => Some(Self::Repository),
            "ENGINE_NATIVE" => Some(Self::EngineNative),
            _ => None,
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Connection parameters for a remote repository backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryParameters {
    /// Repository endpoint URL.
    pub url: String,
    /// Account used to authenticate, when the repository requires one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Credential paired with `user_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Repository folder that receives saved files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_folder: Option<String>,
}

impl RepositoryParameters {
    /// Creates repository parameters for an endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_name: None,
            password: None,
            target_folder: None,
        }
    }

    /// Sets the account and credential used to authenticate.
    pub fn with_credentials(
        mut self,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.user_name = Some(user_name.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the repository folder that receives saved files.
    pub fn with_target_folder(mut self, target_folder: impl Into<String>) -> Self {
        self.target_folder = Some(target_folder.into());
        self
    }
}

impl fmt::Debug for RepositoryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryParameters")
            .field("url", &self.url)
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("target_folder", &self.target_folder)
            .finish()
    }
}

/// Parsed, immutable description of where and how a file should be stored.
///
/// Built once per operation from caller configuration; it configures
/// storage but is never persisted itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDefinition {
    kind: StorageKind,
    complement: Option<String>,
    repository: Option<RepositoryParameters>,
}

impl StorageDefinition {
    /// Creates a definition that stores bytes inside the reference.
    pub fn inline() -> Self {
        Self {
            kind: StorageKind::Inline,
            complement: None,
            repository: None,
        }
    }

    /// Creates a definition that stores bytes in the local temp folder.
    pub fn temp_folder() -> Self {
        Self {
            kind: StorageKind::TempFolder,
            complement: None,
            repository: None,
        }
    }

    /// Creates a definition that stores bytes under a designated folder.
    pub fn folder(path: impl Into<String>) -> Result<Self, DefinitionError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(DefinitionError::MissingComplement {
                kind: StorageKind::Folder,
            });
        }
        Ok(Self {
            kind: StorageKind::Folder,
            complement: Some(path),
            repository: None,
        })
    }

    /// Creates a definition that stores bytes in a remote repository.
    pub fn repository(parameters: RepositoryParameters) -> Result<Self, DefinitionError> {
        if parameters.url.trim().is_empty() {
            return Err(DefinitionError::InvalidRepositoryParameters {
                message: "repository url cannot be empty".to_owned(),
            });
        }
        Ok(Self {
            kind: StorageKind::Repository,
            complement: None,
            repository: Some(parameters),
        })
    }

    /// Creates a definition that delegates storage to the embedding engine.
    pub fn engine_native() -> Self {
        Self {
            kind: StorageKind::EngineNative,
            complement: None,
            repository: None,
        }
    }

    /// Parses the textual form of a storage definition.
    ///
    /// The text is a kind token optionally followed by `:` and a
    /// complement: a folder path for `FOLDER`, a JSON object for
    /// `REPOSITORY`. Complements that are blank after trimming count as
    /// absent for kinds that tolerate a default.
    pub fn parse(text: &str) -> Result<Self, DefinitionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DefinitionError::Empty);
        }

        let (token, complement) = match trimmed.split_once(':') {
            Some((token, rest)) => (token.trim(), Some(rest.trim())),
            None => (trimmed, None),
        };
        let kind = StorageKind::from_token(token)
            .ok_or_else(|| DefinitionError::UnknownKind {
                token: token.to_owned(),
            })?;
        let complement = complement.filter(|rest| !rest.is_empty());

        match kind {
            StorageKind::Folder => {
                let path = complement.ok_or(DefinitionError::MissingComplement { kind })?;
                Self::folder(path)
            }
            StorageKind::Repository => {
                let raw = complement.ok_or_else(|| {
                    DefinitionError::InvalidRepositoryParameters {
                        message: "repository parameters are required".to_owned(),
                    }
                })?;
                let parameters: RepositoryParameters = serde_json::from_str(raw).map_err(
                    |err| DefinitionError::InvalidRepositoryParameters {
                        message: err.to_string(),
                    },
                )?;
                Self::repository(parameters)
            }
            _ => Ok(Self {
                kind,
                complement: complement.map(ToOwned::to_owned),
                repository: None,
            }),
        }
    }

    /// Returns the backend kind this definition selects.
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Returns the free-form complement, typically a folder path.
    pub fn complement(&self) -> Option<&str> {
        self.complement.as_deref()
    }

    /// Returns the structured repository complement.
    pub fn repository_parameters(&self) -> Option<&RepositoryParameters> {
        self.repository.as_ref()
    }
}

impl fmt::Display for StorageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_token())?;
        if let Some(parameters) = &self.repository {
            let json = serde_json::to_string(parameters).map_err(|_| fmt::Error)?;
            write!(f, ":{json}")?;
        } else if let Some(complement) = &self.complement {
            write!(f, ":{complement}")?;
        }
        Ok(())
    }
}
