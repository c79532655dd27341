use glob::Pattern;

use crate::error::StowageError;

/// Filter deciding which source-folder entries an upload ingests.
///
/// An explicit file name always wins over a pattern. The literal
/// pattern `*.*`, a blank pattern, or no pattern at all match every
/// file; anything else is matched as a glob against entry base names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceFilter {
    /// Accept every file.
    #[default]
    All,
    /// Accept exactly one file name.
    Name(String),
    /// Accept file names matching a glob pattern.
    Glob(Pattern),
}

impl SourceFilter {
    /// Builds a filter from the caller's optional name and pattern text.
    pub fn from_parameters(
        file_name: Option<&str>,
        pattern: Option<&str>,
    ) -> Result<Self, StowageError> {
        if let Some(name) = file_name.map(str::trim).filter(|name| !name.is_empty()) {
            return Ok(Self::Name(name.to_owned()));
        }
        match pattern.map(str::trim) {
            None | Some("") | Some("*.*") => Ok(Self::All),
            Some(text) => Self::pattern(text),
        }
    }

    /// Builds a filter matching exactly `name`.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Compiles a glob pattern filter.
    pub fn pattern(text: &str) -> Result<Self, StowageError> {
        Pattern::new(text)
            .map(Self::Glob)
            .map_err(|source| StowageError::InvalidFilter {
                pattern: text.to_owned(),
                source,
            })
    }

    /// Returns `true` when `file_name` passes the filter.
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Name(name) => file_name == name,
            Self::Glob(pattern) => pattern.matches(file_name),
        }
    }
}
