use branchstore_collections::CollectionError;
use branchstore_common::VersionId;
use serde::Serialize;

/// Errors from operations on a single version tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("version {0} does not exist")]
    NoSuchVersion(VersionId),
    #[error("version {0} is an uncommitted draft")]
    DraftVersion(VersionId),
    #[error("version {0} is the root and has no parent")]
    AtRoot(VersionId),
    #[error("no version ids left after {0}")]
    IdsExhausted(VersionId),
}

/// Errors from registry operations, carrying the filename they concern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("file '{name}' already exists")]
    AlreadyExists { name: String },
    #[error("file '{name}' not found")]
    FileNotFound { name: String },
    #[error("file '{name}': {source}")]
    Version { name: String, source: TreeError },
    #[error("rank index misuse: {0}")]
    Index(#[from] CollectionError),
}

/// Coarse classification of a [`RegistryError`], for callers that branch on
/// the category rather than the exact cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    InvalidTransition,
    ContractViolation,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::FileNotFound { .. } => ErrorKind::NotFound,
            Self::Version { source, .. } => match source {
                TreeError::NoSuchVersion(_) | TreeError::DraftVersion(_) => ErrorKind::NotFound,
                TreeError::AtRoot(_) => ErrorKind::InvalidTransition,
                TreeError::IdsExhausted(_) => ErrorKind::ContractViolation,
            },
            Self::Index(_) => ErrorKind::ContractViolation,
        }
    }

    /// The filename the error concerns, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::AlreadyExists { name }
            | Self::FileNotFound { name }
            | Self::Version { name, .. } => Some(name),
            Self::Index(_) => None,
        }
    }
}
