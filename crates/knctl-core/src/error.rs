use thiserror::Error;

use crate::cluster::ClientError;
use crate::constants::{FUNC_FILE_NOT_FOUND, INVOKE_ID_ERROR};

/// Failures surfaced by every [`crate::KnCli`] operation.
///
/// Collaborator messages are carried verbatim so callers can show them as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KnError {
    /// The cluster client or the external process failed.
    #[error("{0}")]
    Io(String),

    /// Output was neither a known sentinel nor a parseable document.
    #[error("{0}")]
    Parse(String),

    #[error("{} {}", INVOKE_ID_ERROR, .0)]
    MissingInvokeId(String),

    #[error("{}", FUNC_FILE_NOT_FOUND)]
    FuncFileNotFound,
}

impl KnError {
    /// Every variant is an I/O-kind failure from the caller's point of view.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Parse(_) | Self::MissingInvokeId(_) | Self::FuncFileNotFound
        )
    }
}

impl From<std::io::Error> for KnError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ClientError> for KnError {
    fn from(err: ClientError) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for KnError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KnError>;
