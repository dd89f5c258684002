// src/infra/errors.rs — Error types for Professor

use std::path::PathBuf;

use thiserror::Error;

use crate::session::{Role, SessionId};

#[derive(Error, Debug)]
pub enum ProfessorError {
    // Storage errors
    #[error("Malformed session record: {0}")]
    Format(String),

    #[error("Could not index '{}': {message}", path.display())]
    Index { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to save session {id}: {source}")]
    Persist {
        id: SessionId,
        #[source]
        source: std::io::Error,
    },

    // Usage errors (caller's responsibility)
    #[error("Session {0} not found")]
    UnknownSession(SessionId),

    #[error("No session selected")]
    NoSelection,

    #[error("{role} message content is empty")]
    EmptyContent { role: Role },

    // Completion service
    #[error("Completion from '{provider}' failed: {message}")]
    Completion { provider: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProfessorError {
    pub(crate) fn completion(provider: &str, message: impl Into<String>) -> Self {
        ProfessorError::Completion {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// The exchange reached memory but not disk; retry the save, not the turn.
    pub fn is_retriable_persist(&self) -> bool {
        matches!(self, ProfessorError::Persist { .. })
    }

    /// The user turn was never recorded; the same input may be re-sent.
    pub fn is_retriable_completion(&self) -> bool {
        matches!(self, ProfessorError::Completion { .. })
    }
}

impl From<serde_json::Error> for ProfessorError {
    fn from(e: serde_json::Error) -> Self {
        ProfessorError::Format(e.to_string())
    }
}
