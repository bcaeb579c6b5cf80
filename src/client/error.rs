//! Errors surfaced by [`PartnerClient`](super::PartnerClient).

use crate::error::FieldErrors;
use thiserror::Error;

/// How the dashboard should present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shown next to the offending inputs; the submission is blocked.
    Field,
    /// Shown as a banner; the partner has to sign in again.
    Session,
    /// Shown as a generic banner; the partner may retry.
    Transport,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Validation failed: {fields}")]
    Validation { message: String, fields: FieldErrors },

    #[error("{0}")]
    SessionExpired(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation { .. } => ErrorKind::Field,
            ClientError::SessionExpired(_) => ErrorKind::Session,
            _ => ErrorKind::Transport,
        }
    }

    /// Banner text for the failure. Field errors carry their own messages in `fields`.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation { message, .. } => message.clone(),
            ClientError::SessionExpired(message) => message.clone(),
            ClientError::NotFound(message) | ClientError::Conflict(message) => message.clone(),
            ClientError::Server { .. } | ClientError::Http(_) | ClientError::Serialization(_) => {
                "Something went wrong, please try again".to_string()
            }
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
