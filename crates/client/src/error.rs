use buildsite_core::error::CoreError;

use crate::storage::StorageError;

/// Errors surfaced by the client layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client-side validation or lookup failure; no request was sent.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Rejected credentials, or an admin call without a valid session.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The backend reported the referenced resource as missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned some other non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The durable session store could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Convenience alias for client return values.
pub type ClientResult<T> = Result<T, ClientError>;

/// Coarse error taxonomy presented to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Index,
    Request,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Core(CoreError::Validation(_)) => ErrorKind::Validation,
            ClientError::Core(CoreError::IndexOutOfRange { .. }) => ErrorKind::Index,
            ClientError::Core(CoreError::NotFound { .. }) | ClientError::NotFound(_) => {
                ErrorKind::NotFound
            }
            ClientError::Auth(_) => ErrorKind::Auth,
            ClientError::Request(_) | ClientError::Api { .. } | ClientError::Storage(_) => {
                ErrorKind::Request
            }
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Short text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Core(CoreError::Validation(msg)) => format!("Please check the form: {msg}"),
            ClientError::Core(CoreError::IndexOutOfRange { index, len }) => {
                format!("Item {index} does not exist (only {len} available)")
            }
            ClientError::Core(CoreError::NotFound { entity, .. }) => {
                format!("That {entity} no longer exists")
            }
            ClientError::Auth(_) => "Invalid username or password, or session expired".to_string(),
            ClientError::NotFound(_) => "The requested item no longer exists".to_string(),
            ClientError::Request(_) | ClientError::Api { .. } | ClientError::Storage(_) => {
                "Request failed. Please try again.".to_string()
            }
        }
    }
}
