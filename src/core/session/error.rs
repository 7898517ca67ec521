//! Session error types and the shared transport-failure handler.

use super::token::TokenError;
use super::transport::TransportError;

/// Errors returned by [`crate::core::session::SessionManager`]
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The transport failed; the original failure is carried unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("stored token is malformed: {0}")]
    MalformedToken(#[from] TokenError),

    #[error("unexpected response body: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("logged out while the login request was in flight")]
    LoginSuperseded,
}

impl SessionError {
    /// The transport failure behind this error, if any
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            SessionError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// Log a failed request and hand the failure back to the caller untouched.
///
/// Every asynchronous session operation routes its transport failures here.
pub fn handle_transport_failure(operation: &'static str, error: TransportError) -> SessionError {
    match &error {
        TransportError::Network { message } => {
            tracing::error!(operation, origin = "client", "an error occurred: {message}");
        }
        TransportError::Backend { status, body } => {
            tracing::error!(
                operation,
                origin = "server",
                status = *status,
                "backend returned code {status}, body was: {body}"
            );
        }
    }
    SessionError::Transport(error)
}
