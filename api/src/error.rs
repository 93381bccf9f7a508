//! Error types shared by every backend call.

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// An error string produced by the backend itself, carried over the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{0}")]
pub struct BackendError(pub String);

/// The reply type of every method on the backend RPC service.
pub type RpcResult<T> = Result<T, BackendError>;

/// What can go wrong when the client talks to the backend.
///
/// Nothing at this layer retries: every variant is terminal for the user
/// action that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq, strum::EnumIs)]
pub enum RpcError {
    /// The call never produced a reply: connection refused, broken pipe,
    /// deadline exceeded, or an exception raised inside the backend.
    #[error("backend call failed: {0}")]
    Transport(String),

    /// The backend answered, but with nothing usable (e.g. an empty task id).
    #[error("backend returned an empty {0}")]
    EmptyReply(&'static str),

    /// The backend processed the request and refused it (`result: false`).
    /// The message is shown to the user verbatim.
    #[error("{0}")]
    Application(String),
}

impl RpcError {
    /// The text to put in an error dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::Application(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for RpcError {
    fn from(e: anyhow::Error) -> Self {
        Self::Transport(format!("{e:#}"))
    }
}

impl From<tarpc::client::RpcError> for RpcError {
    fn from(e: tarpc::client::RpcError) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<BackendError> for RpcError {
    fn from(e: BackendError) -> Self {
        Self::Transport(e.0)
    }
}

/// Error returned when a ticker symbol is not in the currency catalogue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_message_is_shown_verbatim() {
        let err = RpcError::Application("not found".to_string());
        assert_eq!(err.user_message(), "not found");
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn test_backend_error_maps_to_transport() {
        let err: RpcError = BackendError("db locked".to_string()).into();
        assert!(err.is_transport());
        assert_eq!(err.user_message(), "backend call failed: db locked");
    }
}
