use api::error::RpcError;
use dioxus::prelude::*;

#[derive(Clone, PartialEq, Debug, strum::EnumIs)]
pub enum BackendConnectionStatus {
    Connected,
    Disconnected(String),
}

/// Whether `error` means the backend could not be reached at all, as
/// opposed to a call the backend answered or failed on its own.
pub fn is_connection_error(error: &RpcError) -> bool {
    let RpcError::Transport(msg) = error else {
        return false;
    };
    let msg = msg.to_lowercase();
    msg.contains("connection refused")
        || msg.contains("broken pipe")
        || msg.contains("network unreachable")
        || msg.contains("connection reset")
        || msg.contains("failed to connect")
        || msg.contains("shutdown")
        || msg.contains("channel closed")
}

#[derive(Clone, Copy)]
pub struct BackendChecker {
    status: Signal<BackendConnectionStatus>,
}

impl BackendChecker {
    /// Inspects the result of a backend call and passes it through.
    /// - If `Ok`: marks the backend connected again if it was not.
    /// - If it is a connection error: marks the backend disconnected.
    pub fn check<T>(&mut self, result: Result<T, RpcError>) -> Result<T, RpcError> {
        match &result {
            Ok(_) => {
                if self.status.peek().is_disconnected() {
                    self.status.set(BackendConnectionStatus::Connected);
                }
            }
            Err(e) => self.check_error(e),
        }
        result
    }

    /// Marks the backend disconnected if `error` is a connection error.
    pub fn check_error(&mut self, error: &RpcError) {
        if is_connection_error(error) {
            dioxus_logger::tracing::warn!("backend unreachable: {}", error);
            self.status
                .set(BackendConnectionStatus::Disconnected(error.to_string()));
        }
    }

    /// Call .read() on this in a component to subscribe to changes.
    pub fn status(&self) -> Signal<BackendConnectionStatus> {
        self.status
    }
}

pub fn use_backend_checker() -> BackendChecker {
    let status = use_context::<Signal<BackendConnectionStatus>>();
    BackendChecker { status }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors() {
        assert!(is_connection_error(&RpcError::Transport(
            "Connection refused (os error 111)".to_string()
        )));
        assert!(!is_connection_error(&RpcError::Transport(
            "exchange kraken is not connected".to_string()
        )));
        assert!(!is_connection_error(&RpcError::Application(
            "connection refused".to_string()
        )));
        assert!(!is_connection_error(&RpcError::EmptyReply("task id")));
    }
}
