use serde::Deserialize;
use serde::Serialize;

use crate::error::RpcError;

/// The reply of every mutating backend call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub result: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            result: true,
            message: None,
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            result: false,
            message: Some(message.into()),
        }
    }

    /// Turns `result: false` into [RpcError::Application] carrying the
    /// backend's message.
    pub fn into_result(self) -> Result<(), RpcError> {
        if self.result {
            Ok(())
        } else {
            Err(RpcError::Application(
                self.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "the backend refused the request".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_carries_message() {
        let reply: ActionResult =
            serde_json::from_str(r#"{"result": false, "message": "not found"}"#).unwrap();
        assert_eq!(
            reply.into_result(),
            Err(RpcError::Application("not found".to_string()))
        );
    }

    #[test]
    fn test_message_is_optional() {
        let reply: ActionResult = serde_json::from_str(r#"{"result": true}"#).unwrap();
        assert_eq!(reply.into_result(), Ok(()));
    }
}
