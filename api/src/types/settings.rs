use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::RpcError;

fn default_floating_precision() -> u8 {
    2
}

/// The configuration the backend hands out at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ticker of the currency figures are displayed in.
    pub main_currency: String,
    /// Units of each currency one USD buys, keyed by ticker.
    #[serde(default)]
    pub exchange_rates: HashMap<String, f64>,
    /// Number of decimals shown for every figure.
    #[serde(default = "default_floating_precision")]
    pub floating_precision: u8,
}

/// Reply to `unlock_user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub result: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Names of the exchanges the user has connected.
    #[serde(default)]
    pub exchanges: Vec<String>,
}

impl UnlockResponse {
    /// Returns the connected exchanges, or the refusal as
    /// [RpcError::Application].
    pub fn into_exchanges(self) -> Result<Vec<String>, RpcError> {
        if self.result {
            Ok(self.exchanges)
        } else {
            Err(RpcError::Application(
                self.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "invalid username or password".to_string()),
            ))
        }
    }
}

/// Reply to `query_fiat_total`: the USD value of all fiat holdings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiatTotal {
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"main_currency": "EUR"}"#).unwrap();
        assert_eq!(settings.main_currency, "EUR");
        assert!(settings.exchange_rates.is_empty());
        assert_eq!(settings.floating_precision, 2);
    }

    #[test]
    fn test_failed_unlock_uses_backend_message() {
        let reply = UnlockResponse {
            result: false,
            message: Some("wrong password".to_string()),
            exchanges: vec![],
        };
        assert_eq!(
            reply.into_exchanges(),
            Err(RpcError::Application("wrong password".to_string()))
        );
    }
}
