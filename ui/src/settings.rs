//! The display settings every screen formats figures with.

use api::amount::DisplayAmount;
use api::backend::Backend;
use api::currency::Currency;
use api::error::RpcError;
use api::exchange_rates::ExchangeRates;
use api::prefs::display_preference::DisplayPreference;
use api::types::settings::Settings;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use serde::Deserialize;
use serde::Serialize;

/// Main currency, exchange rates and precision, plus the exchanges the
/// signed-in user has connected.
///
/// Owned by the app root and handed to whoever formats a figure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub main_currency: Currency,
    pub exchange_rates: ExchangeRates,
    pub floating_precision: u8,
    pub exchanges: Vec<String>,
}

impl AppSettings {
    /// Settings in effect before the backend has answered.
    pub fn from_prefs(prefs: &DisplayPreference) -> Self {
        Self {
            main_currency: prefs.fallback_currency,
            exchange_rates: ExchangeRates::new(),
            floating_precision: prefs.floating_precision,
            exchanges: vec![],
        }
    }

    /// Overwrites currency, rates and precision with the backend's view.
    ///
    /// A main currency outside the catalogue keeps the current one.
    pub fn apply_backend(&mut self, settings: &Settings) {
        match Currency::from_ticker(&settings.main_currency) {
            Ok(currency) => self.main_currency = currency,
            Err(e) => warn!(
                "backend main currency ignored ({}); keeping {}",
                e,
                self.main_currency.ticker_symbol()
            ),
        }
        self.exchange_rates = ExchangeRates::from_wire(&settings.exchange_rates);
        self.floating_precision = settings.floating_precision;
    }

    pub fn currency_icon(&self) -> &'static str {
        self.main_currency.icon()
    }

    /// Converts a USD figure into the main currency.
    ///
    /// Without a rate for the main currency the USD figure is shown as is.
    pub fn display(&self, usd_value: f64) -> DisplayAmount {
        let value = match self.exchange_rates.convert(usd_value, self.main_currency) {
            Some(converted) => converted,
            None => {
                warn!(
                    "no exchange rate for {}; showing the USD value",
                    self.main_currency.ticker_symbol()
                );
                usd_value
            }
        };
        DisplayAmount::new(value, self.main_currency, self.floating_precision)
    }

    /// `display` rendered with the currency icon, e.g. "€1,234.50".
    pub fn format(&self, usd_value: f64) -> String {
        self.display(usd_value).to_string_with_icon()
    }
}

/// Fetches the backend settings and merges them over the local prefs.
pub async fn load_settings<B: Backend>(
    backend: &B,
    prefs: &DisplayPreference,
) -> Result<AppSettings, RpcError> {
    let mut settings = AppSettings::from_prefs(prefs);
    let remote = backend.get_settings().await?;
    settings.apply_backend(&remote);
    info!(
        "settings loaded: main currency {}, {} exchange rates",
        settings.main_currency.ticker_symbol(),
        settings.exchange_rates.iter().count()
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::mock::MockBackend;
    use serde_json::json;

    fn prefs() -> DisplayPreference {
        DisplayPreference {
            fallback_currency: Currency::USD,
            floating_precision: 2,
        }
    }

    #[tokio::test]
    async fn test_load_settings_uses_backend_currency() {
        let backend = MockBackend::new();
        backend.reply(
            "get_settings",
            json!({"main_currency": "EUR", "exchange_rates": {"EUR": 0.9}, "floating_precision": 3}),
        );

        let settings = load_settings(&backend, &prefs()).await.unwrap();
        assert_eq!(settings.main_currency, Currency::EUR);
        assert_eq!(settings.currency_icon(), "€");
        assert_eq!(settings.floating_precision, 3);
        assert_eq!(settings.format(1000.0), "€900.000");
    }

    #[tokio::test]
    async fn test_load_settings_failure_is_reported() {
        let backend = MockBackend::new();
        backend.fail("get_settings", RpcError::Transport("connection refused".into()));
        let err = load_settings(&backend, &prefs()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_unknown_backend_currency_keeps_fallback() {
        let mut settings = AppSettings::from_prefs(&prefs());
        settings.apply_backend(&Settings {
            main_currency: "XYZ".to_string(),
            exchange_rates: Default::default(),
            floating_precision: 2,
        });
        assert_eq!(settings.main_currency, Currency::USD);
    }

    #[test]
    fn test_missing_rate_shows_usd_value() {
        let mut settings = AppSettings::from_prefs(&prefs());
        settings.main_currency = Currency::GBP;
        assert_eq!(settings.format(1234.5), "£1,234.50");
    }
}
