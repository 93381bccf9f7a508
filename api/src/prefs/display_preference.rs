use std::env;

use serde::Deserialize;
use serde::Serialize;

use crate::currency::Currency;

/// Display settings used until the backend's own settings arrive.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct DisplayPreference {
    /// Currency figures are shown in before `get_settings` answers, or when
    /// it names a currency outside the catalogue.
    pub fallback_currency: Currency,
    /// Decimals shown for every figure.
    pub floating_precision: u8,
}

impl DisplayPreference {
    /// Creates a DisplayPreference instance from environment variables.
    ///
    /// # Environment Variables
    /// - `MAIN_CURRENCY`: any ticker from the catalogue, defaults to USD.
    /// - `FLOATING_PRECISION`: 0..=8, defaults to 2.
    pub fn from_env() -> Self {
        const FLOATING_PRECISION: u8 = 2;
        const MAX_PRECISION: u8 = 8;

        let fallback_currency = env::var("MAIN_CURRENCY")
            .ok()
            .and_then(|s| Currency::from_ticker(&s).ok())
            .unwrap_or_default();

        let floating_precision = env::var("FLOATING_PRECISION")
            .ok()
            .and_then(|s| s.parse::<u8>().ok())
            .map(|p| p.min(MAX_PRECISION))
            .unwrap_or(FLOATING_PRECISION);

        Self {
            fallback_currency,
            floating_precision,
        }
    }
}

impl Default for DisplayPreference {
    fn default() -> Self {
        Self::from_env()
    }
}
