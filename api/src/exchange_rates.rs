//! Provides a specialized map of USD exchange rates keyed by currency.

use std::collections::HashMap;

use dioxus_logger::tracing::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::currency::Currency;

/// How many units of a currency one USD buys.
///
/// Built from the raw `exchange_rates` object in the backend settings. Rates
/// for tickers outside the currency catalogue are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates(HashMap<Currency, f64>);

impl ExchangeRates {
    /// Creates a new, empty `ExchangeRates`.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Builds the map from the backend's ticker-keyed rates.
    pub fn from_wire(raw: &HashMap<String, f64>) -> Self {
        let mut rates = Self::new();
        for (ticker, rate) in raw {
            match Currency::from_ticker(ticker) {
                Ok(currency) => {
                    rates.insert(currency, *rate);
                }
                Err(e) => debug!("ignoring exchange rate: {}", e),
            }
        }
        rates
    }

    /// Inserts or updates the rate for a currency, returning the old rate.
    pub fn insert(&mut self, currency: Currency, rate: f64) -> Option<f64> {
        self.0.insert(currency, rate)
    }

    /// Returns the rate for `currency`. USD is always 1.0.
    pub fn get(&self, currency: Currency) -> Option<f64> {
        match currency {
            Currency::USD => Some(self.0.get(&currency).copied().unwrap_or(1.0)),
            _ => self.0.get(&currency).copied(),
        }
    }

    /// Converts a USD value into `currency`, if its rate is known.
    pub fn convert(&self, usd_value: f64, currency: Currency) -> Option<f64> {
        self.get(currency).map(|rate| usd_value * rate)
    }

    /// Returns an iterator over `(currency, rate)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.0.iter().map(|(currency, rate)| (*currency, *rate))
    }
}
