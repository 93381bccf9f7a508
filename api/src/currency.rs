//! Defines the currencies figures can be displayed in.

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::UnknownCurrency;

/// A currency the user can pick as main currency.
///
/// The backend reports every figure in USD; other currencies are derived by
/// multiplying with the rate found in the settings' exchange rates.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Default,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    #[default]
    USD, // United States Dollar
    EUR, // Euro
    GBP, // British Pound
    JPY, // Japanese Yen
    CNY, // Chinese Yuan
    CAD, // Canadian Dollar
    KRW, // South Korean Won
    RUB, // Russian Ruble
    CHF, // Swiss Franc
    TRY, // Turkish Lira
    ZAR, // South African Rand
    AUD, // Australian Dollar
    NZD, // New Zealand Dollar
    BRL, // Brazilian Real
}

impl Currency {
    /// Looks up a ticker symbol, case-insensitively.
    pub fn from_ticker(ticker: &str) -> Result<Self, UnknownCurrency> {
        Self::from_str(ticker.trim()).map_err(|_| UnknownCurrency(ticker.to_string()))
    }

    /// Returns the ticker symbol (e.g., "USD").
    pub fn ticker_symbol(&self) -> &'static str {
        self.into()
    }

    /// Returns the glyph shown in front of amounts (e.g., '$').
    pub fn icon(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::JPY => "¥",
            Self::CNY => "¥",
            Self::CAD => "$",
            Self::KRW => "₩",
            Self::RUB => "₽",
            Self::CHF => "Fr",
            Self::TRY => "₺",
            Self::ZAR => "R",
            Self::AUD => "$",
            Self::NZD => "$",
            Self::BRL => "R$",
        }
    }

    /// Returns the full name of the currency.
    pub fn name(&self) -> &'static str {
        match self {
            Self::USD => "United States Dollar",
            Self::EUR => "Euro",
            Self::GBP => "British Pound",
            Self::JPY => "Japanese Yen",
            Self::CNY => "Chinese Yuan",
            Self::CAD => "Canadian Dollar",
            Self::KRW => "South Korean Won",
            Self::RUB => "Russian Ruble",
            Self::CHF => "Swiss Franc",
            Self::TRY => "Turkish Lira",
            Self::ZAR => "South African Rand",
            Self::AUD => "Australian Dollar",
            Self::NZD => "New Zealand Dollar",
            Self::BRL => "Brazilian Real",
        }
    }
}
