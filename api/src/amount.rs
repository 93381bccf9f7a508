//! Formatting and parsing of the decimal figures shown on screen.

use std::fmt;

use thiserror::Error;

use crate::currency::Currency;

/// An error that can occur when parsing user input into a number.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAmountError {
    /// Nothing (or only whitespace) was entered.
    #[error("a value is required")]
    Empty,
    /// The string is not in a valid numeric format (e.g., "abc", "1.2.3").
    #[error("invalid number format")]
    InvalidFormat,
    /// The value is negative where only non-negative values make sense.
    #[error("value must not be negative")]
    Negative,
}

/// Parses a plain decimal string such as "12", "0.5" or ".25".
///
/// Exponents, thousands separators and signs other than a leading '-' are
/// rejected, so what the user typed is what gets sent to the backend.
pub fn parse_decimal(s: &str) -> Result<f64, ParseAmountError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (is_negative, digits) = match s.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, s),
    };

    let mut parts = digits.split('.');
    let major_str = parts.next().unwrap_or("");
    let minor_str = parts.next().unwrap_or("");

    if parts.next().is_some() || (major_str.is_empty() && minor_str.is_empty()) {
        return Err(ParseAmountError::InvalidFormat);
    }
    if !major_str.chars().chain(minor_str.chars()).all(|c| c.is_ascii_digit()) {
        return Err(ParseAmountError::InvalidFormat);
    }

    let value: f64 = digits
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;
    if is_negative && value != 0.0 {
        return Err(ParseAmountError::Negative);
    }
    Ok(value)
}

/// Formats `value` with `precision` decimals and ',' thousands separators.
pub fn format_amount(value: f64, precision: u8) -> String {
    let fixed = format!("{:.*}", precision as usize, value.abs());
    let (major, minor) = match fixed.split_once('.') {
        Some((major, minor)) => (major, Some(minor)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + major.len() / 3 + 1);
    for (i, c) in major.chars().enumerate() {
        if i > 0 && (major.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(minor) = minor {
        grouped.push('.');
        grouped.push_str(minor);
    }

    // a value that rounds to zero is shown without a sign.
    let rounds_to_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !rounds_to_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// A figure already converted into the currency it is displayed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayAmount {
    value: f64,
    currency: Currency,
    precision: u8,
}

impl DisplayAmount {
    pub fn new(value: f64, currency: Currency, precision: u8) -> Self {
        Self {
            value,
            currency,
            precision,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Formats the amount with its currency icon (e.g., "$25.34").
    pub fn to_string_with_icon(&self) -> String {
        format!("{}{}", self.currency.icon(), self)
    }

    /// Formats the amount with its ticker (e.g., "25.34 USD").
    pub fn to_string_with_ticker(&self) -> String {
        format!("{} {}", self, self.currency.ticker_symbol())
    }
}

/// Formats as a plain grouped number (e.g., "1,025.34").
impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.value, self.precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12"), Ok(12.0));
        assert_eq!(parse_decimal(" 0.5 "), Ok(0.5));
        assert_eq!(parse_decimal(".25"), Ok(0.25));
        assert_eq!(parse_decimal(""), Err(ParseAmountError::Empty));
        assert_eq!(parse_decimal("1.2.3"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_decimal("1e5"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_decimal("1,000"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_decimal("-3"), Err(ParseAmountError::Negative));
    }

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_amount(999.0, 0), "999");
        assert_eq!(format_amount(1000.0, 0), "1,000");
        assert_eq!(format_amount(-1500.5, 1), "-1,500.5");
        assert_eq!(format_amount(-0.001, 2), "0.00");
    }

    #[test]
    fn test_display_amount() {
        let amount = DisplayAmount::new(2500.0, Currency::EUR, 2);
        assert_eq!(amount.to_string(), "2,500.00");
        assert_eq!(amount.to_string_with_icon(), "€2,500.00");
        assert_eq!(amount.to_string_with_ticker(), "2,500.00 EUR");
    }
}
