use serde::Deserialize;
use serde::Serialize;

/// Direction of a trade, seen from the base asset of its pair.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TradeType {
    #[default]
    Buy,
    Sell,
}

/// Splits a `BASE_QUOTE` pair such as `BTC_EUR` into its two assets.
///
/// Returns `None` unless there is exactly one '_' with a non-empty,
/// alphanumeric asset on each side.
pub fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (base, quote) = pair.split_once('_')?;
    let is_asset = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());
    (is_asset(base) && is_asset(quote)).then_some((base, quote))
}

/// A manually recorded trade as stored by the backend.
///
/// Figures stay strings so a record sent back for deletion is byte-for-byte
/// what the backend handed out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtcTrade {
    /// Backend identifier, when the backend supplies one.
    #[serde(default)]
    pub id: Option<String>,
    /// Seconds since the unix epoch.
    pub timestamp: i64,
    pub pair: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub amount: String,
    pub rate: String,
    #[serde(default)]
    pub fee: String,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub notes: String,
}

/// The fields submitted by the trade form to `add_otctrade` / `edit_otctrade`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtcTradePayload {
    /// Present only when editing a trade the backend identified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otc_id: Option<String>,
    /// `dd/mm/YYYY HH:MM`
    pub otc_time: String,
    pub otc_pair: String,
    pub otc_type: TradeType,
    pub otc_amount: String,
    pub otc_rate: String,
    pub otc_fee: String,
    pub otc_link: String,
    pub otc_notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("BTC_EUR"), Some(("BTC", "EUR")));
        assert_eq!(split_pair("BTCEUR"), None);
        assert_eq!(split_pair("BTC_"), None);
        assert_eq!(split_pair("BTC_EUR_USD"), None);
        assert_eq!(split_pair("B-C_EUR"), None);
    }

    #[test]
    fn test_trade_type_wire_format() {
        assert_eq!(serde_json::to_string(&TradeType::Sell).unwrap(), r#""sell""#);
        assert_eq!(TradeType::from_str("BUY"), Ok(TradeType::Buy));
        assert_eq!(TradeType::Buy.to_string(), "buy");
    }

    #[test]
    fn test_trade_record_from_backend() {
        let trade: OtcTrade = serde_json::from_str(
            r#"{"id": "7", "timestamp": 1500000000, "pair": "ETH_EUR", "type": "buy",
                "amount": "1.10", "rate": "250", "fee": "0.5", "link": "", "notes": "first"}"#,
        )
        .unwrap();
        assert_eq!(trade.id.as_deref(), Some("7"));
        assert_eq!(trade.trade_type, TradeType::Buy);
        assert_eq!(trade.amount, "1.10");
        assert_eq!(trade.fee_currency, None);
    }
}
