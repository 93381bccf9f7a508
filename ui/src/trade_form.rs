//! Add, edit and delete manually recorded (OTC) trades.

use api::amount::parse_decimal;
use api::amount::ParseAmountError;
use api::backend::Backend;
use api::error::RpcError;
use api::types::otc_trade::split_pair;
use api::types::otc_trade::OtcTrade;
use api::types::otc_trade::OtcTradePayload;
use api::types::otc_trade::TradeType;
use chrono::DateTime;
use chrono::NaiveDateTime;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use thiserror::Error;

/// The format of the time field, e.g. "25/12/2018 14:30".
pub const TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Add,
    /// Editing an existing trade. The id is absent when the backend does not
    /// hand out ids.
    Edit { trade_id: Option<String> },
}

/// Why the form was not submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("time must look like 25/12/2018 14:30")]
    InvalidTime,

    #[error("pair must look like BTC_EUR")]
    InvalidPair,

    #[error("{field}: {source}")]
    InvalidNumber {
        field: &'static str,
        source: ParseAmountError,
    },

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl TradeError {
    /// The text to put in an error dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(e) => e.to_string(),
            Self::Rpc(e) => e.user_message(),
        }
    }
}

/// The raw field values of the trade form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TradeForm {
    pub time: String,
    pub pair: String,
    pub trade_type: TradeType,
    pub amount: String,
    pub rate: String,
    pub fee: String,
    pub link: String,
    pub notes: String,
    mode: FormMode,
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(value)
    }
}

fn positive(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let n = parse_decimal(value).map_err(|source| ValidationError::InvalidNumber { field, source })?;
    if n > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive(field))
    }
}

impl TradeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add Trade",
            FormMode::Edit { .. } => "Save Changes",
        }
    }

    /// Loads `trade` into the form for editing.
    pub fn edit(&mut self, trade: &OtcTrade) {
        self.time = DateTime::from_timestamp(trade.timestamp, 0)
            .map(|t| t.naive_utc().format(TIME_FORMAT).to_string())
            .unwrap_or_default();
        self.pair = trade.pair.clone();
        self.trade_type = trade.trade_type;
        self.amount = trade.amount.clone();
        self.rate = trade.rate.clone();
        self.fee = trade.fee.clone();
        self.link = trade.link.clone();
        self.notes = trade.notes.clone();
        self.mode = FormMode::Edit {
            trade_id: trade.id.clone(),
        };
    }

    /// Empties every field and returns to Add mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Checks the fields and builds the payload to submit. Fee, link and
    /// notes are optional.
    pub fn validate(&self) -> Result<OtcTradePayload, ValidationError> {
        let time = required("time", &self.time)?;
        let pair = required("pair", &self.pair)?;
        let amount = required("amount", &self.amount)?;
        let rate = required("rate", &self.rate)?;

        NaiveDateTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| ValidationError::InvalidTime)?;
        split_pair(pair).ok_or(ValidationError::InvalidPair)?;
        positive("amount", amount)?;
        positive("rate", rate)?;

        let fee = self.fee.trim();
        if !fee.is_empty() {
            parse_decimal(fee)
                .map_err(|source| ValidationError::InvalidNumber { field: "fee", source })?;
        }

        let otc_id = match &self.mode {
            FormMode::Add => None,
            FormMode::Edit { trade_id } => trade_id.clone(),
        };
        Ok(OtcTradePayload {
            otc_id,
            otc_time: time.to_string(),
            otc_pair: pair.to_string(),
            otc_type: self.trade_type,
            otc_amount: amount.to_string(),
            otc_rate: rate.to_string(),
            otc_fee: fee.to_string(),
            otc_link: self.link.trim().to_string(),
            otc_notes: self.notes.trim().to_string(),
        })
    }
}

/// Fetches every trade.
pub async fn reload<B: Backend>(backend: &B) -> Result<Vec<OtcTrade>, RpcError> {
    let trades = backend.query_otctrades().await?;
    info!("loaded {} OTC trades", trades.len());
    Ok(trades)
}

/// Validates `form`, sends it as an add or an edit, and on success returns
/// the reloaded trade list. Nothing is sent if validation fails; nothing is
/// reloaded if the backend refuses.
pub async fn submit<B: Backend>(backend: &B, form: &TradeForm) -> Result<Vec<OtcTrade>, TradeError> {
    let payload = form.validate()?;
    let reply = match form.mode() {
        FormMode::Add => backend.add_otctrade(&payload).await?,
        FormMode::Edit { .. } => backend.edit_otctrade(&payload).await?,
    };
    if let Err(e) = reply.into_result() {
        warn!("trade not saved: {}", e);
        return Err(e.into());
    }
    Ok(reload(backend).await?)
}

/// Deletes `trade` and returns the reloaded trade list. The full record is
/// sent, as the backend matches on it.
pub async fn delete<B: Backend>(backend: &B, trade: &OtcTrade) -> Result<Vec<OtcTrade>, TradeError> {
    if let Err(e) = backend.delete_otctrade(trade).await?.into_result() {
        warn!("trade not deleted: {}", e);
        return Err(e.into());
    }
    Ok(reload(backend).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::mock::MockBackend;
    use serde_json::json;

    fn filled() -> TradeForm {
        TradeForm {
            time: "25/12/2018 14:30".to_string(),
            pair: "BTC_EUR".to_string(),
            trade_type: TradeType::Sell,
            amount: "0.5".to_string(),
            rate: "3500".to_string(),
            ..Default::default()
        }
    }

    fn trade() -> OtcTrade {
        OtcTrade {
            id: Some("7".to_string()),
            timestamp: 1545748200,
            pair: "BTC_EUR".to_string(),
            trade_type: TradeType::Sell,
            amount: "0.5".to_string(),
            rate: "3500".to_string(),
            fee: "".to_string(),
            fee_currency: None,
            link: "".to_string(),
            notes: "".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_required_field_sends_nothing() {
        let backend = MockBackend::new();
        let clears: [fn(&mut TradeForm); 4] = [
            |f| f.time.clear(),
            |f| f.pair.clear(),
            |f| f.amount.clear(),
            |f| f.rate = "  ".to_string(),
        ];
        for clear in clears {
            let mut form = filled();
            clear(&mut form);
            let err = submit(&backend, &form).await.unwrap_err();
            assert!(matches!(err, TradeError::Invalid(ValidationError::Missing(_))));
        }
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_validation_rules() {
        let mut form = filled();
        form.time = "2018-12-25 14:30".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidTime));

        let mut form = filled();
        form.pair = "BTCEUR".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidPair));

        let mut form = filled();
        form.amount = "0".to_string();
        assert_eq!(form.validate(), Err(ValidationError::NotPositive("amount")));

        let mut form = filled();
        form.fee = "-1".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidNumber {
                field: "fee",
                source: ParseAmountError::Negative
            })
        );
    }

    #[tokio::test]
    async fn test_add_then_reload() {
        let backend = MockBackend::new();
        backend.reply("add_otctrade", json!({"result": true}));
        backend.reply("query_otctrades", vec![trade()]);

        let trades = submit(&backend, &filled()).await.unwrap();
        assert_eq!(trades, vec![trade()]);

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "add_otctrade");
        assert_eq!(calls[0].args[0]["otc_type"], json!("sell"));
        assert!(calls[0].args[0].get("otc_id").is_none());
        assert_eq!(calls[1].method, "query_otctrades");
    }

    #[tokio::test]
    async fn test_edit_sends_trade_id() {
        let backend = MockBackend::new();
        backend.reply("edit_otctrade", json!({"result": true}));

        let mut form = TradeForm::new();
        form.edit(&trade());
        assert_eq!(form.time, "25/12/2018 14:30");
        assert_eq!(form.submit_label(), "Save Changes");

        submit(&backend, &form).await.unwrap();
        let edit = &backend.calls_to("edit_otctrade")[0];
        assert_eq!(edit.args[0]["otc_id"], json!("7"));
        assert_eq!(backend.call_count("add_otctrade"), 0);

        form.reset();
        assert_eq!(form.mode(), &FormMode::Add);
        assert!(form.pair.is_empty());
    }

    #[tokio::test]
    async fn test_refused_add_is_not_reloaded() {
        let backend = MockBackend::new();
        backend.reply("add_otctrade", json!({"result": false, "message": "bad pair"}));

        let err = submit(&backend, &filled()).await.unwrap_err();
        assert_eq!(err.user_message(), "bad pair");
        assert_eq!(backend.call_count("query_otctrades"), 0);
    }

    #[tokio::test]
    async fn test_refused_delete_shows_message() {
        let backend = MockBackend::new();
        backend.reply("delete_otctrade", json!({"result": false, "message": "not found"}));

        let err = delete(&backend, &trade()).await.unwrap_err();
        assert_eq!(err, TradeError::Rpc(RpcError::Application("not found".to_string())));
        assert_eq!(err.user_message(), "not found");
        assert_eq!(backend.call_count("query_otctrades"), 0);
    }

    #[tokio::test]
    async fn test_delete_sends_full_record() {
        let backend = MockBackend::new();
        backend.reply("delete_otctrade", json!({"result": true}));

        let trades = delete(&backend, &trade()).await.unwrap();
        assert!(trades.is_empty());
        let sent: OtcTrade =
            serde_json::from_value(backend.calls_to("delete_otctrade")[0].args[0].clone()).unwrap();
        assert_eq!(sent, trade());
    }
}
