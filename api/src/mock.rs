//! A scripted [Backend] for tests. Every call is recorded; replies are
//! queued per method name.

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;

use crate::backend::Backend;
use crate::error::RpcError;
use crate::types::action_result::ActionResult;
use crate::types::otc_trade::OtcTrade;
use crate::types::otc_trade::OtcTradePayload;
use crate::types::settings::FiatTotal;
use crate::types::settings::Settings;
use crate::types::settings::UnlockResponse;
use crate::types::task::TaskHandle;
use crate::types::task::TaskId;
use crate::types::task::TaskOutcome;

/// One call as seen by the mock.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub args: Vec<Value>,
}

/// When no reply is queued, `*_async` methods hand out fresh task ids,
/// `query_task_result` answers "still running", `query_otctrades` answers
/// an empty list, and everything else fails with a transport error.
#[derive(Default)]
pub struct MockBackend {
    calls: RefCell<Vec<RecordedCall>>,
    replies: RefCell<HashMap<&'static str, VecDeque<Result<Value, RpcError>>>>,
    next_task: Cell<u64>,
    latency: Cell<Option<Duration>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply for `method`.
    pub fn reply(&self, method: &'static str, value: impl Serialize) -> &Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.replies
            .borrow_mut()
            .entry(method)
            .or_default()
            .push_back(Ok(value));
        self
    }

    /// Queues a failure for `method`.
    pub fn fail(&self, method: &'static str, error: RpcError) -> &Self {
        self.replies
            .borrow_mut()
            .entry(method)
            .or_default()
            .push_back(Err(error));
        self
    }

    /// Makes every call wait `latency` before it is answered.
    pub fn set_latency(&self, latency: Duration) -> &Self {
        self.latency.set(Some(latency));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.method == method).count()
    }

    fn default_reply(&self, method: &'static str) -> Result<Value, RpcError> {
        if method.ends_with("_async") {
            let n = self.next_task.get() + 1;
            self.next_task.set(n);
            return Ok(json!({ "task_id": format!("task-{n}") }));
        }
        match method {
            "query_task_result" => Ok(Value::Null),
            "query_otctrades" => Ok(json!([])),
            _ => Err(RpcError::Transport(format!("no scripted reply for {method}"))),
        }
    }

    async fn answer<T: DeserializeOwned>(
        &self,
        method: &'static str,
        args: Vec<Value>,
    ) -> Result<T, RpcError> {
        if let Some(latency) = self.latency.get() {
            tokio::time::sleep(latency).await;
        }
        self.calls.borrow_mut().push(RecordedCall { method, args });
        let queued = self
            .replies
            .borrow_mut()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        let value = match queued {
            Some(reply) => reply?,
            None => self.default_reply(method)?,
        };
        serde_json::from_value(value)
            .map_err(|e| RpcError::Transport(format!("malformed reply to {method}: {e}")))
    }
}

fn arg(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

impl Backend for MockBackend {
    async fn get_settings(&self) -> Result<Settings, RpcError> {
        self.answer("get_settings", vec![]).await
    }

    async fn unlock_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UnlockResponse, RpcError> {
        self.answer("unlock_user", vec![arg(username), arg(password)]).await
    }

    async fn query_exchange_total_async(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<TaskHandle, RpcError> {
        self.answer(
            "query_exchange_total_async",
            vec![arg(name), arg(force_refresh)],
        )
        .await
    }

    async fn query_balances_async(&self) -> Result<TaskHandle, RpcError> {
        self.answer("query_balances_async", vec![]).await
    }

    async fn query_blockchain_total_async(&self) -> Result<TaskHandle, RpcError> {
        self.answer("query_blockchain_total_async", vec![]).await
    }

    async fn query_fiat_total(&self) -> Result<FiatTotal, RpcError> {
        self.answer("query_fiat_total", vec![]).await
    }

    async fn set_main_currency(&self, ticker: &str) -> Result<ActionResult, RpcError> {
        self.answer("set_main_currency", vec![arg(ticker)]).await
    }

    async fn query_otctrades(&self) -> Result<Vec<OtcTrade>, RpcError> {
        self.answer("query_otctrades", vec![]).await
    }

    async fn add_otctrade(&self, payload: &OtcTradePayload) -> Result<ActionResult, RpcError> {
        self.answer("add_otctrade", vec![arg(payload)]).await
    }

    async fn edit_otctrade(&self, payload: &OtcTradePayload) -> Result<ActionResult, RpcError> {
        self.answer("edit_otctrade", vec![arg(payload)]).await
    }

    async fn delete_otctrade(&self, trade: &OtcTrade) -> Result<ActionResult, RpcError> {
        self.answer("delete_otctrade", vec![arg(trade)]).await
    }

    async fn query_task_result(&self, task_id: &TaskId) -> Result<Option<TaskOutcome>, RpcError> {
        self.answer("query_task_result", vec![arg(task_id)]).await
    }
}
