use crate::error::RpcResult;
use crate::types::action_result::ActionResult;
use crate::types::otc_trade::OtcTrade;
use crate::types::otc_trade::OtcTradePayload;
use crate::types::settings::FiatTotal;
use crate::types::settings::Settings;
use crate::types::settings::UnlockResponse;
use crate::types::task::TaskHandle;
use crate::types::task::TaskId;
use crate::types::task::TaskOutcome;

#[tarpc::service]
pub trait BackendRpc {
    /// Returns the startup configuration: main currency, rates, precision.
    async fn get_settings() -> RpcResult<Settings>;

    /// Unlocks the named user's database. The reply lists connected exchanges.
    async fn unlock_user(username: String, password: String) -> RpcResult<UnlockResponse>;

    /// Starts computing the USD total held at one exchange.
    async fn query_exchange_total_async(name: String, force_refresh: bool)
        -> RpcResult<TaskHandle>;

    /// Starts computing the per-location balances.
    async fn query_balances_async() -> RpcResult<TaskHandle>;

    /// Starts computing the USD total held on blockchain accounts.
    async fn query_blockchain_total_async() -> RpcResult<TaskHandle>;

    /// Returns the USD total of manually tracked fiat balances.
    async fn query_fiat_total() -> RpcResult<FiatTotal>;

    /// Persists the main currency preference.
    async fn set_main_currency(ticker: String) -> RpcResult<ActionResult>;

    /// Returns every recorded OTC trade.
    async fn query_otctrades() -> RpcResult<Vec<OtcTrade>>;

    async fn add_otctrade(payload: OtcTradePayload) -> RpcResult<ActionResult>;

    async fn edit_otctrade(payload: OtcTradePayload) -> RpcResult<ActionResult>;

    /// Deletes the trade matching the given record.
    async fn delete_otctrade(trade: OtcTrade) -> RpcResult<ActionResult>;

    /// Returns the outcome of a task, or `None` while it is still running.
    async fn query_task_result(task_id: TaskId) -> RpcResult<Option<TaskOutcome>>;
}
