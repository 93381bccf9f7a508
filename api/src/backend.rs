//! The contract every controller talks to, and its RPC implementation.

use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::SocketAddr;

use dioxus_logger::tracing::warn;
use tarpc::client;
use tarpc::context;
use tarpc::tokio_serde::formats::Json;

use crate::error::RpcError;
use crate::prefs::connection_prefs::ConnectionPrefs;
use crate::rpc_api::BackendRpcClient;
use crate::types::action_result::ActionResult;
use crate::types::otc_trade::OtcTrade;
use crate::types::otc_trade::OtcTradePayload;
use crate::types::settings::FiatTotal;
use crate::types::settings::Settings;
use crate::types::settings::UnlockResponse;
use crate::types::task::TaskHandle;
use crate::types::task::TaskId;
use crate::types::task::TaskOutcome;
use crate::ApiError;

/// Every backend method the client uses, with transport and backend-side
/// failures folded into [RpcError].
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn get_settings(&self) -> Result<Settings, RpcError>;

    async fn unlock_user(&self, username: &str, password: &str)
        -> Result<UnlockResponse, RpcError>;

    async fn query_exchange_total_async(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<TaskHandle, RpcError>;

    async fn query_balances_async(&self) -> Result<TaskHandle, RpcError>;

    async fn query_blockchain_total_async(&self) -> Result<TaskHandle, RpcError>;

    async fn query_fiat_total(&self) -> Result<FiatTotal, RpcError>;

    async fn set_main_currency(&self, ticker: &str) -> Result<ActionResult, RpcError>;

    async fn query_otctrades(&self) -> Result<Vec<OtcTrade>, RpcError>;

    async fn add_otctrade(&self, payload: &OtcTradePayload) -> Result<ActionResult, RpcError>;

    async fn edit_otctrade(&self, payload: &OtcTradePayload) -> Result<ActionResult, RpcError>;

    async fn delete_otctrade(&self, trade: &OtcTrade) -> Result<ActionResult, RpcError>;

    async fn query_task_result(&self, task_id: &TaskId) -> Result<Option<TaskOutcome>, RpcError>;
}

impl Backend for BackendRpcClient {
    async fn get_settings(&self) -> Result<Settings, RpcError> {
        Ok(BackendRpcClient::get_settings(self, context::current()).await??)
    }

    async fn unlock_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UnlockResponse, RpcError> {
        Ok(BackendRpcClient::unlock_user(
            self,
            context::current(),
            username.to_string(),
            password.to_string(),
        )
        .await??)
    }

    async fn query_exchange_total_async(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<TaskHandle, RpcError> {
        Ok(BackendRpcClient::query_exchange_total_async(
            self,
            context::current(),
            name.to_string(),
            force_refresh,
        )
        .await??)
    }

    async fn query_balances_async(&self) -> Result<TaskHandle, RpcError> {
        Ok(BackendRpcClient::query_balances_async(self, context::current()).await??)
    }

    async fn query_blockchain_total_async(&self) -> Result<TaskHandle, RpcError> {
        Ok(BackendRpcClient::query_blockchain_total_async(self, context::current()).await??)
    }

    async fn query_fiat_total(&self) -> Result<FiatTotal, RpcError> {
        Ok(BackendRpcClient::query_fiat_total(self, context::current()).await??)
    }

    async fn set_main_currency(&self, ticker: &str) -> Result<ActionResult, RpcError> {
        Ok(
            BackendRpcClient::set_main_currency(self, context::current(), ticker.to_string())
                .await??,
        )
    }

    async fn query_otctrades(&self) -> Result<Vec<OtcTrade>, RpcError> {
        Ok(BackendRpcClient::query_otctrades(self, context::current()).await??)
    }

    async fn add_otctrade(&self, payload: &OtcTradePayload) -> Result<ActionResult, RpcError> {
        Ok(BackendRpcClient::add_otctrade(self, context::current(), payload.clone()).await??)
    }

    async fn edit_otctrade(&self, payload: &OtcTradePayload) -> Result<ActionResult, RpcError> {
        Ok(BackendRpcClient::edit_otctrade(self, context::current(), payload.clone()).await??)
    }

    async fn delete_otctrade(&self, trade: &OtcTrade) -> Result<ActionResult, RpcError> {
        Ok(BackendRpcClient::delete_otctrade(self, context::current(), trade.clone()).await??)
    }

    async fn query_task_result(&self, task_id: &TaskId) -> Result<Option<TaskOutcome>, RpcError> {
        Ok(
            BackendRpcClient::query_task_result(self, context::current(), task_id.clone())
                .await??,
        )
    }
}

/// Talks to the backend over a JSON/TCP tarpc transport on localhost.
///
/// A fresh connection is made for every call: connecting on localhost is
/// very fast, and there is no cached client to invalidate after the backend
/// restarts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RpcBackend {
    socket: SocketAddr,
}

impl RpcBackend {
    pub fn new(prefs: &ConnectionPrefs) -> Self {
        Self {
            socket: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), prefs.rpc_port),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.socket
    }

    async fn rpc_client(&self) -> Result<BackendRpcClient, ApiError> {
        let transport = tarpc::serde_transport::tcp::connect(self.socket, Json::default).await?;
        Ok(BackendRpcClient::new(client::Config::default(), transport).spawn())
    }

    async fn client(&self) -> Result<BackendRpcClient, RpcError> {
        self.rpc_client().await.map_err(|e| {
            warn!("cannot reach backend at {}: {:#}", self.socket, e);
            RpcError::from(e)
        })
    }
}

impl Backend for RpcBackend {
    async fn get_settings(&self) -> Result<Settings, RpcError> {
        Backend::get_settings(&self.client().await?).await
    }

    async fn unlock_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UnlockResponse, RpcError> {
        Backend::unlock_user(&self.client().await?, username, password).await
    }

    async fn query_exchange_total_async(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<TaskHandle, RpcError> {
        Backend::query_exchange_total_async(&self.client().await?, name, force_refresh).await
    }

    async fn query_balances_async(&self) -> Result<TaskHandle, RpcError> {
        Backend::query_balances_async(&self.client().await?).await
    }

    async fn query_blockchain_total_async(&self) -> Result<TaskHandle, RpcError> {
        Backend::query_blockchain_total_async(&self.client().await?).await
    }

    async fn query_fiat_total(&self) -> Result<FiatTotal, RpcError> {
        Backend::query_fiat_total(&self.client().await?).await
    }

    async fn set_main_currency(&self, ticker: &str) -> Result<ActionResult, RpcError> {
        Backend::set_main_currency(&self.client().await?, ticker).await
    }

    async fn query_otctrades(&self) -> Result<Vec<OtcTrade>, RpcError> {
        Backend::query_otctrades(&self.client().await?).await
    }

    async fn add_otctrade(&self, payload: &OtcTradePayload) -> Result<ActionResult, RpcError> {
        Backend::add_otctrade(&self.client().await?, payload).await
    }

    async fn edit_otctrade(&self, payload: &OtcTradePayload) -> Result<ActionResult, RpcError> {
        Backend::edit_otctrade(&self.client().await?, payload).await
    }

    async fn delete_otctrade(&self, trade: &OtcTrade) -> Result<ActionResult, RpcError> {
        Backend::delete_otctrade(&self.client().await?, trade).await
    }

    async fn query_task_result(&self, task_id: &TaskId) -> Result<Option<TaskOutcome>, RpcError> {
        Backend::query_task_result(&self.client().await?, task_id).await
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use tarpc::server;
    use tarpc::server::Channel;

    use super::*;
    use crate::error::BackendError;
    use crate::error::RpcResult;
    use crate::rpc_api::BackendRpc;
    use crate::types::otc_trade::TradeType;
    use crate::types::task::TaskPayload;

    /// A minimal in-process backend serving canned replies.
    #[derive(Clone)]
    struct FakeBackend;

    impl BackendRpc for FakeBackend {
        async fn get_settings(self, _: context::Context) -> RpcResult<Settings> {
            Ok(Settings {
                main_currency: "EUR".to_string(),
                exchange_rates: [("EUR".to_string(), 0.9)].into_iter().collect(),
                floating_precision: 3,
            })
        }

        async fn unlock_user(
            self,
            _: context::Context,
            username: String,
            password: String,
        ) -> RpcResult<UnlockResponse> {
            Ok(UnlockResponse {
                result: username == "alice" && password == "pw",
                message: None,
                exchanges: vec!["kraken".to_string()],
            })
        }

        async fn query_exchange_total_async(
            self,
            _: context::Context,
            name: String,
            _force_refresh: bool,
        ) -> RpcResult<TaskHandle> {
            Ok(TaskHandle {
                task_id: TaskId(format!("exchange-{name}")),
            })
        }

        async fn query_balances_async(self, _: context::Context) -> RpcResult<TaskHandle> {
            Err(BackendError("balances unavailable".to_string()))
        }

        async fn query_blockchain_total_async(self, _: context::Context) -> RpcResult<TaskHandle> {
            Ok(TaskHandle {
                task_id: TaskId::from("chain"),
            })
        }

        async fn query_fiat_total(self, _: context::Context) -> RpcResult<FiatTotal> {
            Ok(FiatTotal { total: 10.0 })
        }

        async fn set_main_currency(self, _: context::Context, _: String) -> RpcResult<ActionResult> {
            Ok(ActionResult::ok())
        }

        async fn query_otctrades(self, _: context::Context) -> RpcResult<Vec<OtcTrade>> {
            Ok(vec![OtcTrade {
                id: None,
                timestamp: 1,
                pair: "BTC_EUR".to_string(),
                trade_type: TradeType::Sell,
                amount: "1".to_string(),
                rate: "2".to_string(),
                fee: String::new(),
                fee_currency: None,
                link: String::new(),
                notes: String::new(),
            }])
        }

        async fn add_otctrade(self, _: context::Context, _: OtcTradePayload) -> RpcResult<ActionResult> {
            Ok(ActionResult::ok())
        }

        async fn edit_otctrade(self, _: context::Context, _: OtcTradePayload) -> RpcResult<ActionResult> {
            Ok(ActionResult::ok())
        }

        async fn delete_otctrade(self, _: context::Context, _: OtcTrade) -> RpcResult<ActionResult> {
            Ok(ActionResult::refused("not found"))
        }

        async fn query_task_result(
            self,
            _: context::Context,
            task_id: TaskId,
        ) -> RpcResult<Option<TaskOutcome>> {
            Ok((task_id.0 == "chain").then(|| TaskOutcome {
                task_id,
                payload: TaskPayload::BlockchainTotal { total: 42.0 },
            }))
        }
    }

    fn spawn_fake_backend() -> BackendRpcClient {
        let (client_transport, server_transport) = tarpc::transport::channel::unbounded();
        let server = server::BaseChannel::with_defaults(server_transport);
        tokio::spawn(
            server
                .execute(FakeBackend.serve())
                .for_each(|response| async move {
                    tokio::spawn(response);
                }),
        );
        BackendRpcClient::new(client::Config::default(), client_transport).spawn()
    }

    #[tokio::test]
    async fn test_typed_calls_over_tarpc_channel() {
        let client = spawn_fake_backend();

        let settings = Backend::get_settings(&client).await.unwrap();
        assert_eq!(settings.main_currency, "EUR");
        assert_eq!(settings.floating_precision, 3);

        let unlock = Backend::unlock_user(&client, "alice", "pw").await.unwrap();
        assert_eq!(unlock.into_exchanges(), Ok(vec!["kraken".to_string()]));

        let handle = Backend::query_exchange_total_async(&client, "kraken", true)
            .await
            .unwrap();
        assert_eq!(handle.task_id, TaskId::from("exchange-kraken"));

        let trades = Backend::query_otctrades(&client).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].trade_type, TradeType::Sell);
    }

    #[tokio::test]
    async fn test_backend_error_surfaces_as_transport() {
        let client = spawn_fake_backend();

        let err = Backend::query_balances_async(&client).await.unwrap_err();
        assert_eq!(err, RpcError::Transport("balances unavailable".to_string()));
    }

    #[tokio::test]
    async fn test_task_result_is_none_while_running() {
        let client = spawn_fake_backend();

        let running = Backend::query_task_result(&client, &TaskId::from("other"))
            .await
            .unwrap();
        assert_eq!(running, None);

        let done = Backend::query_task_result(&client, &TaskId::from("chain"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.payload, TaskPayload::BlockchainTotal { total: 42.0 });
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        // nothing listens on port 1 of localhost.
        let backend = RpcBackend {
            socket: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 1),
        };
        let err = backend.get_settings().await.unwrap_err();
        assert!(err.is_transport());
    }
}
