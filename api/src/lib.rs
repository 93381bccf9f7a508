//! This crate contains everything that talks to the backend: the typed RPC
//! contract, the [backend::Backend] trait controllers are written against,
//! the task monitor, and the local prefs and currency data.

pub mod amount;
pub mod backend;
pub mod backend_process;
pub mod currency;
pub mod error;
pub mod exchange_rates;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod prefs;
pub mod rpc_api;
pub mod task_monitor;
pub mod types;

pub type ApiError = anyhow::Error;
