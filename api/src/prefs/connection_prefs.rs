use std::env;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// How the client reaches (and optionally launches) the backend.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ConnectionPrefs {
    /// Localhost port the backend RPC server listens on.
    pub rpc_port: u16,
    /// How often pending tasks are polled for completion.
    pub task_poll_interval: Duration,
    /// Command line used to spawn the backend. `None` means the backend is
    /// started by someone else.
    pub backend_cmd: Option<String>,
}

impl ConnectionPrefs {
    /// Creates a ConnectionPrefs instance from environment variables,
    /// with in-code defaults.
    ///
    /// # Environment Variables
    /// - `BACKEND_RPC_PORT`: port number, defaults to 4242.
    /// - `TASK_POLL_INTERVAL_MS`: milliseconds, defaults to 2000.
    /// - `BACKEND_CMD`: command line of the backend executable.
    pub fn from_env() -> Self {
        const DEFAULT_PORT: u16 = 4242;
        const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

        let rpc_port = env::var("BACKEND_RPC_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let poll_ms = env::var("TASK_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        let backend_cmd = env::var("BACKEND_CMD")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Self {
            rpc_port,
            task_poll_interval: Duration::from_millis(poll_ms),
            backend_cmd,
        }
    }
}

impl Default for ConnectionPrefs {
    fn default() -> Self {
        Self::from_env()
    }
}
