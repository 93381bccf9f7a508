use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Opaque handle the backend issues for an asynchronous computation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Immediate reply of every `*_async` backend method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub task_id: TaskId,
}

/// The logical kind of an asynchronous task. Completion handlers are keyed
/// by kind, not by id.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    QueryExchangeTotal,
    QueryBalances,
    QueryBlockchainTotal,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// A backend operation that can be started as a task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskRequest {
    ExchangeTotal { name: String, force_refresh: bool },
    Balances,
    BlockchainTotal,
}

impl TaskRequest {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::ExchangeTotal { .. } => TaskKind::QueryExchangeTotal,
            Self::Balances => TaskKind::QueryBalances,
            Self::BlockchainTotal => TaskKind::QueryBlockchainTotal,
        }
    }

    /// Human readable description, shown while the task is pending.
    pub fn label(&self) -> String {
        match self {
            Self::ExchangeTotal { name, .. } => format!("Querying {name} balance"),
            Self::Balances => "Querying balances".to_string(),
            Self::BlockchainTotal => "Querying blockchain balances".to_string(),
        }
    }
}

/// The result of a finished task, tagged by the kind that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskPayload {
    ExchangeTotal {
        name: String,
        total: f64,
    },
    Balances {
        /// USD value held per location (e.g. "banks", "kraken").
        totals: BTreeMap<String, f64>,
    },
    BlockchainTotal {
        total: f64,
    },
}

impl TaskPayload {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::ExchangeTotal { .. } => TaskKind::QueryExchangeTotal,
            Self::Balances { .. } => TaskKind::QueryBalances,
            Self::BlockchainTotal { .. } => TaskKind::QueryBlockchainTotal,
        }
    }
}

/// Reply of `query_task_result` once a task has finished.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: TaskId,
    pub payload: TaskPayload,
}
