//! Tracks long-running backend tasks and routes their results to handlers.
//!
//! A `*_async` backend method answers at once with a task id. The monitor
//! records that id together with the task's kind, and the shell polls
//! `query_task_result` for every tracked id on a timer. A finished task is
//! untracked and its payload handed to every handler registered for the
//! task's kind.
//!
//! Polling is split in three steps so that no borrow of the monitor is held
//! while waiting on the backend:
//!
//! 1. [TaskMonitor::pending_ids] snapshots the tracked ids,
//! 2. [poll_completions] asks the backend about each of them,
//! 3. [TaskMonitor::deliver] dispatches whatever finished.

use std::collections::HashMap;

use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use crate::backend::Backend;
use crate::error::RpcError;
use crate::types::task::TaskHandle;
use crate::types::task::TaskId;
use crate::types::task::TaskKind;
use crate::types::task::TaskOutcome;
use crate::types::task::TaskPayload;
use crate::types::task::TaskRequest;

/// A completion handler. Handlers run on the UI thread and need not be `Send`.
pub type TaskHandler = Box<dyn FnMut(&TaskPayload)>;

/// Identifies one handler registration so it can be removed again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

/// A backend operation that has not reported completion yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTask {
    pub id: TaskId,
    pub kind: TaskKind,
    pub label: String,
}

struct Subscription {
    token: SubscriptionToken,
    handler: TaskHandler,
}

#[derive(Default)]
pub struct TaskMonitor {
    /// In submission order.
    pending: Vec<PendingTask>,
    /// Per kind, in subscription order.
    handlers: HashMap<TaskKind, Vec<Subscription>>,
    next_token: u64,
}

impl TaskMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `handler` the only handler for `kind`. Any handler registered
    /// earlier for the same kind, including ones added with
    /// [TaskMonitor::subscribe], is dropped.
    pub fn register_callback(
        &mut self,
        kind: TaskKind,
        handler: impl FnMut(&TaskPayload) + 'static,
    ) -> SubscriptionToken {
        if let Some(replaced) = self.handlers.remove(&kind) {
            debug!(
                "replacing {} handler(s) for {}",
                replaced.len(),
                kind.name()
            );
        }
        self.subscribe(kind, handler)
    }

    /// Adds `handler` after the existing handlers for `kind`.
    pub fn subscribe(
        &mut self,
        kind: TaskKind,
        handler: impl FnMut(&TaskPayload) + 'static,
    ) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.handlers.entry(kind).or_default().push(Subscription {
            token,
            handler: Box::new(handler),
        });
        token
    }

    /// Removes one registration. Returns false if the token is unknown.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        for subscriptions in self.handlers.values_mut() {
            if let Some(pos) = subscriptions.iter().position(|s| s.token == token) {
                subscriptions.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of handlers currently registered for `kind`.
    pub fn handler_count(&self, kind: TaskKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Starts tracking a task. Tracking an id twice keeps the newer record.
    pub fn track(&mut self, task: PendingTask) {
        debug!("tracking task {} ({})", task.id, task.kind.name());
        if let Some(existing) = self.pending.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        } else {
            self.pending.push(task);
        }
    }

    pub fn pending(&self) -> &[PendingTask] {
        &self.pending
    }

    pub fn pending_ids(&self) -> Vec<TaskId> {
        self.pending.iter().map(|t| t.id.clone()).collect()
    }

    pub fn is_tracked(&self, id: &TaskId) -> bool {
        self.pending.iter().any(|t| &t.id == id)
    }

    /// Stops tracking every task; their completions will be ignored.
    /// Handlers stay registered. Returns how many tasks were dropped.
    pub fn forget_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            info!("forgot {} pending task(s)", dropped);
        }
        dropped
    }

    /// Untracks the finished task and runs the handlers of its recorded kind.
    ///
    /// Returns false, and runs nothing, if the id is not tracked.
    pub fn deliver(&mut self, outcome: TaskOutcome) -> bool {
        let Some(pos) = self.pending.iter().position(|t| t.id == outcome.task_id) else {
            warn!("ignoring completion of untracked task {}", outcome.task_id);
            return false;
        };
        let task = self.pending.remove(pos);
        info!("task {} finished: {}", task.id, task.label);

        match self.handlers.get_mut(&task.kind) {
            Some(subscriptions) if !subscriptions.is_empty() => {
                for subscription in subscriptions.iter_mut() {
                    (subscription.handler)(&outcome.payload);
                }
            }
            _ => debug!("no handler for {}, dropping result", task.kind.name()),
        }
        true
    }

    /// Delivers every outcome in order. Returns how many were tracked.
    pub fn deliver_all(&mut self, outcomes: impl IntoIterator<Item = TaskOutcome>) -> usize {
        outcomes
            .into_iter()
            .map(|outcome| self.deliver(outcome))
            .filter(|delivered| *delivered)
            .count()
    }
}

/// Invokes the backend method behind `request` and returns the task to track.
///
/// A failed call, or a reply without a task id, is logged and returned; the
/// task is then never tracked and no completion will fire.
pub async fn start_task<B: Backend>(
    backend: &B,
    request: TaskRequest,
) -> Result<PendingTask, RpcError> {
    let reply: Result<TaskHandle, RpcError> = match &request {
        TaskRequest::ExchangeTotal {
            name,
            force_refresh,
        } => backend.query_exchange_total_async(name, *force_refresh).await,
        TaskRequest::Balances => backend.query_balances_async().await,
        TaskRequest::BlockchainTotal => backend.query_blockchain_total_async().await,
    };

    let handle = reply.map_err(|e| {
        warn!("could not start task '{}': {}", request.label(), e);
        e
    })?;
    if handle.task_id.0.is_empty() {
        warn!("backend returned no task id for '{}'", request.label());
        return Err(RpcError::EmptyReply("task id"));
    }

    Ok(PendingTask {
        id: handle.task_id,
        kind: request.kind(),
        label: request.label(),
    })
}

/// Asks the backend about each id and returns the finished ones, in the
/// order given. Ids whose poll fails stay unfinished and are retried on the
/// next poll.
pub async fn poll_completions<B: Backend>(backend: &B, ids: &[TaskId]) -> Vec<TaskOutcome> {
    let mut finished = Vec::new();
    for id in ids {
        match backend.query_task_result(id).await {
            Ok(Some(outcome)) => finished.push(outcome),
            Ok(None) => {}
            Err(e) => warn!("polling task {} failed: {}", id, e),
        }
    }
    finished
}
