//! What a sign-in and a sign-out do to the client state.
//!
//! The state lives in signals in the app, and in plain values in tests; both
//! are reached through [SessionStore], one short synchronous borrow at a
//! time, so nothing is held across the backend calls in between.

use api::backend::Backend;
use api::error::RpcError;
use api::task_monitor::TaskMonitor;
use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::info;

use crate::auth_flow::AuthFlow;
use crate::dashboard::load_initial;
use crate::dashboard::Dashboard;
use crate::dashboard::InitialLoad;
use crate::result_cache::ResultCache;
use crate::settings::AppSettings;
use crate::trade_form::TradeForm;
use crate::trade_table::TradeTable;

/// Mutable view of everything a session touches.
pub struct Session<'a> {
    pub settings: &'a mut AppSettings,
    pub auth: &'a mut AuthFlow,
    pub dashboard: &'a mut Dashboard,
    pub results: &'a mut ResultCache,
    pub monitor: &'a mut TaskMonitor,
    pub trades: &'a mut TradeTable,
    pub trade_form: &'a mut TradeForm,
}

impl Session<'_> {
    /// Applies the outcome of `unlock_user`. Returns the connected exchanges
    /// when the user is now signed in.
    pub fn enter(&mut self, outcome: Result<Vec<String>, RpcError>) -> Option<Vec<String>> {
        let exchanges = self.auth.finish(outcome)?;
        self.settings.exchanges = exchanges.clone();
        Some(exchanges)
    }

    /// Tracks the started tasks, caches the fiat total and renders whatever
    /// the dashboard can show now. Returns the number of tracked tasks.
    pub fn apply_initial_load(&mut self, load: InitialLoad) -> usize {
        let started = load.tasks.len();
        load.apply(self.monitor, self.results);
        self.results.reapply_unapplied(self.dashboard, self.settings);
        started
    }

    /// Drops everything the signed-in user saw. Completion handlers stay
    /// registered; completions of forgotten tasks are ignored.
    pub fn reset(&mut self) {
        self.auth.logout();
        let forgotten = self.monitor.forget_pending();
        self.dashboard.clear();
        *self.results = ResultCache::new();
        *self.trades = TradeTable::new();
        self.trade_form.reset();
        self.settings.exchanges.clear();
        info!("session reset, {} pending tasks forgotten", forgotten);
    }
}

/// Short exclusive access to the session state.
pub trait SessionStore {
    fn update<R>(&mut self, f: impl FnOnce(&mut Session<'_>) -> R) -> R;
}

/// Completes a sign-in once `unlock_user` has answered: enters the session
/// and issues the initial dashboard batch. Returns the number of tracked
/// tasks, or `None` when the user is still signed out.
pub async fn start_session<B: Backend, S: SessionStore>(
    backend: &B,
    store: &mut S,
    outcome: Result<Vec<String>, RpcError>,
) -> Option<usize> {
    let exchanges = store.update(|s| s.enter(outcome))?;
    let load = load_initial(backend, &exchanges).await;
    let tracked = store.update(|s| s.apply_initial_load(load));
    debug!("session started with {} tracked tasks", tracked);
    Some(tracked)
}
