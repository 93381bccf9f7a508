//! Defines the mutable, reactive state for the application's UI.

use api::task_monitor::TaskMonitor;
use dioxus::prelude::*;

use crate::auth_flow::AuthFlow;
use crate::components::error_notice::use_error_notice;
use crate::components::error_notice::ErrorNotice;
use crate::dashboard::register_result_handlers;
use crate::dashboard::results_from_payload;
use crate::dashboard::Dashboard;
use crate::result_cache::ResultCache;
use crate::session::Session;
use crate::session::SessionStore;
use crate::settings::AppSettings;
use crate::trade_form::TradeForm;
use crate::trade_table::TradeTable;

/// A reactive state provided as a Dioxus context for mutable UI data.
///
/// This struct holds `Signal`s for any UI-related state that needs to change
/// and trigger automatic re-renders in the view. It is separate from the core,
/// immutable `AppState`.
#[derive(Clone, Copy)]
pub struct AppStateMut {
    pub settings: Signal<AppSettings>,
    pub auth: Signal<AuthFlow>,
    pub dashboard: Signal<Dashboard>,
    /// Outlives the dashboard screen, so revisits need no backend call.
    pub results: Signal<ResultCache>,
    pub monitor: Signal<TaskMonitor>,
    pub trades: Signal<TradeTable>,
    /// Kept here so a save survives switching tabs.
    pub trade_form: Signal<TradeForm>,
    pub saving_trade: Signal<bool>,
    pub notice: ErrorNotice,
}

/// Creates the signals. Task completions land in the result cache, and on
/// the dashboard when it is shown.
pub fn use_app_state_mut(settings: AppSettings) -> AppStateMut {
    let settings = use_signal(|| settings);
    let auth = use_signal(AuthFlow::new);
    let dashboard = use_signal(Dashboard::new);
    let results = use_signal(ResultCache::new);
    let trades = use_signal(TradeTable::new);
    let trade_form = use_signal(TradeForm::new);
    let saving_trade = use_signal(|| false);
    let notice = use_error_notice();
    let monitor = use_signal(move || {
        let mut monitor = TaskMonitor::new();
        register_result_handlers(&mut monitor, move |payload| {
            let updates = results_from_payload(payload, &settings.peek().exchanges);
            let mut results = results;
            let mut cache = results.write();
            for update in updates {
                cache.record(update);
            }
            let mut dashboard = dashboard;
            cache.reapply_unapplied(&mut dashboard.write(), &settings.peek());
        });
        monitor
    });

    AppStateMut {
        settings,
        auth,
        dashboard,
        results,
        monitor,
        trades,
        trade_form,
        saving_trade,
        notice,
    }
}

impl SessionStore for AppStateMut {
    fn update<R>(&mut self, f: impl FnOnce(&mut Session<'_>) -> R) -> R {
        let mut settings = self.settings.write();
        let mut auth = self.auth.write();
        let mut dashboard = self.dashboard.write();
        let mut results = self.results.write();
        let mut monitor = self.monitor.write();
        let mut trades = self.trades.write();
        let mut trade_form = self.trade_form.write();
        f(&mut Session {
            settings: &mut settings,
            auth: &mut auth,
            dashboard: &mut dashboard,
            results: &mut results,
            monitor: &mut monitor,
            trades: &mut trades,
            trade_form: &mut trade_form,
        })
    }
}
