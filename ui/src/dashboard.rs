//! The dashboard view-model: one box per exchange and per balance location.
//!
//! Boxes keep their raw USD value, so a currency switch only reformats.

use api::backend::Backend;
use api::currency::Currency;
use api::error::RpcError;
use api::error::UnknownCurrency;
use api::task_monitor::start_task;
use api::task_monitor::PendingTask;
use api::task_monitor::TaskMonitor;
use api::types::task::TaskKind;
use api::types::task::TaskPayload;
use api::types::task::TaskRequest;
use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use serde::Deserialize;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::result_cache::ResultCache;
use crate::result_cache::ResultKind;
use crate::result_cache::ResultUpdate;
use crate::settings::AppSettings;

pub const BANKS_ID: &str = "banks";
pub const BLOCKCHAIN_ID: &str = "blockchain";

const BANKS_ICON: &str = "🏦";
const BLOCKCHAIN_ICON: &str = "⛓";
const LOCATION_ICON: &str = "💰";
const EXCHANGE_ICON: &str = "📈";

pub fn location_icon(location: &str) -> &'static str {
    match location {
        BANKS_ID => BANKS_ICON,
        BLOCKCHAIN_ID => BLOCKCHAIN_ICON,
        _ => LOCATION_ICON,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardBox {
    pub kind: ResultKind,
    pub id: String,
    pub icon: String,
    pub usd_value: f64,
    /// `usd_value` in the main currency, with its icon.
    pub display: String,
}

/// Everything needed to redraw the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub main_currency: Currency,
    pub boxes: Vec<DashboardBox>,
}

impl DashboardSnapshot {
    /// Sum of every box, in USD.
    pub fn net_worth_usd(&self) -> f64 {
        self.boxes.iter().map(|b| b.usd_value).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dashboard {
    /// In creation order.
    boxes: Vec<DashboardBox>,
    visible: bool,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn boxes(&self) -> &[DashboardBox] {
        &self.boxes
    }

    pub fn find(&self, kind: ResultKind, id: &str) -> Option<&DashboardBox> {
        self.boxes.iter().find(|b| b.kind == kind && b.id == id)
    }

    fn insert(
        &mut self,
        kind: ResultKind,
        id: &str,
        icon: &str,
        usd_value: f64,
        settings: &AppSettings,
    ) -> bool {
        if self.find(kind, id).is_some() {
            return false;
        }
        self.boxes.push(DashboardBox {
            kind,
            id: id.to_string(),
            icon: icon.to_string(),
            usd_value,
            display: settings.format(usd_value),
        });
        true
    }

    /// Adds the box for exchange `name`. Returns false, changing nothing,
    /// if it is already there.
    pub fn render_exchange_box(
        &mut self,
        name: &str,
        usd_value: f64,
        icon: &str,
        settings: &AppSettings,
    ) -> bool {
        self.insert(ResultKind::Exchange, name, icon, usd_value, settings)
    }

    /// Adds the generic box `id`. Returns false, changing nothing, if it is
    /// already there. The currency icon comes from `settings`.
    pub fn render_box(
        &mut self,
        id: &str,
        icon: &str,
        usd_value: f64,
        settings: &AppSettings,
    ) -> bool {
        self.insert(ResultKind::Box, id, icon, usd_value, settings)
    }

    /// Overwrites the figure of an existing box.
    pub fn update_amount(
        &mut self,
        kind: ResultKind,
        id: &str,
        usd_value: f64,
        settings: &AppSettings,
    ) -> bool {
        match self.boxes.iter_mut().find(|b| b.kind == kind && b.id == id) {
            Some(b) => {
                b.usd_value = usd_value;
                b.display = settings.format(usd_value);
                true
            }
            None => false,
        }
    }

    /// Recomputes every display string from the raw values.
    pub fn reformat(&mut self, settings: &AppSettings) {
        for b in &mut self.boxes {
            b.display = settings.format(b.usd_value);
        }
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn snapshot(&self, settings: &AppSettings) -> DashboardSnapshot {
        DashboardSnapshot {
            main_currency: settings.main_currency,
            boxes: self.boxes.clone(),
        }
    }

    /// Rebuilds the boxes from `snapshot`, reformatted for `settings`.
    pub fn restore(&mut self, snapshot: DashboardSnapshot, settings: &AppSettings) {
        self.boxes = snapshot.boxes;
        self.reformat(settings);
    }
}

/// Switches the main currency and reformats every box. No RPC is made;
/// see [persist_main_currency].
pub fn set_main_currency(
    settings: &mut AppSettings,
    dashboard: &mut Dashboard,
    ticker: &str,
) -> Result<Currency, UnknownCurrency> {
    let currency = Currency::from_ticker(ticker)?;
    settings.main_currency = currency;
    dashboard.reformat(settings);
    info!("main currency is now {}", currency.ticker_symbol());
    Ok(currency)
}

/// Stores the main currency choice in the backend.
pub async fn persist_main_currency<B: Backend>(
    backend: &B,
    currency: Currency,
) -> Result<(), RpcError> {
    backend
        .set_main_currency(currency.ticker_symbol())
        .await?
        .into_result()
}

/// The first batch of work issued after sign-in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InitialLoad {
    pub tasks: Vec<PendingTask>,
    pub fiat_total: Option<f64>,
}

impl InitialLoad {
    /// Tracks the started tasks and caches the fiat total as the banks box.
    pub fn apply(self, monitor: &mut TaskMonitor, cache: &mut ResultCache) {
        for task in self.tasks {
            monitor.track(task);
        }
        if let Some(total) = self.fiat_total {
            cache.record(ResultUpdate {
                kind: ResultKind::Box,
                key: BANKS_ID.to_string(),
                value: total,
                icon: BANKS_ICON.to_string(),
            });
        }
    }
}

/// Starts one exchange total per connected exchange, the balances and the
/// blockchain total, then asks for the fiat total.
///
/// Tasks that fail to start are logged and left out; a failed fiat total
/// leaves the banks box unset.
pub async fn load_initial<B: Backend>(backend: &B, exchanges: &[String]) -> InitialLoad {
    let requests = exchanges
        .iter()
        .map(|name| TaskRequest::ExchangeTotal {
            name: name.clone(),
            force_refresh: true,
        })
        .chain([TaskRequest::Balances, TaskRequest::BlockchainTotal]);

    let mut load = InitialLoad::default();
    for request in requests {
        if let Ok(task) = start_task(backend, request).await {
            load.tasks.push(task);
        }
    }

    match backend.query_fiat_total().await {
        Ok(fiat) => load.fiat_total = Some(fiat.total),
        Err(e) => warn!("could not query the fiat total: {}", e),
    }
    debug!("initial load started {} tasks", load.tasks.len());
    load
}

/// Maps a completion to the cache entries it produces. Balance locations
/// named after a connected exchange feed that exchange's box.
pub fn results_from_payload(payload: &TaskPayload, exchanges: &[String]) -> Vec<ResultUpdate> {
    match payload {
        TaskPayload::ExchangeTotal { name, total } => vec![ResultUpdate {
            kind: ResultKind::Exchange,
            key: name.clone(),
            value: *total,
            icon: EXCHANGE_ICON.to_string(),
        }],
        TaskPayload::Balances { totals } => totals
            .iter()
            .map(|(location, total)| {
                if exchanges.contains(location) {
                    ResultUpdate {
                        kind: ResultKind::Exchange,
                        key: location.clone(),
                        value: *total,
                        icon: EXCHANGE_ICON.to_string(),
                    }
                } else {
                    ResultUpdate {
                        kind: ResultKind::Box,
                        key: location.clone(),
                        value: *total,
                        icon: location_icon(location).to_string(),
                    }
                }
            })
            .collect(),
        TaskPayload::BlockchainTotal { total } => vec![ResultUpdate {
            kind: ResultKind::Box,
            key: BLOCKCHAIN_ID.to_string(),
            value: *total,
            icon: BLOCKCHAIN_ICON.to_string(),
        }],
    }
}

/// Installs `handler` as the completion handler of every task kind.
pub fn register_result_handlers(
    monitor: &mut TaskMonitor,
    handler: impl FnMut(&TaskPayload) + Clone + 'static,
) {
    for kind in TaskKind::iter() {
        monitor.register_callback(kind, handler.clone());
    }
}
