use dioxus::prelude::*;

use crate::app_state_mut::AppStateMut;
use crate::components::currency_chooser::CurrencyChooser;
use crate::components::empty_state::EmptyState;
use crate::components::pico::Card;
use crate::dashboard::set_main_currency;
use crate::dashboard::DashboardBox;
use crate::hooks::use_session_worker::SessionCommand;

#[component]
fn BalanceBox(item: DashboardBox) -> Element {
    rsx! {
        article {
            style: "margin: 0;",
            header {
                style: "display: flex; gap: 0.5rem; align-items: center;",
                span { style: "font-size: 1.5rem;", "{item.icon}" }
                strong { "{item.id}" }
            }
            h3 { style: "margin: 0;", "{item.display}" }
        }
    }
}

#[component]
pub fn DashboardScreen() -> Element {
    let mut state = use_context::<AppStateMut>();
    let worker = use_coroutine_handle::<SessionCommand>();

    let settings = state.settings.read().clone();
    let snapshot = state.dashboard.read().snapshot(&settings);
    let pending = state.monitor.read().pending().to_vec();
    let net_worth = settings.format(snapshot.net_worth_usd());

    rsx! {
        Card {
            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                div {
                    h3 { style: "margin-bottom: 0.25rem;", "Net Worth" }
                    h2 { style: "margin: 0;", "{net_worth}" }
                }
                CurrencyChooser {
                    selected: snapshot.main_currency,
                    on_select: move |ticker: &'static str| {
                        let changed = set_main_currency(
                            &mut state.settings.write(),
                            &mut state.dashboard.write(),
                            ticker,
                        );
                        match changed {
                            Ok(currency) => worker.send(SessionCommand::PersistCurrency(currency)),
                            Err(e) => state.notice.show("Unknown currency", e.to_string()),
                        }
                    },
                }
            }
        }
        if !pending.is_empty() {
            Card {
                p { "{pending.len()} operation(s) in progress" }
                ul {
                    for task in pending {
                        li { key: "{task.id}", "{task.label}" }
                    }
                }
                progress {}
            }
        }
        if snapshot.boxes.is_empty() {
            EmptyState {
                title: "No balances yet",
                description: Some("Figures appear here as the backend finishes its queries.".to_string()),
                icon: Some("💰".to_string()),
            }
        } else {
            div {
                style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(14rem, 1fr)); gap: 1rem; overflow-y: auto;",
                for item in snapshot.boxes {
                    BalanceBox { key: "{item.kind:?}-{item.id}", item }
                }
            }
        }
    }
}
