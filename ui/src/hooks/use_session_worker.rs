use std::rc::Rc;

use api::backend::Backend;
use api::currency::Currency;
use api::types::otc_trade::OtcTrade;
use dioxus::prelude::*;
use dioxus_logger::tracing::debug;
use futures::StreamExt;

use crate::app_state_mut::AppStateMut;
use crate::auth_flow::unlock;
use crate::auth_flow::Credentials;
use crate::dashboard::persist_main_currency;
use crate::hooks::use_backend_checker::use_backend_checker;
use crate::hooks::use_backend_checker::BackendChecker;
use crate::session::start_session;
use crate::trade_form;
use crate::trade_form::TradeError;
use crate::trade_form::TradeForm;

/// Backend work a screen asks for. It runs in the scope of the app shell,
/// so it completes even when the screen that asked is gone.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    /// `begin` already moved the flow to Authenticating.
    SignIn(Credentials),
    PersistCurrency(Currency),
    ReloadTrades,
    SubmitTrade(TradeForm),
    DeleteTrade(OtcTrade),
}

/// Runs [SessionCommand]s one at a time. Screens send to it through
/// `use_coroutine_handle::<SessionCommand>()`.
///
/// Needs the `Signal<BackendConnectionStatus>` context.
pub fn use_session_worker<B: Backend + 'static>(
    backend: Rc<B>,
    state: AppStateMut,
) -> Coroutine<SessionCommand> {
    let checker = use_backend_checker();
    use_coroutine(move |mut rx: UnboundedReceiver<SessionCommand>| {
        let backend = backend.clone();
        let mut state = state;
        let mut checker = checker;
        async move {
            while let Some(command) = rx.next().await {
                run(&*backend, &mut state, &mut checker, command).await;
            }
        }
    })
}

async fn run<B: Backend>(
    backend: &B,
    state: &mut AppStateMut,
    checker: &mut BackendChecker,
    command: SessionCommand,
) {
    match command {
        SessionCommand::SignIn(credentials) => {
            let outcome = checker.check(unlock(backend, &credentials).await);
            if let Some(tracked) = start_session(backend, state, outcome).await {
                debug!("initial batch issued, {} tasks tracked", tracked);
            }
        }
        SessionCommand::PersistCurrency(currency) => {
            if let Err(e) = persist_main_currency(backend, currency).await {
                checker.check_error(&e);
                state.notice.show("Could not save the currency", e.user_message());
            }
        }
        SessionCommand::ReloadTrades => match checker.check(trade_form::reload(backend).await) {
            Ok(trades) => state.trades.write().replace(trades),
            Err(e) => report(state, checker, e.into()),
        },
        SessionCommand::SubmitTrade(form) => {
            state.saving_trade.set(true);
            let result = trade_form::submit(backend, &form).await;
            state.saving_trade.set(false);
            match result {
                Ok(trades) => {
                    state.trades.write().replace(trades);
                    state.trade_form.write().reset();
                }
                Err(e) => report(state, checker, e),
            }
        }
        SessionCommand::DeleteTrade(trade) => match trade_form::delete(backend, &trade).await {
            Ok(trades) => state.trades.write().replace(trades),
            Err(e) => report(state, checker, e),
        },
    }
}

fn report(state: &mut AppStateMut, checker: &mut BackendChecker, e: TradeError) {
    if let TradeError::Rpc(rpc) = &e {
        checker.check_error(rpc);
    }
    state.notice.show("Trade not saved", e.user_message());
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::app_state_mut::use_app_state_mut;
    use crate::dashboard::BANKS_ID;
    use crate::hooks::use_backend_checker::BackendConnectionStatus;
    use crate::result_cache::ResultKind;
    use crate::settings::AppSettings;
    use api::mock::MockBackend;
    use api::prefs::display_preference::DisplayPreference;
    use dioxus::dioxus_core::NoOpMutations;
    use dioxus::dioxus_core::VirtualDom;
    use serde_json::json;

    thread_local! {
        static BACKEND: Rc<MockBackend> = Rc::new(MockBackend::new());
        static STATE: Cell<Option<AppStateMut>> = const { Cell::new(None) };
    }

    /// The sign-in prompt in miniature: it starts a sign-in, and the shell
    /// unmounts it as soon as the user is signed in.
    #[component]
    fn Prompt() -> Element {
        let worker = use_coroutine_handle::<SessionCommand>();
        let mut state = use_context::<AppStateMut>();
        use_hook(move || {
            spawn(async move {
                let credentials = state.auth.write().begin("alice", "pw");
                if let Ok(credentials) = credentials {
                    worker.send(SessionCommand::SignIn(credentials));
                }
            })
        });
        rsx! { p { "sign in" } }
    }

    #[component]
    fn Shell() -> Element {
        let connection = use_signal(|| BackendConnectionStatus::Connected);
        use_context_provider(|| connection);
        let prefs = DisplayPreference {
            fallback_currency: Currency::USD,
            floating_precision: 2,
        };
        let state = use_app_state_mut(AppSettings::from_prefs(&prefs));
        use_context_provider(|| state);
        let backend = use_hook(|| BACKEND.with(Rc::clone));
        use_session_worker(backend, state);
        use_hook(|| STATE.with(|s| s.set(Some(state))));

        if state.auth.read().is_logged_in() {
            rsx! { p { "signed in" } }
        } else {
            rsx! { Prompt {} }
        }
    }

    async fn drive(dom: &mut VirtualDom) {
        for _ in 0..50 {
            if tokio::time::timeout(Duration::from_millis(50), dom.wait_for_work())
                .await
                .is_err()
            {
                break;
            }
            dom.render_immediate(&mut NoOpMutations);
        }
    }

    #[tokio::test]
    async fn test_initial_batch_completes_after_prompt_unmounts() {
        BACKEND.with(|backend| {
            // every call yields, so the prompt is gone before the batch is out
            backend.set_latency(Duration::from_millis(5));
            backend.reply("unlock_user", json!({"result": true, "exchanges": ["kraken"]}));
            backend.reply("query_fiat_total", json!({"total": 1200.0}));
        });

        let mut dom = VirtualDom::new(Shell);
        dom.rebuild_in_place();
        drive(&mut dom).await;

        let state = STATE.with(Cell::get).unwrap();
        dom.in_runtime(|| {
            assert!(state.auth.peek().is_logged_in());
            assert_eq!(state.monitor.peek().pending().len(), 3);
            let results = state.results.peek();
            assert_eq!(results.get(ResultKind::Box, BANKS_ID).unwrap().value, 1200.0);
        });
        BACKEND.with(|backend| {
            assert_eq!(backend.call_count("query_exchange_total_async"), 1);
            assert_eq!(backend.call_count("query_balances_async"), 1);
            assert_eq!(backend.call_count("query_blockchain_total_async"), 1);
            assert_eq!(backend.call_count("query_fiat_total"), 1);
        });
    }
}
