// The client-side Dioxus application logic.

use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;

mod app_state;
mod app_state_mut;
pub mod auth_flow;
mod components;
pub mod dashboard;
pub mod hooks;
pub mod result_cache;
mod screens;
pub mod session;
pub mod settings;
pub mod trade_form;
pub mod trade_table;

use api::backend::RpcBackend;
use api::backend_process::BackendFailure;
use api::backend_process::BackendProcess;
use api::prefs::user_prefs::UserPrefs;
use api::task_monitor::poll_completions;
use app_state::AppState;
use app_state_mut::use_app_state_mut;
use components::error_notice::ErrorModal;
use components::pico::Button;
use components::pico::ButtonType;
use components::pico::Container;
use hooks::use_backend_checker::is_connection_error;
use hooks::use_backend_checker::BackendConnectionStatus;
use hooks::use_session_worker::use_session_worker;
use screens::dashboard::DashboardScreen;
use screens::fatal_error::FatalErrorScreen;
use screens::otc_trades::OtcTradesScreen;
use screens::sign_in::SignInScreen;
use session::SessionStore;
use settings::AppSettings;
use tokio::sync::mpsc;

/// How long a freshly spawned backend gets to open its port.
const BACKEND_STARTUP_ATTEMPTS: u32 = 20;
const BACKEND_STARTUP_DELAY: Duration = Duration::from_millis(500);

/// Enum to represent the different screens in our application.
#[derive(Clone, Copy, PartialEq, Default)]
enum Screen {
    #[default]
    Dashboard,
    OtcTrades,
}

impl Screen {
    /// Helper to get the display name for each screen.
    fn name(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::OtcTrades => "OTC Trades",
        }
    }
}

/// A list of all available screens for easy iteration.
const ALL_SCREENS: [Screen; 2] = [Screen::Dashboard, Screen::OtcTrades];

/// The navigation tabs component.
#[component]
fn Tabs(active_screen: Signal<Screen>) -> Element {
    rsx! {
        nav {
            class: "tab-menu",
            ul {
                for screen in ALL_SCREENS {
                    li {
                        a {
                            href: "#",
                            class: if active_screen() == screen { "active-tab" } else { "" },
                            "aria-current": if active_screen() == screen { "page" } else { "false" },
                            onclick: move |event| {
                                event.prevent_default();
                                active_screen.set(screen);
                            },
                            "{screen.name()}"
                        }
                    }
                }
            }
        }
    }
}

//=============================================================================
// MAIN APPLICATION COMPONENT
//=============================================================================

#[allow(non_snake_case)]
pub fn App() -> Element {
    let responsive_css = r#"
    * { box-sizing: border-box; }

    html, body {
        height: 100%;
        width: 100%;
        margin: 0;
        padding: 0;
        overflow: hidden;
    }

    .app-main-container {
        position: fixed;
        top: 0; left: 0; right: 0; bottom: 0;
        padding: 10px;
        display: flex;
        flex-direction: column;
        overflow: hidden;
    }

    .app-main-container > * {
        flex: 1;
        display: flex !important;
        flex-direction: column;
        height: 100%;
        min-height: 0;
        overflow: hidden;
        margin: 0 !important;
        width: 100% !important;
        max-width: 100% !important;
    }

    .app-main-container header {
        flex-shrink: 0;
        padding: 0 1rem;
        --pico-nav-element-spacing-vertical: 0.5rem;
    }

    .tab-menu a.active-tab {
        color: var(--pico-primary) !important;
        text-decoration: none;
        border-radius: 10px 10px 0 0;
        border-top: 3px solid color-mix(in srgb, var(--pico-primary), transparent 90%) !important;
        background: linear-gradient(
            to bottom,
            color-mix(in srgb, var(--pico-primary), transparent 97%),
            transparent
        );
    }

    .tab-menu a:not(.active-tab) {
        color: var(--pico-muted-color);
        border-bottom: 3px solid transparent;
    }

    .app-main-container .content {
        flex: 1;
        display: flex;
        flex-direction: column;
        overflow-y: auto;
        min-height: 0;
        padding: 0 1rem;
    }
"#;

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.cyan.min.css",
        }
        style {
            "{responsive_css}"
        }
        AppBody {}
    }
}

/// Starts `BACKEND_CMD`, if configured, and forwards its death to `failure`.
/// Returns whether a backend was spawned.
fn start_backend(prefs: &UserPrefs, mut failure: Signal<Option<BackendFailure>>) -> bool {
    let Some(command_line) = prefs.connection().backend_cmd.clone() else {
        return false;
    };
    match BackendProcess::spawn(&command_line) {
        Ok(process) => {
            let (tx, mut rx) = mpsc::unbounded_channel();
            spawn(process.supervise(tx));
            spawn(async move {
                if let Some(f) = rx.recv().await {
                    failure.set(Some(f));
                }
            });
            true
        }
        Err(e) => {
            dioxus_logger::tracing::error!("{:#}", e);
            // nobody waits on the acknowledgment of a spawn failure.
            let (f, _) = BackendFailure::new(format!("{e:#}"));
            failure.set(Some(f));
            false
        }
    }
}

#[component]
fn AppBody() -> Element {
    let prefs = use_hook(UserPrefs::default);
    let failure = use_signal(|| None::<BackendFailure>);
    let spawned = use_hook({
        let prefs = prefs.clone();
        move || start_backend(&prefs, failure)
    });

    let mut initial_data = use_resource(move || {
        let prefs = prefs.clone();
        async move {
            let backend = RpcBackend::new(prefs.connection());
            let attempts = if spawned { BACKEND_STARTUP_ATTEMPTS } else { 1 };
            let mut attempt = 1;
            loop {
                match settings::load_settings(&backend, prefs.display_preference()).await {
                    Ok(settings) => {
                        dioxus_logger::tracing::info!("prefs: {:#?}", prefs);
                        return Ok((prefs, settings));
                    }
                    Err(e) if attempt < attempts && is_connection_error(&e) => {
                        attempt += 1;
                        tokio::time::sleep(BACKEND_STARTUP_DELAY).await;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    });

    if failure.read().is_some() {
        return rsx! {
            Container {
                FatalErrorScreen { failure }
            }
        };
    }

    let body = match &*initial_data.read() {
        Some(Ok((prefs, settings))) => rsx! {
            LoadedApp {
                user_prefs: prefs.clone(),
                settings: settings.clone(),
            }
        },
        Some(Err(e)) => rsx! {
            Container {
                article {
                    h3 { "Cannot reach the backend" }
                    p { "{e.user_message()}" }
                    button {
                        onclick: move |_| initial_data.restart(),
                        "Retry"
                    }
                }
            }
        },
        None => rsx! {
            Container {
                p { "Loading settings..." }
                progress {}
            }
        },
    };
    body
}

/// This component holds the main app logic and only runs when settings are
/// loaded.
#[component]
fn LoadedApp(user_prefs: UserPrefs, settings: AppSettings) -> Element {
    // Provide the stable, non-reactive AppState.
    let app_state = use_context_provider(|| AppState::new(user_prefs.clone()));

    // The connection status must be provided before the session worker asks
    // for it.
    let connection_status = use_signal(|| BackendConnectionStatus::Connected);
    use_context_provider(|| connection_status);

    let mut state = use_app_state_mut(settings);
    use_context_provider(|| state);

    // screens hand their backend work to this, so it outlives them.
    let backend = app_state.backend;
    let shared_backend = use_hook(|| Rc::new(backend));
    use_session_worker(shared_backend, state);

    // poll the backend for finished tasks.
    let poll_interval = user_prefs.connection().task_poll_interval;
    use_coroutine(move |_rx: UnboundedReceiver<()>| async move {
        loop {
            tokio::time::sleep(poll_interval).await;
            let ids = state.monitor.peek().pending_ids();
            if ids.is_empty() {
                continue;
            }
            let finished = poll_completions(&backend, &ids).await;
            if !finished.is_empty() {
                state.monitor.write().deliver_all(finished);
            }
        }
    });

    let mut active_screen = use_signal(Screen::default);
    let logged_in = state.auth.read().is_logged_in();

    // the dashboard counts as visible only while its tab is shown.
    use_effect(move || {
        let visible = active_screen() == Screen::Dashboard && state.auth.read().is_logged_in();
        if state.dashboard.peek().is_visible() != visible {
            state.dashboard.write().set_visible(visible);
            if visible {
                state
                    .results
                    .write()
                    .reapply_unapplied(&mut state.dashboard.write(), &state.settings.peek());
            }
        }
    });

    let logout = move |_: MouseEvent| {
        state.update(|s| s.reset());
        active_screen.set(Screen::Dashboard);
    };

    let username = match state.auth.read().state() {
        auth_flow::AuthState::LoggedIn { username, .. } => username.clone(),
        _ => String::new(),
    };
    let disconnected = match &*connection_status.read() {
        BackendConnectionStatus::Disconnected(reason) => Some(reason.clone()),
        BackendConnectionStatus::Connected => None,
    };

    rsx! {
        div {
            class: "app-main-container",
            Container {
                header {
                    nav {
                        ul {
                            li { strong { "Portfolio Desk" } }
                            if logged_in {
                                li {
                                    Tabs {
                                        active_screen,
                                    }
                                }
                            }
                        }
                        if logged_in {
                            ul {
                                li { "{username}" }
                                li {
                                    Button {
                                        button_type: ButtonType::Secondary,
                                        outline: true,
                                        on_click: logout,
                                        "Sign Out"
                                    }
                                }
                            }
                        }
                    }
                }
                if let Some(reason) = disconnected {
                    p {
                        style: "color: var(--pico-del-color); padding: 0 1rem;",
                        "Backend unreachable: {reason}"
                    }
                }
                ErrorModal { notice: state.notice }
                div {
                    class: "content",
                    if !logged_in {
                        SignInScreen {}
                    } else {
                        match active_screen() {
                            Screen::Dashboard => rsx! {
                                DashboardScreen {}
                            },
                            Screen::OtcTrades => rsx! {
                                OtcTradesScreen {}
                            },
                        }
                    }
                }
            }
        }
    }
}
