use dioxus::prelude::*;

use crate::app_state_mut::AppStateMut;
use crate::auth_flow::AccountDraft;
use crate::components::pico::Accordion;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;
use crate::components::pico::Input;
use crate::hooks::use_session_worker::SessionCommand;

#[component]
fn CreateAccount() -> Element {
    let mut draft = use_signal(AccountDraft::default);
    let mut outcome = use_signal(|| None::<Result<String, String>>);

    rsx! {
        Accordion {
            title: "Create a new account",
            Input {
                label: "Username",
                name: "new_username",
                value: draft.read().username.clone(),
                on_input: move |v| draft.write().username = v,
            }
            Input {
                label: "Password",
                name: "new_password",
                input_type: "password",
                value: draft.read().password.clone(),
                on_input: move |v| draft.write().password = v,
            }
            Input {
                label: "Repeat password",
                name: "confirm_password",
                input_type: "password",
                value: draft.read().confirm_password.clone(),
                on_input: move |v| draft.write().confirm_password = v,
            }
            Button {
                button_type: ButtonType::Secondary,
                on_click: move |_| {
                    let result = draft.read().validate().map_err(|e| e.to_string());
                    if result.is_ok() {
                        draft.set(AccountDraft::default());
                    }
                    outcome.set(Some(result));
                },
                "Create Account"
            }
            match &*outcome.read() {
                Some(Ok(confirmation)) => rsx! { p { "{confirmation}" } },
                Some(Err(e)) => rsx! { p { style: "color: var(--pico-del-color);", "{e}" } },
                None => rsx! {},
            }
        }
    }
}

/// The sign-in prompt. The session worker unlocks and, on success, issues
/// the initial dashboard batch.
#[component]
pub fn SignInScreen() -> Element {
    let mut state = use_context::<AppStateMut>();
    let worker = use_coroutine_handle::<SessionCommand>();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut input_error = use_signal(|| None::<String>);

    let busy = state.auth.read().state().is_authenticating();
    let error = input_error
        .read()
        .clone()
        .or_else(|| state.auth.read().error().map(str::to_string));

    let sign_in = move |_: MouseEvent| {
        let credentials = match state.auth.write().begin(&username.read(), &password.read()) {
            Ok(credentials) => credentials,
            Err(e) => {
                input_error.set(Some(e.to_string()));
                return;
            }
        };
        input_error.set(None);
        password.set(String::new());
        worker.send(SessionCommand::SignIn(credentials));
    };

    rsx! {
        Card {
            h3 { "Sign In" }
            p { "Unlock your data to see your balances." }
            Input {
                label: "Username",
                name: "username",
                value: username(),
                disabled: busy,
                invalid: error.is_some(),
                on_input: move |v| username.set(v),
            }
            Input {
                label: "Password",
                name: "password",
                input_type: "password",
                value: password(),
                disabled: busy,
                invalid: error.is_some(),
                on_input: move |v| password.set(v),
            }
            if let Some(error) = error {
                p { style: "color: var(--pico-del-color);", "{error}" }
            }
            Button {
                busy,
                on_click: sign_in,
                "Sign In"
            }
        }
        CreateAccount {}
    }
}
