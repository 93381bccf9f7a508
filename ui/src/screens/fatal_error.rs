use api::backend_process::BackendFailure;
use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;

/// Shown, instead of everything else, once the backend process is gone.
/// Mounting it acknowledges the failure.
#[component]
pub fn FatalErrorScreen(mut failure: Signal<Option<BackendFailure>>) -> Element {
    use_effect(move || {
        if let Some(failure) = failure.write().as_mut() {
            failure.acknowledge();
        }
    });

    let message = failure
        .read()
        .as_ref()
        .map(|f| f.message().to_string())
        .unwrap_or_default();

    rsx! {
        Card {
            h3 { "The backend stopped" }
            p { "{message}" }
            p { "Restart the application to continue." }
            Button {
                button_type: ButtonType::Contrast,
                on_click: move |_| {
                    #[cfg(feature = "dioxus-desktop")]
                    dioxus_desktop::window().close();
                },
                "Quit"
            }
        }
    }
}
