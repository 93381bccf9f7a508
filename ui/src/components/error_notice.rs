use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::pico::Modal;

/// The app-wide error dialog. Shown from event handlers and from the
/// session worker alike.
#[derive(Clone, Copy, PartialEq)]
pub struct ErrorNotice {
    is_open: Signal<bool>,
    title: Signal<String>,
    message: Signal<String>,
}

impl ErrorNotice {
    pub fn show(&mut self, title: &str, message: impl Into<String>) {
        self.title.set(title.to_string());
        self.message.set(message.into());
        self.is_open.set(true);
    }
}

pub fn use_error_notice() -> ErrorNotice {
    ErrorNotice {
        is_open: use_signal(|| false),
        title: use_signal(String::new),
        message: use_signal(String::new),
    }
}

#[component]
pub fn ErrorModal(notice: ErrorNotice) -> Element {
    let mut is_open = notice.is_open;
    rsx! {
        Modal {
            is_open,
            title: notice.title.read().clone(),
            p { "{notice.message}" }
            footer {
                Button {
                    on_click: move |_| is_open.set(false),
                    "OK"
                }
            }
        }
    }
}
