#![allow(non_snake_case)]

use api::currency::Currency;
use dioxus::prelude::*;
use strum::IntoEnumIterator;

#[derive(Props, PartialEq, Clone)]
pub struct CurrencyChooserProps {
    /// The current main currency.
    pub selected: Currency,
    /// Called with the ticker of the picked currency.
    pub on_select: EventHandler<&'static str>,
    #[props(optional)]
    pub style: Option<String>,
}

/// A dropdown with a search box for picking the main currency.
pub fn CurrencyChooser(props: CurrencyChooserProps) -> Element {
    let mut is_open = use_signal(|| false);
    let mut filter_text = use_signal(|| "".to_string());

    let selected = props.selected;
    let filter_lower = filter_text.read().to_lowercase();
    let filtered = Currency::iter()
        .filter(|c| {
            c.name().to_lowercase().contains(&filter_lower)
                || c.ticker_symbol().to_lowercase().contains(&filter_lower)
        })
        .collect::<Vec<_>>();

    rsx! {
        div {
            style: "{props.style.as_deref().unwrap_or(\"\")}",
            div {
                style: "position: relative; width: 6rem;",
                div {
                    class: "secondary",
                    style: "display: flex; align-items: center; font-size: 0.875rem; cursor: pointer;",
                    title: "Choose the currency figures are shown in.",
                    onclick: move |_| is_open.toggle(),
                    span {
                        style: "flex-grow: 1; padding: 0.375rem 0.2rem; text-align: center;",
                        "{selected.icon()} {selected.ticker_symbol()}"
                    }
                    span { style: "padding: 0.1rem 0.2rem;", "↓" }
                }
                if is_open() {
                    // Backdrop to catch clicks outside the dropdown
                    div {
                        style: "position: fixed; top: 0; left: 0; width: 100vw; height: 100vh; z-index: 9; background: transparent;",
                        onclick: move |_| is_open.set(false),
                    }
                    div {
                        onclick: |e| e.stop_propagation(),
                        style: "
                            position: absolute;
                            right: 0;
                            min-width: 16rem;
                            z-index: 10;
                            background-color: var(--pico-card-background-color);
                            border: 1px solid var(--pico-card-border-color);
                            border-radius: var(--pico-border-radius);
                            padding: 0.5rem;
                            margin-top: 0.25rem;
                        ",
                        input {
                            r#type: "text",
                            placeholder: "Search currencies...",
                            value: "{filter_text}",
                            oninput: move |evt| filter_text.set(evt.value()),
                            style: "margin-bottom: 0.5rem; width: 100%;",
                            onmounted: move |mounted| {
                                spawn(async move {
                                    mounted.data.set_focus(true).await.ok();
                                });
                            },
                        }
                        ul {
                            role: "listbox",
                            style: "list-style: none; margin: 0; padding: 0; max-height: 250px; overflow-y: auto;",
                            for currency in filtered {
                                li {
                                    key: "{currency.ticker_symbol()}",
                                    style: "display: flex; align-items: center; cursor: pointer; padding: 0.3rem; white-space: nowrap;",
                                    onclick: move |_| {
                                        props.on_select.call(currency.ticker_symbol());
                                        filter_text.set(String::new());
                                        is_open.set(false);
                                    },
                                    span {
                                        style: if currency == selected { "width: 1.5rem;" } else { "width: 1.5rem; visibility: hidden;" },
                                        "✓"
                                    }
                                    span { "{currency.ticker_symbol()} - {currency.name()}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
