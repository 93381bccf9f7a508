//! Lifetime-free Dioxus components for the Pico.css framework.
//! The stylesheet is linked once in [crate::App].

#![allow(non_snake_case)] // Allow PascalCase for component function names

use dioxus::prelude::*;

//=============================================================================
// Layout Components
//=============================================================================

/// Wraps content in a `<main class="container">` element.
#[component]
pub fn Container(children: Element) -> Element {
    rsx! { main { class: "container", {children} } }
}

/// A responsive grid; every child becomes one column.
#[component]
pub fn Grid(children: Element) -> Element {
    rsx! { div { class: "grid", {children} } }
}

//=============================================================================
// Content Components
//=============================================================================

/// Wraps content in an `<article>` element.
#[component]
pub fn Card(children: Element) -> Element {
    rsx! { article { {children} } }
}

#[derive(Props, PartialEq, Clone)]
pub struct AccordionProps {
    title: String,
    #[props(default = false)]
    open: bool,
    children: Element,
}

/// Shows/hides its content, using the <details> element.
pub fn Accordion(props: AccordionProps) -> Element {
    rsx! {
        details {
            open: props.open,
            summary { "{props.title}" }
            {props.children}
        }
    }
}

//=============================================================================
// Interactive Components
//=============================================================================

#[derive(PartialEq, Clone, Copy, Default)]
pub enum ButtonType {
    #[default]
    Primary,
    Secondary,
    Contrast,
}

impl ButtonType {
    fn to_class(self, outline: bool) -> &'static str {
        match (self, outline) {
            (ButtonType::Primary, false) => "",
            (ButtonType::Primary, true) => "outline",
            (ButtonType::Secondary, false) => "secondary",
            (ButtonType::Secondary, true) => "secondary outline",
            (ButtonType::Contrast, false) => "contrast",
            (ButtonType::Contrast, true) => "contrast outline",
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ButtonProps {
    children: Element,
    #[props(optional)]
    on_click: Option<EventHandler<MouseEvent>>,
    #[props(default)]
    button_type: ButtonType,
    #[props(default = false)]
    outline: bool,
    #[props(default = false)]
    disabled: bool,
    /// Shows Pico's spinner and disables the button.
    #[props(default = false)]
    busy: bool,
}

pub fn Button(props: ButtonProps) -> Element {
    let class_str = props.button_type.to_class(props.outline);
    rsx! {
        button {
            class: "{class_str}",
            disabled: props.disabled || props.busy,
            "aria-busy": if props.busy { "true" } else { "false" },
            onclick: move |evt| {
                if let Some(handler) = &props.on_click {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct InputProps {
    label: String,
    name: String,
    value: String,
    on_input: EventHandler<String>,
    #[props(default = "text".to_string())]
    input_type: String,
    #[props(optional)]
    placeholder: Option<String>,
    #[props(default = false)]
    disabled: bool,
    /// Marks the field invalid (red border) when set.
    #[props(default = false)]
    invalid: bool,
}

/// A labeled, controlled form input field.
pub fn Input(props: InputProps) -> Element {
    rsx! {
        label {
            "{props.label}",
            input {
                r#type: "{props.input_type}",
                name: "{props.name}",
                value: "{props.value}",
                placeholder: "{props.placeholder.as_deref().unwrap_or(\"\")}",
                disabled: props.disabled,
                "aria-invalid": if props.invalid { "true" } else { "" },
                oninput: move |evt| props.on_input.call(evt.value()),
            }
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ModalProps {
    is_open: Signal<bool>,
    title: String,
    children: Element,
}

pub fn Modal(mut props: ModalProps) -> Element {
    rsx! {
        if (props.is_open)() {
            dialog {
                open: true,
                article {
                    header {
                        a {
                            href: "#",
                            "aria-label": "Close",
                            class: "close",
                            onclick: move |evt| {
                                evt.prevent_default();
                                props.is_open.set(false);
                            }
                        }
                        h3 { style: "margin-bottom: 0;", "{props.title}" }
                    }
                    {props.children}
                }
            }
        }
    }
}
