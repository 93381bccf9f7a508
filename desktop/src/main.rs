use dioxus::desktop::Config;
use dioxus::desktop::LogicalSize;
use dioxus::desktop::WindowBuilder;
use dioxus::prelude::*;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");

    let window = WindowBuilder::new()
        .with_title("Portfolio Desk")
        .with_inner_size(LogicalSize::new(1100.0, 760.0));

    dioxus::LaunchBuilder::desktop()
        .with_cfg(Config::new().with_window(window).with_menu(None))
        .launch(App);
}

#[component]
fn App() -> Element {
    ui::App()
}
