//! Shared building blocks for the screens.
pub mod currency_chooser;
pub mod empty_state;
pub mod error_notice;
pub mod pico;
