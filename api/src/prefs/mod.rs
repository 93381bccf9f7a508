pub mod connection_prefs;
pub mod display_preference;
pub mod user_prefs;
