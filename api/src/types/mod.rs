//! Request and reply types exchanged with the backend.

pub mod action_result;
pub mod otc_trade;
pub mod settings;
pub mod task;
