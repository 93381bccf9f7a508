// This file makes the screen modules available to the rest of the application.

pub mod dashboard;
pub mod fatal_error;
pub mod otc_trades;
pub mod sign_in;
