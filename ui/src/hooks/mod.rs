pub mod use_backend_checker;
pub mod use_session_worker;
