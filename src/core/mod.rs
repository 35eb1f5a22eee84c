pub mod event_log;
pub mod http;
pub mod monitor;
