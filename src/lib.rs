pub mod collection;
pub mod config;
pub mod drain_client;
pub mod drain_error;
