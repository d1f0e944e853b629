pub mod config;
pub mod contracts;
pub mod deploy;
pub mod error;
pub mod models;
pub mod networks;
pub mod services;
