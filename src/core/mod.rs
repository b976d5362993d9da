pub mod analysis_client;
pub mod commands;
pub mod config;
pub mod errors;
pub mod models;
pub mod report;
pub mod service;
pub mod session;
pub mod settings_store;
pub mod validation;
