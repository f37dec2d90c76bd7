pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod session;
pub mod version;
pub mod views;
