pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod session;
pub mod tracking;
pub mod types;
pub mod views;

#[cfg(test)]
pub mod testing;
