//! HTTP transport for the bet settlement engine
//!
//! A thin actix-web layer over [`bet_settlement::SettlementEngine`]:
//! payload shapes in `models`, status mapping in `error`, routes in
//! `handlers`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

pub use config::ApiConfig;
pub use error::ApiError;
