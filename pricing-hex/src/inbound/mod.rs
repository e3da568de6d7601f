//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod client_ip;
mod handlers;
mod rate_limit;
mod server;

pub use client_ip::{ClientIp, client_ip};
pub use rate_limit::RateLimiterState;
pub use server::HttpServer;
