// src/api/mod.rs
pub mod client;
pub mod http;

pub use client::TradeApi;
pub use http::HttpTradeApi;
