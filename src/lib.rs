// src/lib.rs
pub mod api;
pub mod config;
pub mod errors;
pub mod format;
pub mod sync;
pub mod trade_form;
pub mod types;
