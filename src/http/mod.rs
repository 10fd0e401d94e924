//! HTTP client module for corscheck

pub mod client;
pub use client::HttpClient;
