//! corscheck - CORS misconfiguration probe
//!
//! Sends differential `Origin` probes to every URL of a list with a fixed
//! number of concurrent workers and reports the URLs whose
//! `Access-Control-Allow-Origin` responses reveal a misconfiguration.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod report;
pub mod scanner;
pub mod targets;
