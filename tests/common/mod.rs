//! Common test utilities

#![allow(dead_code)]

use corscheck::http::HttpClient;
use corscheck::models::ProbeConfig;
use corscheck::scanner::CorsProber;

/// Creates a test ProbeConfig suitable for wiremock servers
pub fn test_config() -> ProbeConfig {
    ProbeConfig {
        workers: 2,
        timeout_secs: 5,
        user_agent: "corscheck-test/0.1.0".to_string(),
        ..ProbeConfig::default()
    }
}

/// Creates a prober and a handle to its client for request counting
pub fn test_prober() -> (CorsProber, HttpClient) {
    let client = HttpClient::from_config(&test_config()).expect("client");
    (CorsProber::new(client.clone()), client)
}
