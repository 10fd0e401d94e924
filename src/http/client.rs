//! HTTP client wrapper with request tracking

use crate::error::{CorsCheckError, Result};
use crate::models::ProbeConfig;
use reqwest::{Client, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper with request counting
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_count: Arc<AtomicU64>,
}

impl HttpClient {
    /// Creates a new HttpClient from probe configuration
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        // No cookie store: every probe must be independent of the previous one.
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            });

        // zero means no timeout
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        if let Some(ref proxy_url) = config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| CorsCheckError::Config(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Sends a GET request carrying the given `Origin` header
    pub async fn get_with_origin(&self, url: &str, origin: &str) -> Result<Response> {
        let request = self.client.get(url).header("Origin", origin).build()?;

        self.request_count.fetch_add(1, Ordering::Relaxed);
        let response = self.client.execute(request).await?;
        debug!("Response: {} for {}", response.status(), response.url());

        Ok(response)
    }

    /// Returns the total number of requests sent
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}
