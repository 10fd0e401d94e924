//! CORS misconfiguration probe
//!
//! Sends up to three GET requests to a URL, each with a different `Origin`
//! header, and stops at the first one whose `Access-Control-Allow-Origin`
//! response shows a misconfiguration.

use crate::error::{CorsCheckError, Result};
use crate::http::HttpClient;
use crate::models::{Category, CorsConfig, CorsResult};
use async_trait::async_trait;
use tracing::{debug, info};
use url::{Host, Url};

/// Origin sent by the third-party probe
pub const THIRD_PARTY_ORIGIN: &str = "http://example.com";

/// Origin sent by the first probe
pub const NULL_ORIGIN: &str = "null";

/// Runs the differential origin probes against a single URL
#[derive(Clone)]
pub struct CorsProber {
    client: HttpClient,
}

impl CorsProber {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Probes `url` and returns the deciding result, vulnerable or not.
    ///
    /// Any transport or parse failure aborts the remaining probes.
    pub async fn evaluate(&self, url: &str) -> Result<CorsResult> {
        info!("Checking URL -> {url}");

        let (status, config) = self.send_probe(url, NULL_ORIGIN).await?;
        if let Some(category) = classify_null_probe(url, config.allow_origin()) {
            return Ok(CorsResult::vulnerable(url, status, config, category));
        }

        let (status, config) = self.send_probe(url, THIRD_PARTY_ORIGIN).await?;
        if config.allow_origin() == THIRD_PARTY_ORIGIN {
            return Ok(CorsResult::vulnerable(
                url,
                status,
                config,
                Category::DifferentDomain,
            ));
        }

        let origin = exact_origin(url)?;
        let (status, config) = self.send_probe(url, &origin).await?;
        if config.allow_origin() == origin {
            return Ok(CorsResult::vulnerable(
                url,
                status,
                config,
                Category::SameDomain,
            ));
        }

        debug!("No CORS misconfiguration on {url}");
        Ok(CorsResult::safe(url, status, config))
    }

    async fn send_probe(&self, url: &str, origin: &str) -> Result<(u16, CorsConfig)> {
        let response = self.client.get_with_origin(url, origin).await?;
        let status = response.status().as_u16();
        let config = CorsConfig::from_headers(response.headers());
        debug!("ACAO for origin '{origin}': '{}'", config.allow_origin());
        Ok((status, config))
    }
}

#[async_trait]
impl super::Prober for CorsProber {
    async fn probe(&self, url: &str) -> Result<Option<CorsResult>> {
        let result = self.evaluate(url).await?;
        Ok(result.vulnerable.then_some(result))
    }
}

fn classify_null_probe(url: &str, allow_origin: &str) -> Option<Category> {
    match allow_origin {
        "*" => Some(Category::Wildcard),
        "null" => Some(Category::NullOrigin),
        acao => effective_tld(url)
            .filter(|suffix| acao.ends_with(suffix.as_str()))
            .map(|_| Category::SameDomain),
    }
}

/// Public suffix of the URL's host, e.g. `co.uk` for `https://api.example.co.uk`.
///
/// IP hosts have no suffix.
pub fn effective_tld(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host()? {
        Host::Domain(domain) => psl::suffix_str(domain).map(str::to_string),
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// `scheme://host[:port]` of the URL, the value a same-origin page would send
pub fn exact_origin(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| CorsCheckError::MissingHost(url.to_string()))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}
