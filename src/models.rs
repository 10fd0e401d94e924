//! Core data models for corscheck

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

const IMPACT: &str = "which can allow malicious scripts to make requests on behalf of the user.";

/// Kind of CORS misconfiguration found on a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    NullOrigin,
    Wildcard,
    SameDomain,
    DifferentDomain,
}

impl Category {
    /// All categories in reporting order
    pub const ALL: [Category; 4] = [
        Category::NullOrigin,
        Category::Wildcard,
        Category::SameDomain,
        Category::DifferentDomain,
    ];

    /// Human-readable description stored on the result
    pub fn description(&self) -> String {
        let what = match self {
            Category::NullOrigin => "Null origin is allowed",
            Category::Wildcard => "Wildcard origin (*) is set",
            Category::SameDomain => "Origin allows the same domain as the target URL",
            Category::DifferentDomain => "Origin allows a different domain",
        };
        format!("{what}, {IMPACT}")
    }

    /// Name of the JSON file this category is written to
    pub fn file_name(&self) -> &'static str {
        match self {
            Category::NullOrigin => "null_origin_vulnerabilities.json",
            Category::Wildcard => "wildcard_origin_vulnerabilities.json",
            Category::SameDomain => "domain_origin_vulnerabilities.json",
            Category::DifferentDomain => "different_domain_origin_vulnerabilities.json",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::NullOrigin => write!(f, "Null origin"),
            Category::Wildcard => write!(f, "Wildcard origin"),
            Category::SameDomain => write!(f, "Same domain"),
            Category::DifferentDomain => write!(f, "Different domain"),
        }
    }
}

/// CORS-relevant response headers of a single probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub max_age: i64,
    pub allow_credentials: String,
}

impl CorsConfig {
    /// Builds the config from response headers. Missing or malformed
    /// headers fall back to empty values.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            allow_origins: vec![header_str(headers, "access-control-allow-origin").to_string()],
            allow_methods: parse_header_list(header_str(headers, "access-control-allow-methods")),
            allow_headers: parse_header_list(header_str(headers, "access-control-allow-headers")),
            expose_headers: parse_header_list(header_str(
                headers,
                "access-control-expose-headers",
            )),
            max_age: parse_max_age(header_str(headers, "access-control-max-age")),
            allow_credentials: header_str(headers, "access-control-allow-credentials").to_string(),
        }
    }

    /// The reflected `Access-Control-Allow-Origin` value, empty if absent
    pub fn allow_origin(&self) -> &str {
        self.allow_origins.first().map(String::as_str).unwrap_or("")
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Splits a comma-separated header value without trimming the parts
pub fn parse_header_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}

/// Parses `Access-Control-Max-Age`, zero when absent or not an integer
pub fn parse_max_age(value: &str) -> i64 {
    value.parse().unwrap_or(0)
}

/// Verdict for one probed URL
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsResult {
    pub url: String,
    pub status_code: u16,
    pub cors_config: CorsConfig,
    pub vulnerable: bool,
    pub vulnerability: String,
    #[serde(skip)]
    pub category: Option<Category>,
}

impl CorsResult {
    /// Creates a vulnerable result for the given category
    pub fn vulnerable(
        url: impl Into<String>,
        status_code: u16,
        cors_config: CorsConfig,
        category: Category,
    ) -> Self {
        Self {
            url: url.into(),
            status_code,
            cors_config,
            vulnerable: true,
            vulnerability: category.description(),
            category: Some(category),
        }
    }

    /// Creates a result for a URL where no probe found anything
    pub fn safe(url: impl Into<String>, status_code: u16, cors_config: CorsConfig) -> Self {
        Self {
            url: url.into(),
            status_code,
            cors_config,
            vulnerable: false,
            vulnerability: String::new(),
            category: None,
        }
    }
}

/// Configuration for a probe run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Number of concurrent workers
    pub workers: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
    /// Whether to follow HTTP redirects
    pub follow_redirects: bool,
    /// HTTP/HTTPS proxy URL
    pub proxy: Option<String>,
    /// Directory the category files are written to
    pub output_dir: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            workers: 70,
            timeout_secs: 10,
            user_agent: "corscheck/0.1.0".to_string(),
            follow_redirects: true,
            proxy: None,
            output_dir: PathBuf::from("."),
        }
    }
}
