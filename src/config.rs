//! Configuration management for corscheck

use crate::error::{CorsCheckError, Result};
use crate::models::ProbeConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File-based configuration structure
#[derive(Debug, Deserialize)]
struct FileConfig {
    probe: Option<ProbeSection>,
    proxy: Option<ProxySection>,
    output: Option<OutputSection>,
}

#[derive(Debug, Deserialize)]
struct ProbeSection {
    workers: Option<usize>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    follow_redirects: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ProxySection {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OutputSection {
    dir: Option<PathBuf>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<ProbeConfig> {
    let content = std::fs::read_to_string(path).map_err(CorsCheckError::Io)?;
    parse_config(&content)
}

/// Parses TOML configuration content on top of the defaults
pub fn parse_config(content: &str) -> Result<ProbeConfig> {
    let file_config: FileConfig = toml::from_str(content)?;

    let mut config = ProbeConfig::default();

    if let Some(probe) = file_config.probe {
        if let Some(workers) = probe.workers {
            config.workers = workers;
        }
        if let Some(timeout) = probe.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(ua) = probe.user_agent {
            config.user_agent = ua;
        }
        if let Some(follow) = probe.follow_redirects {
            config.follow_redirects = follow;
        }
    }

    if let Some(proxy) = file_config.proxy {
        config.proxy = proxy.url;
    }

    if let Some(output) = file_config.output {
        if let Some(dir) = output.dir {
            config.output_dir = dir;
        }
    }

    if config.workers == 0 {
        return Err(CorsCheckError::Config(
            "workers must be at least 1".to_string(),
        ));
    }

    Ok(config)
}

/// Merges CLI arguments into an existing ProbeConfig
pub fn merge_cli_args(
    config: &mut ProbeConfig,
    workers: Option<usize>,
    timeout: Option<u64>,
    user_agent: Option<String>,
    proxy: Option<String>,
    output_dir: Option<PathBuf>,
    no_redirects: bool,
) {
    if let Some(w) = workers {
        config.workers = w.max(1);
    }
    if let Some(t) = timeout {
        config.timeout_secs = t;
    }
    if let Some(ua) = user_agent {
        config.user_agent = ua;
    }
    if let Some(p) = proxy {
        config.proxy = Some(p);
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if no_redirects {
        config.follow_redirects = false;
    }
}
