//! Probe engine and worker pool

pub mod cors;
pub mod pool;

pub use cors::CorsProber;
pub use pool::ProbePool;

use crate::error::Result;
use crate::models::CorsResult;
use async_trait::async_trait;

/// Something that can decide whether a single URL is misconfigured
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns `Some` only for vulnerable results
    async fn probe(&self, url: &str) -> Result<Option<CorsResult>>;
}
