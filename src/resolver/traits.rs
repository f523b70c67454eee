use crate::resolver::models::NormalizedResult;
use crate::utils::error::ResolutionError;
use async_trait::async_trait;

/// Core trait for all resolution strategies
///
/// A resolver turns a source URL into a direct media URL through one
/// specific external mechanism (page scraping, a third-party API, ...).
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns a unique identifier for this resolver (e.g., "direct_scrape", "tikwm_api")
    fn id(&self) -> &'static str;

    /// Attempts resolution
    ///
    /// `Ok(None)` means the strategy ran cleanly but found nothing usable;
    /// `Err` is reserved for transport and parse failures.
    async fn resolve(&self, source_url: &str) -> Result<Option<NormalizedResult>, ResolutionError>;
}
