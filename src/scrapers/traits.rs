use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for property scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Scrape every listing the source exposes.
    ///
    /// Returns an error only when the crawl cannot start at all; failures on
    /// individual pages are logged and skipped.
    async fn scrape(&self) -> Result<Vec<Listing>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
