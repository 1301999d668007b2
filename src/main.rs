mod config;
mod models;
mod output;
mod scrapers;

use config::CrawlConfig;
use scrapers::{CwLagosScraper, ScraperTrait};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Lagos Housing Scout");
    info!("=====================");

    let config = CrawlConfig::from_env()?;
    let output_path = config.output_path.clone();
    info!("Start page: {}", config.start_url);

    let scraper = CwLagosScraper::new(config)?;

    info!("Starting {} scrape...", scraper.source_name());
    let listings = match scraper.scrape().await {
        Ok(listings) => listings,
        Err(e) => {
            error!("Scrape aborted, nothing written: {:#}", e);
            return Ok(());
        }
    };

    info!("✅ Scraped {} properties", listings.len());

    output::write_listings(&listings, &output_path).await?;

    Ok(())
}
