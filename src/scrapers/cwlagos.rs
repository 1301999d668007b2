use crate::config::CrawlConfig;
use crate::models::{Category, Listing};
use crate::scrapers::extract::{parse_amenities, parse_categories, parse_listing_page, ListingPage};
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::{CompiledSchema, ListingSchema};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};
use url::Url;

/// Sequential crawler for cwlagos.com: locations → listing pages → cards
pub struct CwLagosScraper {
    client: Client,
    config: CrawlConfig,
    schema: CompiledSchema,
}

impl CwLagosScraper {
    /// Create a scraper using the site's default markup schema
    pub fn new(config: CrawlConfig) -> Result<Self> {
        Self::with_schema(config, &ListingSchema::default())
    }

    pub fn with_schema(config: CrawlConfig, schema: &ListingSchema) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        let schema = schema.compile().context("Failed to compile listing schema")?;

        Ok(Self {
            client,
            config,
            schema,
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("{} returned status {}", url, response.status());
        }

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        debug!("Downloaded {} bytes of HTML", html.len());
        Ok(html)
    }

    /// Walk every location category from the start page.
    ///
    /// Fails only if the start page itself cannot be fetched.
    pub async fn crawl(&self) -> Result<Vec<Listing>> {
        let start_url = Url::parse(&self.config.start_url)
            .with_context(|| format!("Invalid start URL {:?}", self.config.start_url))?;

        let html = self
            .fetch_page(start_url.as_str())
            .await
            .context("Error fetching the main page")?;
        info!("Successfully fetched main page: {}", start_url);

        let categories = parse_categories(&html, &start_url, &self.schema);
        info!("Identified {} locations on the main page", categories.len());

        let mut listings = Vec::new();
        for category in &categories {
            let found = self.scrape_category(category).await;
            info!(
                "Collected {} listings from {}",
                found.len(),
                category.display_name()
            );
            listings.extend(found);
        }

        info!("Scraping finished with {} listings in total", listings.len());
        Ok(listings)
    }

    /// Follow one category's pagination until a page has no cards, no next
    /// link, or cannot be fetched
    async fn scrape_category(&self, category: &Category) -> Vec<Listing> {
        let Some(start) = category.url.as_deref() else {
            warn!("Location {} has no link, skipping", category.display_name());
            return Vec::new();
        };

        info!("Found {}, scraping its listings now", category.display_name());

        let mut listings = Vec::new();
        let mut current = Some(start.to_string());
        let mut pages = 0;

        while let Some(page_url) = current.take() {
            if self.config.max_pages.is_some_and(|max| pages >= max) {
                info!("Reached the page limit for {}", category.display_name());
                break;
            }
            pages += 1;

            info!("Scraping list page: {}", page_url);
            let page = match self.scrape_listing_page(&page_url).await {
                Ok(page) => page,
                Err(e) => {
                    error!("Error fetching list page {}: {:#}", page_url, e);
                    break;
                }
            };

            if page.listings.is_empty() {
                info!("No property cards found on {}, ending this location", page_url);
                break;
            }

            for listing in page.listings {
                listings.push(self.with_amenities(listing).await);
            }

            match page.next_page {
                Some(next) if next == page_url => {
                    warn!("Next-page link on {} points back to itself, stopping", page_url);
                }
                Some(next) => {
                    info!("Found the next page: {}", next);
                    tokio::time::sleep(self.config.page_delay).await;
                    current = Some(next);
                }
                None => info!("No more next-page links for {}", category.display_name()),
            }
        }

        listings
    }

    async fn scrape_listing_page(&self, url: &str) -> Result<ListingPage> {
        let page_url = Url::parse(url).with_context(|| format!("Invalid page URL {:?}", url))?;
        let html = self.fetch_page(url).await?;

        let page = parse_listing_page(&html, &page_url, &self.schema);
        info!("Found {} property cards on this list page", page.listings.len());
        Ok(page)
    }

    /// Attach detail-page amenities; a failed fetch leaves the listing as is
    async fn with_amenities(&self, mut listing: Listing) -> Listing {
        let Some(url) = listing.listing_url.clone() else {
            return listing;
        };

        info!(
            "Scraping detail page: {}",
            listing.title.as_deref().unwrap_or("listing")
        );

        match self.fetch_amenities(&url).await {
            Ok(amenities) => {
                debug!("Found {} amenities on {}", amenities.len(), url);
                for amenity in amenities {
                    listing.add_amenity(amenity);
                }
            }
            Err(e) => warn!("Could not scrape detail page {}: {:#}", url, e),
        }

        listing
    }

    async fn fetch_amenities(&self, url: &str) -> Result<Vec<String>> {
        tokio::time::sleep(self.config.detail_delay).await;
        let html = self.fetch_page(url).await?;
        tokio::time::sleep(self.config.detail_delay).await;

        Ok(parse_amenities(&html, &self.schema))
    }
}

#[async_trait]
impl ScraperTrait for CwLagosScraper {
    async fn scrape(&self) -> Result<Vec<Listing>> {
        self.crawl().await
    }

    fn source_name(&self) -> &'static str {
        "cwlagos"
    }
}
