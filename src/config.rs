use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_START_URL: &str = "https://www.cwlagos.com";
const DEFAULT_OUTPUT_PATH: &str = "data/raw/lagos_housing_data.csv";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Crawl settings loaded from environment variables
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Index page listing the location categories
    pub start_url: String,
    /// CSV file written at the end of the run
    pub output_path: PathBuf,
    /// Pause before and after each detail page fetch
    pub detail_delay: Duration,
    /// Pause before following a next-page link
    pub page_delay: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Upper bound on listing pages per category, unlimited when unset
    pub max_pages: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            detail_delay: Duration::from_secs(1),
            page_delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: None,
        }
    }
}

impl CrawlConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        Ok(Self {
            start_url: env::var("START_URL").unwrap_or(defaults.start_url),
            output_path: env::var("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            detail_delay: parse_var::<u64>("DETAIL_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.detail_delay),
            page_delay: parse_var::<u64>("PAGE_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.page_delay),
            request_timeout: parse_var::<u64>("REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
            max_pages: parse_var::<usize>("MAX_PAGES")?,
        })
    }

    /// Settings for tests: no politeness delays, short timeout
    #[cfg(test)]
    pub fn for_tests(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            detail_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a valid number, got {:?}", name, raw)),
        Err(_) => Ok(None),
    }
}
