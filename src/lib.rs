pub mod api;
pub mod config;
pub mod details;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod locator;
pub mod platforms;
pub mod scrape;
pub mod text;
pub mod tree_path;
pub mod types;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::info;

pub use config::Config;
pub use error::{FetchError, ScrapeError};
pub use fetch::{Fetcher, PageSource};
pub use platforms::{list_platforms, Capability, Platform};
pub use scrape::scrape;
pub use types::*;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
}

impl AppState {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self {
            fetcher: Fetcher::new(http_client),
        }
    }
}

pub fn build_http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    let mut builder = reqwest::Client::builder()
        .timeout(config.fetch_timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .default_headers(headers);

    if let Some(cert_path) = &config.ca_cert {
        let pem = std::fs::read(cert_path)
            .with_context(|| format!("Failed to read TLS CA certificate at {}", cert_path.display()))?;
        let cert = reqwest::Certificate::from_pem(&pem)
            .with_context(|| format!("Failed to parse TLS CA certificate at {}", cert_path.display()))?;
        info!("Loaded TLS CA certificate from {}", cert_path.display());
        builder = builder.add_root_certificate(cert);
    }

    builder.build().context("Failed to build HTTP client")
}
