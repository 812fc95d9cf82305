use crate::platforms::{supported_platforms, Platform};
use thiserror::Error;

/// Failure of the single page fetch behind a scrape.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to fetch {url}: {message}")]
    Transport { url: String, message: String },
    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else if let Some(status) = err.status() {
            FetchError::Status { url, status: status.as_u16() }
        } else {
            FetchError::Transport { url, message: err.to_string() }
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Unsupported platform: {0}. Supported platforms: {}", supported_platforms())]
    UnsupportedPlatform(String),
    #[error("{0} scraper is coming soon! This feature is not yet implemented.")]
    NotImplemented(Platform),
    #[error("Invalid URL '{0}'. Please provide a valid HTTP/HTTPS URL.")]
    InvalidInput(String),
    #[error("Scraping failed: {0}")]
    ScrapeFailure(#[from] FetchError),
    #[error("Scraping failed: extraction task failed: {0}")]
    ExtractionTask(String),
}

impl ScrapeError {
    /// Errors the caller caused and can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScrapeError::UnsupportedPlatform(_) | ScrapeError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ScrapeError::UnsupportedPlatform("ebay".into());
        assert_eq!(
            err.to_string(),
            "Unsupported platform: ebay. Supported platforms: amazon, flipkart, myntra, ajio"
        );

        let err = ScrapeError::NotImplemented(Platform::Flipkart);
        assert_eq!(
            err.to_string(),
            "Flipkart scraper is coming soon! This feature is not yet implemented."
        );

        let err = ScrapeError::from(FetchError::Status { url: "https://x.test/p".into(), status: 503 });
        assert_eq!(err.to_string(), "Scraping failed: https://x.test/p responded with HTTP 503");
        assert!(!err.is_client_error());
        assert!(ScrapeError::InvalidInput("nope".into()).is_client_error());
        assert!(!ScrapeError::ExtractionTask("task panicked".into()).is_client_error());
    }
}
