use crate::error::ScrapeError;
use crate::fetch::PageSource;
use crate::platforms::{extract_product, Platform};
use crate::types::ProductRecord;
use tracing::{info, warn};
use url::Url;

/// Check that `url` is an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<Url, ScrapeError> {
    let invalid = || ScrapeError::InvalidInput(url.to_string());
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        _ => Err(invalid()),
    }
}

/// Scrape one product page.
///
/// The platform is resolved and its capability checked before the URL is
/// looked at, and nothing is fetched unless both pass. Missing fields do not
/// fail the call; only the fetch itself can.
pub async fn scrape<S: PageSource>(source: &S, platform: &str, url: &str) -> Result<ProductRecord, ScrapeError> {
    scrape_platform(source, platform.parse()?, url).await
}

/// [`scrape`] for an already resolved platform.
pub async fn scrape_platform<S: PageSource>(
    source: &S,
    platform: Platform,
    url: &str,
) -> Result<ProductRecord, ScrapeError> {
    if !platform.is_available() {
        warn!("Rejected scrape for {}: not implemented yet", platform);
        return Err(ScrapeError::NotImplemented(platform));
    }
    let parsed = validate_url(url)?;

    info!("Scraping {} product: {}", platform, parsed);
    let html = source.fetch_html(parsed.as_str()).await?;

    // Parsing a full product page is CPU-bound; keep it off the async workers.
    let source_url = url.trim().to_string();
    tokio::task::spawn_blocking(move || extract_product(platform, &html, &source_url))
        .await
        .map_err(|e| ScrapeError::ExtractionTask(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a canned response and counts how often it was asked.
    struct StubSource {
        response: Result<&'static str, u16>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn page(html: &'static str) -> Self {
            Self { response: Ok(html), calls: AtomicUsize::new(0) }
        }

        fn status(status: u16) -> Self {
            Self { response: Err(status), calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PageSource for StubSource {
        async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response {
                Ok(html) => Ok(html.to_string()),
                Err(status) => Err(FetchError::Status { url: url.to_string(), status }),
            }
        }
    }

    const PAGE: &str = r#"<html><body>
        <span id="productTitle">Widget</span>
        <span class="a-price-whole">1,299</span>
    </body></html>"#;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://www.amazon.in/dp/B0TEST").is_ok());
        assert!(validate_url("http://example.com").is_ok());
        for bad in ["", "not-a-url", "ftp://example.com/file", "https://", "mailto:a@b.c"] {
            assert!(
                matches!(validate_url(bad), Err(ScrapeError::InvalidInput(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_coming_soon_never_fetches() {
        let source = StubSource::page(PAGE);
        for platform in ["flipkart", "Myntra", "ajio"] {
            let result = tokio_test::block_on(scrape(&source, platform, "https://example.com/p/1"));
            assert!(matches!(result, Err(ScrapeError::NotImplemented(_))), "{platform}");
        }
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejects_bad_input_before_fetch() {
        let source = StubSource::page(PAGE);

        let result = scrape(&source, "amazon", "not-a-url").await;
        assert!(matches!(result, Err(ScrapeError::InvalidInput(_))));

        let result = scrape(&source, "ebay", "https://www.ebay.com/itm/1").await;
        assert!(matches!(result, Err(ScrapeError::UnsupportedPlatform(_))));

        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_scrape_success() {
        let source = StubSource::page(PAGE);
        let record = scrape(&source, "amazon", "https://www.amazon.in/dp/B0TEST").await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(record.title, "Widget");
        assert_eq!(record.price, Some(1299.0));
        assert_eq!(record.source_url, "https://www.amazon.in/dp/B0TEST");
    }

    #[tokio::test]
    async fn test_concurrent_scrapes_are_independent() {
        let source = StubSource::page(PAGE);
        let (a, b) = tokio::join!(
            scrape(&source, "amazon", "https://www.amazon.in/dp/A1"),
            scrape(&source, "amazon", "https://www.amazon.in/dp/B2"),
        );

        assert_eq!(a.unwrap().source_url, "https://www.amazon.in/dp/A1");
        assert_eq!(b.unwrap().source_url, "https://www.amazon.in/dp/B2");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_wrapped() {
        let source = StubSource::status(503);
        let err = scrape(&source, "amazon", "https://www.amazon.in/dp/B0TEST").await.unwrap_err();

        assert!(matches!(
            err,
            ScrapeError::ScrapeFailure(FetchError::Status { status: 503, .. })
        ));
        assert!(err.to_string().starts_with("Scraping failed:"));
    }
}
