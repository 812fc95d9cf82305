use crate::error::FetchError;
use reqwest::Client;
use std::future::Future;
use tracing::{debug, warn};

/// Anything that can hand back the HTML of a product page.
pub trait PageSource: Send + Sync {
    fn fetch_html(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Page fetcher over a shared, pre-configured HTTP client.
///
/// Headers, timeout and pooling live in the client, which is built once at
/// startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageSource for Fetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("Fetch of {} failed: {}", url, e);
                FetchError::from_reqwest(url, e)
            })?;

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
