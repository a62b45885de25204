use super::types::FetchFailure;
use super::FeedSource;
use async_trait::async_trait;
use reqwest::Client;

/// Plain unauthenticated GET against the feed URL.
pub struct HttpFeedSource {
    client: Client,
}

impl Default for HttpFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFeedSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Use a preconfigured client, e.g. one with timeouts or a proxy.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchFailure::transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchFailure::BadStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        resp.text().await.map_err(FetchFailure::transport)
    }
}
