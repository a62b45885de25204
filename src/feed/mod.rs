pub mod extract;
pub mod http;
pub mod normalize;
pub mod slug;
pub mod types;

use async_trait::async_trait;
use types::FetchFailure;

/// A place a feed document can be pulled from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Perform a single request for `url` and return the body text.
    async fn fetch(&self, url: &str) -> Result<String, FetchFailure>;
}

/// Fetch through `source`, logging the attempt and any failure.
pub async fn fetch_logged(source: &dyn FeedSource, url: &str) -> Result<String, FetchFailure> {
    tracing::info!(url, "fetching feed");
    let result = source.fetch(url).await;
    if let Err(ref failure) = result {
        tracing::warn!(url, error = %failure, "failed to fetch feed");
    }
    result
}
