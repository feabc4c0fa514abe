use crate::error::{Result, SourceError};
use crate::markup::{Document, MarkupMode};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Fetches a page and hands it back ready for HTML or XML queries
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str, mode: MarkupMode) -> Result<Document>;
}

/// Create a reqwest Client with a browser-like user agent; the stores serve
/// stripped-down pages to unknown clients
pub fn create_store_client(user_agent: &str) -> Client {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_document(&self, url: &str, mode: MarkupMode) -> Result<Document> {
        debug!(url = %url, mode = ?mode, "Fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::fetch(url, format!("HTTP {}", status)));
        }

        let body = response.text().await.map_err(|e| SourceError::fetch(url, e))?;
        debug!(url = %url, bytes = body.len(), "Fetched page");

        Ok(Document::new(url, mode, body))
    }
}
