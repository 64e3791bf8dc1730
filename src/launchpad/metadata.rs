use crate::core::types::TokenMetadata;
use crate::ipfs::client::gateway_url;
use anyhow::{Context, Result};
use reqwest::Client;
use tracing::warn;

/// Resolves token metadata documents through an HTTP IPFS gateway.
#[derive(Clone)]
pub struct MetadataFetcher {
    client: Client,
    gateway: String,
}

impl MetadataFetcher {
    pub fn new(client: Client, gateway: &str) -> Self {
        Self {
            client,
            gateway: gateway.to_string(),
        }
    }

    /// Never fails: an empty URI or a bad fetch yields placeholder metadata.
    pub async fn fetch(&self, metadata_uri: &str) -> TokenMetadata {
        if metadata_uri.trim().is_empty() {
            return TokenMetadata::unknown("");
        }

        match self.try_fetch(metadata_uri).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Failed to fetch metadata for {}: {:#}", metadata_uri, e);
                TokenMetadata::unknown("No description available")
            }
        }
    }

    async fn try_fetch(&self, metadata_uri: &str) -> Result<TokenMetadata> {
        let url = gateway_url(&self.gateway, metadata_uri);
        let meta = self
            .client
            .get(&url)
            .send()
            .await
            .context("requesting metadata")?
            .error_for_status()
            .context("Failed to fetch metadata")?
            .json::<TokenMetadata>()
            .await
            .context("parsing metadata")?;
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ipfs/QmMeta"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Doge Wisdom",
                "ticker": "WISE",
                "description": "Much wisdom",
                "imageURI": "https://gw/ipfs/QmImg"
            })))
            .mount(&server)
            .await;

        let fetcher = MetadataFetcher::new(Client::new(), &server.uri());
        let meta = fetcher.fetch("ipfs://QmMeta").await;
        assert_eq!(meta.ticker, "WISE");
        assert_eq!(meta.image_uri, "https://gw/ipfs/QmImg");
    }

    #[tokio::test]
    async fn test_empty_uri_is_unknown() {
        let fetcher = MetadataFetcher::new(Client::new(), "http://127.0.0.1:9");
        let meta = fetcher.fetch("").await;
        assert_eq!(meta.name, "Unknown");
        assert_eq!(meta.description, "");
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = MetadataFetcher::new(Client::new(), &server.uri());
        let meta = fetcher
            .fetch(&format!("{}/ipfs/QmGone", server.uri()))
            .await;
        assert_eq!(meta.name, "Unknown");
        assert_eq!(meta.description, "No description available");
        assert!(meta.image_uri.is_empty());
    }
}
