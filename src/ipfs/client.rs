use anyhow::Result;
use async_trait::async_trait;

/// A pinning service. Pins return the gateway URL of the pinned content.
#[async_trait]
pub trait Pinner: Send + Sync + 'static {
    async fn pin_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<String>;
    async fn pin_json(&self, name: &str, content: &serde_json::Value) -> Result<String>;
    /// Accepts a gateway URL, an `ipfs://` URI or a bare CID.
    async fn unpin(&self, uri: &str) -> Result<()>;
}

/// Extracts the CID from a gateway URL, an `ipfs://` URI or a bare CID.
pub fn cid_from_uri(uri: &str) -> &str {
    let uri = uri.trim();
    let rest = if let Some(rest) = uri.strip_prefix("ipfs://") {
        rest
    } else if let Some((_, rest)) = uri.split_once("/ipfs/") {
        rest
    } else {
        uri
    };
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

/// Rewrites `ipfs://` URIs to the configured HTTP gateway; other URIs pass through.
pub fn gateway_url(gateway: &str, uri: &str) -> String {
    match uri.trim().strip_prefix("ipfs://") {
        Some(path) => format!("{}/ipfs/{}", gateway.trim_end_matches('/'), path),
        None => uri.trim().to_string(),
    }
}
