use crate::config::config::PinataCfg;
use crate::ipfs::client::{Pinner, cid_from_uri};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

pub struct PinataClient {
    client: Client,
    cfg: PinataCfg,
}

impl PinataClient {
    pub fn new(cfg: PinataCfg, client: Client) -> Self {
        Self { client, cfg }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.cfg.api_url.trim_end_matches('/'), path)
    }

    fn gateway_url(&self, cid: &str) -> String {
        format!("{}/ipfs/{}", self.cfg.gateway_url.trim_end_matches('/'), cid)
    }

    async fn read_pin(resp: reqwest::Response) -> Result<String> {
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Pinata error {}: {}", status, text);
        }
        let pin: PinResponse = resp.json().await.context("parsing pin response")?;
        Ok(pin.ipfs_hash)
    }
}

#[async_trait]
impl Pinner for PinataClient {
    async fn pin_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        info!("Uploading file to IPFS: {} ({} bytes)", file_name, bytes.len());
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text(
                "pinataMetadata",
                json!({ "name": file_name }).to_string(),
            );

        let resp = self
            .client
            .post(self.endpoint("/pinning/pinFileToIPFS"))
            .bearer_auth(&self.cfg.jwt)
            .multipart(form)
            .send()
            .await
            .context("requesting pinFileToIPFS")?;

        let cid = Self::read_pin(resp).await?;
        Ok(self.gateway_url(&cid))
    }

    async fn pin_json(&self, name: &str, content: &serde_json::Value) -> Result<String> {
        info!("Uploading metadata to IPFS: {}", name);
        let body = json!({
            "pinataContent": content,
            "pinataMetadata": { "name": name },
        });

        let resp = self
            .client
            .post(self.endpoint("/pinning/pinJSONToIPFS"))
            .bearer_auth(&self.cfg.jwt)
            .json(&body)
            .send()
            .await
            .context("requesting pinJSONToIPFS")?;

        let cid = Self::read_pin(resp).await?;
        Ok(self.gateway_url(&cid))
    }

    async fn unpin(&self, uri: &str) -> Result<()> {
        let cid = cid_from_uri(uri);
        anyhow::ensure!(!cid.is_empty(), "nothing to unpin in '{}'", uri);

        self.client
            .delete(self.endpoint(&format!("/pinning/unpin/{}", cid)))
            .bearer_auth(&self.cfg.jwt)
            .send()
            .await
            .context("requesting unpin")?
            .error_for_status()
            .context("received non-success status for unpin")?;
        info!("Unpinned {}", cid);
        Ok(())
    }
}
