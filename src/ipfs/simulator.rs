use crate::ipfs::client::{Pinner, cid_from_uri};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct SimPinState {
    pub pinned: HashMap<String, Vec<u8>>,
    pub unpinned: Vec<String>,
    pub counter: u64,
    pub fail_json: bool,
}

/// Keeps pinned content in memory under sequential fake CIDs.
pub struct SimPinner {
    gateway: String,
    pub state: Mutex<SimPinState>,
}

impl SimPinner {
    pub fn new(gateway: &str) -> Self {
        Self {
            gateway: gateway.trim_end_matches('/').to_string(),
            state: Mutex::new(SimPinState::default()),
        }
    }

    async fn store(&self, bytes: Vec<u8>) -> String {
        let mut state = self.state.lock().await;
        state.counter += 1;
        let cid = format!("QmSim{}", state.counter);
        state.pinned.insert(cid.clone(), bytes);
        format!("{}/ipfs/{}", self.gateway, cid)
    }
}

#[async_trait]
impl Pinner for SimPinner {
    async fn pin_file(&self, _file_name: &str, bytes: Vec<u8>) -> Result<String> {
        Ok(self.store(bytes).await)
    }

    async fn pin_json(&self, _name: &str, content: &serde_json::Value) -> Result<String> {
        if self.state.lock().await.fail_json {
            anyhow::bail!("Pinata error 500: simulated outage");
        }
        Ok(self.store(serde_json::to_vec(content)?).await)
    }

    async fn unpin(&self, uri: &str) -> Result<()> {
        let cid = cid_from_uri(uri).to_string();
        let mut state = self.state.lock().await;
        state.pinned.remove(&cid);
        state.unpinned.push(cid);
        Ok(())
    }
}
