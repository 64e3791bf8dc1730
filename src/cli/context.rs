use crate::betting::client::BettingClient;
use crate::betting::contract::ContractBettingClient;
use crate::betting::service::BettingService;
use crate::betting::simulator::SimBettingClient;
use crate::chain::provider::{connect_read_only, connect_wallet};
use crate::config::config::AppCfg;
use crate::ipfs::pinata::PinataClient;
use crate::ipfs::simulator::SimPinner;
use crate::launchpad::contract::ContractLaunchpadClient;
use crate::launchpad::metadata::MetadataFetcher;
use crate::launchpad::service::LaunchpadService;
use crate::launchpad::simulator::SimLaunchpadClient;
use crate::store::token_store::TokenStore;
use alloy::primitives::{Address, address};
use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

/// Account the simulators sign as.
pub const SIM_ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Services wired for one run of the binary.
pub struct AppContext {
    pub cfg: AppCfg,
    pub betting: Arc<BettingService>,
    pub launchpad: Option<Arc<LaunchpadService>>,
    pub store: Arc<TokenStore>,
}

impl AppContext {
    /// Real contracts and Pinata. Without a private key only bet reads work.
    pub async fn connect(cfg: AppCfg, http: Client) -> Result<Self> {
        let betting_address: Address = cfg
            .betting
            .address
            .parse()
            .context("invalid betting.address")?;
        let read_only: Arc<dyn BettingClient> = Arc::new(ContractBettingClient::new(
            connect_read_only(&cfg.betting.read_only_rpc_url)?,
            betting_address,
        ));

        let (wallet_client, launchpad) = if cfg.chain.has_wallet() {
            let wallet = connect_wallet(&cfg.chain.rpc_url, &cfg.chain.private_key)?;
            let betting: Arc<dyn BettingClient> =
                Arc::new(ContractBettingClient::with_wallet(&wallet, betting_address));

            // bets live on their own contract; a launchpad outage must not take them down
            let launchpad = match ContractLaunchpadClient::connect(wallet, &cfg.chain).await {
                Ok(factory) => Some(Arc::new(LaunchpadService::new(
                    Arc::new(factory),
                    Arc::new(PinataClient::new(cfg.pinata.clone(), http.clone())),
                    MetadataFetcher::new(http, &cfg.pinata.gateway_url),
                ))),
                Err(e) => {
                    warn!("Launchpad unavailable: {:#}", e);
                    None
                }
            };
            (Some(betting), launchpad)
        } else {
            warn!("No chain.privateKey configured; running read-only");
            (None, None)
        };

        let betting = BettingService::new(wallet_client, read_only, cfg.betting.join_amount);
        Ok(Self {
            cfg,
            betting: Arc::new(betting),
            launchpad,
            store: Arc::new(TokenStore::new()),
        })
    }

    /// In-memory contracts and pinning; nothing leaves the process except
    /// metadata reads against the configured gateway.
    pub fn simulated(cfg: AppCfg, http: Client) -> Self {
        info!("Simulation mode: signing as {}", SIM_ACCOUNT);
        let bets = Arc::new(SimBettingClient::new(SIM_ACCOUNT));
        let betting = BettingService::new(Some(bets.clone()), bets, cfg.betting.join_amount);

        let launchpad = LaunchpadService::new(
            Arc::new(SimLaunchpadClient::new(SIM_ACCOUNT)),
            Arc::new(SimPinner::new(&cfg.pinata.gateway_url)),
            MetadataFetcher::new(http, &cfg.pinata.gateway_url),
        );

        Self {
            cfg,
            betting: Arc::new(betting),
            launchpad: Some(Arc::new(launchpad)),
            store: Arc::new(TokenStore::new()),
        }
    }

    pub fn launchpad(&self) -> Result<&Arc<LaunchpadService>> {
        self.launchpad
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Wallet client not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_only_context_has_no_launchpad() {
        let ctx = AppContext::connect(AppCfg::default(), Client::new())
            .await
            .unwrap();
        assert!(ctx.launchpad.is_none());
        assert_eq!(
            ctx.launchpad().err().unwrap().to_string(),
            "Wallet client not found"
        );
    }

    #[tokio::test]
    async fn test_unreachable_launchpad_keeps_betting() {
        let mut cfg = AppCfg::default();
        // well-known dev key; nothing listens on port 9
        cfg.chain.private_key =
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string();
        cfg.chain.rpc_url = "http://127.0.0.1:9".to_string();
        cfg.betting.read_only_rpc_url = "http://127.0.0.1:9".to_string();

        let ctx = AppContext::connect(cfg, Client::new()).await.unwrap();
        assert!(ctx.launchpad.is_none());
        assert!(ctx.betting.get_all_bets().await.is_empty());
    }

    #[tokio::test]
    async fn test_simulated_context_can_write() {
        let ctx = AppContext::simulated(AppCfg::default(), Client::new());
        assert!(ctx.launchpad().is_ok());
        assert!(ctx.betting.withdraw().await.is_ok());
    }
}
