use crate::betting::service::BettingService;
use crate::bus::types::Bus;
use crate::core::types::{Actor, BetsSnapshot, TokensSnapshot};
use crate::launchpad::service::LaunchpadService;
use crate::store::token_store::TokenStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Re-reads every bet and launchpad token on a fixed cadence and publishes
/// the results as snapshots.
pub struct MarketWatchActor {
    pub bus: Bus,
    pub betting: Arc<BettingService>,
    /// Token listing needs a wallet-backed launchpad; bets alone are watched without one.
    pub launchpad: Option<Arc<LaunchpadService>>,
    pub store: Arc<TokenStore>,
    pub refresh: Duration,
    pub shutdown: CancellationToken,
}

impl MarketWatchActor {
    pub fn new(
        bus: Bus,
        betting: Arc<BettingService>,
        launchpad: Option<Arc<LaunchpadService>>,
        store: Arc<TokenStore>,
        refresh: Duration,
        shutdown: CancellationToken,
    ) -> MarketWatchActor {
        Self {
            bus,
            betting,
            launchpad,
            store,
            refresh,
            shutdown,
        }
    }

    async fn refresh_once(&self) {
        let bets = self.betting.get_all_bets().await;
        info!("MarketWatchActor: {} bets", bets.len());
        let snap = BetsSnapshot {
            bets,
            ts_ms: chrono::Utc::now().timestamp_millis(),
        };
        if let Err(e) = self.bus.bets.publish(snap).await {
            error!("Failed to publish bets snapshot: {}", e);
        }

        let Some(launchpad) = &self.launchpad else {
            return;
        };
        let tokens = launchpad.get_all_tokens().await;
        if tokens.is_empty() {
            warn!("MarketWatchActor: token read returned nothing");
        } else {
            info!("MarketWatchActor: {} tokens", tokens.len());
        }
        self.store.set_tokens(tokens.clone()).await;

        let snap = TokensSnapshot {
            tokens,
            ts_ms: chrono::Utc::now().timestamp_millis(),
        };
        if let Err(e) = self.bus.tokens.publish(snap).await {
            error!("Failed to publish tokens snapshot: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl Actor for MarketWatchActor {
    async fn run(self) -> Result<()> {
        info!("MarketWatchActor started");

        let mut tick = tokio::time::interval(self.refresh);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("MarketWatchActor: shutdown requested");
                    break;
                }

                _ = tick.tick() => {
                    self.refresh_once().await;
                }
            }
        }

        info!("MarketWatchActor stopped cleanly");
        Ok(())
    }
}
