use crate::betting::client::BettingClient;
use crate::chain::units::to_wei;
use crate::core::types::{Bet, BetDraft, CreateBetArgs, TxOutcome, TxReceipt};
use alloy::primitives::U256;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Wallet-driven writes and sequential reads against the Betting contract.
///
/// Writes need a wallet connection and fail fast without one. Reads fall back
/// to the read-only connection when no wallet is configured.
pub struct BettingService {
    wallet: Option<Arc<dyn BettingClient>>,
    read_only: Arc<dyn BettingClient>,
    join_amount: Decimal,
}

impl BettingService {
    pub fn new(
        wallet: Option<Arc<dyn BettingClient>>,
        read_only: Arc<dyn BettingClient>,
        join_amount: Decimal,
    ) -> Self {
        Self {
            wallet,
            read_only,
            join_amount,
        }
    }

    fn wallet(&self) -> Result<&Arc<dyn BettingClient>> {
        self.wallet
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Wallet client not found"))
    }

    fn settle(op: &str, res: Result<TxReceipt>) -> TxOutcome {
        match res {
            Ok(receipt) => {
                info!(
                    "{} confirmed: tx={} status={}",
                    op, receipt.tx_hash, receipt.status
                );
                TxOutcome::from_receipt(&receipt)
            }
            Err(e) => {
                error!("Error in {}: {:?}", op, e);
                TxOutcome::failed(format!("{:#}", e))
            }
        }
    }

    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_bet(&self, draft: &BetDraft) -> Result<TxOutcome> {
        let client = self.wallet()?;
        let join_amount = to_wei(draft.join_amount).context("joinAmount")?;
        let initial_pool_amount =
            to_wei(draft.initial_pool_amount).context("initialPoolAmount")?;

        let args = CreateBetArgs {
            title: draft.title.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            twitter_handle: draft.twitter_handle.clone(),
            end_date: U256::from(draft.end_date),
            join_amount,
            initial_pool_amount,
            image_url: draft.image_url.clone(),
            value: join_amount + initial_pool_amount,
        };
        info!("Creating bet with parameters: {:?}", args);

        Ok(Self::settle("createBet", client.create_bet(&args).await))
    }

    pub async fn join_bet(&self, bet_id: U256, support: bool) -> Result<TxOutcome> {
        let client = self.wallet()?;
        let value = to_wei(self.join_amount).context("betting.joinAmount")?;
        info!("Joining bet {} (support={}) with {} wei", bet_id, support, value);

        Ok(Self::settle(
            "joinBet",
            client.join_bet(bet_id, support, value).await,
        ))
    }

    pub async fn close_bet(&self, bet_id: U256, outcome: bool) -> Result<TxOutcome> {
        let client = self.wallet()?;
        info!("Closing bet {} with outcome={}", bet_id, outcome);

        Ok(Self::settle("closeBet", client.close_bet(bet_id, outcome).await))
    }

    pub async fn withdraw(&self) -> Result<TxOutcome> {
        let client = self.wallet()?;
        Ok(Self::settle("withdraw", client.withdraw().await))
    }

    /// Every bet in index order, or an empty list if any read fails.
    pub async fn get_all_bets(&self) -> Vec<Bet> {
        let client = match &self.wallet {
            Some(client) => client,
            None => {
                warn!("Wallet client not found, reading bets in read-only mode");
                &self.read_only
            }
        };

        match Self::read_all(client.as_ref()).await {
            Ok(bets) => bets,
            Err(e) => {
                error!("Error in getAllBets: {:?}", e);
                Vec::new()
            }
        }
    }

    async fn read_all(client: &dyn BettingClient) -> Result<Vec<Bet>> {
        let counter = client.bet_counter().await?;
        info!("Bet counter: {}", counter);

        let mut bets = Vec::new();
        let mut i = U256::ZERO;
        while i < counter {
            bets.push(client.bet_details(i).await?);
            i += U256::from(1);
        }
        Ok(bets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betting::simulator::SimBettingClient;
    use alloy::primitives::Address;
    use std::str::FromStr;

    fn draft(title: &str) -> BetDraft {
        BetDraft {
            title: title.to_string(),
            description: "Will it pump?".to_string(),
            category: "memes".to_string(),
            twitter_handle: "@doge".to_string(),
            end_date: 1_767_225_600,
            join_amount: Decimal::ONE,
            initial_pool_amount: Decimal::from_str("2.5").unwrap(),
            image_url: "https://img/doge.png".to_string(),
        }
    }

    fn service_with(sim: Arc<SimBettingClient>) -> BettingService {
        BettingService::new(Some(sim.clone()), sim, Decimal::ONE)
    }

    #[tokio::test]
    async fn test_create_bet_sends_join_plus_pool() {
        let sim = Arc::new(SimBettingClient::new(Address::with_last_byte(1)));
        let service = service_with(sim.clone());

        let outcome = service.create_bet(&draft("DOGE to $1")).await.unwrap();
        assert!(outcome.success);
        assert!(outcome.tx_hash.is_some());

        let bets = service.get_all_bets().await;
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].title, "DOGE to $1");
        assert_eq!(bets[0].amount, to_wei(Decimal::ONE).unwrap());
        assert_eq!(
            bets[0].initial_pool_amount,
            to_wei(Decimal::from_str("2.5").unwrap()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_writes_require_wallet() {
        let sim = Arc::new(SimBettingClient::new(Address::ZERO));
        let service = BettingService::new(None, sim, Decimal::ONE);

        let err = service.create_bet(&draft("x")).await.unwrap_err();
        assert_eq!(err.to_string(), "Wallet client not found");
        assert!(service.join_bet(U256::ZERO, true).await.is_err());
        assert!(service.close_bet(U256::ZERO, true).await.is_err());
        assert!(service.withdraw().await.is_err());
    }

    #[tokio::test]
    async fn test_read_only_fallback_lists_bets() {
        let sim = Arc::new(SimBettingClient::new(Address::with_last_byte(1)));
        service_with(sim.clone())
            .create_bet(&draft("first"))
            .await
            .unwrap();

        let read_only = BettingService::new(None, sim, Decimal::ONE);
        let bets = read_only.get_all_bets().await;
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].id, U256::ZERO);
    }

    #[tokio::test]
    async fn test_rejected_call_becomes_failure() {
        let sim = Arc::new(SimBettingClient::new(Address::with_last_byte(1)));
        let service = service_with(sim.clone());
        sim.state.lock().await.reject_writes = true;

        let outcome = service.create_bet(&draft("nope")).await.unwrap();
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("simulated rejection"));

        // join on a missing bet reverts too
        sim.state.lock().await.reject_writes = false;
        let outcome = service.join_bet(U256::from(99), true).await.unwrap();
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_one_failed_read_empties_the_list() {
        let sim = Arc::new(SimBettingClient::new(Address::with_last_byte(1)));
        let service = service_with(sim.clone());
        for title in ["a", "b", "c"] {
            service.create_bet(&draft(title)).await.unwrap();
        }
        assert_eq!(service.get_all_bets().await.len(), 3);

        sim.state.lock().await.broken_bet = Some(U256::from(1));
        assert!(service.get_all_bets().await.is_empty());
    }

    #[tokio::test]
    async fn test_join_close_withdraw_flow() {
        let sim = Arc::new(SimBettingClient::new(Address::with_last_byte(1)));
        let service = service_with(sim.clone());
        service.create_bet(&draft("flow")).await.unwrap();

        assert!(service.join_bet(U256::ZERO, true).await.unwrap().success);
        assert!(service.close_bet(U256::ZERO, true).await.unwrap().success);

        let bet = &service.get_all_bets().await[0];
        assert!(bet.is_closed);
        assert!(bet.outcome);
        assert_eq!(bet.support_count, U256::from(1));

        assert!(service.withdraw().await.unwrap().success);
        // nothing left the second time
        assert!(!service.withdraw().await.unwrap().success);
        // closed bets reject new joins
        assert!(!service.join_bet(U256::ZERO, false).await.unwrap().success);
    }
}
