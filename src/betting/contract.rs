use crate::betting::client::BettingClient;
use crate::chain::contracts::IBetting;
use crate::chain::provider::{Wallet, confirm};
use crate::core::types::{Bet, CreateBetArgs, TxReceipt};
use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Betting contract reached through an alloy provider, signing or read-only.
pub struct ContractBettingClient {
    provider: DynProvider,
    address: Address,
}

impl ContractBettingClient {
    pub fn new(provider: DynProvider, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn with_wallet(wallet: &Wallet, address: Address) -> Self {
        Self::new(wallet.provider.clone(), address)
    }

    // short-lived instance per call
    fn contract(&self) -> IBetting::IBettingInstance<DynProvider> {
        IBetting::new(self.address, self.provider.clone())
    }
}

#[async_trait]
impl BettingClient for ContractBettingClient {
    async fn create_bet(&self, args: &CreateBetArgs) -> Result<TxReceipt> {
        let pending = self
            .contract()
            .createBet(
                args.title.clone(),
                args.description.clone(),
                args.category.clone(),
                args.twitter_handle.clone(),
                args.end_date,
                args.join_amount,
                args.initial_pool_amount,
                args.image_url.clone(),
            )
            .value(args.value)
            .send()
            .await
            .context("sending createBet")?;
        info!("createBet sent: {}", pending.tx_hash());
        confirm(pending).await
    }

    async fn join_bet(&self, bet_id: U256, support: bool, value: U256) -> Result<TxReceipt> {
        let pending = self
            .contract()
            .joinBet(bet_id, support)
            .value(value)
            .send()
            .await
            .context("sending joinBet")?;
        confirm(pending).await
    }

    async fn close_bet(&self, bet_id: U256, outcome: bool) -> Result<TxReceipt> {
        let pending = self
            .contract()
            .closeBet(bet_id, outcome)
            .send()
            .await
            .context("sending closeBet")?;
        confirm(pending).await
    }

    async fn withdraw(&self) -> Result<TxReceipt> {
        let pending = self
            .contract()
            .withdraw()
            .send()
            .await
            .context("sending withdraw")?;
        confirm(pending).await
    }

    async fn bet_counter(&self) -> Result<U256> {
        self.contract()
            .betCounter()
            .call()
            .await
            .context("reading betCounter")
    }

    async fn bet_details(&self, bet_id: U256) -> Result<Bet> {
        let d = self
            .contract()
            .getBetDetailsAsStruct(bet_id)
            .call()
            .await
            .with_context(|| format!("reading bet {}", bet_id))?;

        Ok(Bet {
            id: d.id,
            creator: d.creator,
            amount: d.amount,
            title: d.title,
            description: d.description,
            category: d.category,
            twitter_handle: d.twitterHandle,
            end_date: d.endDate,
            initial_pool_amount: d.initialPoolAmount,
            image_url: d.imageURL,
            is_closed: d.isClosed,
            support_count: d.supportCount,
            against_count: d.againstCount,
            outcome: d.outcome,
        })
    }
}
