use crate::core::types::{Bet, CreateBetArgs, TxReceipt};
use alloy::primitives::U256;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BettingClient: Send + Sync + 'static {
    async fn create_bet(&self, args: &CreateBetArgs) -> Result<TxReceipt>;
    async fn join_bet(&self, bet_id: U256, support: bool, value: U256) -> Result<TxReceipt>;
    async fn close_bet(&self, bet_id: U256, outcome: bool) -> Result<TxReceipt>;
    async fn withdraw(&self) -> Result<TxReceipt>;
    async fn bet_counter(&self) -> Result<U256>;
    async fn bet_details(&self, bet_id: U256) -> Result<Bet>;
}
