use crate::core::types::{TokenSale, TxReceipt};
use alloy::primitives::{Address, U256};
use anyhow::Result;
use async_trait::async_trait;

/// The launchpad's factory and native liquidity pool, as one signing connection.
#[async_trait]
pub trait LaunchpadClient: Send + Sync + 'static {
    /// Address of the connected signer.
    fn signer_address(&self) -> Address;

    async fn fee(&self) -> Result<U256>;
    async fn create(
        &self,
        name: &str,
        ticker: &str,
        metadata_uri: &str,
        value: U256,
    ) -> Result<TxReceipt>;
    async fn get_cost(&self, sold: U256) -> Result<U256>;
    async fn buy(&self, token: Address, amount: U256, value: U256) -> Result<TxReceipt>;
    async fn total_tokens(&self) -> Result<U256>;
    async fn token_sale(&self, index: U256) -> Result<TokenSale>;
    async fn price_for_tokens(&self, token: Address, amount: U256) -> Result<U256>;
    async fn estimated_tokens_for_eth(&self, token: Address, eth_amount: U256) -> Result<U256>;
    async fn estimated_eth_for_tokens(&self, token: Address, token_amount: U256) -> Result<U256>;

    async fn swap_eth_for_token(&self, token: Address, value: U256) -> Result<TxReceipt>;
    async fn swap_token_for_eth(&self, token: Address, token_amount: U256) -> Result<TxReceipt>;

    /// Current balances of every account that ever received `token`.
    async fn holder_balances(&self, token: Address) -> Result<Vec<(Address, U256)>>;
}
