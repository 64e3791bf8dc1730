use crate::chain::contracts::{IERC20, IFactory, INativeLiquidityPool};
use crate::chain::provider::{Wallet, confirm};
use crate::config::config::ChainCfg;
use crate::core::types::{TokenSale, TxReceipt};
use crate::launchpad::client::LaunchpadClient;
use crate::market::holders::{Transfer, balances_from_transfers};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

pub struct ContractLaunchpadClient {
    wallet: Wallet,
    factory: Address,
    liquidity_pool: Address,
    logs_from_block: u64,
}

impl ContractLaunchpadClient {
    /// Resolves the factory and pool for whatever network the wallet is on.
    pub async fn connect(wallet: Wallet, chain: &ChainCfg) -> Result<Self> {
        let chain_id = wallet
            .provider
            .get_chain_id()
            .await
            .context("reading chain id")?;
        let network = chain
            .network(chain_id)
            .ok_or_else(|| anyhow::anyhow!("Unsupported network: chain id {}", chain_id))?;

        let factory = network
            .factory
            .address
            .parse()
            .context("invalid factory address")?;
        let liquidity_pool = network
            .native_liquidity_pool
            .address
            .parse()
            .context("invalid nativeLiquidityPool address")?;
        info!(
            "Launchpad on chain {}: factory={} pool={}",
            chain_id, factory, liquidity_pool
        );

        Ok(Self {
            wallet,
            factory,
            liquidity_pool,
            logs_from_block: chain.logs_from_block,
        })
    }

    fn factory(&self) -> IFactory::IFactoryInstance<DynProvider> {
        IFactory::new(self.factory, self.wallet.provider.clone())
    }

    fn pool(&self) -> INativeLiquidityPool::INativeLiquidityPoolInstance<DynProvider> {
        INativeLiquidityPool::new(self.liquidity_pool, self.wallet.provider.clone())
    }
}

#[async_trait]
impl LaunchpadClient for ContractLaunchpadClient {
    fn signer_address(&self) -> Address {
        self.wallet.address
    }

    async fn fee(&self) -> Result<U256> {
        self.factory().fee().call().await.context("reading fee")
    }

    async fn create(
        &self,
        name: &str,
        ticker: &str,
        metadata_uri: &str,
        value: U256,
    ) -> Result<TxReceipt> {
        let pending = self
            .factory()
            .create(name.to_string(), ticker.to_string(), metadata_uri.to_string())
            .value(value)
            .send()
            .await
            .context("sending create")?;
        confirm(pending).await
    }

    async fn get_cost(&self, sold: U256) -> Result<U256> {
        self.factory()
            .getCost(sold)
            .call()
            .await
            .context("reading getCost")
    }

    async fn buy(&self, token: Address, amount: U256, value: U256) -> Result<TxReceipt> {
        let pending = self
            .factory()
            .buy(token, amount)
            .value(value)
            .send()
            .await
            .context("sending buy")?;
        confirm(pending).await
    }

    async fn total_tokens(&self) -> Result<U256> {
        self.factory()
            .totalTokens()
            .call()
            .await
            .context("reading totalTokens")
    }

    async fn token_sale(&self, index: U256) -> Result<TokenSale> {
        let sale = self
            .factory()
            .getTokenSale(index)
            .call()
            .await
            .with_context(|| format!("reading token sale {}", index))?;

        Ok(TokenSale {
            token: sale.token,
            name: sale.name,
            creator: sale.creator,
            sold: sale.sold,
            raised: sale.raised,
            is_open: sale.isOpen,
            metadata_uri: sale.metadataURI,
        })
    }

    async fn price_for_tokens(&self, token: Address, amount: U256) -> Result<U256> {
        self.factory()
            .getPriceForTokens(token, amount)
            .call()
            .await
            .context("reading getPriceForTokens")
    }

    async fn estimated_tokens_for_eth(&self, token: Address, eth_amount: U256) -> Result<U256> {
        self.factory()
            .getEstimatedTokensForEth(token, eth_amount)
            .call()
            .await
            .context("reading getEstimatedTokensForEth")
    }

    async fn estimated_eth_for_tokens(&self, token: Address, token_amount: U256) -> Result<U256> {
        self.factory()
            .getEstimatedEthForTokens(token, token_amount)
            .call()
            .await
            .context("reading getEstimatedEthForTokens")
    }

    async fn swap_eth_for_token(&self, token: Address, value: U256) -> Result<TxReceipt> {
        let pending = self
            .pool()
            .swapEthForToken(token)
            .value(value)
            .send()
            .await
            .context("sending swapEthForToken")?;
        confirm(pending).await
    }

    async fn swap_token_for_eth(&self, token: Address, token_amount: U256) -> Result<TxReceipt> {
        let pending = self
            .pool()
            .swapTokenForEth(token, token_amount)
            .send()
            .await
            .context("sending swapTokenForEth")?;
        confirm(pending).await
    }

    async fn holder_balances(&self, token: Address) -> Result<Vec<(Address, U256)>> {
        let filter = Filter::new()
            .address(token)
            .event_signature(IERC20::Transfer::SIGNATURE_HASH)
            .from_block(self.logs_from_block);
        let logs = self
            .wallet
            .provider
            .get_logs(&filter)
            .await
            .context("reading Transfer logs")?;

        let mut transfers = Vec::with_capacity(logs.len());
        for log in logs {
            let decoded = log
                .log_decode::<IERC20::Transfer>()
                .context("decoding Transfer log")?;
            let ev = decoded.inner.data;
            transfers.push(Transfer {
                from: ev.from,
                to: ev.to,
                value: ev.value,
            });
        }
        info!("Token {}: {} transfers scanned", token, transfers.len());
        Ok(balances_from_transfers(&transfers))
    }
}
