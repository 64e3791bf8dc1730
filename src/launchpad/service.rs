use crate::chain::units::scale_whole;
use crate::core::types::{
    CreateTokenOutcome, Holder, ImageUpload, Token, TokenDraft, TokenFilter, TokenMetadata,
    TokenSale, TxOutcome, TxReceipt,
};
use crate::ipfs::client::Pinner;
use crate::launchpad::client::LaunchpadClient;
use crate::launchpad::metadata::MetadataFetcher;
use crate::market::holders::rank_holders;
use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Most whole tokens a single price quote may ask for.
pub const PRICE_QUOTE_CAP: u64 = 10_000;

pub struct LaunchpadService {
    client: Arc<dyn LaunchpadClient>,
    pinner: Arc<dyn Pinner>,
    metadata: MetadataFetcher,
}

impl LaunchpadService {
    pub fn new(
        client: Arc<dyn LaunchpadClient>,
        pinner: Arc<dyn Pinner>,
        metadata: MetadataFetcher,
    ) -> Self {
        Self {
            client,
            pinner,
            metadata,
        }
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

    /// Spends `amount` wei of the native coin on `sale`'s token in the pool.
    pub async fn swap_coin_for_token(&self, sale: &TokenSale, amount: U256) -> TxOutcome {
        Self::settle(
            "swapEthForToken",
            self.client.swap_eth_for_token(sale.token, amount).await,
        )
    }

    pub async fn swap_token_for_coin(&self, sale: &TokenSale, token_amount: U256) -> TxOutcome {
        Self::settle(
            "swapTokenForEth",
            self.client.swap_token_for_eth(sale.token, token_amount).await,
        )
    }

    /// Pins the image and metadata, then launches the token on the factory.
    /// Whatever was pinned is unpinned again if the launch does not succeed.
    #[tracing::instrument(skip(self, draft, image), fields(ticker = %draft.ticker))]
    pub async fn create_token(&self, draft: &TokenDraft, image: ImageUpload) -> CreateTokenOutcome {
        let mut pinned = Vec::new();

        match self.launch(draft, image, &mut pinned).await {
            Ok((receipt, image_url)) if receipt.status => {
                info!("Token {} launched in tx {}", draft.ticker, receipt.tx_hash);
                CreateTokenOutcome {
                    success: true,
                    image_url: Some(image_url),
                    error: None,
                }
            }
            Ok((receipt, _)) => {
                warn!("create reverted in tx {}", receipt.tx_hash);
                self.unpin_all(&pinned).await;
                CreateTokenOutcome {
                    success: false,
                    image_url: None,
                    error: Some("Transaction failed".to_string()),
                }
            }
            Err(e) => {
                error!("Error in createToken: {:?}", e);
                self.unpin_all(&pinned).await;
                CreateTokenOutcome {
                    success: false,
                    image_url: None,
                    error: Some(format!("{:#}", e)),
                }
            }
        }
    }

    async fn launch(
        &self,
        draft: &TokenDraft,
        image: ImageUpload,
        pinned: &mut Vec<String>,
    ) -> Result<(TxReceipt, String)> {
        let image_url = self
            .pinner
            .pin_file(&image.file_name, image.bytes)
            .await
            .context("pinning image")?;
        pinned.push(image_url.clone());

        let metadata = TokenMetadata {
            name: draft.name.clone(),
            ticker: draft.ticker.clone(),
            description: draft.description.clone(),
            image_uri: image_url.clone(),
        };
        let metadata_uri = self
            .pinner
            .pin_json(&draft.ticker, &serde_json::to_value(&metadata)?)
            .await
            .context("pinning metadata")?;
        pinned.push(metadata_uri.clone());

        let fee = self.client.fee().await?;
        let receipt = self
            .client
            .create(&draft.name, &draft.ticker, &metadata_uri, fee)
            .await?;
        Ok((receipt, image_url))
    }

    async fn unpin_all(&self, pinned: &[String]) {
        for uri in pinned {
            if let Err(e) = self.pinner.unpin(uri).await {
                warn!("Failed to unpin {}: {:#}", uri, e);
            }
        }
    }

    /// Buys `amount` whole tokens from an open sale at the current curve price.
    pub async fn buy_token(&self, sale: &TokenSale, amount: U256) -> TxOutcome {
        if !sale.is_open {
            return TxOutcome::skipped();
        }
        Self::settle("buy", self.try_buy(sale, amount).await)
    }

    async fn try_buy(&self, sale: &TokenSale, amount: U256) -> Result<TxReceipt> {
        let cost = self.client.get_cost(sale.sold).await?;
        let total_cost = cost
            .checked_mul(amount)
            .ok_or_else(|| anyhow::anyhow!("total cost overflows"))?;
        info!("Buying {} tokens of {} for {} wei", amount, sale.token, total_cost);

        self.client
            .buy(sale.token, scale_whole(amount)?, total_cost)
            .await
    }

    /// Token sales newest first, with metadata resolved. Empty if any read fails.
    pub async fn get_tokens(&self, filter: TokenFilter) -> Vec<Token> {
        match self.read_tokens(filter).await {
            Ok(tokens) => tokens,
            Err(e) => {
                error!("Error in getTokens: {:?}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_all_tokens(&self) -> Vec<Token> {
        self.get_tokens(TokenFilter::default()).await
    }

    pub async fn get_user_tokens(&self) -> Vec<Token> {
        self.get_tokens(TokenFilter {
            is_open: None,
            is_creator: true,
        })
        .await
    }

    async fn read_tokens(&self, filter: TokenFilter) -> Result<Vec<Token>> {
        let total = self.client.total_tokens().await?;
        let creator = filter.is_creator.then(|| self.client.signer_address());

        let mut tokens = Vec::new();
        let mut i = U256::ZERO;
        while i < total {
            let sale = self.client.token_sale(i).await?;
            i += U256::from(1);

            let matches_open = filter.is_open.is_none_or(|open| sale.is_open == open);
            let matches_creator = creator.is_none_or(|c| sale.creator == c);
            if !(matches_open && matches_creator) {
                continue;
            }

            let metadata = self.metadata.fetch(&sale.metadata_uri).await;
            tokens.push(Token::from_sale(sale, metadata));
        }

        tokens.reverse();
        Ok(tokens)
    }

    pub async fn fetch_metadata(&self, metadata_uri: &str) -> TokenMetadata {
        self.metadata.fetch(metadata_uri).await
    }

    /// The sale record of `token`, found by scanning the factory in index order.
    pub async fn find_sale(&self, token: Address) -> Result<TokenSale> {
        let total = self.client.total_tokens().await?;
        let mut i = U256::ZERO;
        while i < total {
            let sale = self.client.token_sale(i).await?;
            if sale.token == token {
                return Ok(sale);
            }
            i += U256::from(1);
        }
        anyhow::bail!("token {} is not listed on the factory", token)
    }

    /// Zero for closed sales and for quotes above the cap.
    pub async fn get_price_for_tokens(&self, sale: &TokenSale, amount: U256) -> Result<U256> {
        // amount * 10^18 > cap * 10^18 exactly when amount > cap
        if !sale.is_open || amount > U256::from(PRICE_QUOTE_CAP) {
            return Ok(U256::ZERO);
        }
        self.client.price_for_tokens(sale.token, amount).await
    }

    /// Pool estimate; zero while the sale is still open and the pool is unfunded.
    pub async fn get_estimated_tokens_for_eth(
        &self,
        sale: &TokenSale,
        eth_amount: U256,
    ) -> Result<U256> {
        if sale.is_open {
            return Ok(U256::ZERO);
        }
        self.client
            .estimated_tokens_for_eth(sale.token, scale_whole(eth_amount)?)
            .await
    }

    pub async fn get_estimated_eth_for_tokens(
        &self,
        sale: &TokenSale,
        token_amount: U256,
    ) -> Result<U256> {
        if sale.is_open {
            return Ok(U256::ZERO);
        }
        self.client
            .estimated_eth_for_tokens(sale.token, scale_whole(token_amount)?)
            .await
    }

    pub async fn top_holders(&self, token: Address, limit: usize) -> Result<Vec<Holder>> {
        let balances = self.client.holder_balances(token).await?;
        Ok(rank_holders(balances, limit))
    }
}
