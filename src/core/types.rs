use alloy::primitives::{Address, B256, U256};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[async_trait::async_trait]
pub trait Actor: Send + Sync + 'static {
    async fn run(self) -> Result<()>;
}

// ----------- Betting -----------------
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bet {
    pub id: U256,
    pub creator: Address,
    pub amount: U256,
    pub title: String,
    pub description: String,
    pub category: String,
    pub twitter_handle: String,
    pub end_date: U256, // unix seconds
    pub initial_pool_amount: U256,
    pub image_url: String,
    pub is_closed: bool,
    pub support_count: U256,
    pub against_count: U256,
    pub outcome: bool,
}

/// User-entered bet parameters. Amounts are in ether, not wei.
#[derive(Clone, Debug)]
pub struct BetDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub twitter_handle: String,
    pub end_date: u64,
    pub join_amount: Decimal,
    pub initial_pool_amount: Decimal,
    pub image_url: String,
}

/// Arguments for `createBet` as the contract sees them (wei amounts).
#[derive(Clone, Debug)]
pub struct CreateBetArgs {
    pub title: String,
    pub description: String,
    pub category: String,
    pub twitter_handle: String,
    pub end_date: U256,
    pub join_amount: U256,
    pub initial_pool_amount: U256,
    pub image_url: String,
    pub value: U256,
}

// ----------- Launchpad -----------------
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSale {
    pub token: Address,
    pub name: String,
    pub creator: Address,
    pub sold: U256,
    pub raised: U256,
    pub is_open: bool,
    pub metadata_uri: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub token: Address,
    pub name: String,
    pub ticker: String,
    pub creator: Address,
    pub sold: U256,
    pub raised: U256,
    pub is_open: bool,
    pub image: String,
    pub description: String,
}

impl Token {
    pub fn from_sale(sale: TokenSale, metadata: TokenMetadata) -> Self {
        Self {
            token: sale.token,
            name: sale.name,
            ticker: metadata.ticker,
            creator: sale.creator,
            sold: sale.sold,
            raised: sale.raised,
            is_open: sale.is_open,
            image: metadata.image_uri,
            description: metadata.description,
        }
    }
}

/// Metadata document pinned to IPFS next to every launched token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "imageURI", default)]
    pub image_uri: String,
}

impl TokenMetadata {
    pub fn unknown(description: &str) -> Self {
        Self {
            name: "Unknown".to_string(),
            ticker: String::new(),
            description: description.to_string(),
            image_uri: String::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TokenDraft {
    pub name: String,
    pub ticker: String,
    pub description: String,
}

#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TokenFilter {
    pub is_open: Option<bool>,
    pub is_creator: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Holder {
    pub rank: usize,
    pub address: Address,
    pub liquidity_percentage: Decimal,
}

// ----------- Transactions -----------------
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub status: bool,
    pub block_number: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub success: bool,
    pub tx_hash: Option<B256>,
    pub error: Option<String>,
}

impl TxOutcome {
    pub fn from_receipt(receipt: &TxReceipt) -> Self {
        Self {
            success: receipt.status,
            tx_hash: Some(receipt.tx_hash),
            error: (!receipt.status).then(|| "Transaction failed".to_string()),
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            tx_hash: None,
            error: Some(error.to_string()),
        }
    }

    /// Rejected before anything was sent, e.g. a closed sale.
    pub fn skipped() -> Self {
        Self {
            success: false,
            tx_hash: None,
            error: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTokenOutcome {
    pub success: bool,
    pub image_url: Option<String>,
    pub error: Option<String>,
}

// ----------- Marketplace -----------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Bsc,
    Solana,
    Polygon,
    Avalanche,
}

impl Chain {
    pub const ALL: [Chain; 5] = [
        Chain::Ethereum,
        Chain::Bsc,
        Chain::Solana,
        Chain::Polygon,
        Chain::Avalanche,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Bsc => "bsc",
            Chain::Solana => "solana",
            Chain::Polygon => "polygon",
            Chain::Avalanche => "avalanche",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Bsc => "BSC",
            Chain::Solana => "Solana",
            Chain::Polygon => "Polygon",
            Chain::Avalanche => "Avalanche",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Chain::ALL
            .into_iter()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| anyhow::anyhow!("unknown chain '{}'", s))
    }
}

// ----------- Bus messages -----------------
#[derive(Clone, Debug)]
pub struct BetsSnapshot {
    pub bets: Vec<Bet>,
    pub ts_ms: i64,
}

#[derive(Clone, Debug)]
pub struct TokensSnapshot {
    pub tokens: Vec<Token>,
    pub ts_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_parse_is_case_insensitive() {
        assert_eq!("BSC".parse::<Chain>().unwrap(), Chain::Bsc);
        assert_eq!(" solana ".parse::<Chain>().unwrap(), Chain::Solana);
        assert!("dogechain".parse::<Chain>().is_err());
    }

    #[test]
    fn test_metadata_uses_image_uri_key() {
        let json = r#"{"name":"Wise","ticker":"WISE","description":"wow","imageURI":"https://x/ipfs/abc"}"#;
        let meta: TokenMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.image_uri, "https://x/ipfs/abc");

        let partial: TokenMetadata = serde_json::from_str(r#"{"name":"Bare"}"#).unwrap();
        assert!(partial.ticker.is_empty());
        assert!(partial.image_uri.is_empty());
    }

    #[test]
    fn test_outcome_from_failed_receipt() {
        let receipt = TxReceipt {
            tx_hash: B256::with_last_byte(7),
            status: false,
            block_number: Some(10),
        };
        let outcome = TxOutcome::from_receipt(&receipt);
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Transaction failed"));
    }
}
