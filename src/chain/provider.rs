use crate::core::types::TxReceipt;
use anyhow::{Context, Result};
use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use tracing::info;

/// Signing connection: the provider fills and signs transactions for `address`.
#[derive(Clone)]
pub struct Wallet {
    pub provider: DynProvider,
    pub address: Address,
}

pub fn connect_wallet(rpc_url: &str, private_key: &str) -> Result<Wallet> {
    let signer: PrivateKeySigner = private_key
        .trim()
        .parse()
        .context("Invalid private key format")?;
    let address = signer.address();

    let url = rpc_url
        .parse()
        .with_context(|| format!("invalid rpc url '{}'", rpc_url))?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url)
        .erased();

    info!("Wallet connected: {} via {}", address, rpc_url);
    Ok(Wallet { provider, address })
}

pub fn connect_read_only(rpc_url: &str) -> Result<DynProvider> {
    let url = rpc_url
        .parse()
        .with_context(|| format!("invalid rpc url '{}'", rpc_url))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// Waits for one confirmation of a sent transaction.
pub async fn confirm(pending: PendingTransactionBuilder<Ethereum>) -> Result<TxReceipt> {
    let tx_hash = *pending.tx_hash();
    let receipt = pending
        .with_required_confirmations(1)
        .get_receipt()
        .await
        .context("waiting for transaction receipt")?;

    Ok(TxReceipt {
        tx_hash,
        status: receipt.status(),
        block_number: receipt.block_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_address_from_key() {
        // anvil's first dev account
        let wallet = connect_wallet(
            "http://localhost:8545",
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        assert_eq!(
            wallet.address,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_bad_key_is_rejected() {
        let err = connect_wallet("http://localhost:8545", "dummypk")
            .err()
            .unwrap();
        assert!(err.to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_bad_url_is_rejected() {
        assert!(connect_read_only("not a url").is_err());
    }
}
