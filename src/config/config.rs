use crate::core::types::Chain;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub http: HttpCfg,
    #[serde(default)]
    pub chain: ChainCfg,
    #[serde(default)]
    pub betting: BettingCfg,
    #[serde(default)]
    pub pinata: PinataCfg,
    #[serde(default)]
    pub marketplace: MarketplaceCfg,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpCfg {
    #[serde(rename = "userAgent", alias = "useragent", default = "default_ua")]
    pub user_agent: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(rename = "poolIdleTimeout", alias = "poolidletimeout", with = "humantime_serde", default = "default_pool_idle")]
    pub pool_idle_timeout: Duration,
    #[serde(rename = "tcpKeepAlive", alias = "tcpkeepalive", with = "humantime_serde", default = "default_keep_alive")]
    pub tcp_keep_alive: Duration,
    #[serde(rename = "poolMaxIdlePerHost", alias = "poolmaxidleperhost", default = "default_pool")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            user_agent: default_ua(),
            timeout: default_timeout(),
            pool_idle_timeout: default_pool_idle(),
            tcp_keep_alive: default_keep_alive(),
            pool_max_idle_per_host: default_pool(),
        }
    }
}
fn default_ua() -> String {
    "memeswap/0.1".into()
}
fn default_timeout() -> Duration {
    Duration::from_secs(15)
}
fn default_pool() -> usize {
    16
}
fn default_pool_idle() -> Duration {
    Duration::from_secs(90)
}
fn default_keep_alive() -> Duration {
    Duration::from_secs(60)
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ContractRef {
    pub address: String,
}

/// Launchpad deployment on one network, keyed by chain id in `ChainCfg::networks`.
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkCfg {
    pub factory: ContractRef,
    #[serde(rename = "nativeLiquidityPool", alias = "nativeliquiditypool")]
    pub native_liquidity_pool: ContractRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChainCfg {
    #[serde(rename = "rpcUrl", alias = "rpcurl", default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(rename = "privateKey", alias = "privatekey", default)]
    pub private_key: String,
    #[serde(rename = "logsFromBlock", alias = "logsfromblock", default)]
    pub logs_from_block: u64,
    #[serde(default)]
    pub networks: HashMap<String, NetworkCfg>,
}

impl Default for ChainCfg {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            private_key: "".to_string(),
            logs_from_block: 0,
            networks: HashMap::new(),
        }
    }
}

impl ChainCfg {
    pub fn has_wallet(&self) -> bool {
        !self.private_key.trim().is_empty()
    }

    pub fn network(&self, chain_id: u64) -> Option<&NetworkCfg> {
        self.networks.get(&chain_id.to_string())
    }
}

fn default_rpc_url() -> String {
    "https://testnet.aurora.dev".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BettingCfg {
    #[serde(default = "default_betting_address")]
    pub address: String,
    #[serde(rename = "readOnlyRpcUrl", alias = "readonlyrpcurl", default = "default_rpc_url")]
    pub read_only_rpc_url: String,
    /// Stake sent with `joinBet`, in ether.
    #[serde(rename = "joinAmount", alias = "joinamount", default = "default_join_amount")]
    pub join_amount: Decimal,
}

impl Default for BettingCfg {
    fn default() -> Self {
        Self {
            address: default_betting_address(),
            read_only_rpc_url: default_rpc_url(),
            join_amount: default_join_amount(),
        }
    }
}
fn default_betting_address() -> String {
    "0x930aE314a7285B7Cac2E5c7b1c59319837816D48".to_string()
}
fn default_join_amount() -> Decimal {
    Decimal::ONE
}

#[derive(Debug, Deserialize, Clone)]
pub struct PinataCfg {
    #[serde(rename = "apiUrl", alias = "apiurl", default = "default_pinata_api")]
    pub api_url: String,
    #[serde(rename = "gatewayUrl", alias = "gatewayurl", default = "default_gateway")]
    pub gateway_url: String,
    #[serde(default)]
    pub jwt: String,
}

impl Default for PinataCfg {
    fn default() -> Self {
        Self {
            api_url: default_pinata_api(),
            gateway_url: default_gateway(),
            jwt: "".to_string(),
        }
    }
}
fn default_pinata_api() -> String {
    "https://api.pinata.cloud".to_string()
}
fn default_gateway() -> String {
    "https://gateway.pinata.cloud".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeaturedListingCfg {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "imageUrl", alias = "imageurl", default)]
    pub image_url: String,
    #[serde(default)]
    pub price: String,
    #[serde(rename = "marketCap", alias = "marketcap", default)]
    pub market_cap: String,
    #[serde(rename = "priceChange", alias = "pricechange", default)]
    pub price_change: Decimal,
    pub chain: Chain,
    #[serde(rename = "launchDate", alias = "launchdate", default)]
    pub launch_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketplaceCfg {
    #[serde(rename = "itemsPerPage", alias = "itemsperpage", default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(rename = "betsPerPage", alias = "betsperpage", default = "default_bets_per_page")]
    pub bets_per_page: usize,
    #[serde(rename = "topHolders", alias = "topholders", default = "default_top_holders")]
    pub top_holders: usize,
    #[serde(with = "humantime_serde", default = "default_refresh")]
    pub refresh: Duration,
    /// Chain the launchpad tokens are listed under.
    #[serde(default = "default_chain")]
    pub chain: Chain,
    #[serde(default)]
    pub featured: Vec<FeaturedListingCfg>,
}

impl Default for MarketplaceCfg {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            bets_per_page: default_bets_per_page(),
            top_holders: default_top_holders(),
            refresh: default_refresh(),
            chain: default_chain(),
            featured: Vec::new(),
        }
    }
}
fn default_items_per_page() -> usize {
    8
}
fn default_bets_per_page() -> usize {
    6
}
fn default_top_holders() -> usize {
    10
}
fn default_refresh() -> Duration {
    Duration::from_secs(60)
}
fn default_chain() -> Chain {
    Chain::Ethereum
}

impl AppCfg {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(path))
            .add_source(config::Environment::default().separator("__"))
            .build()
            .context("building config")?;

        let app: AppCfg = cfg.try_deserialize().context("deserializing config")?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.chain.rpc_url.is_empty(), "chain.rpcUrl missing");
        anyhow::ensure!(
            self.betting.address.parse::<alloy::primitives::Address>().is_ok(),
            "betting.address is not a valid address: '{}'",
            self.betting.address
        );
        anyhow::ensure!(
            !self.betting.read_only_rpc_url.is_empty(),
            "betting.readOnlyRpcUrl missing"
        );
        anyhow::ensure!(
            self.betting.join_amount > Decimal::ZERO,
            "betting.joinAmount must be > 0"
        );
        anyhow::ensure!(!self.pinata.api_url.is_empty(), "pinata.apiUrl missing");
        anyhow::ensure!(
            !self.pinata.gateway_url.is_empty(),
            "pinata.gatewayUrl missing"
        );
        anyhow::ensure!(
            self.marketplace.items_per_page > 0,
            "marketplace.itemsPerPage must be > 0"
        );
        anyhow::ensure!(
            self.marketplace.bets_per_page > 0,
            "marketplace.betsPerPage must be > 0"
        );
        anyhow::ensure!(
            !self.marketplace.refresh.is_zero(),
            "marketplace.refresh must be > 0"
        );
        for (chain_id, net) in &self.chain.networks {
            anyhow::ensure!(
                chain_id.parse::<u64>().is_ok(),
                "chain.networks key '{}' is not a chain id",
                chain_id
            );
            for contract in [&net.factory, &net.native_liquidity_pool] {
                anyhow::ensure!(
                    contract.address.parse::<alloy::primitives::Address>().is_ok(),
                    "chain.networks.{}: invalid address '{}'",
                    chain_id,
                    contract.address
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_env_var_override() {
        unsafe {
            env::set_var("PINATA__JWT", "env-jwt-123");
        }

        let cfg = Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()
            .unwrap();

        let val = cfg.get_string("pinata.jwt").unwrap();
        assert_eq!(val, "env-jwt-123");

        unsafe {
            env::remove_var("PINATA__JWT");
        }
    }

    #[test]
    fn test_defaults_validate() {
        let cfg = AppCfg::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.marketplace.items_per_page, 8);
        assert_eq!(cfg.marketplace.bets_per_page, 6);
        assert_eq!(cfg.betting.join_amount, Decimal::ONE);
        assert!(!cfg.chain.has_wallet());
    }

    #[test]
    fn test_yaml_sections_deserialize() {
        let yaml = r#"
chain:
  rpcUrl: "http://localhost:8545"
  networks:
    "31337":
      factory:
        address: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
      nativeLiquidityPool:
        address: "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
marketplace:
  itemsPerPage: 4
  refresh: 30s
  featured:
    - name: "Doge Wisdom"
      symbol: "WISE"
      priceChange: "0.41"
      chain: ethereum
"#;
        let cfg: AppCfg = Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(cfg.validate().is_ok());
        assert!(cfg.chain.network(31337).is_some());
        assert!(cfg.chain.network(1).is_none());
        assert_eq!(cfg.marketplace.items_per_page, 4);
        assert_eq!(cfg.marketplace.refresh, Duration::from_secs(30));
        assert_eq!(cfg.marketplace.featured[0].chain, Chain::Ethereum);
    }

    #[test]
    fn test_shipped_config_loads() {
        let cfg = AppCfg::load("config.yml").unwrap();
        assert_eq!(cfg.http.pool_idle_timeout, Duration::from_secs(90));
        assert_eq!(cfg.http.user_agent, "memeswap/0.1");
        assert!(cfg.chain.network(1313161555).is_some());
        assert_eq!(
            cfg.betting.read_only_rpc_url,
            "https://testnet.aurora.dev"
        );
        assert_eq!(cfg.marketplace.items_per_page, 8);
        assert_eq!(cfg.marketplace.featured.len(), 2);
        assert_eq!(cfg.marketplace.featured[1].chain, Chain::Solana);
        assert_eq!(
            cfg.marketplace.featured[0].launch_date,
            NaiveDate::from_ymd_opt(2025, 1, 10)
        );
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let mut cfg = AppCfg::default();
        cfg.marketplace.refresh = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_invalid_network_address_rejected() {
        let mut cfg = AppCfg::default();
        cfg.chain.networks.insert(
            "1".to_string(),
            NetworkCfg {
                factory: ContractRef {
                    address: "not-an-address".to_string(),
                },
                native_liquidity_pool: ContractRef {
                    address: "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".to_string(),
                },
            },
        );
        assert!(cfg.validate().is_err());
    }
}
