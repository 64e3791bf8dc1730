use crate::chain::units::UNIT;
use crate::core::types::{TokenSale, TxReceipt};
use crate::launchpad::client::LaunchpadClient;
use alloy::primitives::{Address, B256, U256};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Whole tokens a sale can sell before it closes and liquidity moves to the pool.
pub const SIM_SALE_CAP: u64 = 10_000;
/// Tokens seeded into the pool next to the raised coin when a sale closes.
pub const SIM_POOL_TOKENS: u64 = 200_000;

#[derive(Debug)]
pub struct SimLaunchpadState {
    pub fee: U256,
    /// Price of the first whole token, in wei. Each sold whole token adds `cost_step`.
    pub cost_floor: U256,
    pub cost_step: U256,
    pub sales: Vec<TokenSale>,
    pub balances: HashMap<(Address, Address), U256>,
    /// token -> (coin reserve, token reserve)
    pub reserves: HashMap<Address, (U256, U256)>,
    pub tx_count: u64,
    pub reject_writes: bool,
    /// Mined but reverted `create` receipts.
    pub revert_create: bool,
    pub broken_sale: Option<U256>,
}

impl Default for SimLaunchpadState {
    fn default() -> Self {
        Self {
            fee: U256::from(10_000_000_000_000_000u64), // 0.01
            cost_floor: U256::from(1_000_000_000_000u64), // 0.000001
            cost_step: U256::from(1_000_000_000u64),
            sales: Vec::new(),
            balances: HashMap::new(),
            reserves: HashMap::new(),
            tx_count: 0,
            reject_writes: false,
            revert_create: false,
            broken_sale: None,
        }
    }
}

impl SimLaunchpadState {
    fn receipt(&mut self, status: bool) -> TxReceipt {
        self.tx_count += 1;
        TxReceipt {
            tx_hash: B256::from(U256::from(self.tx_count)),
            status,
            block_number: Some(self.tx_count),
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.reject_writes {
            anyhow::bail!("execution reverted: simulated rejection");
        }
        Ok(())
    }

    fn sale_mut(&mut self, token: Address) -> Result<&mut TokenSale> {
        self.sales
            .iter_mut()
            .find(|s| s.token == token)
            .ok_or_else(|| anyhow::anyhow!("execution reverted: unknown token"))
    }

    fn cost(&self, sold: U256) -> U256 {
        self.cost_floor + self.cost_step * (sold / UNIT)
    }

    fn pool(&self, token: Address) -> Result<(U256, U256)> {
        self.reserves
            .get(&token)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("execution reverted: no liquidity"))
    }
}

// constant product, no fee
fn amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> U256 {
    if amount_in.is_zero() {
        return U256::ZERO;
    }
    reserve_out * amount_in / (reserve_in + amount_in)
}

/// In-memory factory plus liquidity pool with a linear sale curve.
pub struct SimLaunchpadClient {
    pub account: Address,
    pub state: Mutex<SimLaunchpadState>,
}

impl SimLaunchpadClient {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            state: Mutex::new(SimLaunchpadState::default()),
        }
    }
}

#[async_trait]
impl LaunchpadClient for SimLaunchpadClient {
    fn signer_address(&self) -> Address {
        self.account
    }

    async fn fee(&self) -> Result<U256> {
        Ok(self.state.lock().await.fee)
    }

    async fn create(
        &self,
        name: &str,
        _ticker: &str,
        metadata_uri: &str,
        value: U256,
    ) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        anyhow::ensure!(value >= state.fee, "execution reverted: fee not paid");
        if state.revert_create {
            return Ok(state.receipt(false));
        }

        let n = state.sales.len() as u64;
        let token = Address::left_padding_from(&(0x1000 + n).to_be_bytes());
        state.sales.push(TokenSale {
            token,
            name: name.to_string(),
            creator: self.account,
            sold: U256::ZERO,
            raised: U256::ZERO,
            is_open: true,
            metadata_uri: metadata_uri.to_string(),
        });
        Ok(state.receipt(true))
    }

    async fn get_cost(&self, sold: U256) -> Result<U256> {
        Ok(self.state.lock().await.cost(sold))
    }

    async fn buy(&self, token: Address, amount: U256, value: U256) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        let cap = U256::from(SIM_SALE_CAP) * UNIT;

        let sold = state.sale_mut(token)?.sold;
        let price = state.cost(sold) * (amount / UNIT);
        let sale = state.sale_mut(token)?;
        anyhow::ensure!(sale.is_open, "execution reverted: sale closed");
        anyhow::ensure!(sale.sold + amount <= cap, "execution reverted: over cap");
        anyhow::ensure!(value >= price, "execution reverted: insufficient payment");

        sale.sold += amount;
        sale.raised += value;
        let (closed, raised) = (sale.sold >= cap, sale.raised);
        if closed {
            sale.is_open = false;
            state
                .reserves
                .insert(token, (raised, U256::from(SIM_POOL_TOKENS) * UNIT));
        }
        *state.balances.entry((token, self.account)).or_default() += amount;
        Ok(state.receipt(true))
    }

    async fn total_tokens(&self) -> Result<U256> {
        Ok(U256::from(self.state.lock().await.sales.len()))
    }

    async fn token_sale(&self, index: U256) -> Result<TokenSale> {
        let state = self.state.lock().await;
        if state.broken_sale == Some(index) {
            anyhow::bail!("could not decode token sale {}", index);
        }
        let i = usize::try_from(index)
            .map_err(|_| anyhow::anyhow!("token sale index {} out of range", index))?;
        state
            .sales
            .get(i)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("token sale {} does not exist", index))
    }

    async fn price_for_tokens(&self, token: Address, amount: U256) -> Result<U256> {
        let mut state = self.state.lock().await;
        let sold = state.sale_mut(token)?.sold;
        Ok(state.cost(sold) * amount)
    }

    async fn estimated_tokens_for_eth(&self, token: Address, eth_amount: U256) -> Result<U256> {
        let (coin, tokens) = self.state.lock().await.pool(token)?;
        Ok(amount_out(eth_amount, coin, tokens))
    }

    async fn estimated_eth_for_tokens(&self, token: Address, token_amount: U256) -> Result<U256> {
        let (coin, tokens) = self.state.lock().await.pool(token)?;
        Ok(amount_out(token_amount, tokens, coin))
    }

    async fn swap_eth_for_token(&self, token: Address, value: U256) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        let (coin, tokens) = state.pool(token)?;
        let out = amount_out(value, coin, tokens);
        anyhow::ensure!(!out.is_zero(), "execution reverted: zero output");

        state.reserves.insert(token, (coin + value, tokens - out));
        *state.balances.entry((token, self.account)).or_default() += out;
        Ok(state.receipt(true))
    }

    async fn swap_token_for_eth(&self, token: Address, token_amount: U256) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        let (coin, tokens) = state.pool(token)?;
        let held = state
            .balances
            .get(&(token, self.account))
            .copied()
            .unwrap_or_default();
        anyhow::ensure!(held >= token_amount, "execution reverted: insufficient balance");

        let out = amount_out(token_amount, tokens, coin);
        state.reserves.insert(token, (coin - out, tokens + token_amount));
        state
            .balances
            .insert((token, self.account), held - token_amount);
        Ok(state.receipt(true))
    }

    async fn holder_balances(&self, token: Address) -> Result<Vec<(Address, U256)>> {
        let state = self.state.lock().await;
        Ok(state
            .balances
            .iter()
            .filter(|((t, _), balance)| *t == token && !balance.is_zero())
            .map(|((_, holder), balance)| (*holder, *balance))
            .collect())
    }
}
