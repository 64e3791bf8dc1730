use crate::betting::client::BettingClient;
use crate::core::types::{Bet, CreateBetArgs, TxReceipt};
use alloy::primitives::{Address, B256, U256};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct SimBettingState {
    pub bets: Vec<Bet>,
    /// (bet id, participant) -> side taken
    pub positions: HashMap<(U256, Address), bool>,
    pub stakes: HashMap<(U256, Address), U256>,
    pub withdrawable: HashMap<Address, U256>,
    pub tx_count: u64,
    /// Makes `bet_details` fail for this id, to exercise partial read failures.
    pub broken_bet: Option<U256>,
    /// Every write reverts when set.
    pub reject_writes: bool,
}

/// In-memory Betting contract.
pub struct SimBettingClient {
    pub account: Address,
    pub state: Mutex<SimBettingState>,
}

impl SimBettingClient {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            state: Mutex::new(SimBettingState::default()),
        }
    }

    fn receipt(state: &mut SimBettingState) -> TxReceipt {
        state.tx_count += 1;
        TxReceipt {
            tx_hash: B256::from(U256::from(state.tx_count)),
            status: true,
            block_number: Some(state.tx_count),
        }
    }

    fn check_writable(state: &SimBettingState) -> Result<()> {
        if state.reject_writes {
            anyhow::bail!("execution reverted: simulated rejection");
        }
        Ok(())
    }
}

#[async_trait]
impl BettingClient for SimBettingClient {
    async fn create_bet(&self, args: &CreateBetArgs) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        Self::check_writable(&state)?;
        anyhow::ensure!(
            args.value == args.join_amount + args.initial_pool_amount,
            "execution reverted: incorrect value"
        );

        let id = U256::from(state.bets.len());
        state.bets.push(Bet {
            id,
            creator: self.account,
            amount: args.join_amount,
            title: args.title.clone(),
            description: args.description.clone(),
            category: args.category.clone(),
            twitter_handle: args.twitter_handle.clone(),
            end_date: args.end_date,
            initial_pool_amount: args.initial_pool_amount,
            image_url: args.image_url.clone(),
            is_closed: false,
            support_count: U256::ZERO,
            against_count: U256::ZERO,
            outcome: false,
        });
        Ok(Self::receipt(&mut state))
    }

    async fn join_bet(&self, bet_id: U256, support: bool, value: U256) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        Self::check_writable(&state)?;
        let account = self.account;

        let bet = state
            .bets
            .iter_mut()
            .find(|b| b.id == bet_id)
            .ok_or_else(|| anyhow::anyhow!("execution reverted: bet does not exist"))?;
        anyhow::ensure!(!bet.is_closed, "execution reverted: bet is closed");
        anyhow::ensure!(value == bet.amount, "execution reverted: wrong stake");
        if support {
            bet.support_count += U256::from(1);
        } else {
            bet.against_count += U256::from(1);
        }

        state.positions.insert((bet_id, account), support);
        *state.stakes.entry((bet_id, account)).or_default() += value;
        Ok(Self::receipt(&mut state))
    }

    async fn close_bet(&self, bet_id: U256, outcome: bool) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        Self::check_writable(&state)?;

        let bet = state
            .bets
            .iter_mut()
            .find(|b| b.id == bet_id)
            .ok_or_else(|| anyhow::anyhow!("execution reverted: bet does not exist"))?;
        anyhow::ensure!(!bet.is_closed, "execution reverted: bet is closed");
        anyhow::ensure!(
            bet.creator == self.account,
            "execution reverted: only creator"
        );
        bet.is_closed = true;
        bet.outcome = outcome;
        let pool = bet.initial_pool_amount;

        // winners split their stakes plus the creator's pool
        let winners: Vec<(Address, U256)> = state
            .positions
            .iter()
            .filter(|((id, _), side)| *id == bet_id && **side == outcome)
            .map(|((_, who), _)| (*who, state.stakes[&(bet_id, *who)]))
            .collect();
        let losing_total: U256 = state
            .positions
            .iter()
            .filter(|((id, _), side)| *id == bet_id && **side != outcome)
            .map(|((_, who), _)| state.stakes[&(bet_id, *who)])
            .fold(U256::ZERO, |acc, s| acc + s);

        let bonus = pool + losing_total;
        let share = if winners.is_empty() {
            U256::ZERO
        } else {
            bonus / U256::from(winners.len())
        };
        for (who, stake) in winners {
            *state.withdrawable.entry(who).or_default() += stake + share;
        }
        Ok(Self::receipt(&mut state))
    }

    async fn withdraw(&self) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        Self::check_writable(&state)?;
        let owed = state.withdrawable.remove(&self.account).unwrap_or_default();
        anyhow::ensure!(!owed.is_zero(), "execution reverted: nothing to withdraw");
        Ok(Self::receipt(&mut state))
    }

    async fn bet_counter(&self) -> Result<U256> {
        let state = self.state.lock().await;
        Ok(U256::from(state.bets.len()))
    }

    async fn bet_details(&self, bet_id: U256) -> Result<Bet> {
        let state = self.state.lock().await;
        if state.broken_bet == Some(bet_id) {
            anyhow::bail!("could not decode bet {}", bet_id);
        }
        state
            .bets
            .iter()
            .find(|b| b.id == bet_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("bet {} does not exist", bet_id))
    }
}
