use crate::core::types::Holder;
use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// One decoded ERC-20 `Transfer` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// Replays transfers into per-holder balances. Mints come from and burns go to
/// the zero address, which is never reported as a holder.
pub fn balances_from_transfers(transfers: &[Transfer]) -> Vec<(Address, U256)> {
    let mut balances: HashMap<Address, U256> = HashMap::new();
    for t in transfers {
        if t.from != Address::ZERO {
            let b = balances.entry(t.from).or_default();
            *b = b.saturating_sub(t.value);
        }
        if t.to != Address::ZERO {
            let b = balances.entry(t.to).or_default();
            *b = b.saturating_add(t.value);
        }
    }

    let mut out: Vec<_> = balances.into_iter().filter(|(_, b)| !b.is_zero()).collect();
    out.sort_by_key(|(addr, _)| *addr);
    out
}

/// Largest holders first, each with its share of the summed balances as a
/// percentage with four decimal places.
pub fn rank_holders(mut balances: Vec<(Address, U256)>, limit: usize) -> Vec<Holder> {
    balances.retain(|(_, b)| !b.is_zero());
    let total = balances
        .iter()
        .fold(U256::ZERO, |acc, (_, b)| acc.saturating_add(*b));
    if total.is_zero() {
        return Vec::new();
    }

    balances.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    balances
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (address, balance))| {
            // share <= total, so the scaled ratio is at most 1_000_000
            let scaled = balance.saturating_mul(U256::from(1_000_000u64)) / total;
            Holder {
                rank: i + 1,
                address,
                liquidity_percentage: Decimal::new(scaled.to::<u64>() as i64, 4),
            }
        })
        .collect()
}

/// `0x1234...5678` form for display.
pub fn short_address(address: &Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::units::UNIT;
    use std::str::FromStr;

    fn pct(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn addr(b: u8) -> Address {
        Address::with_last_byte(b)
    }

    fn tokens(n: u64) -> U256 {
        U256::from(n) * UNIT
    }

    #[test]
    fn test_balances_replay_mints_and_transfers() {
        let transfers = vec![
            Transfer {
                from: Address::ZERO,
                to: addr(1),
                value: tokens(100),
            },
            Transfer {
                from: addr(1),
                to: addr(2),
                value: tokens(40),
            },
            Transfer {
                from: addr(2),
                to: Address::ZERO,
                value: tokens(40),
            },
        ];

        let balances = balances_from_transfers(&transfers);
        assert_eq!(balances, vec![(addr(1), tokens(60))]);
    }

    #[test]
    fn test_rank_holders_orders_and_limits() {
        let balances = vec![
            (addr(1), tokens(10)),
            (addr(2), tokens(60)),
            (addr(3), tokens(30)),
            (addr(4), U256::ZERO),
        ];

        let ranked = rank_holders(balances, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].address, addr(2));
        assert_eq!(ranked[0].liquidity_percentage, pct("60"));
        assert_eq!(ranked[1].address, addr(3));
        assert_eq!(ranked[1].liquidity_percentage, pct("30"));
    }

    #[test]
    fn test_rank_holders_fractional_share() {
        let ranked = rank_holders(vec![(addr(1), tokens(1)), (addr(2), tokens(2))], 10);
        assert_eq!(ranked[1].liquidity_percentage, pct("33.3333"));
    }

    #[test]
    fn test_rank_holders_empty_supply() {
        assert!(rank_holders(vec![(addr(1), U256::ZERO)], 10).is_empty());
    }

    #[test]
    fn test_short_address() {
        let a: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(short_address(&a), "0xf39F...2266");
    }
}
