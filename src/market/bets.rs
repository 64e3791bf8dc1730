use crate::core::types::Bet;
use crate::market::pagination::Pagination;

/// A titled list of bets shown one page at a time.
#[derive(Clone, Debug)]
pub struct BetSection {
    pub title: &'static str,
    pub bets: Vec<Bet>,
}

impl BetSection {
    pub fn page(&self, per_page: usize, current: usize) -> (Pagination, &[Bet]) {
        let p = Pagination::new(self.bets.len(), per_page, current);
        (p, p.slice(&self.bets))
    }
}

/// Active bets, then closed ones, each keeping contract order.
pub fn split_bets(bets: Vec<Bet>) -> [BetSection; 2] {
    let (closed, active): (Vec<Bet>, Vec<Bet>) = bets.into_iter().partition(|b| b.is_closed);
    [
        BetSection {
            title: "Active Bets",
            bets: active,
        },
        BetSection {
            title: "Closed Bets",
            bets: closed,
        },
    ]
}

/// Case-insensitive match on title or category; an empty term keeps everything.
pub fn search_bets(bets: Vec<Bet>, term: &str) -> Vec<Bet> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return bets;
    }
    bets.into_iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&term) || b.category.to_lowercase().contains(&term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};

    fn bet(id: u64, title: &str, closed: bool) -> Bet {
        Bet {
            id: U256::from(id),
            creator: Address::ZERO,
            amount: U256::from(1),
            title: title.to_string(),
            description: String::new(),
            category: "crypto".to_string(),
            twitter_handle: String::new(),
            end_date: U256::from(1_700_000_000u64),
            initial_pool_amount: U256::ZERO,
            image_url: String::new(),
            is_closed: closed,
            support_count: U256::ZERO,
            against_count: U256::ZERO,
            outcome: false,
        }
    }

    #[test]
    fn test_split_keeps_order() {
        let bets = (0..10).map(|i| bet(i, "b", i % 3 == 0)).collect();
        let [active, closed] = split_bets(bets);
        let ids: Vec<u64> = active.bets.iter().map(|b| b.id.to::<u64>()).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 7, 8]);
        assert_eq!(closed.bets.len(), 4);
        assert_eq!(closed.title, "Closed Bets");
    }

    #[test]
    fn test_section_pages() {
        let [active, _] = split_bets((0..8).map(|i| bet(i, "b", false)).collect());
        let (p, page) = active.page(6, 2);
        assert_eq!(page.len(), 2);
        assert_eq!(p.summary(), "Showing 7-8 of 8");
        assert!(p.is_visible());
    }

    #[test]
    fn test_search_title_and_category() {
        let bets = vec![bet(0, "ETH to 10k", false), bet(1, "Rain tomorrow", false)];
        assert_eq!(search_bets(bets.clone(), "eth").len(), 1);
        assert_eq!(search_bets(bets.clone(), "CRYPTO").len(), 2);
        assert_eq!(search_bets(bets, "  ").len(), 2);
    }
}
