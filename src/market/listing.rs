use crate::chain::units::format_wei;
use crate::config::config::FeaturedListingCfg;
use crate::core::types::{Chain, Token};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TOKEN_IMAGE: &str = "/placeholder.svg";

/// A marketplace row, from either a featured listing or a launchpad token.
#[derive(Clone, Debug, PartialEq)]
pub struct ListedToken {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image_url: String,
    pub price: String,
    pub market_cap: String,
    pub price_change: Decimal,
    pub funding_raised: String,
    pub chain: Chain,
    pub launch_date: NaiveDate,
    pub user_created: bool,
}

impl ListedToken {
    /// Featured rows without a launch date are dated `today`.
    pub fn from_featured(cfg: &FeaturedListingCfg, today: NaiveDate) -> Self {
        Self {
            id: cfg.symbol.clone(),
            name: cfg.name.clone(),
            symbol: cfg.symbol.clone(),
            description: cfg.description.clone(),
            image_url: cfg.image_url.clone(),
            price: cfg.price.clone(),
            market_cap: cfg.market_cap.clone(),
            price_change: cfg.price_change,
            funding_raised: "0".to_string(),
            chain: cfg.chain,
            launch_date: cfg.launch_date.unwrap_or(today),
            user_created: false,
        }
    }

    pub fn from_token(token: &Token, chain: Chain, today: NaiveDate) -> Self {
        Self {
            id: token.token.to_string(),
            name: token.name.clone(),
            symbol: token.ticker.clone(),
            description: token.description.clone(),
            image_url: token.image.clone(),
            price: String::new(),
            market_cap: String::new(),
            price_change: Decimal::ZERO,
            funding_raised: format_wei(token.raised),
            chain,
            launch_date: today,
            user_created: true,
        }
    }
}

/// Featured rows first, then store rows, one row per symbol. A later duplicate
/// replaces the earlier value in the earlier position.
pub fn merge_listings(featured: Vec<ListedToken>, stored: Vec<ListedToken>) -> Vec<ListedToken> {
    let mut rows: Vec<ListedToken> = Vec::new();
    let mut by_symbol: HashMap<String, usize> = HashMap::new();

    for mut row in featured.into_iter().chain(stored) {
        if row.image_url.is_empty() {
            row.image_url = DEFAULT_TOKEN_IMAGE.to_string();
        }
        match by_symbol.get(&row.symbol) {
            Some(&i) => rows[i] = row,
            None => {
                by_symbol.insert(row.symbol.clone(), rows.len());
                rows.push(row);
            }
        }
    }
    rows
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Latest,
    Trending,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Latest => f.write_str("latest"),
            SortMode::Trending => f.write_str("trending"),
        }
    }
}

impl FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "latest" => Ok(SortMode::Latest),
            "trending" => Ok(SortMode::Trending),
            other => anyhow::bail!("unknown sort mode '{}'", other),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ListingQuery {
    pub search: String,
    pub chain: Option<Chain>,
    pub sort: SortMode,
}

impl ListingQuery {
    pub fn matches(&self, row: &ListedToken) -> bool {
        let term = self.search.to_lowercase();
        let text_hit = row.name.to_lowercase().contains(&term)
            || row.symbol.to_lowercase().contains(&term);
        let chain_hit = self.chain.is_none_or(|c| row.chain == c);
        text_hit && chain_hit
    }

    /// Filters, then orders with a stable sort.
    pub fn apply(&self, rows: &[ListedToken]) -> Vec<ListedToken> {
        let mut out: Vec<ListedToken> = rows.iter().filter(|r| self.matches(r)).cloned().collect();
        match self.sort {
            SortMode::Trending => {
                out.sort_by(|a, b| b.price_change.abs().cmp(&a.price_change.abs()));
            }
            SortMode::Latest => {
                out.sort_by(|a, b| {
                    b.user_created
                        .cmp(&a.user_created)
                        .then(b.launch_date.cmp(&a.launch_date))
                });
            }
        }
        out
    }
}
