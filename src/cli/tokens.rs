use crate::chain::units::{format_wei, to_wei};
use crate::cli::context::AppContext;
use crate::cli::{print_outcome, render_links};
use crate::core::types::{Chain, ImageUpload, TokenDraft};
use crate::market::holders::short_address;
use crate::market::listing::{ListedToken, ListingQuery, SortMode, merge_listings};
use crate::market::pagination::Pagination;
use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use clap::Subcommand;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::warn;

#[derive(Subcommand, Debug)]
pub enum TokensCommand {
    /// Marketplace listing: featured tokens plus launchpad tokens
    List {
        /// Only tokens whose name or symbol contains this text
        #[arg(long, default_value = "")]
        search: String,

        #[arg(long)]
        chain: Option<Chain>,

        /// latest or trending
        #[arg(long, default_value = "latest")]
        sort: SortMode,

        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Only launchpad tokens you created
        #[arg(long)]
        mine: bool,
    },

    /// Pin the image and metadata, then launch the token
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        ticker: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Image file to pin
        #[arg(long)]
        image: PathBuf,
    },

    /// Buy whole tokens from an open sale
    Buy { token: Address, amount: u64 },

    /// Sell tokens to the liquidity pool
    Sell {
        token: Address,
        /// Token amount, 18 decimals
        amount: Decimal,
    },

    /// Swap native coin for tokens in the liquidity pool
    Swap {
        token: Address,
        /// Coin amount, in ether
        amount: Decimal,
    },

    /// Sale price of whole tokens
    Price { token: Address, amount: u64 },

    /// Pool estimate of tokens received for whole coins
    EstimateTokens { token: Address, eth: u64 },

    /// Pool estimate of coin received for whole tokens
    EstimateEth { token: Address, tokens: u64 },

    /// Largest holders of a token
    Holders {
        token: Address,

        #[arg(long)]
        limit: Option<usize>,
    },
}

pub async fn run(ctx: &AppContext, cmd: TokensCommand) -> Result<()> {
    match cmd {
        TokensCommand::List {
            search,
            chain,
            sort,
            page,
            mine,
        } => {
            let query = ListingQuery {
                search,
                chain,
                sort,
            };
            list(ctx, &query, page, mine).await?;
        }
        TokensCommand::Create {
            name,
            ticker,
            description,
            image,
        } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("reading image {}", image.display()))?;
            let file_name = image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());

            let draft = TokenDraft {
                name,
                ticker,
                description,
            };
            let outcome = ctx
                .launchpad()?
                .create_token(&draft, ImageUpload { file_name, bytes })
                .await;
            match (outcome.success, outcome.image_url, outcome.error) {
                (true, Some(url), _) => {
                    remember_created(ctx).await;
                    println!("ok  image={}", url);
                }
                (_, _, err) => println!("failed  {}", err.unwrap_or_default()),
            }
        }
        TokensCommand::Buy { token, amount } => {
            let launchpad = ctx.launchpad()?;
            let sale = launchpad.find_sale(token).await?;
            if !sale.is_open {
                warn!("Sale for {} is closed; use swap instead", token);
            }
            print_outcome(&launchpad.buy_token(&sale, U256::from(amount)).await);
        }
        TokensCommand::Sell { token, amount } => {
            let launchpad = ctx.launchpad()?;
            let sale = launchpad.find_sale(token).await?;
            let outcome = launchpad
                .swap_token_for_coin(&sale, to_wei(amount)?)
                .await;
            print_outcome(&outcome);
        }
        TokensCommand::Swap { token, amount } => {
            let launchpad = ctx.launchpad()?;
            let sale = launchpad.find_sale(token).await?;
            let outcome = launchpad
                .swap_coin_for_token(&sale, to_wei(amount)?)
                .await;
            print_outcome(&outcome);
        }
        TokensCommand::Price { token, amount } => {
            let launchpad = ctx.launchpad()?;
            let sale = launchpad.find_sale(token).await?;
            let price = launchpad
                .get_price_for_tokens(&sale, U256::from(amount))
                .await?;
            println!("{} {} cost {}", amount, sale.name, format_wei(price));
        }
        TokensCommand::EstimateTokens { token, eth } => {
            let launchpad = ctx.launchpad()?;
            let sale = launchpad.find_sale(token).await?;
            let out = launchpad
                .get_estimated_tokens_for_eth(&sale, U256::from(eth))
                .await?;
            println!("{} coin buys ~{} {}", eth, format_wei(out), sale.name);
        }
        TokensCommand::EstimateEth { token, tokens } => {
            let launchpad = ctx.launchpad()?;
            let sale = launchpad.find_sale(token).await?;
            let out = launchpad
                .get_estimated_eth_for_tokens(&sale, U256::from(tokens))
                .await?;
            println!("{} {} sells for ~{}", tokens, sale.name, format_wei(out));
        }
        TokensCommand::Holders { token, limit } => {
            let limit = limit.unwrap_or(ctx.cfg.marketplace.top_holders);
            let holders = ctx.launchpad()?.top_holders(token, limit).await?;
            if holders.is_empty() {
                println!("no holders");
            }
            for h in holders {
                println!(
                    "{:>3}  {}  {}%",
                    h.rank,
                    short_address(&h.address),
                    h.liquidity_percentage.round_dp(2)
                );
            }
        }
    }
    Ok(())
}

/// Puts the caller's newest launchpad token in front of the shared list.
async fn remember_created(ctx: &AppContext) {
    let Some(launchpad) = &ctx.launchpad else {
        return;
    };
    match launchpad.get_user_tokens().await.into_iter().next() {
        Some(token) => ctx.store.add_token(token).await,
        None => warn!("Created token not found in launchpad listing"),
    }
}

async fn list(ctx: &AppContext, query: &ListingQuery, page: usize, mine: bool) -> Result<()> {
    match &ctx.launchpad {
        Some(launchpad) => {
            let tokens = if mine {
                launchpad.get_user_tokens().await
            } else {
                launchpad.get_all_tokens().await
            };
            ctx.store.set_tokens(tokens).await;
        }
        None => warn!("No wallet connected; listing featured tokens only"),
    }

    let today = chrono::Utc::now().date_naive();
    let featured = if mine {
        Vec::new()
    } else {
        ctx.cfg
            .marketplace
            .featured
            .iter()
            .map(|f| ListedToken::from_featured(f, today))
            .collect()
    };
    let stored = ctx
        .store
        .tokens()
        .await
        .iter()
        .map(|t| ListedToken::from_token(t, ctx.cfg.marketplace.chain, today))
        .collect();

    let rows = query.apply(&merge_listings(featured, stored));
    let pagination = Pagination::new(rows.len(), ctx.cfg.marketplace.items_per_page, page);
    for row in pagination.slice(&rows) {
        println!("{}", listing_line(row));
    }
    if rows.is_empty() {
        println!("no tokens match");
    }
    if pagination.is_visible() {
        println!("{}  {}", pagination.summary(), render_links(&pagination));
    }
    Ok(())
}

fn listing_line(row: &ListedToken) -> String {
    let change = if row.price_change.is_sign_negative() {
        format!("{}%", row.price_change)
    } else {
        format!("+{}%", row.price_change)
    };
    format!(
        "{:<8} {:<24} {:<10} {:<10} {:>8}  raised={}  {}  {}",
        row.symbol,
        row.name,
        row.price,
        row.market_cap,
        change,
        row.funding_raised,
        row.chain,
        row.launch_date
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::AppCfg;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_created_token_lands_in_store() {
        let mut cfg = AppCfg::default();
        // metadata reads fail fast and fall back
        cfg.pinata.gateway_url = "http://127.0.0.1:9".to_string();
        let ctx = AppContext::simulated(cfg, reqwest::Client::new());

        let draft = TokenDraft {
            name: "Moon Frog".to_string(),
            ticker: "MFROG".to_string(),
            description: String::new(),
        };
        let upload = ImageUpload {
            file_name: "frog.png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let launchpad = ctx.launchpad().unwrap();
        assert!(launchpad.create_token(&draft, upload.clone()).await.success);
        remember_created(&ctx).await;

        let second = TokenDraft {
            name: "Moon Toad".to_string(),
            ..draft
        };
        assert!(launchpad.create_token(&second, upload).await.success);
        remember_created(&ctx).await;

        let stored = ctx.store.tokens().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "Moon Toad");
        assert_eq!(stored[1].name, "Moon Frog");
    }

    #[test]
    fn test_listing_line() {
        let row = ListedToken {
            id: "WISE".to_string(),
            name: "Doge Wisdom".to_string(),
            symbol: "WISE".to_string(),
            description: String::new(),
            image_url: String::new(),
            price: "$0.0042".to_string(),
            market_cap: "$4.2M".to_string(),
            price_change: Decimal::new(-52, 1),
            funding_raised: "0".to_string(),
            chain: Chain::Bsc,
            launch_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            user_created: false,
        };
        let line = listing_line(&row);
        assert!(line.starts_with("WISE"));
        assert!(line.contains("-5.2%"));
        assert!(line.ends_with("BSC  2024-03-01"));
    }
}
