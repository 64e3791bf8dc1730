use crate::chain::units::format_wei;
use crate::cli::context::AppContext;
use crate::cli::{Side, print_outcome, render_links};
use crate::core::types::{Bet, BetDraft};
use crate::market::bets::{search_bets, split_bets};
use alloy::primitives::U256;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use clap::Subcommand;
use rust_decimal::Decimal;

#[derive(Subcommand, Debug)]
pub enum BetsCommand {
    /// List active and closed bets
    List {
        /// Only bets whose title or category contains this text
        #[arg(long)]
        search: Option<String>,

        /// Page of each section to show
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Open a new bet, staking the join amount plus the initial pool
    Create {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "general")]
        category: String,

        #[arg(long, default_value = "")]
        twitter_handle: String,

        /// Last day of the bet (YYYY-MM-DD, UTC)
        #[arg(long)]
        end_date: NaiveDate,

        /// Stake every participant pays, in ether
        #[arg(long)]
        join_amount: Option<Decimal>,

        /// Extra liquidity seeded by the creator, in ether
        #[arg(long, default_value = "0")]
        initial_pool: Decimal,

        #[arg(long, default_value = "")]
        image_url: String,
    },

    /// Join a bet with the configured stake
    Join {
        bet_id: u64,

        #[arg(long, value_enum)]
        side: Side,
    },

    /// Close a bet you created and settle it
    Close {
        bet_id: u64,

        #[arg(long, value_enum)]
        outcome: Side,
    },

    /// Withdraw winnings
    Withdraw,
}

pub async fn run(ctx: &AppContext, cmd: BetsCommand) -> Result<()> {
    match cmd {
        BetsCommand::List { search, page } => {
            let bets = ctx.betting.get_all_bets().await;
            let bets = search_bets(bets, search.as_deref().unwrap_or_default());

            for section in split_bets(bets) {
                let (pagination, rows) = section.page(ctx.cfg.marketplace.bets_per_page, page);
                println!("{} ({} total)", section.title, section.bets.len());
                for bet in rows {
                    println!("  {}", bet_line(bet));
                }
                if pagination.is_visible() {
                    println!("  {}  {}", pagination.summary(), render_links(&pagination));
                }
            }
        }
        BetsCommand::Create {
            title,
            description,
            category,
            twitter_handle,
            end_date,
            join_amount,
            initial_pool,
            image_url,
        } => {
            let end_date = end_date
                .and_hms_opt(23, 59, 59)
                .context("invalid end date")?
                .and_utc()
                .timestamp();
            let draft = BetDraft {
                title,
                description,
                category,
                twitter_handle,
                end_date: u64::try_from(end_date).context("end date before 1970")?,
                join_amount: join_amount.unwrap_or(ctx.cfg.betting.join_amount),
                initial_pool_amount: initial_pool,
                image_url,
            };
            print_outcome(&ctx.betting.create_bet(&draft).await?);
        }
        BetsCommand::Join { bet_id, side } => {
            let outcome = ctx
                .betting
                .join_bet(U256::from(bet_id), side.as_bool())
                .await?;
            print_outcome(&outcome);
        }
        BetsCommand::Close { bet_id, outcome } => {
            let outcome = ctx
                .betting
                .close_bet(U256::from(bet_id), outcome.as_bool())
                .await?;
            print_outcome(&outcome);
        }
        BetsCommand::Withdraw => {
            print_outcome(&ctx.betting.withdraw().await?);
        }
    }
    Ok(())
}

fn bet_line(bet: &Bet) -> String {
    let ends = u64::try_from(bet.end_date)
        .ok()
        .and_then(|s| i64::try_from(s).ok())
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "?".to_string());
    let status = if bet.is_closed {
        format!("closed ({})", if bet.outcome { "yes" } else { "no" })
    } else {
        format!("ends {}", ends)
    };
    format!(
        "#{} [{}] {}  stake={} pool={}  for={} against={}  {}",
        bet.id,
        bet.category,
        bet.title,
        format_wei(bet.amount),
        format_wei(bet.initial_pool_amount),
        bet.support_count,
        bet.against_count,
        status
    )
}
