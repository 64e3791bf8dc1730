pub mod bets;
pub mod context;
pub mod tokens;

use crate::core::types::TxOutcome;
use crate::market::pagination::{PageLink, Pagination};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use context::AppContext;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    name = "memeswap",
    about = "Meme-token launchpad and prediction betting client"
)]
pub struct Args {
    /// Path to the YAML config file
    #[arg(short = 'c', long, global = true, default_value = "config.yml")]
    pub config: PathBuf,

    /// Run against in-memory contracts and pinning instead of the network
    #[arg(long, global = true)]
    pub simulate: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Keep refreshing bets and tokens until Ctrl-C
    Watch,

    /// Prediction bets
    #[command(subcommand)]
    Bets(bets::BetsCommand),

    /// Launchpad tokens and the marketplace listing
    #[command(subcommand)]
    Tokens(tokens::TokensCommand),
}

/// Which way a bet is joined or settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    pub fn as_bool(self) -> bool {
        self == Side::Yes
    }
}

/// Runs every one-shot command. `watch` is supervised by `main`.
pub async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Watch => anyhow::bail!("watch is not a one-shot command"),
        Command::Bets(cmd) => bets::run(ctx, cmd).await,
        Command::Tokens(cmd) => tokens::run(ctx, cmd).await,
    }
}

pub fn print_outcome(outcome: &TxOutcome) {
    match (outcome.success, outcome.tx_hash, &outcome.error) {
        (true, Some(hash), _) => println!("ok  tx={}", hash),
        (true, None, _) => println!("ok"),
        (false, _, Some(err)) => println!("failed  {}", err),
        (false, _, None) => println!("failed"),
    }
}

/// `< 1 .. 4 [5] 6 .. 10 >` with the arrows only when there is a page to go to.
pub fn render_links(p: &Pagination) -> String {
    let mut parts = Vec::new();
    if p.has_previous() {
        parts.push("<".to_string());
    }
    for link in p.links() {
        parts.push(match link {
            PageLink::Page {
                number,
                active: true,
            } => format!("[{}]", number),
            PageLink::Page { number, .. } => number.to_string(),
            PageLink::Ellipsis => "..".to_string(),
        });
    }
    if p.has_next() {
        parts.push(">".to_string());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bets_join() {
        let args = Args::try_parse_from(["memeswap", "--simulate", "bets", "join", "4", "--side", "no"])
            .unwrap();
        assert!(args.simulate);
        assert_eq!(args.config, PathBuf::from("config.yml"));
        match args.command {
            Command::Bets(bets::BetsCommand::Join { bet_id, side }) => {
                assert_eq!(bet_id, 4);
                assert!(!side.as_bool());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_tokens_list() {
        let args = Args::try_parse_from([
            "memeswap", "tokens", "list", "--chain", "BSC", "--sort", "trending", "--page", "2",
        ])
        .unwrap();
        match args.command {
            Command::Tokens(tokens::TokensCommand::List {
                chain, sort, page, ..
            }) => {
                assert_eq!(chain, Some(crate::core::types::Chain::Bsc));
                assert_eq!(sort, crate::market::listing::SortMode::Trending);
                assert_eq!(page, 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_address() {
        assert!(Args::try_parse_from(["memeswap", "tokens", "buy", "0xnope", "1"]).is_err());
    }

    #[test]
    fn test_render_links() {
        assert_eq!(
            render_links(&Pagination::new(100, 10, 5)),
            "< 1 .. 4 [5] 6 .. 10 >"
        );
        assert_eq!(render_links(&Pagination::new(16, 8, 1)), "[1] 2 >");
    }
}
