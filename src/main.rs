mod betting;
mod bus;
mod chain;
mod cli;
mod config;
mod core;
mod ipfs;
mod launchpad;
mod market;
mod store;
mod watcher;

use anyhow::{Context, Result};
use bus::types::Bus;
use clap::Parser;
use cli::context::AppContext;
use cli::{Args, Command};
use config::config::AppCfg;
use core::types::Actor;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span};
use watcher::actor::MarketWatchActor;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    dotenv::dotenv().ok();

    let args = Args::parse();
    let config_path = args.config.to_string_lossy().into_owned();
    let cfg = AppCfg::load(&config_path)?;

    let span = info_span!(
        "Supervisor",
        pid = %std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
    );

    async move {
        let client = Client::builder()
            .user_agent(cfg.http.user_agent.clone())
            .pool_idle_timeout(cfg.http.pool_idle_timeout)
            .pool_max_idle_per_host(cfg.http.pool_max_idle_per_host)
            .tcp_keepalive(cfg.http.tcp_keep_alive)
            .timeout(cfg.http.timeout)
            .build()
            .context("building http client")?;

        let ctx = if args.simulate {
            AppContext::simulated(cfg, client)
        } else {
            AppContext::connect(cfg, client).await?
        };

        match args.command {
            Command::Watch => supervise(ctx).await,
            command => cli::run(&ctx, command).await,
        }
    }
    .instrument(span)
    .await
}

async fn supervise(ctx: AppContext) -> Result<()> {
    info!("Starting up");

    let bus = Bus::new();
    let shutdown = CancellationToken::new();

    let watcher = MarketWatchActor::new(
        bus.clone(),
        ctx.betting.clone(),
        ctx.launchpad.clone(),
        ctx.store.clone(),
        ctx.cfg.marketplace.refresh,
        shutdown.clone(),
    );

    let mut actors = tokio::task::JoinSet::new();
    actors.spawn(watcher.run().instrument(info_span!("Watcher")));
    actors.spawn(
        report(bus, ctx.cfg.marketplace.bets_per_page, shutdown.clone())
            .instrument(info_span!("Report")),
    );

    tokio::select! {
        _ = async {
            while let Some(res) = actors.join_next().await {
                match res {
                    Ok(Ok(())) => info!("Actor exited cleanly"),
                    Ok(Err(e)) => error!(?e, "Actor returned error"),
                    Err(panic) => error!(?panic, "Actor panicked/cancelled"),
                }
            }
        } => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down supervisor loop");
            shutdown.cancel();
        }
    }

    info!("Waiting for graceful shutdown of actors");
    while let Some(res) = actors.join_next().await {
        match res {
            Ok(Ok(())) => info!("Actor exited cleanly"),
            Ok(Err(e)) => error!(?e, "Actor returned error"),
            Err(panic) => error!(?panic, "Actor panicked/cancelled"),
        }
    }

    info!("Supervisor exit");
    Ok(())
}

/// Milliseconds since a snapshot was taken; never negative.
fn snapshot_age_ms(ts_ms: i64) -> i64 {
    (chrono::Utc::now().timestamp_millis() - ts_ms).max(0)
}

/// Logs a one-line summary of every snapshot the watcher publishes.
async fn report(bus: Bus, bets_per_page: usize, shutdown: CancellationToken) -> Result<()> {
    let mut bets_rx = bus.bets.subscribe();
    let mut tokens_rx = bus.tokens.subscribe();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            res = bets_rx.recv() => match res {
                Ok(snap) => {
                    let [active, closed] = market::bets::split_bets(snap.bets.clone());
                    let (page, _) = active.page(bets_per_page, 1);
                    info!(
                        age_ms = snapshot_age_ms(snap.ts_ms),
                        active = active.bets.len(),
                        closed = closed.bets.len(),
                        pages = page.total_pages(),
                        "bets refreshed"
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    error!("Report lagged by {n} bet snapshots");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },

            res = tokens_rx.recv() => match res {
                Ok(snap) => {
                    let open = snap.tokens.iter().filter(|t| t.is_open).count();
                    info!(
                        age_ms = snapshot_age_ms(snap.ts_ms),
                        total = snap.tokens.len(),
                        open,
                        "tokens refreshed"
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    error!("Report lagged by {n} token snapshots");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BetsSnapshot, TokensSnapshot};
    use std::time::Duration;

    #[test]
    fn test_snapshot_age() {
        let now = chrono::Utc::now().timestamp_millis();
        assert!(snapshot_age_ms(now - 5_000) >= 5_000);
        assert_eq!(snapshot_age_ms(now + 60_000), 0);
    }

    #[tokio::test]
    async fn test_report_drains_until_shutdown() {
        let bus = Bus::new();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(report(bus.clone(), 8, shutdown.clone()));
        tokio::task::yield_now().await;

        let ts_ms = chrono::Utc::now().timestamp_millis();
        bus.bets
            .publish(BetsSnapshot {
                bets: Vec::new(),
                ts_ms,
            })
            .await
            .unwrap();
        bus.tokens
            .publish(TokensSnapshot {
                tokens: Vec::new(),
                ts_ms,
            })
            .await
            .unwrap();

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
