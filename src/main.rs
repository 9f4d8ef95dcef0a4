use std::path::PathBuf;

use clap::{Parser, Subcommand};
use futures::future::join_all;
use lobx_signals::config::AppConfig;
use lobx_signals::imbalance::{instrument_from_ticker, ImbalanceSignalEngine};
use lobx_signals::telemetry;
use lobx_signals::universe::AssetUniverseCache;

#[derive(Parser)]
#[command(name = "lobx-signals", about = "Hyperliquid universe and order-book imbalance")]
struct Cli {
    /// Optional config file (toml/json/yaml); LOBX__* env vars override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Prometheus listener port (only with the metrics-exporter feature)
    #[arg(long, global = true, default_value_t = 9000)]
    metrics_port: u16,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List perpetuals
    Perps {
        #[arg(long)]
        include_delisted: bool,
        /// Only the N highest-leverage listed perpetuals
        #[arg(long)]
        top: Option<usize>,
    },
    /// List spot pairs
    Spot {
        /// Only pairs quoted in this token
        #[arg(long)]
        quote: Option<String>,
        /// Only major pairs in the reference quote
        #[arg(long)]
        majors: bool,
    },
    /// Order-book imbalance for one or more tickers
    Obi {
        #[arg(required = true)]
        tickers: Vec<String>,
        #[arg(long)]
        breakdown: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;

    telemetry::init_tracing(&cfg.log_filter);
    telemetry::init_metrics(cli.metrics_port)?;

    match cli.command {
        Command::Perps { include_delisted, top } => {
            let universe = AssetUniverseCache::hyperliquid(cfg.universe, &cfg.hyperliquid)?;
            let perps = match top {
                Some(n) => universe.top_perpetuals_by_leverage(n).await,
                None => universe.perpetuals(include_delisted).await,
            };
            if perps.is_empty() {
                println!("No perpetuals available");
            }
            for perp in perps {
                println!(
                    "{:<12} {:>4}x  szDecimals={}{}{}",
                    perp.symbol(),
                    perp.max_leverage,
                    perp.sz_decimals,
                    if perp.only_isolated { "  isolated-only" } else { "" },
                    if perp.is_delisted { "  DELISTED" } else { "" },
                );
            }
        }
        Command::Spot { quote, majors } => {
            let universe = AssetUniverseCache::hyperliquid(cfg.universe, &cfg.hyperliquid)?;
            let pairs = if majors {
                universe.major_spot_pairs().await
            } else {
                universe.spot(quote.as_deref()).await
            };
            if pairs.is_empty() {
                println!("No spot pairs available");
            }
            for pair in pairs {
                println!("{:<16} {:<10} {}", pair.display_name(), pair.api_id(), pair.symbol());
            }
        }
        Command::Obi { tickers, breakdown } => {
            let engine = ImbalanceSignalEngine::hyperliquid(&cfg.imbalance, &cfg.hyperliquid)?;
            let results = join_all(tickers.iter().map(|ticker| {
                let engine = &engine;
                async move { (ticker, engine.breakdown(instrument_from_ticker(ticker)).await) }
            }))
            .await;

            for (ticker, result) in results {
                match result? {
                    Some(b) if breakdown => println!(
                        "{ticker:<10} obi={:+.4} simple={:+.4} weighted={:+.4} bid={} ask={} levels={}/{} mid={} spread={} ({:.2} bps)",
                        b.imbalance,
                        b.simple,
                        b.weighted,
                        b.bid_depth,
                        b.ask_depth,
                        b.bid_levels,
                        b.ask_levels,
                        b.mid_price,
                        b.spread,
                        b.spread_bps,
                    ),
                    Some(b) => println!("{ticker:<10} {:+.4}", b.imbalance),
                    None => println!("{ticker:<10} unavailable"),
                }
            }
        }
    }

    Ok(())
}
