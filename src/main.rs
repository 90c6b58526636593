use anyhow::{Context, Result, anyhow, bail};
use bigdecimal::BigDecimal;
use clmm_depth::{
    CurveOptions, DisplayUnit, EngineConfig, Market, MarketSnapshot, Side, build_depth_curve,
    price_from_volume, quote_until_price, utils,
};
use num_bigint::BigUint;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const USAGE: &str = "usage: clmm-depth <snapshot.json> [--buy <price>] [--sell <price>] \
                     [--volume <raw amount>] [--zoom <buckets>] [--collateral]";

#[derive(Debug, Default)]
struct Args {
    snapshot: PathBuf,
    buy: Option<BigDecimal>,
    sell: Option<BigDecimal>,
    volume: Option<BigUint>,
    zoom: Option<usize>,
    collateral: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut snapshot = None;
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| iter.next().ok_or_else(|| anyhow!("{flag} needs a value"));
        match arg.as_str() {
            "--buy" => args.buy = Some(BigDecimal::from_str(&value("--buy")?)?),
            "--sell" => args.sell = Some(BigDecimal::from_str(&value("--sell")?)?),
            "--volume" => {
                let raw = value("--volume")?;
                args.volume = Some(
                    raw.parse()
                        .with_context(|| format!("--volume expects an integer, got {raw:?}"))?,
                );
            }
            "--zoom" => args.zoom = Some(value("--zoom")?.parse()?),
            "--collateral" => args.collateral = true,
            "-h" | "--help" => bail!(USAGE),
            path if snapshot.is_none() && !path.starts_with("--") => {
                snapshot = Some(PathBuf::from(path))
            }
            other => bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }
    args.snapshot = snapshot.ok_or_else(|| anyhow!(USAGE))?;
    Ok(args)
}

/// Run a pure computation off the async runtime, bounded by `limit`.
async fn run_blocking<T, F>(limit: Duration, f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(f);
    let joined = tokio::time::timeout(limit, handle)
        .await
        .map_err(|_| anyhow!("computation timed out after {limit:?}"))??;
    Ok(joined)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let args = parse_args()?;
    let config = Arc::new(EngineConfig::from_env()?);
    let limit = Duration::from_secs(
        std::env::var("DEPTH_QUERY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .unwrap_or(10),
    );

    let raw = tokio::fs::read_to_string(&args.snapshot)
        .await
        .with_context(|| format!("reading {}", args.snapshot.display()))?;
    let snapshot: MarketSnapshot = serde_json::from_str(&raw)?;
    let market = Arc::new(Market::from_snapshot(snapshot)?);
    tracing::info!(
        ticks = market.ticks.len(),
        current_tick = market.pool.current_tick,
        liquidity = market.pool.liquidity,
        orientation = ?market.orientation,
        "[INIT] market snapshot loaded"
    );

    // Depth curve ---------------------------------------------------------
    let options = CurveOptions {
        zoom_count: args.zoom,
        unit: if args.collateral {
            DisplayUnit::Collateral
        } else {
            DisplayUnit::Outcome
        },
    };
    let curve = {
        let (market, config) = (market.clone(), config.clone());
        run_blocking(limit, move || build_depth_curve(&market, &options, &config)).await?
    };
    tracing::info!(
        current_price = %utils::format_price(&curve.current_price, config.display_decimals),
        asks = curve.asks.len(),
        bids = curve.bids.len(),
        max_zoom_count = curve.max_zoom_count,
        "[DEPTH] curve"
    );
    for (label, points) in [("ask", &curve.asks), ("bid", &curve.bids)] {
        for point in points {
            tracing::info!(
                side = label,
                price = %utils::format_price(&point.price, config.display_decimals),
                volume = %utils::format_volume(&point.volume, config.volume_decimals),
                cumulative = %utils::format_volume(&point.cumulative, config.volume_decimals),
                "[DEPTH] bucket"
            );
        }
    }

    // Volume-at-price -----------------------------------------------------
    for (side, price) in [(Side::Buy, args.buy), (Side::Sell, args.sell)] {
        let Some(price) = price else { continue };
        let quote = {
            let (market, config, target) = (market.clone(), config.clone(), price.clone());
            run_blocking(limit, move || quote_until_price(&market, &target, side, &config)).await?
        };
        tracing::info!(
            ?side,
            target_price = %utils::format_price(&price, config.display_decimals),
            target_tick = ?quote.target_tick,
            amount_out = %utils::format_volume(&quote.amount_out, config.volume_decimals),
            amount_in = %utils::format_volume(&quote.amount_in, config.volume_decimals),
            "[QUERY] volume until price"
        );
    }

    // Price-at-volume -----------------------------------------------------
    if let Some(volume) = args.volume {
        for side in [Side::Buy, Side::Sell] {
            let price = {
                let (market, config, target) = (market.clone(), config.clone(), volume.clone());
                run_blocking(limit, move || price_from_volume(&market, &target, side, &config))
                    .await?
            };
            tracing::info!(
                ?side,
                volume = %utils::format_volume(&volume, config.volume_decimals),
                price = %utils::format_price(&price, config.display_decimals),
                "[QUERY] price from volume"
            );
        }
    }

    Ok(())
}
