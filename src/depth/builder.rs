use super::types::{CurveOptions, DepthCurve, DepthPoint};
use crate::config::EngineConfig;
use crate::liquidity::{Interval, TickWalk, densify, walk_ticks};
use crate::models::{DisplayUnit, Market, Orientation, Side};
use crate::pricing::{clamp_tick, outcome_price_at_tick};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

/// Build the bid/ask depth curve of `market`.
pub fn build_depth_curve(
    market: &Market,
    options: &CurveOptions,
    config: &EngineConfig,
) -> DepthCurve {
    let dense = densify(&market.ticks, market.pool.tick_spacing, config);
    let ask_walk = walk_ticks(
        &market.pool,
        &dense,
        Side::Buy.walk_direction(market.orientation),
        None,
        config.tick_soft_cap,
    );
    let bid_walk = walk_ticks(
        &market.pool,
        &dense,
        Side::Sell.walk_direction(market.orientation),
        None,
        config.tick_soft_cap,
    );
    curve_from_walks(market, &ask_walk, &bid_walk, options, config)
}

/// Assemble a curve from walks the caller already holds.
pub fn curve_from_walks(
    market: &Market,
    ask_walk: &TickWalk,
    bid_walk: &TickWalk,
    options: &CurveOptions,
    config: &EngineConfig,
) -> DepthCurve {
    let mut asks = bucketize(&ask_walk.intervals, Side::Buy, market.orientation, options.unit, config);
    let mut bids = bucketize(&bid_walk.intervals, Side::Sell, market.orientation, options.unit, config);
    let max_zoom_count = asks.len().max(bids.len());

    if let Some(zoom) = options.zoom_count {
        asks.truncate(zoom);
        bids.truncate(zoom);
    }

    let current_tick = clamp_tick(market.pool.current_tick, config.tick_soft_cap);
    let curve = DepthCurve {
        asks,
        bids,
        current_price: outcome_price_at_tick(current_tick, market.orientation, config.price_decimals),
        max_zoom_count,
    };
    debug!(
        asks = curve.asks.len(),
        bids = curve.bids.len(),
        max_zoom_count,
        zoom = ?options.zoom_count,
        "[DEPTH] curve built"
    );
    curve
}

/// Merge consecutive intervals into at most `max_buckets_target` buckets and
/// accumulate volume outward from the current price.
fn bucketize(
    intervals: &[Interval],
    side: Side,
    orientation: Orientation,
    unit: DisplayUnit,
    config: &EngineConfig,
) -> Vec<DepthPoint> {
    if intervals.is_empty() {
        return Vec::new();
    }
    let target = config.max_buckets_target.max(1);
    let group = intervals.len().div_ceil(target);

    let mut cumulative = BigUint::zero();
    intervals
        .chunks(group)
        .map(|chunk| {
            let low_tick = chunk.iter().map(|i| i.low_tick).min().unwrap_or_default();
            let high_tick = chunk.iter().map(|i| i.high_tick).max().unwrap_or_default();
            let volume = chunk
                .iter()
                .fold(BigUint::zero(), |acc, i| acc + display_amount(i, side, unit));
            cumulative += &volume;
            let mid_tick = low_tick + (high_tick - low_tick) / 2;
            DepthPoint {
                low_tick,
                high_tick,
                price: outcome_price_at_tick(mid_tick, orientation, config.price_decimals),
                volume,
                cumulative: cumulative.clone(),
            }
        })
        .collect()
}

/// Buyers take outcome tokens out of the pool, sellers put them in.
fn display_amount(interval: &Interval, side: Side, unit: DisplayUnit) -> &BigUint {
    match (side, unit) {
        (Side::Buy, DisplayUnit::Outcome) | (Side::Sell, DisplayUnit::Collateral) => {
            interval.amount_out()
        }
        (Side::Buy, DisplayUnit::Collateral) | (Side::Sell, DisplayUnit::Outcome) => {
            interval.amount_in()
        }
    }
}
