use super::volume::volume_until_price;
use crate::config::EngineConfig;
use crate::models::{Market, Side};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use tracing::{debug, trace};

/// Outcome price at which the pool has paid out `target_volume` on `side`.
///
/// Bisects `[bracket_low, bracket_high]` for at most `bisection_iterations`
/// steps, stopping early once the volume is within `bisection_tolerance`
/// tokens of the target. Targets beyond the available liquidity saturate at
/// the bracket edge on the side's far end. Across a liquidity gap any price
/// inside the gap may be returned.
pub fn price_from_volume(
    market: &Market,
    target_volume: &BigUint,
    side: Side,
    config: &EngineConfig,
) -> BigDecimal {
    let half = BigDecimal::new(5.into(), 1);
    let mut low = config.bracket_low.clone();
    let mut high = config.bracket_high.clone();

    for iteration in 0..config.bisection_iterations {
        let mid = (&low + &high) * &half;
        let volume = volume_until_price(market, &mid, side, config);
        let residual = residual_tokens(&volume, target_volume, config.volume_decimals);
        trace!(iteration, %mid, %volume, residual, "[SOLVE] bisection step");

        if residual < config.bisection_tolerance {
            debug!(iterations = iteration + 1, price = %mid, "[SOLVE] converged");
            return mid;
        }

        // volume rises with price when buying and falls with it when selling
        let short = volume < *target_volume;
        match (side, short) {
            (Side::Buy, true) | (Side::Sell, false) => low = mid,
            (Side::Buy, false) | (Side::Sell, true) => high = mid,
        }
    }

    let price = (&low + &high) * &half;
    debug!(
        iterations = config.bisection_iterations,
        price = %price,
        "[SOLVE] iteration cap reached"
    );
    price
}

/// `|volume - target|` in whole tokens.
fn residual_tokens(volume: &BigUint, target: &BigUint, decimals: u32) -> f64 {
    let diff = BigInt::from(volume.clone()) - BigInt::from(target.clone());
    BigDecimal::new(diff, decimals as i64)
        .abs()
        .to_f64()
        .unwrap_or(f64::INFINITY)
}
