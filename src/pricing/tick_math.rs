//! Soft-capped wrappers over `uniswap_v3_math::tick_math`.

use alloy_primitives::U256;
use num_bigint::BigUint;
use uniswap_v3_math::tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};

pub use uniswap_v3_math::tick_math::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};

/// Number of fractional bits of a Q64.96 sqrt price.
pub const RESOLUTION: usize = 96;

/// Clamp `tick` into `[-cap, cap]`.
#[inline]
pub fn clamp_tick(tick: i32, cap: i32) -> i32 {
    tick.clamp(-cap, cap)
}

/// Sqrt price (Q64.96) at `tick`, bit-identical to the on-chain `TickMath`.
///
/// Ticks outside `[MIN_TICK, MAX_TICK]` saturate to the nearest bound.
pub fn sqrt_ratio_at_tick(tick: i32) -> U256 {
    let tick = tick.clamp(MIN_TICK, MAX_TICK);
    get_sqrt_ratio_at_tick(tick).unwrap_or(if tick < 0 {
        MIN_SQRT_RATIO
    } else {
        MAX_SQRT_RATIO
    })
}

/// [`sqrt_ratio_at_tick`] lifted into an arbitrary-precision integer.
pub fn sqrt_price_at_tick(tick: i32) -> BigUint {
    u256_to_biguint(sqrt_ratio_at_tick(tick))
}

pub fn u256_to_biguint(value: U256) -> BigUint {
    BigUint::from_bytes_le(&value.to_le_bytes::<32>())
}

/// `None` when `value` needs more than 256 bits.
pub fn biguint_to_u256(value: &BigUint) -> Option<U256> {
    U256::try_from_le_slice(&value.to_bytes_le())
}

/// Greatest tick within `[-cap, cap]` whose sqrt price does not exceed
/// `sqrt_price_x96`, i.e. the tick rounded toward negative infinity.
///
/// Sqrt prices outside the capped range saturate to `-cap` / `cap`.
pub fn tick_at_sqrt_price(sqrt_price_x96: &BigUint, cap: i32) -> i32 {
    let cap = cap.clamp(0, MAX_TICK);
    if *sqrt_price_x96 < sqrt_price_at_tick(-cap) {
        return -cap;
    }
    if *sqrt_price_x96 >= sqrt_price_at_tick(cap) {
        return cap;
    }
    // inside [sqrt(-cap), sqrt(cap)) the ratio is a valid on-chain sqrt price
    biguint_to_u256(sqrt_price_x96)
        .and_then(|ratio| get_tick_at_sqrt_ratio(ratio).ok())
        .map_or(-cap, |tick| clamp_tick(tick, cap))
}
