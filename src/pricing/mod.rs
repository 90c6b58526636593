//! Fixed-point price conversions: tick <-> Q64.96 sqrt price <-> decimal price.

pub mod price;
pub mod tick_math;

pub use price::{
    outcome_price_at_tick, price_at_tick, sqrt_price_from_price0, sqrt_price_from_price1,
    tick_at_outcome_price,
};
pub use tick_math::{clamp_tick, sqrt_price_at_tick, sqrt_ratio_at_tick, tick_at_sqrt_price};
