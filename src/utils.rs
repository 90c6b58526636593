//! Miscellaneous helper utilities.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::Signed;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Render a price rounded to `decimals` fractional digits, e.g. `0.9151`.
pub fn format_price(price: &BigDecimal, decimals: u32) -> String {
    let rounded = price.round(decimals as i64).with_scale(decimals as i64);
    let (digits, _) = rounded.as_bigint_and_exponent();
    format_fixed(&digits, decimals)
}

/// Render a raw fixed-point token amount with `decimals` fractional digits.
pub fn format_volume(volume: &BigUint, decimals: u32) -> String {
    format_fixed(&BigInt::from(volume.clone()), decimals)
}

fn format_fixed(digits: &BigInt, decimals: u32) -> String {
    let sign = if digits.is_negative() { "-" } else { "" };
    let magnitude = digits.magnitude();
    if decimals == 0 {
        return format!("{sign}{magnitude}");
    }
    let unit = BigUint::from(10u32).pow(decimals);
    let whole = magnitude / &unit;
    let fraction = magnitude % &unit;
    format!(
        "{sign}{whole}.{fraction:0>width$}",
        fraction = fraction.to_string(),
        width = decimals as usize
    )
}
