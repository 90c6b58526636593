use crate::models::Orientation;
use crate::pricing::tick_math::{RESOLUTION, sqrt_price_at_tick, tick_at_sqrt_price};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

/// Largest power of ten a decimal price may carry, in either direction.
pub const MAX_DECIMAL_EXPONENT: u32 = 1_000;

/// Decimal prices at `tick`, truncated to `decimals` fractional digits.
///
/// Returns `(price0, price1)` where `price0 = sqrtP^2 / 2^192` is token1 per
/// token0 and `price1` is its reciprocal.
pub fn price_at_tick(tick: i32, decimals: u32) -> (BigDecimal, BigDecimal) {
    let sqrt_price = sqrt_price_at_tick(tick);
    let ratio_x192 = &sqrt_price * &sqrt_price;
    let scale = BigUint::from(10u32).pow(decimals);

    let price0 = (&ratio_x192 * &scale) >> (2 * RESOLUTION);
    let price1 = (scale << (2 * RESOLUTION)) / ratio_x192;

    (
        BigDecimal::new(BigInt::from(price0), decimals as i64),
        BigDecimal::new(BigInt::from(price1), decimals as i64),
    )
}

/// Price of the outcome token at `tick`, quoted in the other pool token.
pub fn outcome_price_at_tick(tick: i32, orientation: Orientation, decimals: u32) -> BigDecimal {
    let (price0, price1) = price_at_tick(tick, decimals);
    match orientation {
        Orientation::OutcomeIsToken0 => price0,
        Orientation::OutcomeIsToken1 => price1,
    }
}

/// Q64.96 sqrt price for a decimal `price0` (token1 per token0), rounded
/// down. `None` for non-positive prices or out-of-range exponents.
pub fn sqrt_price_from_price0(price0: &BigDecimal) -> Option<BigUint> {
    let (numerator, denominator) = decimal_fraction(price0)?;
    let ratio_x192 = (numerator << (2 * RESOLUTION)) / denominator;
    Some(ratio_x192.sqrt())
}

/// Q64.96 sqrt price for a decimal `price1` (token0 per token1), rounded
/// down. `None` for non-positive prices or out-of-range exponents.
pub fn sqrt_price_from_price1(price1: &BigDecimal) -> Option<BigUint> {
    let (numerator, denominator) = decimal_fraction(price1)?;
    let ratio_x192 = (denominator << (2 * RESOLUTION)) / numerator;
    Some(ratio_x192.sqrt())
}

/// Tick of an outcome price, saturated to `[-cap, cap]`. `None` for
/// non-positive prices.
///
/// Rounds toward negative infinity, except that a price rendered by
/// [`outcome_price_at_tick`] at `decimals` maps back to exactly its own tick
/// in either orientation.
pub fn tick_at_outcome_price(
    price: &BigDecimal,
    orientation: Orientation,
    decimals: u32,
    cap: i32,
) -> Option<i32> {
    match orientation {
        Orientation::OutcomeIsToken0 => {
            let tick = tick_at_sqrt_price(&sqrt_price_from_price0(price)?, cap);
            // truncated price0 lands just below its tick's sqrt price
            let next = tick + 1;
            if next <= cap && outcome_price_at_tick(next, orientation, decimals) <= *price {
                Some(next)
            } else {
                Some(tick)
            }
        }
        // truncated price1 already lands on or above its tick's sqrt price
        Orientation::OutcomeIsToken1 => {
            Some(tick_at_sqrt_price(&sqrt_price_from_price1(price)?, cap))
        }
    }
}

/// Split a positive decimal into an exact `numerator / denominator` pair.
/// `None` when the decimal exponent exceeds [`MAX_DECIMAL_EXPONENT`].
fn decimal_fraction(value: &BigDecimal) -> Option<(BigUint, BigUint)> {
    let (digits, scale) = value.as_bigint_and_exponent();
    if digits.sign() != Sign::Plus || digits.is_zero() {
        return None;
    }
    let exponent = u32::try_from(scale.unsigned_abs())
        .ok()
        .filter(|e| *e <= MAX_DECIMAL_EXPONENT)?;
    let digits = digits.magnitude().clone();
    let power = BigUint::from(10u32).pow(exponent);
    if scale >= 0 {
        Some((digits, power))
    } else {
        Some((digits * power, BigUint::from(1u32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn unit_price_at_tick_zero() {
        let (price0, price1) = price_at_tick(0, 18);
        assert_eq!(price0, BigDecimal::from(1));
        assert_eq!(price1, BigDecimal::from(1));
    }

    #[test]
    fn prices_are_reciprocal() {
        let (price0, price1) = price_at_tick(6_932, 18);
        // 1.0001^6932 ~= 2
        let product = &price0 * &price1;
        let one = BigDecimal::from(1);
        let tolerance = BigDecimal::from_str("0.000000000001").unwrap();
        assert!((product - one).abs() < tolerance);
        assert!(price0 > BigDecimal::from_str("1.99").unwrap());
        assert!(price0 < BigDecimal::from_str("2.01").unwrap());
    }

    #[test]
    fn round_trip_recovers_tick_within_one() {
        for tick in [-69_000, -20_000, -887, -3, 0, 5, 887, 13_863, 69_000] {
            let (price0, price1) = price_at_tick(tick, 18);
            let back0 = tick_at_outcome_price(&price0, Orientation::OutcomeIsToken0, 18, 69_077)
                .expect("positive price");
            let back1 = tick_at_outcome_price(&price1, Orientation::OutcomeIsToken1, 18, 69_077)
                .expect("positive price");
            assert!((back0 - tick).abs() <= 1, "tick {tick} -> {back0}");
            assert!((back1 - tick).abs() <= 1, "tick {tick} -> {back1}");
        }
    }

    #[test]
    fn rendered_prices_map_back_to_their_own_tick() {
        for tick in (-30..=30).map(|i| i * 997) {
            for orientation in [Orientation::OutcomeIsToken0, Orientation::OutcomeIsToken1] {
                let price = outcome_price_at_tick(tick, orientation, 18);
                let back = tick_at_outcome_price(&price, orientation, 18, 69_077).unwrap();
                assert_eq!(back, tick, "{orientation:?} at tick {tick}");
            }
        }
    }

    #[test]
    fn prices_between_ticks_round_down() {
        // halfway between ticks 100 and 101 in price0 terms
        let low = outcome_price_at_tick(100, Orientation::OutcomeIsToken0, 18);
        let high = outcome_price_at_tick(101, Orientation::OutcomeIsToken0, 18);
        let mid = (&low + &high) / BigDecimal::from(2);
        let tick = tick_at_outcome_price(&mid, Orientation::OutcomeIsToken0, 18, 69_077).unwrap();
        assert_eq!(tick, 100);
    }

    #[test]
    fn non_positive_prices_have_no_tick() {
        let zero = BigDecimal::from(0);
        let negative = BigDecimal::from_str("-0.5").unwrap();
        assert!(tick_at_outcome_price(&zero, Orientation::OutcomeIsToken0, 18, 69_077).is_none());
        assert!(tick_at_outcome_price(&negative, Orientation::OutcomeIsToken1, 18, 69_077).is_none());
    }

    #[test]
    fn integer_prices_without_fraction_digits() {
        // scale can be negative for values like 1E+2
        let hundred = BigDecimal::new(BigInt::from(1), -2);
        let tick =
            tick_at_outcome_price(&hundred, Orientation::OutcomeIsToken0, 18, 69_077).unwrap();
        // 1.0001^46054 ~= 100
        assert!((tick - 46_054).abs() <= 1);
    }

    #[test]
    fn oversized_exponents_are_rejected() {
        // 1E-4294967297 must not wrap around to 0.1
        let wrapped = BigDecimal::new(BigInt::from(1), 4_294_967_297);
        assert!(sqrt_price_from_price0(&wrapped).is_none());
        assert!(tick_at_outcome_price(&wrapped, Orientation::OutcomeIsToken0, 18, 69_077).is_none());

        let huge = BigDecimal::new(BigInt::from(1), -5_000);
        assert!(sqrt_price_from_price1(&huge).is_none());

        let edge = BigDecimal::new(BigInt::from(1), MAX_DECIMAL_EXPONENT as i64);
        assert!(sqrt_price_from_price0(&edge).is_some());
    }

    #[test]
    fn outcome_price_follows_orientation() {
        let up = outcome_price_at_tick(887, Orientation::OutcomeIsToken0, 18);
        let down = outcome_price_at_tick(887, Orientation::OutcomeIsToken1, 18);
        assert!(up > BigDecimal::from(1));
        assert!(down < BigDecimal::from(1));
    }
}
