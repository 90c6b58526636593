use crate::config::EngineConfig;
use crate::liquidity::{TickWalk, amount0_delta, amount1_delta, walk_ticks};
use crate::models::{Market, Side, Tick, WalkDirection};
use crate::pricing::{clamp_tick, sqrt_ratio_at_tick, tick_at_outcome_price};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use std::borrow::Cow;
use tracing::debug;

/// Amounts needed to move the pool from its current price to a target price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    pub side: Side,
    /// Tick the walk stopped at, `None` when the target was rejected.
    pub target_tick: Option<i32>,
    /// Paid into the pool, rounded up.
    pub amount_in: BigUint,
    /// Paid out by the pool, rounded down.
    pub amount_out: BigUint,
}

impl SwapQuote {
    fn empty(side: Side, target_tick: Option<i32>) -> Self {
        Self {
            side,
            target_tick,
            amount_in: BigUint::zero(),
            amount_out: BigUint::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.amount_in.is_zero() && self.amount_out.is_zero()
    }

    /// Collateral paid or received per outcome token.
    pub fn average_price(&self) -> Option<BigDecimal> {
        let (collateral, outcome) = match self.side {
            Side::Buy => (&self.amount_in, &self.amount_out),
            Side::Sell => (&self.amount_out, &self.amount_in),
        };
        if outcome.is_zero() {
            return None;
        }
        Some(
            BigDecimal::from(BigInt::from(collateral.clone()))
                / BigDecimal::from(BigInt::from(outcome.clone())),
        )
    }
}

/// Volume the pool pays out while the outcome price moves from its current
/// value to `target_price` on `side`.
///
/// Prices outside `(0, 1]`, targets behind the current price and markets
/// without ticks all yield zero.
pub fn volume_until_price(
    market: &Market,
    target_price: &BigDecimal,
    side: Side,
    config: &EngineConfig,
) -> BigUint {
    quote_until_price(market, target_price, side, config).amount_out
}

/// Full in/out breakdown behind [`volume_until_price`].
pub fn quote_until_price(
    market: &Market,
    target_price: &BigDecimal,
    side: Side,
    config: &EngineConfig,
) -> SwapQuote {
    if market.ticks.is_empty()
        || *target_price <= BigDecimal::zero()
        || *target_price > BigDecimal::from(1)
    {
        return SwapQuote::empty(side, None);
    }
    let Some(target_tick) = tick_at_outcome_price(
        target_price,
        market.orientation,
        config.price_decimals,
        config.tick_soft_cap,
    ) else {
        return SwapQuote::empty(side, None);
    };

    let direction = side.walk_direction(market.orientation);
    let current = clamp_tick(market.pool.current_tick, config.tick_soft_cap);
    let ahead = match direction {
        WalkDirection::Up => target_tick > current,
        WalkDirection::Down => target_tick < current,
    };
    if !ahead {
        return SwapQuote::empty(side, Some(target_tick));
    }

    let ticks = with_boundary(&market.ticks, target_tick);
    let walk = walk_ticks(
        &market.pool,
        &ticks,
        direction,
        Some(target_tick),
        config.tick_soft_cap,
    );
    let quote = SwapQuote {
        side,
        target_tick: Some(target_tick),
        amount_in: walk.total_in(),
        amount_out: walk.total_out(),
    };
    debug!(
        ?side,
        target_tick,
        intervals = walk.intervals.len(),
        amount_out = %quote.amount_out,
        "[QUERY] volume until price"
    );
    quote
}

/// Output volume of an existing walk up to `target_tick`, splitting the
/// interval that straddles it.
///
/// Lets a caller answer volume queries from the walk it already computed for
/// a depth curve. Matches [`volume_until_price`] exactly when the walk was
/// built over the same ticks.
pub fn volume_from_walk(walk: &TickWalk, target_tick: i32) -> BigUint {
    let mut total = BigUint::zero();
    for interval in &walk.intervals {
        let (inside, partial) = match walk.direction {
            WalkDirection::Up => (
                interval.high_tick <= target_tick,
                interval.low_tick < target_tick,
            ),
            WalkDirection::Down => (
                interval.low_tick >= target_tick,
                interval.high_tick > target_tick,
            ),
        };
        if inside {
            total += interval.amount_out();
            continue;
        }
        if partial {
            total += match walk.direction {
                WalkDirection::Up => amount0_delta(
                    sqrt_ratio_at_tick(interval.low_tick),
                    sqrt_ratio_at_tick(target_tick),
                    interval.active_liquidity,
                    false,
                ),
                WalkDirection::Down => amount1_delta(
                    sqrt_ratio_at_tick(target_tick),
                    sqrt_ratio_at_tick(interval.high_tick),
                    interval.active_liquidity,
                    false,
                ),
            };
        }
        break;
    }
    total
}

/// `ticks` with a zero-delta boundary at `index` if none exists there.
fn with_boundary(ticks: &[Tick], index: i32) -> Cow<'_, [Tick]> {
    match ticks.binary_search_by_key(&index, |t| t.index) {
        Ok(_) => Cow::Borrowed(ticks),
        Err(pos) => {
            let mut owned = Vec::with_capacity(ticks.len() + 1);
            owned.extend_from_slice(&ticks[..pos]);
            owned.push(Tick::filler(index));
            owned.extend_from_slice(&ticks[pos..]);
            Cow::Owned(owned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PoolState;
    use crate::pricing::{outcome_price_at_tick, price_at_tick};
    use alloy_primitives::Address;
    use std::str::FromStr;

    const E18: i128 = 1_000_000_000_000_000_000;
    const TOKEN0: Address = Address::repeat_byte(0x0a);
    const TOKEN1: Address = Address::repeat_byte(0x0b);

    fn mock_market(current_tick: i32, liquidity: u128, ticks: Vec<Tick>, outcome: Address) -> Market {
        let pool = PoolState {
            current_tick,
            liquidity,
            tick_spacing: 1,
            token0: TOKEN0,
            token1: TOKEN1,
        };
        Market::new(pool, ticks, outcome).unwrap()
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn worked_example_matches_closed_form() {
        let config = EngineConfig::default();
        let market = mock_market(0, E18 as u128, vec![Tick::new(887, -E18)], TOKEN1);
        let (_, price1) = price_at_tick(887, config.price_decimals);

        let volume = volume_until_price(&market, &price1, Side::Sell, &config);
        let closed_form = amount0_delta(
            sqrt_ratio_at_tick(0),
            sqrt_ratio_at_tick(887),
            E18 as u128,
            false,
        );
        assert_eq!(volume, closed_form);
        assert_eq!(volume, BigUint::from(43_378_796_641_719_760u64));
    }

    #[test]
    fn out_of_domain_prices_yield_zero() {
        let config = EngineConfig::default();
        let market = mock_market(
            -6_932,
            E18 as u128,
            vec![Tick::new(-20_000, E18), Tick::new(0, -E18)],
            TOKEN0,
        );
        for price in ["0", "-0.25", "1.5"] {
            assert!(volume_until_price(&market, &dec(price), Side::Buy, &config).is_zero());
            assert!(volume_until_price(&market, &dec(price), Side::Sell, &config).is_zero());
        }
        assert!(!volume_until_price(&market, &dec("1"), Side::Buy, &config).is_zero());
    }

    #[test]
    fn empty_ticks_and_wrong_side_yield_zero() {
        let config = EngineConfig::default();
        let empty = mock_market(0, E18 as u128, vec![], TOKEN0);
        assert!(volume_until_price(&empty, &dec("0.5"), Side::Sell, &config).is_zero());

        let market = mock_market(
            -6_932,
            E18 as u128,
            vec![Tick::new(-20_000, E18), Tick::new(0, -E18)],
            TOKEN0,
        );
        // current price ~0.5: buying toward 0.3 goes nowhere
        let quote = quote_until_price(&market, &dec("0.3"), Side::Buy, &config);
        assert!(quote.is_empty());
        assert!(quote.target_tick.is_some());
    }

    #[test]
    fn volume_grows_with_distance_from_current_price() {
        let config = EngineConfig::default();
        let ticks = vec![
            Tick::new(-15_000, E18),
            Tick::new(-9_000, -E18),
            Tick::new(-6_000, 2 * E18),
            Tick::new(-1_000, -2 * E18),
        ];
        // mirrored so the outcome price starts near 0.5 either way
        let mirrored: Vec<Tick> = ticks
            .iter()
            .rev()
            .map(|t| Tick::new(-t.index, -t.liquidity_net))
            .collect();

        for (outcome, current_tick, ticks) in [(TOKEN0, -7_000, ticks), (TOKEN1, 7_000, mirrored)] {
            let market = mock_market(current_tick, 0, ticks, outcome);
            let current = outcome_price_at_tick(current_tick, market.orientation, 18);
            for side in [Side::Buy, Side::Sell] {
                let mut previous = BigUint::zero();
                for step in 1..=40 {
                    let offset = dec("0.02") * BigDecimal::from(step);
                    let price = match side {
                        Side::Buy => &current + &offset,
                        Side::Sell => &current - &offset,
                    };
                    if price <= BigDecimal::zero() || price > BigDecimal::from(1) {
                        continue;
                    }
                    let volume = volume_until_price(&market, &price, side, &config);
                    assert!(volume >= previous, "{side:?} at {price}");
                    previous = volume;
                }
                assert!(!previous.is_zero(), "{side:?} never reached liquidity");
            }
        }
    }

    #[test]
    fn quote_reports_both_legs() {
        let config = EngineConfig::default();
        let market = mock_market(
            -6_932,
            E18 as u128,
            vec![Tick::new(-20_000, E18), Tick::new(0, -E18)],
            TOKEN0,
        );
        let quote = quote_until_price(&market, &dec("0.8"), Side::Buy, &config);
        assert!(!quote.is_empty());
        let average = quote.average_price().unwrap();
        // buying from ~0.5 up to 0.8 averages in between
        assert!(average > dec("0.5") && average < dec("0.8"));
    }

    #[test]
    fn walk_reuse_matches_direct_query() {
        let config = EngineConfig::default();
        let ticks = vec![
            Tick::new(-8_000, E18),
            Tick::new(-3_000, E18),
            Tick::new(-500, -2 * E18),
        ];
        let market = mock_market(-6_000, E18 as u128, ticks, TOKEN0);
        let walk = walk_ticks(
            &market.pool,
            &market.ticks,
            WalkDirection::Up,
            None,
            config.tick_soft_cap,
        );
        for target_tick in [-5_500, -3_000, -1_234, -500] {
            let price = outcome_price_at_tick(target_tick, market.orientation, 18);
            let direct = quote_until_price(&market, &price, Side::Buy, &config);
            let tick = direct.target_tick.unwrap();
            assert_eq!(volume_from_walk(&walk, tick), direct.amount_out);
        }
    }
}
