use crate::models::{PoolState, Tick, WalkDirection};
use crate::pricing::tick_math::{clamp_tick, sqrt_ratio_at_tick, u256_to_biguint};
use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, warn};
use uniswap_v3_math::error::UniswapV3MathError;
use uniswap_v3_math::sqrt_price_math::{_get_amount_0_delta, _get_amount_1_delta};

/// Liquidity active between two adjacent boundaries and the token amounts
/// needed to move the price across it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub low_tick: i32,
    pub high_tick: i32,
    pub active_liquidity: u128,
    pub amount0: BigUint,
    pub amount1: BigUint,
    pub direction: WalkDirection,
}

impl Interval {
    /// Amount paid out by the pool, rounded down.
    pub fn amount_out(&self) -> &BigUint {
        match self.direction {
            WalkDirection::Up => &self.amount0,
            WalkDirection::Down => &self.amount1,
        }
    }

    /// Amount the pool needs to receive, rounded up.
    pub fn amount_in(&self) -> &BigUint {
        match self.direction {
            WalkDirection::Up => &self.amount1,
            WalkDirection::Down => &self.amount0,
        }
    }
}

/// Outcome of walking the tick list in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickWalk {
    pub direction: WalkDirection,
    /// Ordered outward from the starting tick.
    pub intervals: Vec<Interval>,
    pub end_tick: i32,
    /// Active liquidity after crossing the last boundary.
    pub end_liquidity: u128,
}

impl TickWalk {
    pub fn total_out(&self) -> BigUint {
        self.intervals
            .iter()
            .fold(BigUint::zero(), |acc, i| acc + i.amount_out())
    }

    pub fn total_in(&self) -> BigUint {
        self.intervals
            .iter()
            .fold(BigUint::zero(), |acc, i| acc + i.amount_in())
    }

    pub fn total_amount0(&self) -> BigUint {
        self.intervals
            .iter()
            .fold(BigUint::zero(), |acc, i| acc + &i.amount0)
    }

    pub fn total_amount1(&self) -> BigUint {
        self.intervals
            .iter()
            .fold(BigUint::zero(), |acc, i| acc + &i.amount1)
    }
}

/// Walk `ticks` outward from `pool.current_tick`, one interval per boundary.
///
/// The walk ends at `stop_tick` (the cap in the walk direction when `None`),
/// or when the ticks run out. Every tick is clamped to `[-cap, cap]`.
/// `ticks` must be sorted ascending without duplicates.
pub fn walk_ticks(
    pool: &PoolState,
    ticks: &[Tick],
    direction: WalkDirection,
    stop_tick: Option<i32>,
    cap: i32,
) -> TickWalk {
    debug_assert!(
        ticks.windows(2).all(|w| w[0].index < w[1].index),
        "ticks must be strictly ascending"
    );

    let start = clamp_tick(pool.current_tick, cap);
    let mut walk = TickWalk {
        direction,
        intervals: Vec::new(),
        end_tick: start,
        end_liquidity: pool.liquidity,
    };
    if ticks.is_empty() {
        return walk;
    }

    let mut liquidity = pool.liquidity;
    let mut cursor = start;
    let mut sqrt_cursor = sqrt_ratio_at_tick(cursor);

    match direction {
        WalkDirection::Up => {
            let limit = clamp_tick(stop_tick.unwrap_or(cap), cap);
            let first = ticks.partition_point(|t| t.index <= pool.current_tick);
            for tick in &ticks[first..] {
                let boundary = tick.index.min(limit);
                if boundary > cursor {
                    let sqrt_next = sqrt_ratio_at_tick(boundary);
                    walk.intervals.push(Interval {
                        low_tick: cursor,
                        high_tick: boundary,
                        active_liquidity: liquidity,
                        amount0: amount0_delta(sqrt_cursor, sqrt_next, liquidity, false),
                        amount1: amount1_delta(sqrt_cursor, sqrt_next, liquidity, true),
                        direction,
                    });
                    cursor = boundary;
                    sqrt_cursor = sqrt_next;
                }
                if tick.index > limit {
                    break;
                }
                liquidity = cross(liquidity, tick.liquidity_net, tick.index);
                if tick.index == limit {
                    break;
                }
            }
        }
        WalkDirection::Down => {
            let limit = clamp_tick(stop_tick.unwrap_or(-cap), cap);
            let end = ticks.partition_point(|t| t.index <= pool.current_tick);
            for tick in ticks[..end].iter().rev() {
                let boundary = tick.index.max(limit);
                if boundary < cursor {
                    let sqrt_next = sqrt_ratio_at_tick(boundary);
                    walk.intervals.push(Interval {
                        low_tick: boundary,
                        high_tick: cursor,
                        active_liquidity: liquidity,
                        amount0: amount0_delta(sqrt_next, sqrt_cursor, liquidity, true),
                        amount1: amount1_delta(sqrt_next, sqrt_cursor, liquidity, false),
                        direction,
                    });
                    cursor = boundary;
                    sqrt_cursor = sqrt_next;
                }
                if tick.index < limit {
                    break;
                }
                // crossing downward removes what crossing upward added
                liquidity = match tick.liquidity_net.checked_neg() {
                    Some(net) => cross(liquidity, net, tick.index),
                    None => cross(cross(liquidity, i128::MAX, tick.index), 1, tick.index),
                };
                if tick.index == limit {
                    break;
                }
            }
        }
    }

    walk.end_tick = cursor;
    walk.end_liquidity = liquidity;
    debug!(
        ?direction,
        start,
        end = cursor,
        intervals = walk.intervals.len(),
        end_liquidity = liquidity,
        "[WALK] tick walk finished"
    );
    walk
}

/// Apply a signed liquidity delta, saturating instead of wrapping.
fn cross(liquidity: u128, delta: i128, tick: i32) -> u128 {
    let next = if delta >= 0 {
        liquidity.checked_add(delta.unsigned_abs())
    } else {
        liquidity.checked_sub(delta.unsigned_abs())
    };
    match next {
        Some(value) => value,
        None => {
            warn!(
                tick,
                liquidity, delta, "[WALK] active liquidity out of range, saturating"
            );
            if delta >= 0 { u128::MAX } else { 0 }
        }
    }
}

/// Token0 amount for moving between `sqrt_a` and `sqrt_b` at `liquidity`,
/// rounded like `SqrtPriceMath.getAmount0Delta`.
pub fn amount0_delta(sqrt_a: U256, sqrt_b: U256, liquidity: u128, round_up: bool) -> BigUint {
    settle(_get_amount_0_delta(sqrt_a, sqrt_b, liquidity, round_up))
}

/// Token1 amount for moving between `sqrt_a` and `sqrt_b` at `liquidity`,
/// rounded like `SqrtPriceMath.getAmount1Delta`.
pub fn amount1_delta(sqrt_a: U256, sqrt_b: U256, liquidity: u128, round_up: bool) -> BigUint {
    settle(_get_amount_1_delta(sqrt_a, sqrt_b, liquidity, round_up))
}

fn settle(amount: Result<U256, UniswapV3MathError>) -> BigUint {
    match amount {
        Ok(amount) => u256_to_biguint(amount),
        Err(err) => {
            warn!(%err, "[WALK] amount delta out of range, counting zero");
            BigUint::zero()
        }
    }
}
