//! Shared data structures used throughout the engine.

use crate::errors::{EngineError, Result};
use alloy_primitives::Address;
use serde::Deserialize;
use std::str::FromStr;

/// Initialized tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub index: i32,
    /// Signed change of active liquidity when the price crosses this tick upward.
    pub liquidity_net: i128,
}

impl Tick {
    pub fn new(index: i32, liquidity_net: i128) -> Self {
        Self {
            index,
            liquidity_net,
        }
    }

    /// Synthetic boundary that leaves active liquidity untouched.
    pub fn filler(index: i32) -> Self {
        Self::new(index, 0)
    }
}

/// Immutable snapshot of the pool state needed to walk its liquidity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub current_tick: i32,
    /// Active (in-range) liquidity at `current_tick`.
    pub liquidity: u128,
    pub tick_spacing: i32,
    pub token0: Address,
    pub token1: Address,
}

/// Which pool token is the outcome token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Outcome price is token1 per token0; it rises with the tick.
    OutcomeIsToken0,
    /// Outcome price is token0 per token1; it falls as the tick rises.
    OutcomeIsToken1,
}

impl Orientation {
    pub fn from_pool(pool: &PoolState, outcome: Address) -> Result<Self> {
        if outcome == pool.token0 {
            Ok(Self::OutcomeIsToken0)
        } else if outcome == pool.token1 {
            Ok(Self::OutcomeIsToken1)
        } else {
            Err(EngineError::UnknownOutcomeToken(outcome))
        }
    }
}

/// Direction of a tick walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDirection {
    /// Ticks increasing: token1 in, token0 out.
    Up,
    /// Ticks decreasing: token0 in, token1 out.
    Down,
}

/// Trade side from the outcome token's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Acquire outcome tokens; the outcome price rises.
    Buy,
    /// Dispose of outcome tokens; the outcome price falls.
    Sell,
}

impl Side {
    pub fn walk_direction(self, orientation: Orientation) -> WalkDirection {
        match (self, orientation) {
            (Side::Buy, Orientation::OutcomeIsToken0) => WalkDirection::Up,
            (Side::Buy, Orientation::OutcomeIsToken1) => WalkDirection::Down,
            (Side::Sell, Orientation::OutcomeIsToken0) => WalkDirection::Down,
            (Side::Sell, Orientation::OutcomeIsToken1) => WalkDirection::Up,
        }
    }
}

impl FromStr for Side {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(EngineError::Config(format!("unknown side {other:?}"))),
        }
    }
}

/// Token the depth curve volumes are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayUnit {
    #[default]
    Outcome,
    Collateral,
}

/// Pool, its initialized ticks and the outcome token, validated together.
#[derive(Debug, Clone)]
pub struct Market {
    pub pool: PoolState,
    /// Sorted ascending by index, without duplicates.
    pub ticks: Vec<Tick>,
    pub outcome: Address,
    pub orientation: Orientation,
}

impl Market {
    pub fn new(pool: PoolState, ticks: Vec<Tick>, outcome: Address) -> Result<Self> {
        if pool.tick_spacing <= 0 {
            return Err(EngineError::InvalidTickSpacing(pool.tick_spacing));
        }
        let orientation = Orientation::from_pool(&pool, outcome)?;
        Ok(Self {
            pool,
            ticks,
            outcome,
            orientation,
        })
    }

    pub fn from_snapshot(snapshot: MarketSnapshot) -> Result<Self> {
        let pool = PoolState::try_from(snapshot.pool)?;
        let mut ticks = snapshot
            .ticks
            .into_iter()
            .map(Tick::try_from)
            .collect::<Result<Vec<_>>>()?;
        ticks.sort_by_key(|t| t.index);
        Self::new(pool, ticks, snapshot.outcome_token)
    }
}

// ---------- raw inputs ----------

/// Integer that upstream may encode either as a JSON number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntOrText {
    Int(i64),
    Text(String),
}

impl IntOrText {
    fn parse_i32(&self, field: &str) -> Result<i32> {
        match self {
            IntOrText::Int(v) => i32::try_from(*v)
                .map_err(|_| EngineError::Config(format!("{field} out of range: {v}"))),
            IntOrText::Text(s) => Ok(s.trim().parse()?),
        }
    }
}

/// Tick as delivered by the indexer, 128-bit values encoded as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTick {
    pub tick_idx: IntOrText,
    pub liquidity_net: String,
}

impl TryFrom<RawTick> for Tick {
    type Error = EngineError;

    fn try_from(raw: RawTick) -> Result<Self> {
        let index = raw.tick_idx.parse_i32("tickIdx")?;
        let liquidity_net =
            raw.liquidity_net
                .trim()
                .parse::<i128>()
                .map_err(|e| EngineError::InvalidLiquidity {
                    value: raw.liquidity_net.clone(),
                    reason: e.to_string(),
                })?;
        Ok(Tick::new(index, liquidity_net))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPool {
    pub liquidity: String,
    pub tick: IntOrText,
    pub tick_spacing: IntOrText,
    pub token0: Address,
    pub token1: Address,
}

impl TryFrom<RawPool> for PoolState {
    type Error = EngineError;

    fn try_from(raw: RawPool) -> Result<Self> {
        let liquidity =
            raw.liquidity
                .trim()
                .parse::<u128>()
                .map_err(|e| EngineError::InvalidLiquidity {
                    value: raw.liquidity.clone(),
                    reason: e.to_string(),
                })?;
        Ok(PoolState {
            current_tick: raw.tick.parse_i32("tick")?,
            liquidity,
            tick_spacing: raw.tick_spacing.parse_i32("tickSpacing")?,
            token0: raw.token0,
            token1: raw.token1,
        })
    }
}

/// Whole-market input document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub pool: RawPool,
    pub ticks: Vec<RawTick>,
    pub outcome_token: Address,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const TOKEN0: Address = address!("0x1000000000000000000000000000000000000001");
    const TOKEN1: Address = address!("0x2000000000000000000000000000000000000002");

    fn mock_pool(tick_spacing: i32) -> PoolState {
        PoolState {
            current_tick: 0,
            liquidity: 1_000,
            tick_spacing,
            token0: TOKEN0,
            token1: TOKEN1,
        }
    }

    #[test]
    fn orientation_follows_outcome_token() {
        let pool = mock_pool(1);
        assert_eq!(
            Orientation::from_pool(&pool, TOKEN0).unwrap(),
            Orientation::OutcomeIsToken0
        );
        assert_eq!(
            Orientation::from_pool(&pool, TOKEN1).unwrap(),
            Orientation::OutcomeIsToken1
        );
        assert!(matches!(
            Orientation::from_pool(&pool, Address::ZERO),
            Err(EngineError::UnknownOutcomeToken(_))
        ));
    }

    #[test]
    fn sides_walk_opposite_ways() {
        for orientation in [Orientation::OutcomeIsToken0, Orientation::OutcomeIsToken1] {
            assert_ne!(
                Side::Buy.walk_direction(orientation),
                Side::Sell.walk_direction(orientation)
            );
        }
        assert_eq!(
            Side::Sell.walk_direction(Orientation::OutcomeIsToken1),
            WalkDirection::Up
        );
        assert_eq!("BUY".parse::<Side>().unwrap(), Side::Buy);
        assert!("hold".parse::<Side>().is_err());
    }

    #[test]
    fn market_rejects_bad_spacing() {
        let err = Market::new(mock_pool(0), vec![], TOKEN0);
        assert!(matches!(err, Err(EngineError::InvalidTickSpacing(0))));
    }

    #[test]
    fn snapshot_parses_text_encoded_integers() {
        let raw = r#"{
            "pool": {
                "liquidity": "340282366920938463463374607431768211455",
                "tick": "-120",
                "tickSpacing": 60,
                "token0": "0x1000000000000000000000000000000000000001",
                "token1": "0x2000000000000000000000000000000000000002"
            },
            "ticks": [
                {"tickIdx": "60", "liquidityNet": "-170141183460469231731687303715884105728"},
                {"tickIdx": -180, "liquidityNet": "170141183460469231731687303715884105727"}
            ],
            "outcomeToken": "0x2000000000000000000000000000000000000002"
        }"#;
        let snapshot: MarketSnapshot = serde_json::from_str(raw).expect("json should parse");
        let market = Market::from_snapshot(snapshot).unwrap();
        assert_eq!(market.pool.liquidity, u128::MAX);
        assert_eq!(market.pool.current_tick, -120);
        assert_eq!(market.orientation, Orientation::OutcomeIsToken1);
        assert_eq!(
            market.ticks,
            vec![Tick::new(-180, i128::MAX), Tick::new(60, i128::MIN)]
        );
    }

    #[test]
    fn malformed_liquidity_is_reported() {
        let raw = RawTick {
            tick_idx: IntOrText::Int(10),
            liquidity_net: "12abc".into(),
        };
        let err = Tick::try_from(raw).unwrap_err();
        assert!(matches!(err, EngineError::InvalidLiquidity { .. }));

        let raw = RawPool {
            liquidity: "-5".into(),
            tick: IntOrText::Int(0),
            tick_spacing: IntOrText::Int(1),
            token0: TOKEN0,
            token1: TOKEN1,
        };
        assert!(PoolState::try_from(raw).is_err());
    }
}
