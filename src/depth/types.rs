use crate::models::DisplayUnit;
use bigdecimal::BigDecimal;
use num_bigint::BigUint;

/// Options for building a depth curve
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveOptions {
    /// Keep only the N buckets nearest the current price on each side.
    pub zoom_count: Option<usize>,
    pub unit: DisplayUnit,
}

/// One bucket of a depth curve side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthPoint {
    pub low_tick: i32,
    pub high_tick: i32,
    /// Outcome price at the bucket's midpoint tick.
    pub price: BigDecimal,
    /// Volume tradeable inside this bucket alone.
    pub volume: BigUint,
    /// Volume tradeable from the current price through this bucket.
    pub cumulative: BigUint,
}

/// Cumulative bid/ask volume as a function of outcome price.
///
/// Each side is ordered outward from the current price; prices are strictly
/// monotonic within a side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthCurve {
    /// Volume available while the outcome price rises.
    pub asks: Vec<DepthPoint>,
    /// Volume available while the outcome price falls.
    pub bids: Vec<DepthPoint>,
    pub current_price: BigDecimal,
    /// Largest zoom count that still changes the curve.
    pub max_zoom_count: usize,
}

impl DepthCurve {
    pub fn bucket_count(&self) -> usize {
        self.asks.len() + self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}
