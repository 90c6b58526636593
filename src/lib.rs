//! Synthetic order-book depth for concentrated-liquidity pools.
//!
//! The crate reconstructs bid/ask depth curves from a pool's initialized
//! ticks and answers price/volume inversion queries against them. It is a
//! pure computation library: callers supply the tick list, the pool snapshot
//! and the outcome token, and every call recomputes from those inputs.

pub mod config;
pub mod depth;
pub mod errors;
pub mod liquidity;
pub mod models;
pub mod pricing;
pub mod query;
pub mod utils;

pub use config::EngineConfig;
pub use depth::{CurveOptions, DepthCurve, DepthPoint, build_depth_curve};
pub use errors::{EngineError, Result};
pub use models::{DisplayUnit, Market, MarketSnapshot, Orientation, PoolState, Side, Tick};
pub use query::{SwapQuote, price_from_volume, quote_until_price, volume_until_price};
