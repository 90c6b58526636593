//! Liquidity traversal over initialized ticks.

pub mod densify;
pub mod walk;

pub use densify::{densify, filler_step};
pub use walk::{Interval, TickWalk, amount0_delta, amount1_delta, walk_ticks};
