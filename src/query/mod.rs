//! Price/volume inversion queries.

pub mod solver;
pub mod volume;

pub use solver::price_from_volume;
pub use volume::{SwapQuote, quote_until_price, volume_from_walk, volume_until_price};
