//! Engine tunables.

use crate::errors::{EngineError, Result};
use bigdecimal::BigDecimal;
use std::str::FromStr;

/// Largest tick magnitude the engine walks to, roughly a 1000x price move.
pub const DEFAULT_TICK_SOFT_CAP: i32 = 69_077;
pub const DEFAULT_MAX_BUCKETS_TARGET: usize = 100;
pub const DEFAULT_MIN_FILLER_STEP: i32 = 5;
/// Iteration cap of the price-from-volume bisection.
pub const DEFAULT_BISECTION_ITERATIONS: u32 = 60;
pub const DEFAULT_BISECTION_TOLERANCE: f64 = 1e-12;

/// Consolidated engine configuration.
///
/// Every value the computations depend on lives here, so the engine stays
/// free of module-level state and can be exercised across configurations.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Ticks beyond `±tick_soft_cap` saturate to the cap.
    pub tick_soft_cap: i32,
    /// Target number of buckets per curve side.
    pub max_buckets_target: usize,
    /// Smallest filler step, in multiples of the tick spacing.
    pub min_filler_step: i32,
    pub bisection_iterations: u32,
    /// Residual, in whole tokens, under which the bisection stops early.
    pub bisection_tolerance: f64,
    pub bracket_low: BigDecimal,
    pub bracket_high: BigDecimal,
    /// Fractional digits kept when converting ticks into decimal prices.
    pub price_decimals: u32,
    /// Fractional digits shown to users.
    pub display_decimals: u32,
    /// Fixed-point decimals of raw token volumes.
    pub volume_decimals: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_soft_cap: DEFAULT_TICK_SOFT_CAP,
            max_buckets_target: DEFAULT_MAX_BUCKETS_TARGET,
            min_filler_step: DEFAULT_MIN_FILLER_STEP,
            bisection_iterations: DEFAULT_BISECTION_ITERATIONS,
            bisection_tolerance: DEFAULT_BISECTION_TOLERANCE,
            bracket_low: BigDecimal::new(1.into(), 3),
            bracket_high: BigDecimal::from(1),
            price_decimals: 18,
            display_decimals: 4,
            volume_decimals: 18,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `DEPTH_*` environment variables, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("DEPTH_TICK_SOFT_CAP") {
            config.tick_soft_cap = v.trim().parse()?;
        }
        if let Some(v) = lookup("DEPTH_MAX_BUCKETS_TARGET") {
            config.max_buckets_target = v.trim().parse()?;
        }
        if let Some(v) = lookup("DEPTH_MIN_FILLER_STEP") {
            config.min_filler_step = v.trim().parse()?;
        }
        if let Some(v) = lookup("DEPTH_BISECTION_ITERATIONS") {
            config.bisection_iterations = v.trim().parse()?;
        }
        if let Some(v) = lookup("DEPTH_BISECTION_TOLERANCE") {
            config.bisection_tolerance = v.trim().parse()?;
        }
        if let Some(v) = lookup("DEPTH_BRACKET_LOW") {
            config.bracket_low = BigDecimal::from_str(v.trim())?;
        }
        if let Some(v) = lookup("DEPTH_BRACKET_HIGH") {
            config.bracket_high = BigDecimal::from_str(v.trim())?;
        }
        if let Some(v) = lookup("DEPTH_PRICE_DECIMALS") {
            config.price_decimals = v.trim().parse()?;
        }
        if let Some(v) = lookup("DEPTH_DISPLAY_DECIMALS") {
            config.display_decimals = v.trim().parse()?;
        }
        if let Some(v) = lookup("DEPTH_VOLUME_DECIMALS") {
            config.volume_decimals = v.trim().parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_soft_cap <= 0 || self.tick_soft_cap > crate::pricing::tick_math::MAX_TICK {
            return Err(EngineError::Config(format!(
                "tick_soft_cap must be within 1..={}, got {}",
                crate::pricing::tick_math::MAX_TICK,
                self.tick_soft_cap
            )));
        }
        if self.max_buckets_target == 0 {
            return Err(EngineError::Config(
                "max_buckets_target must be at least 1".into(),
            ));
        }
        if self.min_filler_step <= 0 {
            return Err(EngineError::Config(format!(
                "min_filler_step must be positive, got {}",
                self.min_filler_step
            )));
        }
        if self.bracket_low >= self.bracket_high {
            return Err(EngineError::Config(format!(
                "bisection bracket is empty: [{}, {}]",
                self.bracket_low, self.bracket_high
            )));
        }
        if self.bisection_tolerance.is_nan() || self.bisection_tolerance < 0.0 {
            return Err(EngineError::Config(
                "bisection_tolerance must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}
