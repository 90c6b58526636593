use crate::config::EngineConfig;
use crate::models::Tick;
use tracing::debug;

/// Distance between synthetic filler ticks for this tick list.
///
/// `tick_spacing * max((last - first) / spacing / max_buckets / spacing, min_step)`
pub fn filler_step(ticks: &[Tick], tick_spacing: i32, config: &EngineConfig) -> i32 {
    let spacing = i64::from(tick_spacing.max(1));
    let span = match (ticks.first(), ticks.last()) {
        (Some(first), Some(last)) => i64::from(last.index) - i64::from(first.index),
        _ => 0,
    };
    let buckets = config.max_buckets_target.max(1) as i64;
    let interval = span / spacing / buckets / spacing;
    let step = spacing * interval.max(i64::from(config.min_filler_step));
    i32::try_from(step).unwrap_or(i32::MAX)
}

/// Insert zero-`liquidity_net` ticks between consecutive real ticks so that
/// sparse liquidity still produces enough chart resolution.
pub fn densify(ticks: &[Tick], tick_spacing: i32, config: &EngineConfig) -> Vec<Tick> {
    debug_assert!(
        ticks.windows(2).all(|w| w[0].index < w[1].index),
        "ticks must be strictly ascending"
    );
    if ticks.len() < 2 {
        return ticks.to_vec();
    }

    let step = filler_step(ticks, tick_spacing, config);
    let mut dense = Vec::with_capacity(ticks.len());
    for pair in ticks.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        dense.push(lower);
        let mut filler = lower.index.saturating_add(step);
        while filler < upper.index {
            dense.push(Tick::filler(filler));
            filler = filler.saturating_add(step);
        }
    }
    if let Some(last) = ticks.last() {
        dense.push(*last);
    }

    debug!(
        real = ticks.len(),
        synthetic = dense.len() - ticks.len(),
        step,
        "[DENSIFY] filler ticks inserted"
    );
    dense
}
