//! Pure easing and interpolation helpers for the drift animation.
//!
//! Everything here maps normalized time `[0, 1]` to normalized position
//! `[0, 1]` or interpolates between two offsets. No clocks, no state.

use std::time::{Duration, Instant};

/// Half-sine ease-in-out: `f(t) = -(cos(π·t) - 1) / 2`.
///
/// Symmetric around the midpoint (`f(0.5) = 0.5`), so the animation's
/// temporal midpoint lands on the spatial midpoint.
#[inline]
pub fn ease_in_out_sine(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    -((std::f64::consts::PI * t).cos() - 1.0) / 2.0
}

/// Normalized progress of an animation that started at `start` and runs
/// for `duration`, clamped to `[0, 1]`. A zero duration counts as done.
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Interpolate between two row offsets, rounding to the nearest row.
#[inline]
pub fn lerp_offset(from: u64, to: u64, t: f64) -> u64 {
    let from = from as f64;
    let to = to as f64;
    (from + (to - from) * t).round().max(0.0) as u64
}
