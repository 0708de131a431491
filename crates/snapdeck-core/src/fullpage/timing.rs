//! L4 Atomic Layer: Time calculation utilities for section transitions
//!
//! Pure functions; the current instant is always passed in so that frames
//! can be replayed deterministically.

use std::time::{Duration, Instant};

/// Calculate transition progress (0.0 to 1.0) at `now`
///
/// A zero duration is always complete.
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Vertical offset of the container when `index` is in view
///
/// Sections stack downward, so the container moves up (negative offset).
#[inline]
pub fn section_offset(index: usize, extent: f64) -> f64 {
    -(index as f64) * extent
}
