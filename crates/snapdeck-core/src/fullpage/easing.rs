//! L4 Atomic Layer: Pure easing functions for section transitions
//!
//! Maps progress in [0, 1] to eased progress in [0, 1]. Presets come from
//! configuration; `Easing::Custom` swaps in any caller-supplied curve.

pub use crate::config::EasingType;

/// Easing curve applied by the animation driver
#[derive(Debug, Clone, Copy)]
pub enum Easing {
    /// One of the configurable presets
    Curve(EasingType),
    /// Caller-supplied curve; must be monotonic with f(0)=0 and f(1)=1
    Custom(fn(f64) -> f64),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Curve(EasingType::CubicInOut)
    }
}

impl From<EasingType> for Easing {
    fn from(easing: EasingType) -> Self {
        Easing::Curve(easing)
    }
}

impl Easing {
    /// Apply the easing function to a progress value
    ///
    /// Input is clamped to [0, 1] first, so callers may pass raw ratios.
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Curve(curve) => curve.apply(t),
            Easing::Custom(f) => f(t),
        }
    }
}

impl EasingType {
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => if t < 1.0 { 0.0 } else { 1.0 },
            EasingType::Linear => t,
            EasingType::CubicInOut => cubic_ease_in_out(t),
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
        }
    }
}

/// Cubic ease-in-out: 4t³ for t < 0.5, else 1 - (-2t+2)³/2
#[inline]
pub fn cubic_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: [EasingType; 5] = [
        EasingType::Linear,
        EasingType::CubicInOut,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
    ];

    #[test]
    fn test_easing_boundaries() {
        for easing in PRESETS {
            assert!(easing.apply(0.0).abs() < 0.001, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", easing);
        }
        assert_eq!(EasingType::None.apply(0.99), 0.0);
        assert_eq!(EasingType::None.apply(1.0), 1.0);
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in PRESETS {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let v = easing.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_cubic_in_out_shape() {
        assert!((cubic_ease_in_out(0.25) - 0.0625).abs() < 1e-9);
        assert!((cubic_ease_in_out(0.5) - 0.5).abs() < 1e-9);
        assert!((cubic_ease_in_out(0.75) - 0.9375).abs() < 1e-9);
    }

    #[test]
    fn test_custom_curve_is_clamped() {
        fn square(t: f64) -> f64 {
            t * t
        }
        let easing = Easing::Custom(square);
        assert!((easing.apply(0.5) - 0.25).abs() < 1e-9);
        assert_eq!(easing.apply(2.0), 1.0);
        assert_eq!(easing.apply(-1.0), 0.0);
    }
}
