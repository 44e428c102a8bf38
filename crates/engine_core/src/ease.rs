//! Easing helpers shared by the camera rig and the transition overlays.

use glam::Vec3;

/// Fraction of the remaining distance to cover this frame for a first-order
/// exponential approach with the given `rate` (1/s). Independent of frame rate:
/// two steps of `dt` land exactly where one step of `2·dt` would.
pub fn exp_decay_factor(rate: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

/// Move `current` toward `target` by [`exp_decay_factor`].
pub fn exp_decay(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, exp_decay_factor(rate, dt))
}

/// CSS-style cubic bezier timing curve through (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Panel slide curve of the TV shutoff.
pub const EASE_PANEL: CubicBezier = CubicBezier::new(0.43, 0.13, 0.23, 0.96);
/// Standard ease-in.
pub const EASE_IN: CubicBezier = CubicBezier::new(0.42, 0.0, 1.0, 1.0);

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn slope(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Eased value for input progress `x` in [0, 1].
    pub fn ease(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }

        // Newton iterations on t, bisection fallback when the slope flattens.
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-5 {
                return Self::sample(self.y1, self.y2, t);
            }
            let d = Self::slope(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t = (t - err / d).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let v = Self::sample(self.x1, self.x2, t);
            if (v - x).abs() < 1e-5 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        Self::sample(self.y1, self.y2, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_decay_is_frame_rate_independent() {
        let rate = 6.3;
        let mut a = Vec3::ZERO;
        for _ in 0..4 {
            a = exp_decay(a, Vec3::X, rate, 0.25);
        }
        let b = exp_decay(Vec3::ZERO, Vec3::X, rate, 1.0);
        assert!((a - b).length() < 1e-5);
    }

    #[test]
    fn default_rate_covers_a_tenth_per_frame_at_sixty_fps() {
        assert!((exp_decay_factor(6.3, 1.0 / 60.0) - 0.1).abs() < 1e-3);
        assert_eq!(exp_decay_factor(6.3, 0.0), 0.0);
    }

    #[test]
    fn bezier_endpoints_and_monotonic() {
        assert_eq!(EASE_PANEL.ease(0.0), 0.0);
        assert_eq!(EASE_PANEL.ease(1.0), 1.0);
        let mut prev = 0.0;
        for i in 1..=20 {
            let v = EASE_PANEL.ease(i as f32 / 20.0);
            assert!(v >= prev - 1e-4);
            prev = v;
        }
    }

    #[test]
    fn ease_in_starts_slow() {
        assert!(EASE_IN.ease(0.25) < 0.25);
        assert!(EASE_IN.ease(0.9) > 0.8);
    }
}
