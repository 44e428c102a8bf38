//! Common ECS components for decorative scene motion.

use glam::Vec3;

/// Resting position of an entity. Motion components offset from here each
/// frame so floating never drifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor(pub Vec3);

/// Gentle vertical bob (hologram screens, rockets, the flag).
#[derive(Debug, Clone, Copy)]
pub struct Float {
    pub amplitude: f32,
    /// Cycles per second.
    pub frequency: f32,
    /// Phase offset in radians so neighbours don't bob in lockstep.
    pub phase: f32,
}

impl Float {
    pub fn new(amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self { amplitude, frequency, phase }
    }

    /// Vertical offset at scene time `t` seconds.
    pub fn offset(&self, t: f32) -> Vec3 {
        let angle = t * self.frequency * std::f32::consts::TAU + self.phase;
        Vec3::Y * angle.sin() * self.amplitude
    }
}

/// Constant spin around the local Y axis (planets).
#[derive(Debug, Clone, Copy, Default)]
pub struct Spin {
    /// Radians per second.
    pub speed: f32,
}

impl Spin {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

/// Countdown for temporary entities.
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Tick down; returns true once the lifetime has run out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_offset_is_bounded_by_amplitude() {
        let float = Float::new(0.05, 0.5, 1.0);
        for i in 0..100 {
            let y = float.offset(i as f32 * 0.037).y;
            assert!(y.abs() <= 0.05 + 1e-6);
        }
    }

    #[test]
    fn lifetime_expires() {
        let mut life = Lifetime::new(0.2);
        assert!(!life.update(0.1));
        assert!(life.update(0.1));
    }
}
