//! Transform component and utilities for spatial positioning.

use glam::{Quat, Vec3};

/// Position, rotation and scale of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform at `position` with a uniform scale.
    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale: Vec3::splat(scale),
            ..Default::default()
        }
    }

    /// Rotate around the Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_y(angle) * self.rotation;
    }

    /// Uniform size, taken from the X scale.
    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn yaw_accumulates() {
        let mut t = Transform::from_position(Vec3::ONE);
        t.rotate_y(FRAC_PI_2);
        t.rotate_y(FRAC_PI_2);
        let facing = t.rotation * -Vec3::Z;
        assert!((facing - Vec3::Z).length() < 1e-5);
        assert_eq!(t.position, Vec3::ONE);
    }

    #[test]
    fn uniform_scale_reads_back() {
        let t = Transform::from_position_scale(Vec3::ZERO, 0.25);
        assert_eq!(t.uniform_scale(), 0.25);
    }
}
