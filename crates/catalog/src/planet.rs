//! Planets of the solar system scene and their surface environments.

use crate::{color::Rgb, locale::Localized};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Surface look of a planet once landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub ground: Rgb,
    pub sky: Rgb,
    pub fog: Rgb,
    pub ambient: Rgb,
    pub particle: Rgb,
    /// Free-form decoration tags ("craters", "dust", ...).
    #[serde(default)]
    pub features: Vec<String>,
}

impl Environment {
    pub fn has_feature(&self, tag: &str) -> bool {
        self.features.iter().any(|f| f == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: String,
    pub name: Localized,
    /// Visual radius in world units.
    pub size: f32,
    /// Position in the solar-system layout.
    pub position: (f32, f32, f32),
    /// Spin in radians per 60 Hz frame.
    pub rotation_speed: f32,
    /// Project showcased on this planet's surface, if any.
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub has_ring: bool,
    pub environment: Environment,
}

impl Planet {
    pub fn position(&self) -> Vec3 {
        let (x, y, z) = self.position;
        Vec3::new(x, y, z)
    }

    /// Spin rate in radians per second.
    pub fn spin_per_second(&self) -> f32 {
        self.rotation_speed * 60.0
    }
}
