//! Launch-bay rockets, one per destination planet.

use crate::{color::Rgb, locale::Localized};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    /// Bay-local position. Front row (z = -2) carries projects.
    pub position: (f32, f32, f32),
    pub size: f32,
    pub color: Rgb,
    pub glow: Rgb,
    pub target_planet_id: String,
    pub label: Localized,
}

impl Capsule {
    pub fn position(&self) -> Vec3 {
        let (x, y, z) = self.position;
        Vec3::new(x, y, z)
    }
}
