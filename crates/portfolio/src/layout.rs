//! World placement of every selectable object, per device profile.

use catalog::Catalog;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera_rig::{OrbitSettings, Pose};
use crate::config::CameraConfig;
use crate::state::{ObjectId, ObjectKind};

/// Viewport class, derived from the window width in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub fn from_width(logical_width: f32) -> Self {
        if logical_width < 768.0 {
            DeviceClass::Mobile
        } else if logical_width < 1024.0 {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }
}

// ── Ship interior ───────────────────────────────────────────────────────────

/// Hologram screens floating at different depths, one per planet in catalog order.
/// x and y are scaled by the device spacing.
pub const HOLOGRAM_GRID: [Vec3; 9] = [
    Vec3::new(-7.0, 4.0, -5.0),
    Vec3::new(0.0, 5.0, -9.0),
    Vec3::new(7.0, 4.0, -6.0),
    Vec3::new(-6.0, 0.0, -10.0),
    Vec3::new(0.0, 0.0, -4.0),
    Vec3::new(6.0, 0.0, -8.0),
    Vec3::new(-7.0, -4.0, -7.0),
    Vec3::new(0.0, -5.0, -10.0),
    Vec3::new(7.0, -4.0, -5.0),
];
pub const HOLOGRAM_SPACING_DESKTOP: f32 = 1.0;
pub const HOLOGRAM_SPACING_MOBILE: f32 = 0.6;
/// Screen width and height in world units.
pub const HOLOGRAM_SIZE: (f32, f32) = (3.2, 2.2);

/// The launch bay sits below the hologram wall, close to the viewer.
pub const ROCKET_BAY_OFFSET: Vec3 = Vec3::new(0.0, -6.0, 1.0);
pub const ROCKET_BAY_SCALE: f32 = 0.8;

/// Solar-system planets are seen through the viewport, pushed behind the wall.
pub const PLANET_BACKDROP_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -40.0);

// ── Planet surface ──────────────────────────────────────────────────────────

pub const SURFACE_CAMERA: Vec3 = Vec3::new(5.0, 3.0, 8.0);
pub const SURFACE_LOOK_AT: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const SURFACE_FLAG: Vec3 = Vec3::ZERO;
pub const SURFACE_BACK_BUTTON: Vec3 = Vec3::new(-8.0, 3.0, 0.0);
pub const SURFACE_ASTRONAUT: Vec3 = Vec3::new(2.0, 0.0, 0.0);
pub const ASTRONAUT_SPAWN_HEIGHT: f32 = 15.0;
/// Orbit shell around [`SURFACE_LOOK_AT`]: polar angle from straight up, and distance.
pub const SURFACE_ORBIT_POLAR: (f32, f32) = (0.3, std::f32::consts::FRAC_PI_2 - 0.1);
pub const SURFACE_ORBIT_DISTANCE: (f32, f32) = (3.0, 20.0);

/// A placed object: where it stands and how far it reaches from its centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub id: ObjectId,
    pub position: Vec3,
    pub extent: f32,
}

/// Positions of everything selectable in the ship interior.
#[derive(Debug, Clone)]
pub struct ShipLayout {
    pub device: DeviceClass,
    placements: Vec<Placement>,
}

impl ShipLayout {
    pub fn new(catalog: &Catalog, device: DeviceClass) -> Self {
        let spacing = if device.is_mobile() {
            HOLOGRAM_SPACING_MOBILE
        } else {
            HOLOGRAM_SPACING_DESKTOP
        };

        if catalog.planets.len() > HOLOGRAM_GRID.len() {
            log::warn!(
                "{} planets but only {} hologram slots; extra planets get no screen",
                catalog.planets.len(),
                HOLOGRAM_GRID.len()
            );
        }

        let holograms = catalog.planets.iter().zip(HOLOGRAM_GRID).map(|(planet, slot)| Placement {
            id: ObjectId::hologram(&planet.id),
            position: Vec3::new(slot.x * spacing, slot.y * spacing, slot.z),
            extent: 0.0,
        });

        let rockets = catalog.capsules.iter().map(|capsule| Placement {
            id: ObjectId::rocket(&capsule.id),
            position: ROCKET_BAY_OFFSET + capsule.position() * ROCKET_BAY_SCALE,
            extent: capsule.size * ROCKET_BAY_SCALE,
        });

        let planets = catalog.planets.iter().map(|planet| Placement {
            id: ObjectId::planet(&planet.id),
            position: PLANET_BACKDROP_OFFSET + planet.position(),
            extent: planet.size,
        });

        Self {
            device,
            placements: holograms.chain(rockets).chain(planets).collect(),
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn find(&self, id: &ObjectId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.id == id)
    }

    /// Close-up camera pose for a selected object: in front of it along +Z,
    /// backed off by its extent, looking straight at it.
    pub fn focus_pose(&self, id: &ObjectId, camera: &CameraConfig) -> Option<Pose> {
        let placement = self.find(id)?;
        let distance = camera.zoom_distance(self.device) + placement.extent;
        Some(Pose::new(placement.position + Vec3::Z * distance, placement.position))
    }
}

/// Resting camera pose in the ship.
pub fn ship_home(camera: &CameraConfig, device: DeviceClass) -> Pose {
    Pose::new(
        Vec3::new(0.0, 0.0, camera.initial_z(device)),
        Vec3::from_array(camera.initial_look_at),
    )
}

/// Resting camera pose on a planet surface.
pub fn surface_home() -> Pose {
    Pose::new(SURFACE_CAMERA, SURFACE_LOOK_AT)
}

/// User orbit around the flag. Never dips below the ground.
pub fn surface_orbit(camera: &CameraConfig, device: DeviceClass) -> OrbitSettings {
    let (rotate_speed, zoom_speed) = camera.orbit_speeds(device);
    OrbitSettings {
        rotate_speed,
        zoom_speed,
        damping_rate: camera.orbit_damping_rate(),
        min_polar: SURFACE_ORBIT_POLAR.0,
        max_polar: SURFACE_ORBIT_POLAR.1,
        min_distance: SURFACE_ORBIT_DISTANCE.0,
        max_distance: SURFACE_ORBIT_DISTANCE.1,
    }
}

/// Surface objects do not depend on the catalog.
pub fn surface_placements() -> [Placement; 2] {
    [
        Placement {
            id: ObjectId::new(ObjectKind::Flag, "flag"),
            position: SURFACE_FLAG,
            extent: 1.5,
        },
        Placement {
            id: ObjectId::new(ObjectKind::BackButton, "back"),
            position: SURFACE_BACK_BUTTON,
            extent: 0.8,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_breakpoints() {
        assert_eq!(DeviceClass::from_width(375.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_width(768.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(1023.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(1440.0), DeviceClass::Desktop);
    }

    #[test]
    fn hologram_focus_matches_grid_slot() {
        let catalog = Catalog::builtin().unwrap();
        let layout = ShipLayout::new(&catalog, DeviceClass::Desktop);
        let camera = CameraConfig::default();
        // Earth is the fourth planet: slot (-6, 0, -10).
        let pose = layout.focus_pose(&ObjectId::hologram("3"), &camera).unwrap();
        assert_eq!(pose.look_at, Vec3::new(-6.0, 0.0, -10.0));
        assert_eq!(pose.position, Vec3::new(-6.0, 0.0, 0.0));
    }

    #[test]
    fn mobile_layout_is_tighter_and_closer() {
        let catalog = Catalog::builtin().unwrap();
        let layout = ShipLayout::new(&catalog, DeviceClass::Mobile);
        let camera = CameraConfig::default();
        let pose = layout.focus_pose(&ObjectId::hologram("0"), &camera).unwrap();
        assert!((pose.look_at - Vec3::new(-7.0 * 0.6, 4.0 * 0.6, -5.0)).length() < 1e-5);
        assert!((pose.position.z - (-5.0 + 8.0)).abs() < 1e-5);
        assert_eq!(ship_home(&camera, DeviceClass::Mobile).position.z, 12.0);
    }

    #[test]
    fn every_capsule_and_planet_is_placed() {
        let catalog = Catalog::builtin().unwrap();
        let layout = ShipLayout::new(&catalog, DeviceClass::Desktop);
        assert_eq!(layout.placements().len(), 9 + 9 + 9);
        assert!(layout.find(&ObjectId::rocket("4")).is_some());
        assert!(layout.find(&ObjectId::rocket("42")).is_none());
    }
}
