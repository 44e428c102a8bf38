//! Scene phase and object identity.

use catalog::{Planet, Project};
use std::fmt;

/// Which sub-scene is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneMode {
    Spaceship,
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Hologram,
    Rocket,
    Planet,
    Flag,
    BackButton,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Hologram => "hologram",
            ObjectKind::Rocket => "rocket",
            ObjectKind::Planet => "planet",
            ObjectKind::Flag => "flag",
            ObjectKind::BackButton => "back",
        }
    }

    /// Lives in the ship interior.
    pub fn in_ship(self) -> bool {
        matches!(self, ObjectKind::Hologram | ObjectKind::Rocket | ObjectKind::Planet)
    }
}

/// Identity of an interactive object. Events carry nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub kind: ObjectKind,
    pub key: String,
}

impl ObjectId {
    pub fn new(kind: ObjectKind, key: impl Into<String>) -> Self {
        Self { kind, key: key.into() }
    }

    pub fn hologram(planet_id: &str) -> Self {
        Self::new(ObjectKind::Hologram, planet_id)
    }

    pub fn rocket(capsule_id: &str) -> Self {
        Self::new(ObjectKind::Rocket, capsule_id)
    }

    pub fn planet(planet_id: &str) -> Self {
        Self::new(ObjectKind::Planet, planet_id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.key)
    }
}

/// A selected object and the planet it leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub object: ObjectId,
    pub planet_id: String,
}

/// The planet being visited and its project, if it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub planet: Planet,
    pub project: Option<Project>,
}

/// Orchestrator state. Each variant carries exactly the data valid in it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Exploring,
    /// Camera easing toward a freshly selected object.
    CameraZooming { target: Target },
    Selected { target: Target },
    /// Warp overlay running; the visit was resolved when it started.
    Warping { target: Target, visit: Visit },
    Surface { visit: Visit },
    /// Astronaut launching off the surface.
    Exiting { visit: Visit },
    /// Screen shutting off; still showing the surface until docked.
    ReturningToShip { visit: Visit },
}

impl Phase {
    pub fn mode(&self) -> SceneMode {
        match self {
            Phase::Surface { .. } | Phase::Exiting { .. } | Phase::ReturningToShip { .. } => SceneMode::Surface,
            _ => SceneMode::Spaceship,
        }
    }

    pub fn target(&self) -> Option<&Target> {
        match self {
            Phase::CameraZooming { target } | Phase::Selected { target } | Phase::Warping { target, .. } => {
                Some(target)
            }
            _ => None,
        }
    }

    /// The current surface visit. `Warping` carries a visit too, but it is not
    /// current until landing.
    pub fn visit(&self) -> Option<&Visit> {
        match self {
            Phase::Surface { visit } | Phase::Exiting { visit } | Phase::ReturningToShip { visit } => Some(visit),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Exploring => "exploring",
            Phase::CameraZooming { .. } => "camera-zooming",
            Phase::Selected { .. } => "selected",
            Phase::Warping { .. } => "warping",
            Phase::Surface { .. } => "surface",
            Phase::Exiting { .. } => "exiting",
            Phase::ReturningToShip { .. } => "returning-to-ship",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_display() {
        assert_eq!(ObjectId::rocket("4").to_string(), "rocket:4");
        assert_eq!(ObjectId::new(ObjectKind::BackButton, "back").to_string(), "back:back");
    }

    #[test]
    fn warping_is_still_spaceship_mode() {
        let catalog = catalog::Catalog::builtin().unwrap();
        let planet = catalog.find_planet("4").unwrap().clone();
        let visit = Visit { planet, project: None };
        let target = Target {
            object: ObjectId::rocket("4"),
            planet_id: "4".into(),
        };
        let warping = Phase::Warping {
            target,
            visit: visit.clone(),
        };
        assert_eq!(warping.mode(), SceneMode::Spaceship);
        assert!(warping.visit().is_none());
        assert_eq!(Phase::Exiting { visit }.mode(), SceneMode::Surface);
    }
}
