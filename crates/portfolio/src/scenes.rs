//! Sub-scene mounting: spawns ship or surface entities into the world when the
//! director's mode changes, and runs their decorative motion.

use catalog::{Localized, Planet, Project, Rgb};
use engine_core::{Anchor, Float, Lifetime, Spin, Transform};
use glam::Vec3;
use hecs::{Entity, EntityBuilder, World};
use rand::Rng;

use crate::director::SceneDirector;
use crate::layout::{self, DeviceClass, HOLOGRAM_SIZE};
use crate::render::objects;
use crate::selectable::{Appearance, DrawFn, Selectable};
use crate::state::{ObjectKind, Phase, SceneMode};

const HOLOGRAM_GLOW: Rgb = Rgb::new(0, 255, 255);
const BACK_BUTTON_BODY: Rgb = Rgb::new(255, 71, 87);
const DUST_PUFFS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AstronautState {
    /// Descending from spawn height with a damped wobble.
    Landing { progress: f32 },
    Standing,
    /// Taking off, accelerating upward.
    Launching { progress: f32 },
}

/// The astronaut standing in for the visitor on a planet surface.
#[derive(Debug, Clone, Copy)]
pub struct Astronaut {
    pub state: AstronautState,
    /// Sideways tilt in radians.
    pub roll: f32,
}

impl Astronaut {
    pub fn landing() -> Self {
        Self {
            state: AstronautState::Landing { progress: 0.0 },
            roll: 0.0,
        }
    }

    pub fn launch(&mut self) {
        if !matches!(self.state, AstronautState::Launching { .. }) {
            self.state = AstronautState::Launching { progress: 0.0 };
        }
    }

    /// Advance and return the height above the ground.
    /// Reports touchdown through `touched_down` on the frame landing ends.
    pub fn step(&mut self, dt: f32, touched_down: &mut bool) -> f32 {
        match &mut self.state {
            AstronautState::Landing { progress } => {
                *progress += dt * 1.5;
                let t = (*progress / 2.0).min(1.0);
                let eased = 1.0 - (1.0 - t).powi(3);
                self.roll = (*progress * 8.0).sin() * 0.15 * (1.0 - eased);
                if t >= 1.0 {
                    self.state = AstronautState::Standing;
                    self.roll = 0.0;
                    *touched_down = true;
                }
                layout::ASTRONAUT_SPAWN_HEIGHT * (1.0 - eased)
            }
            AstronautState::Standing => 0.0,
            AstronautState::Launching { progress } => {
                *progress += dt * 2.0;
                self.roll = (*progress * 10.0).sin() * 0.1;
                progress.powi(2) * 3.0
            }
        }
    }
}

/// Short-lived dust kicked up at touchdown.
#[derive(Debug, Clone, Copy)]
pub struct Dust {
    pub velocity: Vec3,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
enum Mounted {
    Ship(DeviceClass),
    Surface(String),
}

/// Tracks which sub-scene is in the world.
#[derive(Debug, Default)]
pub struct SceneMount {
    mounted: Option<Mounted>,
}

impl SceneMount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remount if the director's scene differs from what is spawned.
    /// Returns true when the world was rebuilt.
    pub fn sync(&mut self, world: &mut World, director: &SceneDirector) -> bool {
        let wanted = match (director.mode(), director.current_planet()) {
            (SceneMode::Surface, Some(planet)) => Mounted::Surface(planet.id.clone()),
            _ => Mounted::Ship(director.layout().device),
        };
        if self.mounted.as_ref() == Some(&wanted) {
            return false;
        }

        world.clear();
        match &wanted {
            Mounted::Ship(_) => mount_ship(world, director),
            Mounted::Surface(_) => {
                if let Some(planet) = director.current_planet() {
                    mount_surface(world, planet, director.current_project());
                }
            }
        }
        log::info!("Mounted {:?} ({} entities)", wanted, world.len());
        self.mounted = Some(wanted);
        true
    }
}

fn mount_ship(world: &mut World, director: &SceneDirector) {
    let catalog = director.catalog();
    for (i, placement) in director.layout().placements().iter().enumerate() {
        let key = placement.id.key.as_str();
        let position = placement.position;
        let mut builder = EntityBuilder::new();
        builder.add(Transform::from_position(position)).add(Anchor(position));

        let selectable = match placement.id.kind {
            ObjectKind::Hologram => {
                let Some(planet) = catalog.find_planet(key) else { continue };
                builder.add(Float::new(0.05, 0.5, i as f32 * 0.7));
                let label = catalog
                    .project_for_planet(planet)
                    .map_or_else(|| planet.name.clone(), |p| p.title.clone());
                Selectable {
                    id: placement.id.clone(),
                    radius: HOLOGRAM_SIZE.0 * 0.5,
                    appearance: Appearance::new(planet.environment.ground, HOLOGRAM_GLOW),
                    draw: objects::draw_hologram,
                    label: Some(label),
                }
            }
            ObjectKind::Rocket => {
                let Some(capsule) = catalog.find_capsule(key) else { continue };
                builder.add(Float::new(0.1, 0.3, i as f32 * 0.9));
                Selectable {
                    id: placement.id.clone(),
                    radius: placement.extent,
                    appearance: Appearance::new(capsule.color, capsule.glow),
                    draw: objects::draw_rocket,
                    label: Some(capsule.label.clone()),
                }
            }
            ObjectKind::Planet => {
                let Some(planet) = catalog.find_planet(key) else { continue };
                builder.add(Spin::new(planet.spin_per_second()));
                let mut appearance = Appearance::new(planet.environment.ground, planet.environment.fog);
                appearance.ring = planet.has_ring;
                Selectable {
                    id: placement.id.clone(),
                    radius: placement.extent,
                    appearance,
                    draw: objects::draw_planet,
                    label: Some(planet.name.clone()),
                }
            }
            ObjectKind::Flag | ObjectKind::BackButton => continue,
        };
        builder.add(selectable);
        world.spawn(builder.build());
    }
}

fn mount_surface(world: &mut World, planet: &Planet, project: Option<&Project>) {
    let env = &planet.environment;
    for placement in layout::surface_placements() {
        let (appearance, draw, label): (Appearance, DrawFn, Localized) = match (placement.id.kind, project) {
            (ObjectKind::Flag, Some(project)) => (
                Appearance::new(env.particle, env.ambient),
                objects::draw_flag,
                project.title.clone(),
            ),
            (ObjectKind::BackButton, _) => (
                Appearance::new(BACK_BUTTON_BODY, Rgb::WHITE),
                objects::draw_back_button,
                Localized::new("우주선으로", "Back to Ship"),
            ),
            _ => continue,
        };
        // Flags stand on the ground; the pole reaches up by its extent.
        let position = match placement.id.kind {
            ObjectKind::Flag => placement.position + Vec3::Y * placement.extent,
            _ => placement.position,
        };
        world.spawn((
            Transform::from_position(position),
            Anchor(position),
            Float::new(0.05, 0.4, 0.0),
            Selectable {
                id: placement.id,
                radius: placement.extent,
                appearance,
                draw,
                label: Some(label),
            },
        ));
    }

    world.spawn((
        Transform::from_position(layout::SURFACE_ASTRONAUT + Vec3::Y * layout::ASTRONAUT_SPAWN_HEIGHT),
        Astronaut::landing(),
    ));
}

/// Per-frame decorative motion. `time` is seconds since start.
pub fn animate(world: &mut World, director: &SceneDirector, dt: f32, time: f32) {
    for (_, (transform, anchor, float)) in world.query_mut::<(&mut Transform, &Anchor, &Float)>() {
        transform.position = anchor.0 + float.offset(time);
    }
    for (_, (transform, spin)) in world.query_mut::<(&mut Transform, &Spin)>() {
        transform.rotate_y(spin.speed * dt);
    }

    let leaving = matches!(director.phase(), Phase::Exiting { .. } | Phase::ReturningToShip { .. });
    let mut touchdowns = Vec::new();
    for (_, (transform, astronaut)) in world.query_mut::<(&mut Transform, &mut Astronaut)>() {
        if leaving {
            astronaut.launch();
        }
        let mut touched_down = false;
        let height = astronaut.step(dt, &mut touched_down);
        transform.position = layout::SURFACE_ASTRONAUT + Vec3::Y * height;
        if touched_down {
            touchdowns.push(transform.position);
        }
    }

    if let Some(planet) = director.current_planet() {
        for at in touchdowns {
            spawn_dust(world, at, planet.environment.particle);
        }
    }

    let mut expired: Vec<Entity> = Vec::new();
    for (entity, (transform, dust, lifetime)) in world.query_mut::<(&mut Transform, &mut Dust, &mut Lifetime)>() {
        transform.position += dust.velocity * dt;
        dust.velocity *= (1.0 - 2.5 * dt).max(0.0);
        if lifetime.update(dt) {
            expired.push(entity);
        }
    }
    for entity in expired {
        let _ = world.despawn(entity);
    }
}

fn spawn_dust(world: &mut World, at: Vec3, color: Rgb) {
    let mut rng = rand::thread_rng();
    for i in 0..DUST_PUFFS {
        let angle = i as f32 / DUST_PUFFS as f32 * std::f32::consts::TAU;
        let speed = rng.gen_range(1.0..2.5);
        let velocity = Vec3::new(angle.cos() * speed, rng.gen_range(0.2..0.8), angle.sin() * speed);
        world.spawn((
            Transform::from_position_scale(at, rng.gen_range(0.15..0.35)),
            Dust { velocity, color },
            Lifetime::new(rng.gen_range(0.6..1.2)),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PortfolioConfig;
    use crate::director::SceneEvent;
    use crate::state::ObjectId;
    use catalog::Catalog;

    fn director() -> SceneDirector {
        SceneDirector::with_seed(
            Catalog::builtin().unwrap(),
            &PortfolioConfig::default(),
            DeviceClass::Desktop,
            1,
        )
    }

    #[test]
    fn ship_mounts_every_placement_once() {
        let d = director();
        let mut world = World::new();
        let mut mount = SceneMount::new();
        assert!(mount.sync(&mut world, &d));
        assert_eq!(world.query::<&Selectable>().iter().count(), 27);
        assert!(!mount.sync(&mut world, &d));
    }

    #[test]
    fn surface_mounts_flag_button_and_astronaut() {
        let mut d = director();
        let holo = ObjectId::hologram("4");
        d.reduce(SceneEvent::Select(holo.clone()));
        d.reduce(SceneEvent::Enter(holo));
        for _ in 0..200 {
            d.update(1.0 / 60.0);
        }
        assert_eq!(d.mode(), SceneMode::Surface);

        let mut world = World::new();
        let mut mount = SceneMount::new();
        assert!(mount.sync(&mut world, &d));
        let kinds: Vec<ObjectKind> = world.query::<&Selectable>().iter().map(|(_, s)| s.id.kind).collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&ObjectKind::Flag));
        let flag_label = world
            .query::<&Selectable>()
            .iter()
            .find(|(_, s)| s.id.kind == ObjectKind::Flag)
            .and_then(|(_, s)| s.label.clone());
        assert_eq!(flag_label, d.current_project().map(|p| p.title.clone()));
        assert_eq!(world.query::<&Astronaut>().iter().count(), 1);
    }

    #[test]
    fn astronaut_touches_down_without_overshoot() {
        let mut astronaut = Astronaut::landing();
        let mut touched = false;
        let mut last = f32::MAX;
        let mut frames = 0;
        while !touched {
            let h = astronaut.step(1.0 / 60.0, &mut touched);
            assert!(h <= last + 1e-5 && h >= 0.0);
            last = h;
            frames += 1;
            assert!(frames < 200);
        }
        // progress reaches 2.0 at 1.5 per second
        assert!((frames as f32 / 60.0 - 4.0 / 3.0).abs() < 0.05);
        assert_eq!(astronaut.roll, 0.0);
    }

    #[test]
    fn launch_climbs() {
        let mut astronaut = Astronaut::landing();
        astronaut.launch();
        let mut touched = false;
        let a = astronaut.step(0.1, &mut touched);
        let b = astronaut.step(0.1, &mut touched);
        assert!(b > a);
        assert!(!touched);
    }

    #[test]
    fn dust_expires() {
        let d = director();
        let mut world = World::new();
        spawn_dust(&mut world, Vec3::ZERO, Rgb::WHITE);
        assert_eq!(world.len() as usize, DUST_PUFFS);
        for _ in 0..120 {
            animate(&mut world, &d, 1.0 / 60.0, 0.0);
        }
        assert_eq!(world.len(), 0);
    }
}
