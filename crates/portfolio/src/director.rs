//! Scene orchestration: one reducer over [`SceneEvent`]s owning the phase,
//! camera rig, transition overlays and the active multi-stage sequence.

use catalog::{Catalog, Language, Planet, Project};
use glam::{Vec2, Vec3};

use crate::camera_rig::{CameraRig, Pose};
use crate::config::{CameraConfig, PortfolioConfig, TimingConfig};
use crate::layout::{self, DeviceClass, ShipLayout};
use crate::selectable;
use crate::sequence::{Cue, Sequence};
use crate::state::{ObjectId, ObjectKind, Phase, SceneMode, Target, Visit};
use crate::transitions::{OverlayKind, Transitions};

#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Pointer moved onto an object, or off everything.
    Hover(Option<ObjectId>),
    /// Pointer click on an object; resolved to one of the events below.
    Click(ObjectId),
    Select(ObjectId),
    Enter(ObjectId),
    /// Keyboard confirm: enter the current selection.
    ConfirmSelection,
    OpenDetail,
    CloseDetail,
    Back,
    Escape,
    CameraSettled,
    OverlayFinished(OverlayKind),
    Cue(Cue),
}

pub struct SceneDirector {
    catalog: Catalog,
    timing: TimingConfig,
    camera: CameraConfig,
    layout: ShipLayout,
    phase: Phase,
    hovered: Option<ObjectId>,
    detail: Option<Project>,
    rig: CameraRig,
    transitions: Transitions,
    sequence: Option<Sequence>,
    /// Bumped whenever a sequence starts or is dropped.
    sequence_generation: u64,
    language: Language,
}

impl SceneDirector {
    pub fn new(catalog: Catalog, config: &PortfolioConfig, device: DeviceClass) -> Self {
        Self::with_seed(catalog, config, device, rand::random())
    }

    /// Same as [`SceneDirector::new`] with a fixed warp-field seed.
    pub fn with_seed(catalog: Catalog, config: &PortfolioConfig, device: DeviceClass, seed: u64) -> Self {
        let layout = ShipLayout::new(&catalog, device);
        let home = layout::ship_home(&config.camera, device);
        Self {
            catalog,
            timing: config.timing,
            camera: config.camera,
            layout,
            phase: Phase::Exploring,
            hovered: None,
            detail: None,
            rig: CameraRig::new(home, config.camera.convergence_rate, config.camera.settle_threshold),
            transitions: Transitions::new(&config.timing, seed),
            sequence: None,
            sequence_generation: 0,
            language: config.language,
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> SceneMode {
        self.phase.mode()
    }

    pub fn hovered(&self) -> Option<&ObjectId> {
        self.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&ObjectId> {
        self.phase.target().map(|t| &t.object)
    }

    pub fn selected_planet_id(&self) -> Option<&str> {
        self.phase.target().map(|t| t.planet_id.as_str())
    }

    pub fn current_planet(&self) -> Option<&Planet> {
        self.phase.visit().map(|v| &v.planet)
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.phase.visit().and_then(|v| v.project.as_ref())
    }

    /// Project shown in the detail overlay.
    pub fn detail(&self) -> Option<&Project> {
        self.detail.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &ShipLayout {
        &self.layout
    }

    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    pub fn is_overlay_active(&self, kind: OverlayKind) -> bool {
        self.transitions.is_active(kind)
    }

    pub fn has_sequence(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn fov(&self) -> f32 {
        self.camera.fov(self.layout.device)
    }

    /// Camera pose to render with, including warp shake.
    pub fn camera_pose(&self) -> Pose {
        let pose = self.rig.pose();
        let shake = self.transitions.warp.shake_offset();
        let offset = Vec3::new(shake.x, shake.y, 0.0);
        Pose::new(pose.position + offset, pose.look_at + offset)
    }

    /// Pointer input is accepted for ship objects.
    fn ship_pointer_blocked(&self) -> bool {
        self.transitions.any_active()
            || self.detail.is_some()
            || !matches!(
                self.phase,
                Phase::Exploring | Phase::CameraZooming { .. } | Phase::Selected { .. }
            )
    }

    // ── Settings ────────────────────────────────────────────────────────────

    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            log::info!("Language: {}", language.code());
            self.language = language;
        }
    }

    pub fn toggle_language(&mut self) {
        self.set_language(self.language.toggled());
    }

    /// Re-layout the ship for a new viewport class.
    pub fn set_device(&mut self, device: DeviceClass) {
        if device == self.layout.device {
            return;
        }
        log::info!("Device profile: {:?}", device);
        self.layout = ShipLayout::new(&self.catalog, device);
        if self.rig.is_orbiting() {
            self.rig.start_orbit(layout::surface_orbit(&self.camera, device));
        }
        if self.mode() == SceneMode::Spaceship {
            self.rig.set_home(layout::ship_home(&self.camera, device));
            match self.phase.target().and_then(|t| self.layout.focus_pose(&t.object, &self.camera)) {
                Some(pose) => self.rig.focus(pose),
                None => self.rig.release(),
            }
        }
    }

    /// Surface camera input: `drag` in pixels, `scroll` in wheel lines.
    /// Ignored outside a settled surface visit and while the detail card is up.
    pub fn orbit(&mut self, drag: Vec2, scroll: f32, viewport_height: f32) {
        if !matches!(self.phase, Phase::Surface { .. }) || self.detail.is_some() || self.transitions.any_active() {
            return;
        }
        if let Some(orbit) = self.rig.orbit_mut() {
            if drag != Vec2::ZERO {
                orbit.rotate(drag, viewport_height);
            }
            if scroll != 0.0 {
                orbit.zoom(scroll);
            }
        }
    }

    // ── Frame ───────────────────────────────────────────────────────────────

    /// Advance one frame: sequence timers, then camera, then overlays.
    pub fn update(&mut self, dt: f32) {
        if let Some(sequence) = &mut self.sequence {
            let cues = sequence.tick(dt);
            let generation = self.sequence_generation;
            for cue in cues {
                if self.sequence_generation != generation {
                    break;
                }
                self.reduce(SceneEvent::Cue(cue));
            }
        }

        if self.rig.update(dt) {
            self.reduce(SceneEvent::CameraSettled);
        }

        for kind in self.transitions.update(dt) {
            self.reduce(SceneEvent::OverlayFinished(kind));
        }

        if self.sequence.as_ref().is_some_and(Sequence::is_finished) {
            self.sequence = None;
        }
    }

    // ── Reducer ─────────────────────────────────────────────────────────────

    pub fn reduce(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::Hover(id) => {
                if self.transitions.any_active() || self.detail.is_some() {
                    return;
                }
                self.hovered = id;
            }
            SceneEvent::Click(id) => {
                if self.transitions.any_active() || self.detail.is_some() {
                    log::debug!("Click on {} ignored", id);
                    return;
                }
                let resolved = selectable::resolve_click(id, self.selected());
                self.reduce(resolved);
            }
            SceneEvent::Select(id) | SceneEvent::Enter(id) => {
                if self.ship_pointer_blocked() || !id.kind.in_ship() {
                    log::debug!("Select {} ignored in {}", id, self.phase.name());
                    return;
                }
                if self.selected() == Some(&id) {
                    self.enter(id);
                } else {
                    self.select(id);
                }
            }
            SceneEvent::ConfirmSelection => {
                if let Some(id) = self.selected().cloned() {
                    self.reduce(SceneEvent::Enter(id));
                }
            }
            SceneEvent::OpenDetail => self.open_detail(),
            SceneEvent::CloseDetail => {
                if self.detail.take().is_some() {
                    log::info!("Detail closed");
                }
            }
            SceneEvent::Back => {
                if self.detail.is_some() {
                    self.reduce(SceneEvent::CloseDetail);
                } else {
                    self.begin_exit();
                }
            }
            SceneEvent::Escape => {
                if self.detail.is_some() {
                    self.reduce(SceneEvent::CloseDetail);
                } else if matches!(self.phase, Phase::Surface { .. }) {
                    self.begin_exit();
                } else if matches!(self.phase, Phase::CameraZooming { .. } | Phase::Selected { .. }) {
                    self.clear_selection();
                }
            }
            SceneEvent::CameraSettled => {
                if let Phase::CameraZooming { target } = &self.phase {
                    log::debug!("Camera settled on {}", target.object);
                    self.phase = Phase::Selected { target: target.clone() };
                }
            }
            SceneEvent::OverlayFinished(kind) => {
                log::debug!("Overlay {:?} finished", kind);
                let cue = self.sequence.as_mut().and_then(|s| s.signal(kind));
                if let Some(cue) = cue {
                    self.reduce(SceneEvent::Cue(cue));
                }
            }
            SceneEvent::Cue(cue) => self.apply_cue(cue),
        }
    }

    /// Planet an object leads to, if it is selectable and placed.
    fn resolve_target(&self, id: &ObjectId) -> Option<Target> {
        let planet_id = match id.kind {
            ObjectKind::Hologram | ObjectKind::Planet => self.catalog.find_planet(&id.key)?.id.clone(),
            ObjectKind::Rocket => self.catalog.find_capsule(&id.key)?.target_planet_id.clone(),
            ObjectKind::Flag | ObjectKind::BackButton => return None,
        };
        Some(Target {
            object: id.clone(),
            planet_id,
        })
    }

    fn select(&mut self, id: ObjectId) {
        let Some(target) = self.resolve_target(&id) else {
            log::warn!("Select: unknown object {}", id);
            return;
        };
        let Some(pose) = self.layout.focus_pose(&id, &self.camera) else {
            log::warn!("Select: {} has no placement", id);
            return;
        };
        log::info!("Selected {} (planet {})", id, target.planet_id);
        self.hovered = Some(id);
        self.rig.focus(pose);
        self.phase = Phase::CameraZooming { target };
    }

    fn clear_selection(&mut self) {
        log::info!("Selection cleared");
        self.phase = Phase::Exploring;
        self.rig.release();
    }

    fn enter(&mut self, id: ObjectId) {
        let Some(target) = self.phase.target().filter(|t| t.object == id).cloned() else {
            return;
        };
        let Some(planet) = self.catalog.find_planet(&target.planet_id).cloned() else {
            log::warn!("Enter: planet {} not in catalog", target.planet_id);
            return;
        };
        let project = self.visit_project(&target, &planet);
        log::info!(
            "Warping to {} ({})",
            planet.name.get(self.language),
            project.as_ref().map_or("no project", |p| p.title.get(self.language))
        );

        self.phase = Phase::Warping {
            target,
            visit: Visit { planet, project },
        };
        self.transitions.start(OverlayKind::Warp);
        self.start_sequence(
            Sequence::new()
                .then_on(OverlayKind::Warp, Some(Cue::Land))
                .then_after(self.timing.turnon_delay, Cue::BeginTurnon),
        );
    }

    /// A rocket may carry its own project; otherwise the planet's.
    fn visit_project(&self, target: &Target, planet: &Planet) -> Option<Project> {
        let from_rocket = match target.object.kind {
            ObjectKind::Rocket => self
                .catalog
                .find_capsule(&target.object.key)
                .and_then(|c| c.project_id.as_deref())
                .and_then(|id| self.catalog.find_project(id)),
            _ => None,
        };
        from_rocket.or_else(|| self.catalog.project_for_planet(planet)).cloned()
    }

    fn open_detail(&mut self) {
        let Phase::Surface { visit } = &self.phase else {
            log::debug!("Detail unavailable in {}", self.phase.name());
            return;
        };
        match &visit.project {
            Some(project) => {
                log::info!("Detail opened: {}", project.title.get(self.language));
                self.detail = Some(project.clone());
            }
            None => log::debug!("Planet {} has no project", visit.planet.id),
        }
    }

    fn begin_exit(&mut self) {
        let Phase::Surface { visit } = &self.phase else {
            log::debug!("Back ignored in {}", self.phase.name());
            return;
        };
        if self.is_overlay_active(OverlayKind::Warp) || self.is_overlay_active(OverlayKind::TvShutoff) {
            log::debug!("Back ignored while an overlay is running");
            return;
        }
        if self.is_overlay_active(OverlayKind::TvTurnon) {
            log::debug!("Turn-on cut short");
            self.transitions.turnon.stop();
        }
        log::info!("Leaving {}", visit.planet.name.get(self.language));
        self.phase = Phase::Exiting { visit: visit.clone() };
        self.detail = None;
        self.hovered = None;
        self.start_sequence(
            Sequence::new()
                .then_after(self.timing.launch, Cue::BeginShutoff)
                .then_on(OverlayKind::TvShutoff, None)
                .then_after(self.timing.shutoff_hold, Cue::DockAtShip)
                .then_after(self.timing.turnon_delay, Cue::BeginTurnon),
        );
    }

    fn start_sequence(&mut self, sequence: Sequence) {
        self.sequence = Some(sequence);
        self.sequence_generation += 1;
    }

    fn abort_sequence(&mut self, cue: Cue) {
        log::warn!("{:?} does not apply in {}; dropping sequence", cue, self.phase.name());
        self.sequence = None;
        self.sequence_generation += 1;
    }

    fn apply_cue(&mut self, cue: Cue) {
        match cue {
            Cue::Land => {
                let Phase::Warping { visit, .. } = &self.phase else {
                    return self.abort_sequence(cue);
                };
                let visit = visit.clone();
                log::info!("Landed on {}", visit.planet.name.get(self.language));
                self.phase = Phase::Surface { visit };
                self.hovered = None;
                self.rig.set_home(layout::surface_home());
                self.rig.snap_home();
                self.rig.start_orbit(layout::surface_orbit(&self.camera, self.layout.device));
            }
            Cue::BeginShutoff => {
                let Phase::Exiting { visit } = &self.phase else {
                    return self.abort_sequence(cue);
                };
                let visit = visit.clone();
                self.phase = Phase::ReturningToShip { visit };
                self.transitions.start(OverlayKind::TvShutoff);
            }
            Cue::DockAtShip => {
                if !matches!(self.phase, Phase::ReturningToShip { .. }) {
                    return self.abort_sequence(cue);
                }
                log::info!("Docked at ship");
                self.phase = Phase::Exploring;
                self.detail = None;
                self.hovered = None;
                self.rig.set_home(layout::ship_home(&self.camera, self.layout.device));
                self.rig.snap_home();
            }
            Cue::BeginTurnon => {
                if !matches!(self.phase, Phase::Surface { .. } | Phase::Exploring)
                    || self.transitions.is_active(OverlayKind::Warp)
                {
                    return self.abort_sequence(cue);
                }
                self.transitions.shutoff.release();
                self.transitions.start(OverlayKind::TvTurnon);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn ship_home() -> Pose {
        layout::ship_home(&CameraConfig::default(), DeviceClass::Desktop)
    }

    fn director() -> SceneDirector {
        let catalog = Catalog::builtin().unwrap();
        SceneDirector::with_seed(catalog, &PortfolioConfig::default(), DeviceClass::Desktop, 42)
    }

    /// Step frames until `done` holds, checking invariants on every frame.
    fn run_until(d: &mut SceneDirector, max_seconds: f32, done: impl Fn(&SceneDirector) -> bool) {
        let mut t = 0.0;
        while !done(d) {
            assert!(t < max_seconds, "condition not reached in {}s (phase {})", max_seconds, d.phase().name());
            d.update(DT);
            assert_invariants(d);
            t += DT;
        }
    }

    fn assert_invariants(d: &SceneDirector) {
        assert_eq!(d.mode() == SceneMode::Surface, d.current_planet().is_some());
        let warp = d.is_overlay_active(OverlayKind::Warp);
        let shutoff = d.is_overlay_active(OverlayKind::TvShutoff);
        let turnon = d.is_overlay_active(OverlayKind::TvTurnon);
        assert!(!(warp && shutoff));
        assert!(!(turnon && warp));
    }

    fn land_on_mars(d: &mut SceneDirector) {
        let rocket = ObjectId::rocket("4");
        d.reduce(SceneEvent::Click(rocket.clone()));
        run_until(d, 5.0, |d| matches!(d.phase(), Phase::Selected { .. }));
        d.reduce(SceneEvent::Click(rocket));
        run_until(d, 10.0, |d| d.mode() == SceneMode::Surface && !d.transitions().any_active());
    }

    #[test]
    fn select_then_enter_lands_on_planet() {
        let mut d = director();
        let rocket = ObjectId::rocket("4");

        d.reduce(SceneEvent::Select(rocket.clone()));
        assert_eq!(d.hovered(), Some(&rocket));
        assert_eq!(d.selected(), Some(&rocket));
        assert_eq!(d.selected_planet_id(), Some("4"));
        assert!(matches!(d.phase(), Phase::CameraZooming { .. }));
        assert_ne!(d.camera_pose(), ship_home());

        run_until(&mut d, 5.0, |d| matches!(d.phase(), Phase::Selected { .. }));

        d.reduce(SceneEvent::Enter(rocket.clone()));
        assert!(d.is_overlay_active(OverlayKind::Warp));
        assert_eq!(d.mode(), SceneMode::Spaceship);

        run_until(&mut d, 4.0, |d| d.mode() == SceneMode::Surface);
        assert_eq!(d.current_planet().map(|p| p.id.as_str()), Some("4"));
        assert_eq!(d.current_project().map(|p| p.id.as_str()), Some("4"));
        assert_eq!(d.selected_planet_id(), None);
        assert!(!d.is_overlay_active(OverlayKind::Warp));

        run_until(&mut d, 1.0, |d| d.is_overlay_active(OverlayKind::TvTurnon));
        run_until(&mut d, 2.0, |d| !d.transitions().any_active());
        assert!(!d.has_sequence());
    }

    #[test]
    fn second_enter_during_warp_is_ignored() {
        let mut d = director();
        let rocket = ObjectId::rocket("4");
        d.reduce(SceneEvent::Select(rocket.clone()));
        d.reduce(SceneEvent::Enter(rocket.clone()));
        assert!(matches!(d.phase(), Phase::Warping { .. }));

        d.update(1.0);
        let before = d.transitions().warp.timeline().elapsed();
        d.reduce(SceneEvent::Enter(rocket.clone()));
        d.reduce(SceneEvent::Click(rocket));
        d.reduce(SceneEvent::ConfirmSelection);
        assert_eq!(d.transitions().warp.timeline().elapsed(), before);

        let mut lands = 0;
        for _ in 0..400 {
            let was_warping = matches!(d.phase(), Phase::Warping { .. });
            d.update(DT);
            if was_warping && d.mode() == SceneMode::Surface {
                lands += 1;
            }
        }
        assert_eq!(lands, 1);
    }

    #[test]
    fn escape_closes_detail_before_leaving_surface() {
        let mut d = director();
        land_on_mars(&mut d);

        let flag = ObjectId::new(ObjectKind::Flag, "flag");
        d.reduce(SceneEvent::Click(flag));
        assert_eq!(d.detail().map(|p| p.id.as_str()), Some("4"));

        d.reduce(SceneEvent::Escape);
        assert!(d.detail().is_none());
        assert!(matches!(d.phase(), Phase::Surface { .. }));

        d.reduce(SceneEvent::Escape);
        assert!(matches!(d.phase(), Phase::Exiting { .. }));
    }

    #[test]
    fn escape_in_ship_clears_selection() {
        let mut d = director();
        d.reduce(SceneEvent::Select(ObjectId::hologram("3")));
        d.reduce(SceneEvent::Escape);
        assert_eq!(d.phase(), &Phase::Exploring);
        assert_eq!(d.selected_planet_id(), None);
        run_until(&mut d, 5.0, |d| d.camera_pose() == ship_home());
    }

    #[test]
    fn back_round_trip_returns_to_ship() {
        let mut d = director();
        land_on_mars(&mut d);

        d.reduce(SceneEvent::Click(ObjectId::new(ObjectKind::BackButton, "back")));
        assert!(matches!(d.phase(), Phase::Exiting { .. }));
        // Still on the surface while the astronaut launches and the screen shuts off.
        assert_eq!(d.mode(), SceneMode::Surface);

        run_until(&mut d, 2.0, |d| d.is_overlay_active(OverlayKind::TvShutoff));
        assert!(matches!(d.phase(), Phase::ReturningToShip { .. }));

        run_until(&mut d, 3.0, |d| d.mode() == SceneMode::Spaceship);
        assert!(d.current_planet().is_none());
        assert!(d.current_project().is_none());
        assert_eq!(d.phase(), &Phase::Exploring);

        run_until(&mut d, 3.0, |d| !d.transitions().any_active() && !d.has_sequence());
        assert_eq!(d.camera_pose(), ship_home());
    }

    #[test]
    fn enter_acts_as_select_on_unselected_object() {
        let mut d = director();
        let holo = ObjectId::hologram("2");
        d.reduce(SceneEvent::Enter(holo.clone()));
        assert!(matches!(d.phase(), Phase::CameraZooming { .. }));
        assert_eq!(d.selected(), Some(&holo));
    }

    #[test]
    fn unknown_object_is_a_no_op() {
        let mut d = director();
        d.reduce(SceneEvent::Select(ObjectId::rocket("42")));
        d.update(DT);
        assert_eq!(d.phase(), &Phase::Exploring);
        assert_eq!(d.camera_pose(), ship_home());
    }

    #[test]
    fn surface_objects_cannot_be_selected_in_ship() {
        let mut d = director();
        d.reduce(SceneEvent::Select(ObjectId::new(ObjectKind::Flag, "flag")));
        d.reduce(SceneEvent::OpenDetail);
        assert_eq!(d.phase(), &Phase::Exploring);
        assert!(d.detail().is_none());
    }

    #[test]
    fn moon_has_no_detail() {
        let mut d = director();
        let moon = ObjectId::hologram("0");
        d.reduce(SceneEvent::Select(moon.clone()));
        d.reduce(SceneEvent::Enter(moon));
        run_until(&mut d, 10.0, |d| d.mode() == SceneMode::Surface && !d.transitions().any_active());
        assert!(d.current_project().is_none());
        d.reduce(SceneEvent::OpenDetail);
        assert!(d.detail().is_none());
    }

    #[test]
    fn stale_cue_drops_sequence() {
        let mut d = director();
        d.start_sequence(Sequence::new().then_after(0.0, Cue::DockAtShip));
        d.update(DT);
        assert_eq!(d.phase(), &Phase::Exploring);
        assert!(!d.has_sequence());
        assert!(!d.transitions().any_active());
    }

    #[test]
    fn escape_right_after_landing_leaves_the_surface() {
        let mut d = director();
        let rocket = ObjectId::rocket("4");
        d.reduce(SceneEvent::Select(rocket.clone()));
        d.reduce(SceneEvent::Enter(rocket));
        run_until(&mut d, 4.0, |d| d.mode() == SceneMode::Surface);

        // Before the turn-on starts.
        d.reduce(SceneEvent::Escape);
        assert!(matches!(d.phase(), Phase::Exiting { .. }));
        run_until(&mut d, 5.0, |d| d.phase() == &Phase::Exploring);
        run_until(&mut d, 3.0, |d| !d.transitions().any_active() && !d.has_sequence());
    }

    #[test]
    fn back_during_turn_on_cuts_it_short() {
        let mut d = director();
        let rocket = ObjectId::rocket("4");
        d.reduce(SceneEvent::Select(rocket.clone()));
        d.reduce(SceneEvent::Enter(rocket));
        run_until(&mut d, 5.0, |d| d.is_overlay_active(OverlayKind::TvTurnon));
        assert_eq!(d.mode(), SceneMode::Surface);

        d.reduce(SceneEvent::Back);
        assert!(matches!(d.phase(), Phase::Exiting { .. }));
        assert!(!d.is_overlay_active(OverlayKind::TvTurnon));

        run_until(&mut d, 2.0, |d| d.is_overlay_active(OverlayKind::TvShutoff));
        run_until(&mut d, 3.0, |d| d.mode() == SceneMode::Spaceship);
        run_until(&mut d, 3.0, |d| !d.transitions().any_active() && !d.has_sequence());
        assert_eq!(d.phase(), &Phase::Exploring);
    }

    #[test]
    fn exit_keys_do_not_restart_the_return_trip() {
        let mut d = director();
        land_on_mars(&mut d);
        d.reduce(SceneEvent::Back);
        let generation = d.sequence_generation;

        d.reduce(SceneEvent::Escape);
        d.reduce(SceneEvent::Back);
        assert!(matches!(d.phase(), Phase::Exiting { .. }));
        assert_eq!(d.sequence_generation, generation);

        run_until(&mut d, 2.0, |d| matches!(d.phase(), Phase::ReturningToShip { .. }));
        d.reduce(SceneEvent::Escape);
        d.reduce(SceneEvent::Back);
        assert!(matches!(d.phase(), Phase::ReturningToShip { .. }));
        assert_eq!(d.sequence_generation, generation);

        run_until(&mut d, 3.0, |d| d.phase() == &Phase::Exploring);
        run_until(&mut d, 3.0, |d| !d.transitions().any_active() && !d.has_sequence());
    }

    #[test]
    fn escape_during_warp_is_ignored() {
        let mut d = director();
        let holo = ObjectId::hologram("3");
        d.reduce(SceneEvent::Select(holo.clone()));
        d.reduce(SceneEvent::Enter(holo.clone()));
        d.update(0.5);
        let generation = d.sequence_generation;

        d.reduce(SceneEvent::Escape);
        d.reduce(SceneEvent::Back);
        assert!(matches!(d.phase(), Phase::Warping { .. }));
        assert!(d.is_overlay_active(OverlayKind::Warp));
        assert_eq!(d.selected(), Some(&holo));
        assert_eq!(d.sequence_generation, generation);

        run_until(&mut d, 4.0, |d| d.mode() == SceneMode::Surface);
        assert_eq!(d.current_planet().map(|p| p.id.as_str()), Some("3"));
    }

    #[test]
    fn device_change_refocuses_the_selection() {
        let mut d = director();
        let holo = ObjectId::hologram("3");
        d.reduce(SceneEvent::Select(holo.clone()));
        run_until(&mut d, 5.0, |d| matches!(d.phase(), Phase::Selected { .. }));

        d.set_device(DeviceClass::Mobile);
        let camera = CameraConfig::default();
        let mobile = d.layout().focus_pose(&holo, &camera).unwrap();
        assert_eq!(d.rig.goal(), mobile);
        assert_eq!(d.selected(), Some(&holo));
        assert_eq!(d.fov(), 75.0);

        run_until(&mut d, 5.0, |d| d.camera_pose() == mobile);
        assert!(matches!(d.phase(), Phase::Selected { .. }));

        d.reduce(SceneEvent::Escape);
        run_until(&mut d, 5.0, |d| d.camera_pose() == layout::ship_home(&camera, DeviceClass::Mobile));
    }

    #[test]
    fn rocket_brings_its_own_project() {
        let mut catalog = Catalog::builtin().unwrap();
        let moon_rocket = catalog.capsules.iter_mut().find(|c| c.id == "0").unwrap();
        moon_rocket.project_id = Some("2".into());
        let mut d = SceneDirector::with_seed(catalog, &PortfolioConfig::default(), DeviceClass::Desktop, 7);

        let rocket = ObjectId::rocket("0");
        d.reduce(SceneEvent::Select(rocket.clone()));
        d.reduce(SceneEvent::Enter(rocket));
        run_until(&mut d, 4.0, |d| d.mode() == SceneMode::Surface);
        assert_eq!(d.current_planet().map(|p| p.id.as_str()), Some("0"));
        assert_eq!(d.current_project().map(|p| p.id.as_str()), Some("2"));
    }

    #[test]
    fn rejected_hover_is_sent_again_once_overlays_finish() {
        let mut d = director();
        let rocket = ObjectId::rocket("4");
        d.reduce(SceneEvent::Select(rocket.clone()));
        d.reduce(SceneEvent::Enter(rocket));
        run_until(&mut d, 5.0, |d| d.is_overlay_active(OverlayKind::TvTurnon));

        let flag = ObjectId::new(ObjectKind::Flag, "flag");
        let event = selectable::hover_change(Some(&flag), d.hovered()).unwrap();
        d.reduce(event);
        assert_eq!(d.hovered(), None);

        run_until(&mut d, 2.0, |d| !d.transitions().any_active());
        let event = selectable::hover_change(Some(&flag), d.hovered()).unwrap();
        d.reduce(event);
        assert_eq!(d.hovered(), Some(&flag));
        assert_eq!(selectable::hover_change(Some(&flag), d.hovered()), None);
    }

    #[test]
    fn surface_orbit_follows_drag_only_when_idle() {
        let mut d = director();
        land_on_mars(&mut d);
        let rest = d.camera_pose();
        assert_eq!(rest.look_at, layout::SURFACE_LOOK_AT);

        d.reduce(SceneEvent::OpenDetail);
        d.orbit(Vec2::new(200.0, 0.0), 2.0, 720.0);
        d.update(DT);
        assert_eq!(d.camera_pose(), rest);

        d.reduce(SceneEvent::CloseDetail);
        d.orbit(Vec2::new(200.0, 0.0), 2.0, 720.0);
        run_until(&mut d, 10.0, |d| d.camera_pose().position.distance(d.rig.goal().position) < 1e-3);
        let moved = d.camera_pose();
        assert_eq!(moved.look_at, layout::SURFACE_LOOK_AT);
        assert!(moved.position.distance(rest.position) > 1.0);
        // Zooming in moves closer to the flag.
        assert!(moved.position.distance(moved.look_at) < rest.position.distance(rest.look_at));
    }

    #[test]
    fn pointer_ignored_while_detail_open() {
        let mut d = director();
        land_on_mars(&mut d);
        d.reduce(SceneEvent::OpenDetail);
        d.reduce(SceneEvent::Click(ObjectId::new(ObjectKind::BackButton, "back")));
        assert!(matches!(d.phase(), Phase::Surface { .. }));
        assert!(d.detail().is_some());
        d.reduce(SceneEvent::Back);
        assert!(d.detail().is_none());
        assert!(matches!(d.phase(), Phase::Surface { .. }));
    }
}
