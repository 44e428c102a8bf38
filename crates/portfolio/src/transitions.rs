//! Full-screen transition overlays: warp streaks, TV shutoff and TV turn-on.
//!
//! Each overlay runs a fixed-duration [`Timeline`] measured from activation and
//! reports completion exactly once, as the return value of `update`. Nothing
//! here mutates scene state; the director decides what a completion means.

use engine_core::{EASE_IN, EASE_PANEL};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TimingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Warp,
    TvShutoff,
    TvTurnon,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TimelineState {
    Idle,
    Running { elapsed: f32 },
    /// Finished but still drawn at its end frame until stopped.
    Holding,
}

/// Activation clock shared by all overlays.
#[derive(Debug, Clone)]
pub struct Timeline {
    duration: f32,
    hold_on_finish: bool,
    state: TimelineState,
}

impl Timeline {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            hold_on_finish: false,
            state: TimelineState::Idle,
        }
    }

    /// Keep the end frame on screen after finishing, until [`Timeline::stop`].
    pub fn holding(mut self) -> Self {
        self.hold_on_finish = true;
        self
    }

    /// (Re)start from zero.
    pub fn start(&mut self) {
        self.state = TimelineState::Running { elapsed: 0.0 };
    }

    pub fn stop(&mut self) {
        self.state = TimelineState::Idle;
    }

    /// Advance; true on the single frame the duration is reached.
    pub fn update(&mut self, dt: f32) -> bool {
        if let TimelineState::Running { elapsed } = &mut self.state {
            *elapsed += dt;
            if *elapsed >= self.duration {
                self.state = if self.hold_on_finish {
                    TimelineState::Holding
                } else {
                    TimelineState::Idle
                };
                return true;
            }
        }
        false
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimelineState::Running { .. })
    }

    /// Running or holding: something is on screen.
    pub fn is_active(&self) -> bool {
        self.state != TimelineState::Idle
    }

    pub fn elapsed(&self) -> f32 {
        match self.state {
            TimelineState::Idle => 0.0,
            TimelineState::Running { elapsed } => elapsed,
            TimelineState::Holding => self.duration,
        }
    }

    /// 0..1 through the run, 1 while holding.
    pub fn progress(&self) -> f32 {
        match self.state {
            TimelineState::Idle => 0.0,
            TimelineState::Holding => 1.0,
            TimelineState::Running { elapsed } if self.duration > 0.0 => (elapsed / self.duration).clamp(0.0, 1.0),
            TimelineState::Running { .. } => 1.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

// ── Warp ────────────────────────────────────────────────────────────────────

pub const WARP_STAR_COUNT: usize = 2500;
const WARP_RADIUS: (f32, f32) = (5.0, 35.0);
const WARP_NEAR_Z: f32 = -15.0;
const WARP_DEPTH: f32 = 150.0;
const WARP_WRAP_Z: f32 = 10.0;
const WARP_RESET_Z: f32 = -165.0;
const WARP_VELOCITY: (f32, f32) = (2.0, 5.0);

/// One star of the warp field, in camera space (camera looks down -Z).
#[derive(Debug, Clone, Copy)]
pub struct WarpStar {
    pub position: Vec3,
    pub velocity: f32,
}

/// Star streaks rushing past the camera, with a shake that fades out near the end.
#[derive(Debug)]
pub struct WarpJump {
    timeline: Timeline,
    stars: Vec<WarpStar>,
    shake: Vec2,
    rng: StdRng,
}

impl WarpJump {
    pub fn new(duration: f32, seed: u64) -> Self {
        Self {
            timeline: Timeline::new(duration),
            stars: Vec::new(),
            shake: Vec2::ZERO,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn start(&mut self) {
        let rng = &mut self.rng;
        self.stars = (0..WARP_STAR_COUNT)
            .map(|_| {
                let theta = rng.gen_range(0.0..std::f32::consts::TAU);
                let radius = rng.gen_range(WARP_RADIUS.0..WARP_RADIUS.1);
                let z = WARP_NEAR_Z - rng.gen_range(0.0..WARP_DEPTH);
                WarpStar {
                    position: Vec3::new(theta.cos() * radius, theta.sin() * radius, z),
                    velocity: rng.gen_range(WARP_VELOCITY.0..WARP_VELOCITY.1),
                }
            })
            .collect();
        self.shake = Vec2::ZERO;
        self.timeline.start();
    }

    /// Streak speed: ramps up over the first 30% then cruises.
    pub fn speed(progress: f32) -> f32 {
        if progress < 0.3 {
            progress * 100.0
        } else {
            30.0
        }
    }

    pub fn update(&mut self, dt: f32) -> bool {
        if !self.timeline.is_running() {
            return false;
        }
        let finished = self.timeline.update(dt);
        let p = self.timeline.progress();
        let speed = Self::speed(p);

        for star in &mut self.stars {
            star.position.z += star.velocity * speed * dt;
            if star.position.z > WARP_WRAP_Z {
                star.position.z = WARP_RESET_Z;
            }
        }

        self.shake = if p < 0.9 && !finished {
            let intensity = p.min(0.3);
            Vec2::new(
                (self.rng.gen::<f32>() - 0.5) * intensity * 0.5,
                (self.rng.gen::<f32>() - 0.5) * intensity * 0.3,
            )
        } else {
            Vec2::ZERO
        };

        if finished {
            self.stars.clear();
        }
        finished
    }

    pub fn stop(&mut self) {
        self.timeline.stop();
        self.stars.clear();
        self.shake = Vec2::ZERO;
    }

    pub fn stars(&self) -> &[WarpStar] {
        &self.stars
    }

    /// Camera offset (world x/y) to apply this frame.
    pub fn shake_offset(&self) -> Vec2 {
        self.shake
    }

    /// Current streak speed, for drawing trail lengths.
    pub fn current_speed(&self) -> f32 {
        Self::speed(self.timeline.progress())
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

// ── TV wipes ────────────────────────────────────────────────────────────────

/// How much of the screen each black panel covers, as fractions:
/// `top`/`bottom` of the height, `left`/`right` of the width (0.5 = to the centre).
/// `backdrop` is the opacity of the white layer behind the panels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Panels {
    pub backdrop: f32,
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Panels {
    pub const BLACK: Panels = Panels {
        backdrop: 1.0,
        top: 0.5,
        bottom: 0.5,
        left: 0.5,
        right: 0.5,
    };
}

/// Screen collapsing to a white line and then to black. Holds black once
/// finished until [`TvShutoff::release`].
#[derive(Debug)]
pub struct TvShutoff {
    timeline: Timeline,
}

impl TvShutoff {
    pub fn new(duration: f32) -> Self {
        Self {
            timeline: Timeline::new(duration).holding(),
        }
    }

    pub fn start(&mut self) {
        self.timeline.start();
    }

    pub fn update(&mut self, dt: f32) -> bool {
        self.timeline.update(dt)
    }

    pub fn release(&mut self) {
        self.timeline.stop();
    }

    pub fn panels(&self) -> Option<Panels> {
        if !self.timeline.is_active() {
            return None;
        }
        if !self.timeline.is_running() {
            return Some(Panels::BLACK);
        }
        let d = self.timeline.duration().max(f32::EPSILON);
        let t = self.timeline.elapsed();

        let half = (t / (0.5 * d)).min(1.0);
        let vertical = 0.25 + 0.25 * EASE_PANEL.ease(half);
        let side = 0.5 * EASE_PANEL.ease(((t - 0.3 * d) / (2.0 * d)).max(0.0));
        Some(Panels {
            backdrop: EASE_IN.ease(half),
            top: vertical,
            bottom: vertical,
            left: side,
            right: side,
        })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

/// Black panels parting from the centre: slowly to half-open, then quickly.
#[derive(Debug)]
pub struct TvTurnon {
    timeline: Timeline,
}

impl TvTurnon {
    pub fn new(duration: f32) -> Self {
        Self {
            timeline: Timeline::new(duration),
        }
    }

    pub fn start(&mut self) {
        self.timeline.start();
    }

    pub fn update(&mut self, dt: f32) -> bool {
        self.timeline.update(dt)
    }

    pub fn stop(&mut self) {
        self.timeline.stop();
    }

    /// Panel travel as a fraction of its own height at progress `u`.
    fn travel(u: f32) -> f32 {
        if u < 0.7 {
            0.5 * EASE_PANEL.ease(u / 0.7)
        } else {
            0.5 + 0.5 * EASE_PANEL.ease((u - 0.7) / 0.3)
        }
    }

    pub fn panels(&self) -> Option<Panels> {
        if !self.timeline.is_running() {
            return None;
        }
        let covered = 0.5 * (1.0 - Self::travel(self.timeline.progress()));
        Some(Panels {
            backdrop: 0.0,
            top: covered,
            bottom: covered,
            left: 0.0,
            right: 0.0,
        })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

// ── Bundle ──────────────────────────────────────────────────────────────────

/// The three overlays, owned together by the director.
#[derive(Debug)]
pub struct Transitions {
    pub warp: WarpJump,
    pub shutoff: TvShutoff,
    pub turnon: TvTurnon,
}

impl Transitions {
    pub fn new(timing: &TimingConfig, seed: u64) -> Self {
        Self {
            warp: WarpJump::new(timing.warp, seed),
            shutoff: TvShutoff::new(timing.tv_shutoff),
            turnon: TvTurnon::new(timing.tv_turnon),
        }
    }

    pub fn start(&mut self, kind: OverlayKind) {
        log::debug!("Overlay {:?} started", kind);
        match kind {
            OverlayKind::Warp => self.warp.start(),
            OverlayKind::TvShutoff => self.shutoff.start(),
            OverlayKind::TvTurnon => self.turnon.start(),
        }
    }

    /// Advance all overlays; returns the ones that finished this frame.
    pub fn update(&mut self, dt: f32) -> Vec<OverlayKind> {
        let mut finished = Vec::new();
        if self.warp.update(dt) {
            finished.push(OverlayKind::Warp);
        }
        if self.shutoff.update(dt) {
            finished.push(OverlayKind::TvShutoff);
        }
        if self.turnon.update(dt) {
            finished.push(OverlayKind::TvTurnon);
        }
        finished
    }

    pub fn is_active(&self, kind: OverlayKind) -> bool {
        match kind {
            OverlayKind::Warp => self.warp.timeline().is_active(),
            OverlayKind::TvShutoff => self.shutoff.timeline().is_active(),
            OverlayKind::TvTurnon => self.turnon.timeline().is_active(),
        }
    }

    pub fn any_active(&self) -> bool {
        [OverlayKind::Warp, OverlayKind::TvShutoff, OverlayKind::TvTurnon]
            .into_iter()
            .any(|k| self.is_active(k))
    }
}
