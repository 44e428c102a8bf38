//! Camera rig: eases the camera toward a focus pose, or back home when released.
//! On a planet surface the rig can instead orbit a fixed target under user control.

use engine_core::exp_decay;
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Distance factor per wheel line at zoom speed 1.
const ZOOM_STEP: f32 = 0.95;

/// Camera eye position and look-at point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    fn within(&self, other: &Pose, threshold: f32) -> bool {
        self.position.distance(other.position) < threshold && self.look_at.distance(other.look_at) < threshold
    }
}

#[derive(Debug, Clone)]
pub struct CameraRig {
    current: Pose,
    home: Pose,
    /// Focus pose while a selection holds the camera; `None` means home.
    focus: Option<Pose>,
    /// Set on every activation, cleared when the rig settles.
    animating: bool,
    rate: f32,
    threshold: f32,
    /// User-driven orbit; while set it owns the pose.
    orbit: Option<Orbit>,
}

impl CameraRig {
    pub fn new(home: Pose, rate: f32, threshold: f32) -> Self {
        Self {
            current: home,
            home,
            focus: None,
            animating: false,
            rate,
            threshold,
            orbit: None,
        }
    }

    /// Start easing toward `pose`.
    pub fn focus(&mut self, pose: Pose) {
        self.orbit = None;
        self.focus = Some(pose);
        self.animating = true;
    }

    /// Start easing back to the home pose.
    pub fn release(&mut self) {
        self.orbit = None;
        self.focus = None;
        self.animating = true;
    }

    pub fn set_home(&mut self, home: Pose) {
        self.home = home;
    }

    /// Jump to the home pose without animating or reporting completion.
    pub fn snap_home(&mut self) {
        self.orbit = None;
        self.focus = None;
        self.current = self.home;
        self.animating = false;
    }

    /// Advance by `dt` seconds. Returns true on the frame the rig settles,
    /// once per `focus`/`release` call.
    pub fn update(&mut self, dt: f32) -> bool {
        if let Some(orbit) = &mut self.orbit {
            orbit.update(dt);
            self.current = orbit.pose();
            return false;
        }
        if !self.animating {
            return false;
        }
        let goal = self.goal();
        self.current.position = exp_decay(self.current.position, goal.position, self.rate, dt);
        self.current.look_at = exp_decay(self.current.look_at, goal.look_at, self.rate, dt);

        if self.current.within(&goal, self.threshold) {
            self.current = goal;
            self.animating = false;
            return true;
        }
        false
    }

    pub fn pose(&self) -> Pose {
        self.current
    }

    /// Pose the rig is heading to.
    pub fn goal(&self) -> Pose {
        match &self.orbit {
            Some(orbit) => orbit.goal_pose(),
            None => self.focus.unwrap_or(self.home),
        }
    }

    /// Hand the pose to an orbit starting from the current pose.
    /// Cleared by the next `focus`, `release` or `snap_home`.
    pub fn start_orbit(&mut self, settings: OrbitSettings) {
        self.focus = None;
        self.animating = false;
        let orbit = Orbit::new(self.current, settings);
        self.current = orbit.pose();
        self.orbit = Some(orbit);
    }

    pub fn orbit_mut(&mut self) -> Option<&mut Orbit> {
        self.orbit.as_mut()
    }

    pub fn is_orbiting(&self) -> bool {
        self.orbit.is_some()
    }
}

/// Orbit tuning: input speeds, damping and the allowed shell around the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    /// Multiplier on drag rotation; 1 turns a full viewport height of drag into one revolution.
    pub rotate_speed: f32,
    /// Multiplier on wheel zoom.
    pub zoom_speed: f32,
    /// Approach rate (1/s) toward the input goal.
    pub damping_rate: f32,
    /// Polar angle from straight up, in radians.
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

/// Spherical coordinates around a fixed target. Input moves the goal; the
/// camera follows it with exponential damping.
#[derive(Debug, Clone)]
pub struct Orbit {
    target: Vec3,
    /// (azimuth, polar, distance).
    current: Vec3,
    goal: Vec3,
    settings: OrbitSettings,
}

impl Orbit {
    pub fn new(pose: Pose, settings: OrbitSettings) -> Self {
        let offset = pose.position - pose.look_at;
        let distance = offset.length().max(f32::EPSILON);
        let azimuth = offset.x.atan2(offset.z);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        let spherical = Self::clamped(&settings, Vec3::new(azimuth, polar, distance));
        Self {
            target: pose.look_at,
            current: spherical,
            goal: spherical,
            settings,
        }
    }

    fn clamped(settings: &OrbitSettings, s: Vec3) -> Vec3 {
        Vec3::new(
            s.x,
            s.y.clamp(settings.min_polar, settings.max_polar),
            s.z.clamp(settings.min_distance, settings.max_distance),
        )
    }

    /// Drag by `delta` pixels in a viewport `viewport_height` pixels tall.
    /// Dragging right swings the camera left; dragging down raises it.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let k = TAU * self.settings.rotate_speed / viewport_height.max(1.0);
        self.goal.x -= delta.x * k;
        self.goal.y -= delta.y * k;
        self.goal = Self::clamped(&self.settings, self.goal);
    }

    /// Wheel travel in lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.goal.z *= ZOOM_STEP.powf(lines * self.settings.zoom_speed);
        self.goal = Self::clamped(&self.settings, self.goal);
    }

    pub fn update(&mut self, dt: f32) {
        self.current = exp_decay(self.current, self.goal, self.settings.damping_rate, dt);
    }

    fn pose_at(&self, s: Vec3) -> Pose {
        let (sin_polar, cos_polar) = s.y.sin_cos();
        let offset = Vec3::new(sin_polar * s.x.sin(), cos_polar, sin_polar * s.x.cos()) * s.z;
        Pose::new(self.target + offset, self.target)
    }

    pub fn pose(&self) -> Pose {
        self.pose_at(self.current)
    }

    pub fn goal_pose(&self) -> Pose {
        self.pose_at(self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(Pose::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -6.0)), 6.3, 0.01)
    }

    #[test]
    fn converges_monotonically_and_completes_once() {
        let mut rig = rig();
        let target = Pose::new(Vec3::new(4.5, 0.0, 8.0), Vec3::new(4.5, 0.0, -2.0));
        rig.focus(target);

        let mut last = f32::MAX;
        let mut completions = 0;
        for _ in 0..600 {
            if rig.update(1.0 / 60.0) {
                completions += 1;
            }
            let d = rig.pose().position.distance(target.position);
            assert!(d <= last);
            last = d;
        }
        assert_eq!(completions, 1);
        assert_eq!(rig.pose(), target);
        assert!(!rig.update(1.0 / 60.0));
    }

    #[test]
    fn settle_time_is_frame_rate_independent() {
        let target = Pose::new(Vec3::new(6.0, 0.0, 0.0), Vec3::new(6.0, 0.0, -10.0));
        let settle = |fps: f32| {
            let mut rig = rig();
            rig.focus(target);
            let mut t = 0.0;
            while !rig.update(1.0 / fps) {
                t += 1.0 / fps;
            }
            t
        };
        assert!((settle(30.0) - settle(144.0)).abs() < 0.1);
    }

    #[test]
    fn release_returns_home() {
        let mut rig = rig();
        let home = rig.pose();
        rig.focus(Pose::new(Vec3::ONE, Vec3::ZERO));
        while !rig.update(0.05) {}
        rig.release();
        assert_eq!(rig.goal(), home);
        while !rig.update(0.05) {}
        assert_eq!(rig.pose(), home);
    }

    fn orbit_settings() -> OrbitSettings {
        OrbitSettings {
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            damping_rate: 3.0,
            min_polar: 0.3,
            max_polar: std::f32::consts::FRAC_PI_2 - 0.1,
            min_distance: 3.0,
            max_distance: 20.0,
        }
    }

    fn surface_rig() -> CameraRig {
        let home = Pose::new(Vec3::new(5.0, 3.0, 8.0), Vec3::new(0.0, 1.0, 0.0));
        let mut rig = CameraRig::new(home, 6.3, 0.01);
        rig.start_orbit(orbit_settings());
        rig
    }

    #[test]
    fn orbit_starts_at_the_current_pose() {
        let rig = surface_rig();
        assert!(rig.pose().position.distance(Vec3::new(5.0, 3.0, 8.0)) < 1e-4);
        assert_eq!(rig.pose().look_at, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn orbit_clamps_polar_and_distance() {
        let mut rig = surface_rig();
        let orbit = rig.orbit_mut().unwrap();
        // A long drag up pushes the camera under the horizon; down, over the pole.
        orbit.rotate(Vec2::new(0.0, -5000.0), 720.0);
        orbit.zoom(-200.0);
        for _ in 0..600 {
            rig.update(1.0 / 60.0);
        }
        let orbit = rig.orbit_mut().unwrap();
        assert!((orbit.current.y - (std::f32::consts::FRAC_PI_2 - 0.1)).abs() < 1e-3);
        assert!((orbit.current.z - 20.0).abs() < 1e-3);
        // The camera stays above the target.
        assert!(rig.pose().position.y > 1.0);

        let orbit = rig.orbit_mut().unwrap();
        orbit.rotate(Vec2::new(0.0, 5000.0), 720.0);
        orbit.zoom(200.0);
        for _ in 0..600 {
            rig.update(1.0 / 60.0);
        }
        let orbit = rig.orbit_mut().unwrap();
        assert!((orbit.current.y - 0.3).abs() < 1e-3);
        assert!((orbit.current.z - 3.0).abs() < 1e-3);
    }

    #[test]
    fn orbit_is_damped_and_keeps_the_target() {
        let mut rig = surface_rig();
        let start = rig.pose();
        rig.orbit_mut().unwrap().rotate(Vec2::new(360.0, 0.0), 720.0);
        assert_eq!(rig.pose(), start);
        assert!(!rig.update(1.0 / 60.0));
        let one_frame = rig.pose();
        assert_ne!(one_frame, start);
        assert!(one_frame.position.distance(rig.goal().position) > 0.1);
        for _ in 0..600 {
            rig.update(1.0 / 60.0);
        }
        assert!(rig.pose().position.distance(rig.goal().position) < 1e-3);
        assert_eq!(rig.pose().look_at, Vec3::new(0.0, 1.0, 0.0));
        // Half a revolution keeps the height and distance.
        assert!((rig.pose().position.y - 3.0).abs() < 1e-3);
        assert!((rig.pose().position.x + 5.0).abs() < 1e-3);
    }

    #[test]
    fn snap_home_ends_the_orbit() {
        let mut rig = surface_rig();
        rig.orbit_mut().unwrap().zoom(5.0);
        rig.snap_home();
        assert!(!rig.is_orbiting());
        assert!(!rig.update(0.016));
        assert_eq!(rig.pose().position, Vec3::new(5.0, 3.0, 8.0));
    }

    #[test]
    fn snap_home_does_not_report_completion() {
        let mut rig = rig();
        rig.focus(Pose::new(Vec3::ONE, Vec3::ZERO));
        rig.set_home(Pose::new(Vec3::new(5.0, 3.0, 8.0), Vec3::new(0.0, 1.0, 0.0)));
        rig.snap_home();
        assert!(!rig.update(0.016));
        assert_eq!(rig.pose().position, Vec3::new(5.0, 3.0, 8.0));
    }
}
