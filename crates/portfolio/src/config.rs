//! Portfolio configuration (window, language, font, timing, camera). Loaded from config.ron at startup.

use catalog::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::layout::DeviceClass;

/// Persistent settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Start in fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    /// Initial display language.
    #[serde(default)]
    pub language: Language,
    /// Force a device profile instead of deriving it from the window width.
    #[serde(default)]
    pub device: Option<DeviceClass>,
    /// TrueType/OpenType face for labels. Without one, well-known system
    /// fonts are tried, then the built-in ASCII face.
    #[serde(default)]
    pub font_path: Option<String>,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

/// Transition durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Warp streak field.
    #[serde(default = "default_warp")]
    pub warp: f32,
    /// TV shutoff wipe.
    #[serde(default = "default_one")]
    pub tv_shutoff: f32,
    /// TV turn-on wipe.
    #[serde(default = "default_one")]
    pub tv_turnon: f32,
    /// Pause between a scene switch and the turn-on wipe, so the new scene is mounted first.
    #[serde(default = "default_turnon_delay")]
    pub turnon_delay: f32,
    /// Astronaut launch before the shutoff starts.
    #[serde(default = "default_one")]
    pub launch: f32,
    /// Time the screen stays black after the shutoff finishes, before docking.
    #[serde(default = "default_shutoff_hold")]
    pub shutoff_hold: f32,
}

fn default_warp() -> f32 {
    3.0
}
fn default_one() -> f32 {
    1.0
}
fn default_turnon_delay() -> f32 {
    0.1
}
fn default_shutoff_hold() -> f32 {
    0.15
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            warp: default_warp(),
            tv_shutoff: default_one(),
            tv_turnon: default_one(),
            turnon_delay: default_turnon_delay(),
            launch: default_one(),
            shutoff_hold: default_shutoff_hold(),
        }
    }
}

/// Camera rig tuning. Mobile values apply to the mobile profile only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Exponential approach rate (1/s). 6.3 matches a 0.1 lerp per frame at 60 Hz.
    #[serde(default = "default_convergence_rate")]
    pub convergence_rate: f32,
    /// Distance under which the rig snaps and reports completion.
    #[serde(default = "default_settle_threshold")]
    pub settle_threshold: f32,
    #[serde(default = "default_initial_z_desktop")]
    pub initial_z_desktop: f32,
    #[serde(default = "default_initial_z_mobile")]
    pub initial_z_mobile: f32,
    #[serde(default = "default_look_at")]
    pub initial_look_at: [f32; 3],
    #[serde(default = "default_zoom_desktop")]
    pub zoom_distance_desktop: f32,
    #[serde(default = "default_zoom_mobile")]
    pub zoom_distance_mobile: f32,
    #[serde(default = "default_fov_desktop")]
    pub fov_desktop: f32,
    #[serde(default = "default_fov_mobile")]
    pub fov_mobile: f32,
    /// Surface orbit drag speed.
    #[serde(default = "default_one")]
    pub orbit_rotate_desktop: f32,
    #[serde(default = "default_orbit_rotate_mobile")]
    pub orbit_rotate_mobile: f32,
    /// Surface orbit wheel speed.
    #[serde(default = "default_one")]
    pub orbit_zoom_desktop: f32,
    #[serde(default = "default_orbit_zoom_mobile")]
    pub orbit_zoom_mobile: f32,
    /// Fraction of the remaining orbit motion applied per 60 Hz frame.
    #[serde(default = "default_orbit_damping")]
    pub orbit_damping: f32,
}

fn default_convergence_rate() -> f32 {
    6.3
}
fn default_settle_threshold() -> f32 {
    0.01
}
fn default_initial_z_desktop() -> f32 {
    10.0
}
fn default_initial_z_mobile() -> f32 {
    12.0
}
fn default_look_at() -> [f32; 3] {
    [0.0, 0.0, -6.0]
}
fn default_zoom_desktop() -> f32 {
    10.0
}
fn default_zoom_mobile() -> f32 {
    8.0
}
fn default_fov_desktop() -> f32 {
    60.0
}
fn default_fov_mobile() -> f32 {
    75.0
}
fn default_orbit_rotate_mobile() -> f32 {
    0.7
}
fn default_orbit_zoom_mobile() -> f32 {
    0.8
}
fn default_orbit_damping() -> f32 {
    0.05
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            convergence_rate: default_convergence_rate(),
            settle_threshold: default_settle_threshold(),
            initial_z_desktop: default_initial_z_desktop(),
            initial_z_mobile: default_initial_z_mobile(),
            initial_look_at: default_look_at(),
            zoom_distance_desktop: default_zoom_desktop(),
            zoom_distance_mobile: default_zoom_mobile(),
            fov_desktop: default_fov_desktop(),
            fov_mobile: default_fov_mobile(),
            orbit_rotate_desktop: default_one(),
            orbit_rotate_mobile: default_orbit_rotate_mobile(),
            orbit_zoom_desktop: default_one(),
            orbit_zoom_mobile: default_orbit_zoom_mobile(),
            orbit_damping: default_orbit_damping(),
        }
    }
}

impl CameraConfig {
    pub fn initial_z(&self, device: DeviceClass) -> f32 {
        if device.is_mobile() {
            self.initial_z_mobile
        } else {
            self.initial_z_desktop
        }
    }

    pub fn zoom_distance(&self, device: DeviceClass) -> f32 {
        if device.is_mobile() {
            self.zoom_distance_mobile
        } else {
            self.zoom_distance_desktop
        }
    }

    pub fn fov(&self, device: DeviceClass) -> f32 {
        if device.is_mobile() {
            self.fov_mobile
        } else {
            self.fov_desktop
        }
    }

    /// Orbit (rotate, zoom) speeds.
    pub fn orbit_speeds(&self, device: DeviceClass) -> (f32, f32) {
        if device.is_mobile() {
            (self.orbit_rotate_mobile, self.orbit_zoom_mobile)
        } else {
            (self.orbit_rotate_desktop, self.orbit_zoom_desktop)
        }
    }

    /// Orbit damping as an exponential rate (1/s).
    pub fn orbit_damping_rate(&self) -> f32 {
        -(1.0 - self.orbit_damping).ln() * 60.0
    }

    fn sanitize(&mut self) {
        let d = Self::default();
        positive(&mut self.convergence_rate, d.convergence_rate, "camera.convergence_rate");
        positive(&mut self.settle_threshold, d.settle_threshold, "camera.settle_threshold");
        finite(&mut self.initial_z_desktop, d.initial_z_desktop, "camera.initial_z_desktop");
        finite(&mut self.initial_z_mobile, d.initial_z_mobile, "camera.initial_z_mobile");
        if !self.initial_look_at.iter().all(|v| v.is_finite()) {
            log::warn!("config: camera.initial_look_at is not finite, using default");
            self.initial_look_at = d.initial_look_at;
        }
        positive(&mut self.zoom_distance_desktop, d.zoom_distance_desktop, "camera.zoom_distance_desktop");
        positive(&mut self.zoom_distance_mobile, d.zoom_distance_mobile, "camera.zoom_distance_mobile");
        below(&mut self.fov_desktop, 180.0, d.fov_desktop, "camera.fov_desktop");
        below(&mut self.fov_mobile, 180.0, d.fov_mobile, "camera.fov_mobile");
        positive(&mut self.orbit_rotate_desktop, d.orbit_rotate_desktop, "camera.orbit_rotate_desktop");
        positive(&mut self.orbit_rotate_mobile, d.orbit_rotate_mobile, "camera.orbit_rotate_mobile");
        positive(&mut self.orbit_zoom_desktop, d.orbit_zoom_desktop, "camera.orbit_zoom_desktop");
        positive(&mut self.orbit_zoom_mobile, d.orbit_zoom_mobile, "camera.orbit_zoom_mobile");
        below(&mut self.orbit_damping, 1.0, d.orbit_damping, "camera.orbit_damping");
    }
}

impl TimingConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        positive(&mut self.warp, d.warp, "timing.warp");
        positive(&mut self.tv_shutoff, d.tv_shutoff, "timing.tv_shutoff");
        positive(&mut self.tv_turnon, d.tv_turnon, "timing.tv_turnon");
        non_negative(&mut self.turnon_delay, d.turnon_delay, "timing.turnon_delay");
        non_negative(&mut self.launch, d.launch, "timing.launch");
        non_negative(&mut self.shutoff_hold, d.shutoff_hold, "timing.shutoff_hold");
    }
}

fn finite(value: &mut f32, fallback: f32, name: &str) {
    if !value.is_finite() {
        log::warn!("config: {} = {} is not finite, using {}", name, value, fallback);
        *value = fallback;
    }
}

fn non_negative(value: &mut f32, fallback: f32, name: &str) {
    if !(value.is_finite() && *value >= 0.0) {
        log::warn!("config: {} = {} must be >= 0, using {}", name, value, fallback);
        *value = fallback;
    }
}

fn positive(value: &mut f32, fallback: f32, name: &str) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!("config: {} = {} must be > 0, using {}", name, value, fallback);
        *value = fallback;
    }
}

/// Open interval (0, limit).
fn below(value: &mut f32, limit: f32, fallback: f32, name: &str) {
    if !(value.is_finite() && *value > 0.0 && *value < limit) {
        log::warn!("config: {} = {} must be in (0, {}), using {}", name, value, limit, fallback);
        *value = fallback;
    }
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            fullscreen: false,
            language: Language::default(),
            device: None,
            font_path: None,
            timing: TimingConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl PortfolioConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Parse and sanitize: out-of-range numbers are replaced by their defaults with a warning.
    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        let mut config: Self = ron::from_str(data)?;
        config.sanitize();
        Ok(config)
    }

    fn sanitize(&mut self) {
        if self.window_width == 0 || self.window_height == 0 {
            log::warn!(
                "config: window size {}x{} is empty, using defaults",
                self.window_width,
                self.window_height
            );
            self.window_width = default_window_width();
            self.window_height = default_window_height();
        }
        self.timing.sanitize();
        self.camera.sanitize();
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = PortfolioConfig::parse("()").unwrap();
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.language, Language::Ko);
        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.camera.zoom_distance(DeviceClass::Mobile), 8.0);
        assert_eq!(config.camera.fov(DeviceClass::Desktop), 60.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = PortfolioConfig::parse("(language: En, timing: (warp: 1.5))").unwrap();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.timing.warp, 1.5);
        assert_eq!(config.timing.tv_shutoff, 1.0);
    }

    #[test]
    fn out_of_range_numbers_fall_back_to_defaults() {
        let config = PortfolioConfig::parse(
            "(window_width: 0, timing: (warp: -2.0, turnon_delay: 0.0, launch: 0.5), \
             camera: (convergence_rate: -1.0, settle_threshold: 0.0, fov_mobile: 200.0, \
             orbit_damping: 1.0, zoom_distance_desktop: 7.0))",
        )
        .unwrap();
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.timing.warp, 3.0);
        assert_eq!(config.timing.turnon_delay, 0.0);
        assert_eq!(config.timing.launch, 0.5);
        assert_eq!(config.camera.convergence_rate, 6.3);
        assert_eq!(config.camera.settle_threshold, 0.01);
        assert_eq!(config.camera.fov_mobile, 75.0);
        assert_eq!(config.camera.orbit_damping, 0.05);
        assert_eq!(config.camera.zoom_distance_desktop, 7.0);
    }

    #[test]
    fn negative_rate_from_file_still_converges() {
        let dir = std::env::temp_dir().join(format!("starfolio-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.ron");
        std::fs::write(&path, "(camera: (convergence_rate: -1.0))").unwrap();
        let config = PortfolioConfig::load_from(&path);
        std::fs::remove_dir_all(&dir).ok();

        let home = crate::layout::ship_home(&config.camera, DeviceClass::Desktop);
        let mut rig = crate::camera_rig::CameraRig::new(
            home,
            config.camera.convergence_rate,
            config.camera.settle_threshold,
        );
        rig.focus(crate::camera_rig::Pose::new(glam::Vec3::new(4.0, 0.0, 8.0), glam::Vec3::ZERO));
        for _ in 0..600 {
            rig.update(1.0 / 60.0);
        }
        assert!(rig.pose().position.is_finite());
        assert_eq!(rig.pose().position, glam::Vec3::new(4.0, 0.0, 8.0));
    }

    #[test]
    fn orbit_damping_matches_per_frame_fraction() {
        let camera = CameraConfig::default();
        let factor = engine_core::exp_decay_factor(camera.orbit_damping_rate(), 1.0 / 60.0);
        assert!((factor - 0.05).abs() < 1e-5);
        assert_eq!(camera.orbit_speeds(DeviceClass::Mobile), (0.7, 0.8));
        assert_eq!(camera.orbit_speeds(DeviceClass::Desktop), (1.0, 1.0));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = PortfolioConfig::load_from(Path::new("/nonexistent/starfolio/config.ron"));
        assert!(config.vsync);
        assert!(config.device.is_none());
    }
}
