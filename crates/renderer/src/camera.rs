//! Look-at camera with screen projection helpers.

use glam::{Mat4, Vec2, Vec3};

/// Perspective camera defined by an eye position and a look-at target.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::new(0.0, 0.0, -6.0),
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        Self {
            position,
            target,
            fov_degrees,
            ..Default::default()
        }
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn set_pose(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    /// Get camera forward direction.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(-Vec3::Z)
    }

    /// Get camera right direction.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to pixel coordinates (origin top-left).
    /// Returns the pixel position and the view-space distance, or `None` when
    /// the point is behind the camera or outside the clip range.
    pub fn world_to_screen(&self, world: Vec3, width: f32, height: f32) -> Option<(Vec2, f32)> {
        let clip = self.view_projection_matrix() * world.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.z < 0.0 || ndc.z > 1.0 {
            return None;
        }
        let px = Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height);
        Some((px, clip.w))
    }

    /// On-screen radius in pixels of a sphere of `radius` at view distance `depth`.
    pub fn pixel_radius(&self, radius: f32, depth: f32, height: f32) -> f32 {
        if depth <= 0.0 {
            return 0.0;
        }
        let half_fov = (self.fov_degrees.to_radians() * 0.5).tan();
        radius / (depth * half_fov) * height * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_target_projects_to_screen_center() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 60.0);
        let (px, depth) = camera.world_to_screen(Vec3::ZERO, 800.0, 600.0).unwrap();
        assert!((px - Vec2::new(400.0, 300.0)).length() < 0.01);
        assert!((depth - 10.0).abs() < 1e-3);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 60.0);
        assert!(camera.world_to_screen(Vec3::new(0.0, 0.0, 20.0), 800.0, 600.0).is_none());
    }

    #[test]
    fn pixel_radius_shrinks_with_distance() {
        let camera = Camera::default();
        let near = camera.pixel_radius(1.0, 5.0, 600.0);
        let far = camera.pixel_radius(1.0, 10.0, 600.0);
        assert!((near - 2.0 * far).abs() < 1e-3);
    }
}
