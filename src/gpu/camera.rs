//! Turntable camera looking at the orbital plane.

use glam::{Mat4, Vec2, Vec3};

/// Orbit camera around the scene origin.
///
/// The scene is normalised so the strain grid spans `[-1, 1]` horizontally.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Elevation above the orbital plane in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Camera {
    /// 25 degrees above the plane, 2.5 grid half-widths away.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 25.0_f32.to_radians(),
            distance: 2.5,
            target: Vec3::ZERO,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Combined projection and view for the given aspect ratio.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), aspect, 0.05, 50.0);
        proj * self.view_matrix()
    }

    /// Apply a mouse drag (pixels) and wheel scroll (lines).
    pub fn apply(&mut self, drag: Vec2, scroll: f32) {
        self.yaw -= drag.x * 0.005;
        self.pitch = (self.pitch + drag.y * 0.005).clamp(-1.5, 1.5);
        self.distance = (self.distance - scroll * 0.2).clamp(0.5, 10.0);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
