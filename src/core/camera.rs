//! Camera for 3D rendering
//!
//! The camera translates through the scene but always looks at a fixed
//! world-space target, so the view matrix is rebuilt each frame from the
//! current position only. Left-handed convention: view-space +Z is the
//! forward axis, which is what the LOD policy dots object directions
//! against.

use glam::{Mat4, Vec3};

/// Camera with position, fixed look-at target, and projection parameters
pub struct Camera {
    /// World position, updated by input each frame
    pub position: Vec3,
    /// Fixed look-at target
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Camera {
    /// Create a new camera at `position` looking at `target`
    pub fn new(position: Vec3, target: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            position,
            target,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Update aspect ratio from window dimensions
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height.max(1.0);
    }

    /// Get view matrix (world to camera space, +Z forward)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.target, Vec3::Y)
    }

    /// Get projection matrix (camera to clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_forward_axis_is_positive_z() {
        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1000.0), 60.0, 4.0 / 3.0);
        let v = camera.view_matrix();

        // A point straight ahead of the camera lands on the +Z view axis
        let p = v * Vec4::new(0.0, 0.0, 20.0, 1.0);
        assert!((p.x).abs() < 1e-5);
        assert!((p.y).abs() < 1e-5);
        assert!((p.z - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_translation_shifts_view_space() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1000.0), 60.0, 4.0 / 3.0);
        camera.position.z = 5.0;
        let v = camera.view_matrix();

        let p = v * Vec4::new(0.0, 0.0, 20.0, 1.0);
        assert!((p.z - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_aspect() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::Z, 60.0, 1.0);
        camera.set_aspect(1024.0, 768.0);
        assert!((camera.aspect - 1024.0 / 768.0).abs() < 1e-6);
        // Height never reaches zero
        camera.set_aspect(100.0, 0.0);
        assert!(camera.aspect.is_finite());
    }
}
