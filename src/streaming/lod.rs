//! LOD policy: which resolution tier an object should display
//!
//! The policy is a pure function of the view matrix and the object's model
//! matrix. An object gets the high tier when it is both near enough and
//! inside the camera's (approximate) horizontal field of view; everything
//! else gets the low tier.

use std::sync::atomic::{AtomicU8, Ordering};

use glam::{Mat4, Vec3};

/// World-space distance inside which an object may use the high tier
pub const MAX_DISTANCE: f32 = 40.0;

/// View-space depth offset compensating for the object's half-extent,
/// so "behind camera" is judged by the trailing edge, not the center
pub const Z_OFFSET: f32 = 3.0;

/// Resolution class of an object's displayed image
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Low = 0,
    High = 1,
}

impl Tier {
    fn from_u8(v: u8) -> Self {
        if v == Tier::High as u8 { Tier::High } else { Tier::Low }
    }
}

/// A `Tier` readable and writable across threads without a lock
///
/// The render thread writes it at adoption; the streaming worker reads it
/// when seeding its in-flight targets. Relaxed ordering is enough: the
/// pending-slot mutex orders the image handoff itself.
pub struct AtomicTier(AtomicU8);

impl AtomicTier {
    pub fn new(tier: Tier) -> Self {
        Self(AtomicU8::new(tier as u8))
    }

    pub fn load(&self) -> Tier {
        Tier::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, tier: Tier) {
        self.0.store(tier as u8, Ordering::Relaxed);
    }
}

/// Tier selection thresholds
#[derive(Debug, Clone, Copy)]
pub struct LodConfig {
    /// View-space depth below which the distance test passes (strict `<`)
    pub max_distance: f32,
    /// Depth offset added before the tests, see [`Z_OFFSET`]
    pub z_offset: f32,
    /// Cosine of half the horizontal field of view; the angle test passes
    /// at `>=` this value (boundary counts as inside)
    pub cos_half_hfov: f32,
}

impl LodConfig {
    /// Build a config from the camera's vertical FOV and aspect ratio
    ///
    /// Uses the horizontal FOV approximation `hfov = fov_y * aspect`,
    /// which is simpler than the exact `2*atan(tan(fov_y/2)*aspect)` and
    /// close enough for a coarse in/out decision.
    pub fn new(fov_y_degrees: f32, aspect: f32) -> Self {
        let hfov_degrees = fov_y_degrees * aspect;
        Self {
            max_distance: MAX_DISTANCE,
            z_offset: Z_OFFSET,
            cos_half_hfov: (hfov_degrees / 2.0).to_radians().cos(),
        }
    }

    /// Desired tier for an object with model matrix `model` under view `view`
    ///
    /// Pure: same inputs always produce the same tier.
    pub fn desired_tier(&self, view: &Mat4, model: &Mat4) -> Tier {
        let vm = *view * *model;

        // View-space position of the object's origin; depth is pushed out
        // by z_offset so the trailing edge decides "behind camera"
        let depth = vm.w_axis.z + self.z_offset;

        // Cosine of the angle between the forward axis and the object
        let dir = Vec3::new(vm.w_axis.x, vm.w_axis.y, depth).normalize_or_zero();
        let cosine = dir.z;

        self.classify(depth, cosine)
    }

    /// The shared comparison: near enough and inside the horizontal FOV
    pub fn classify(&self, depth: f32, cosine: f32) -> Tier {
        if depth < self.max_distance && cosine >= self.cos_half_hfov {
            Tier::High
        } else {
            Tier::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 60 degree vertical FOV at the viewer's 1024x768 aspect gives the
    // original 80 degree horizontal approximation
    fn viewer_config() -> LodConfig {
        LodConfig::new(60.0, 1024.0 / 768.0)
    }

    fn view_at_origin() -> Mat4 {
        Mat4::look_at_lh(Vec3::ZERO, Vec3::new(0.0, 0.0, 1000.0), Vec3::Y)
    }

    #[test]
    fn test_near_object_dead_ahead_is_high() {
        // Scenario A: view-space z = 20, dot = 1.0
        let config = viewer_config();
        let model = Mat4::from_translation(Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(config.desired_tier(&view_at_origin(), &model), Tier::High);
    }

    #[test]
    fn test_outside_fov_is_low() {
        // Scenario B: distance passes but the angle test fails
        // (dot = 0.3 against cos(30 deg) ~= 0.866 for hfov = 60 deg)
        let config = LodConfig::new(60.0, 1.0);
        assert_eq!(config.classify(20.0, 0.3), Tier::Low);
    }

    #[test]
    fn test_far_object_dead_ahead_is_low() {
        // Scenario C: z = 45 directly ahead
        let config = viewer_config();
        assert_eq!(config.classify(45.0, 1.0), Tier::Low);
    }

    #[test]
    fn test_distance_boundary_is_exclusive() {
        let config = viewer_config();
        assert_eq!(config.classify(40.0, 1.0), Tier::Low);
        assert_eq!(config.classify(39.999, 1.0), Tier::High);
    }

    #[test]
    fn test_angle_boundary_is_inclusive() {
        let config = LodConfig::new(60.0, 1.0);
        assert_eq!(config.classify(20.0, config.cos_half_hfov), Tier::High);
        assert_eq!(config.classify(20.0, config.cos_half_hfov - 1e-4), Tier::Low);
    }

    #[test]
    fn test_z_offset_shifts_depth() {
        // Object origin at z = 37 plus the 3.0 offset lands exactly on the
        // 40-unit boundary, which resolves Low
        let config = viewer_config();
        let at_boundary = Mat4::from_translation(Vec3::new(0.0, 0.0, 37.0));
        let just_inside = Mat4::from_translation(Vec3::new(0.0, 0.0, 36.9));
        assert_eq!(config.desired_tier(&view_at_origin(), &at_boundary), Tier::Low);
        assert_eq!(config.desired_tier(&view_at_origin(), &just_inside), Tier::High);
    }

    #[test]
    fn test_behind_camera_is_low() {
        let config = viewer_config();
        let model = Mat4::from_translation(Vec3::new(0.0, 0.0, -20.0));
        assert_eq!(config.desired_tier(&view_at_origin(), &model), Tier::Low);
    }

    #[test]
    fn test_policy_is_deterministic() {
        let config = viewer_config();
        let view = Mat4::look_at_lh(Vec3::new(3.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1000.0), Vec3::Y);
        let model = Mat4::from_translation(Vec3::new(10.0, 0.0, 25.0));

        let first = config.desired_tier(&view, &model);
        for _ in 0..100 {
            assert_eq!(config.desired_tier(&view, &model), first);
        }
    }

    #[test]
    fn test_atomic_tier_round_trip() {
        let tier = AtomicTier::new(Tier::Low);
        assert_eq!(tier.load(), Tier::Low);
        tier.store(Tier::High);
        assert_eq!(tier.load(), Tier::High);
    }
}
