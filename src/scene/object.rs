//! Cross-thread scene object state
//!
//! Each scene object splits in two: [`ObjectState`], the shard both threads
//! touch, and the GPU residency (texture, uniforms, bind group), which only
//! the render thread owns and which lives in the renderer. `ObjectState` is
//! shared as `Arc` between the render loop and the streaming worker.

use glam::{Mat4, Vec3};

use crate::streaming::lod::{AtomicTier, Tier};
use crate::streaming::slot::{PendingImage, PendingSlot};

/// The shared, thread-safe part of a scene object
pub struct ObjectState {
    /// World transform, translation only; fixed at setup, read by both sides
    transform: Mat4,
    /// Resolution class of the displayed texture; written only at adoption
    tier: AtomicTier,
    /// Handoff slot, worker publishes / render thread drains
    pending: PendingSlot,
}

impl ObjectState {
    /// Create an object at `position` displaying the given initial tier
    pub fn new(position: Vec3, tier: Tier) -> Self {
        Self {
            transform: Mat4::from_translation(position),
            tier: AtomicTier::new(tier),
            pending: PendingSlot::new(),
        }
    }

    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Resolution class of the currently displayed texture
    pub fn tier(&self) -> Tier {
        self.tier.load()
    }

    /// Record the adopted tier; call only after the matching upload succeeded
    pub(crate) fn set_tier(&self, tier: Tier) {
        self.tier.store(tier);
    }

    /// Worker side: publish a decoded image for adoption
    pub fn publish(&self, pending: PendingImage) {
        self.pending.publish(pending);
    }

    /// Render side: drain the pending image, if any
    pub fn take_pending(&self) -> Option<PendingImage> {
        self.pending.take()
    }

    /// True when no image is waiting for adoption
    pub fn has_no_pending(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Build the demo grid: `size` x `size` objects, `spacing` apart, centered
/// on the origin at y = 0, all starting at the low tier
pub fn build_grid(size: u32, spacing: f32) -> Vec<std::sync::Arc<ObjectState>> {
    let half = size as f32 / 2.0;
    let mut objects = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            let position = Vec3::new(
                (x as f32 - half) * spacing,
                0.0,
                (y as f32 - half) * spacing,
            );
            objects.push(std::sync::Arc::new(ObjectState::new(position, Tier::Low)));
        }
    }
    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::DecodedImage;

    #[test]
    fn test_new_object_starts_clean() {
        let obj = ObjectState::new(Vec3::new(5.0, 0.0, -10.0), Tier::Low);
        assert_eq!(obj.tier(), Tier::Low);
        assert!(obj.has_no_pending());
        assert_eq!(obj.transform().w_axis.z, -10.0);
    }

    #[test]
    fn test_publish_does_not_change_tier() {
        let obj = ObjectState::new(Vec3::ZERO, Tier::Low);
        obj.publish(PendingImage {
            tier: Tier::High,
            image: DecodedImage { width: 1, height: 1, data: vec![0; 4] },
        });

        // Tier only moves at adoption
        assert_eq!(obj.tier(), Tier::Low);
        assert!(!obj.has_no_pending());

        let pending = obj.take_pending().unwrap();
        obj.set_tier(pending.tier);
        assert_eq!(obj.tier(), Tier::High);
    }

    #[test]
    fn test_build_grid() {
        let objects = build_grid(10, 10.0);
        assert_eq!(objects.len(), 100);
        assert!(objects.iter().all(|o| o.tier() == Tier::Low));
        assert!(objects.iter().all(|o| o.has_no_pending()));

        // Corners straddle the origin
        let first = objects[0].transform().w_axis;
        let last = objects[99].transform().w_axis;
        assert_eq!((first.x, first.z), (-50.0, -50.0));
        assert_eq!((last.x, last.z), (40.0, 40.0));
    }
}
