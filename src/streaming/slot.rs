//! Per-object pending-image slot
//!
//! The slot is the single point of handoff between the streaming worker and
//! the render thread. The mutex and the option it guards are private, so
//! touching the pending image without holding the lock is unrepresentable:
//! the only doors are [`PendingSlot::publish`] and [`PendingSlot::take`],
//! and both keep the critical section to the swap itself.

use std::sync::Mutex;

use crate::assets::DecodedImage;
use crate::streaming::lod::Tier;

/// A decoded image awaiting adoption, tagged with its resolution tier
///
/// Carrying the tier alongside the pixels means adoption can set the
/// object's tier from the same value it uploads, so the two can never
/// disagree.
#[derive(Debug)]
pub struct PendingImage {
    pub tier: Tier,
    pub image: DecodedImage,
}

/// Lock-guarded slot holding at most one pending image
#[derive(Debug, Default)]
pub struct PendingSlot {
    inner: Mutex<Option<PendingImage>>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly decoded image, discarding any unconsumed one
    ///
    /// Last publish wins: a stale image that was never adopted is simply
    /// dropped here. Decoding must already have happened; only the swap
    /// runs under the lock.
    pub fn publish(&self, pending: PendingImage) {
        let mut guard = self.inner.lock().unwrap();
        *guard = Some(pending);
    }

    /// Take ownership of the pending image, leaving the slot empty
    pub fn take(&self) -> Option<PendingImage> {
        self.inner.lock().unwrap().take()
    }

    /// True when no image is waiting
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn image_of(tier: Tier, fill: u8) -> PendingImage {
        PendingImage {
            tier,
            image: DecodedImage {
                width: 4,
                height: 4,
                data: vec![fill; 4 * 4 * 4],
            },
        }
    }

    #[test]
    fn test_publish_then_take() {
        let slot = PendingSlot::new();
        assert!(slot.is_empty());
        assert!(slot.take().is_none());

        slot.publish(image_of(Tier::High, 7));
        assert!(!slot.is_empty());

        let taken = slot.take().unwrap();
        assert_eq!(taken.tier, Tier::High);
        assert!(taken.image.is_complete());
        assert!(slot.is_empty());
    }

    #[test]
    fn test_last_publish_wins() {
        // Scenario: a stale low-tier image is still in the slot when the
        // worker publishes a high-tier one; exactly one image comes out
        let slot = PendingSlot::new();
        slot.publish(image_of(Tier::Low, 1));
        slot.publish(image_of(Tier::High, 2));

        let taken = slot.take().unwrap();
        assert_eq!(taken.tier, Tier::High);
        assert_eq!(taken.image.data[0], 2);
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_concurrent_publish_take_never_tears() {
        // Hammer one slot from a publisher and a consumer; every image the
        // consumer sees must be complete and internally consistent (all
        // bytes equal to the fill value encoding its tier).
        let slot = Arc::new(PendingSlot::new());
        let publisher_slot = slot.clone();

        let publisher = std::thread::spawn(move || {
            for i in 0..5000u32 {
                let tier = if i % 2 == 0 { Tier::Low } else { Tier::High };
                let fill = tier as u8 + 1;
                publisher_slot.publish(image_of(tier, fill));
            }
        });

        let mut seen = 0usize;
        while !publisher.is_finished() || !slot.is_empty() {
            if let Some(pending) = slot.take() {
                assert!(pending.image.is_complete());
                let expected = pending.tier as u8 + 1;
                assert!(pending.image.data.iter().all(|&b| b == expected));
                seen += 1;
            }
        }
        publisher.join().unwrap();
        assert!(seen > 0);
    }
}
