//! Per-frame adoption of pending images
//!
//! Runs on the render thread, once per frame, before drawing. The slot lock
//! is held only for the take; channel reordering and the GPU upload happen
//! after release, so a slow decode or upload never extends the worker's or
//! the render thread's critical section.

use std::sync::Arc;

use crate::render::{ObjectPipeline, ObjectTexture};
use crate::scene::object::ObjectState;

/// Render-thread-owned half of a scene object
pub struct SceneObject {
    /// Shared state, also held by the streaming worker
    pub state: Arc<ObjectState>,
    /// Currently displayed texture; replaced wholesale at adoption
    pub texture: ObjectTexture,
    /// Model-matrix uniform, fixed at setup
    pub model_buffer: wgpu::Buffer,
    /// Bind group over `model_buffer` and the current texture
    pub bind_group: wgpu::BindGroup,
}

/// Reorder RGBA bytes into BGRA in place (stride 4, alpha untouched)
pub fn convert_rgba_to_bgra(data: &mut [u8]) {
    for pixel in data.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
}

/// Drain every object's pending slot and swap in the new textures
///
/// Returns the number of adoptions. An object whose upload is rejected
/// keeps its previous texture and tier; the image is dropped, and the
/// worker sees the displayed tier still disagreeing with its decision and
/// decodes the transition again on a later pass.
pub fn adopt_pending(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &ObjectPipeline,
    objects: &mut [SceneObject],
) -> usize {
    let mut adopted = 0;

    for object in objects.iter_mut() {
        let Some(mut pending) = object.state.take_pending() else {
            continue;
        };

        convert_rgba_to_bgra(&mut pending.image.data);

        match ObjectTexture::upload(
            device,
            queue,
            pending.image.width,
            pending.image.height,
            &pending.image.data,
        ) {
            Ok(texture) => {
                object.bind_group =
                    pipeline.create_object_bind_group(device, &object.model_buffer, &texture.view);
                // Old texture is released here; tier moves with the upload
                object.texture = texture;
                object.state.set_tier(pending.tier);
                adopted += 1;
            }
            Err(e) => {
                log::warn!("texture adoption failed, keeping previous: {e}");
            }
        }
    }

    adopted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::DecodedImage;
    use crate::streaming::{PendingImage, Tier};
    use glam::Vec3;

    #[test]
    fn test_convert_rgba_to_bgra() {
        let mut data = vec![1, 2, 3, 4, 10, 20, 30, 40];
        convert_rgba_to_bgra(&mut data);
        assert_eq!(data, vec![3, 2, 1, 4, 30, 20, 10, 40]);
    }

    #[test]
    fn test_convert_is_an_involution() {
        let original: Vec<u8> = (0..64).collect();
        let mut data = original.clone();
        convert_rgba_to_bgra(&mut data);
        convert_rgba_to_bgra(&mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn test_adoption_protocol_sets_tier_from_pending() {
        // CPU half of adoption: drain under the lock, then record the tier
        // the drained image carries. The GPU upload is exercised in the
        // running viewer.
        let state = ObjectState::new(Vec3::ZERO, Tier::Low);
        state.publish(PendingImage {
            tier: Tier::High,
            image: DecodedImage { width: 2, height: 2, data: vec![0; 16] },
        });

        let pending = state.take_pending().expect("image was pending");
        assert!(pending.image.is_complete());
        state.set_tier(pending.tier);

        assert_eq!(state.tier(), Tier::High);
        assert!(state.has_no_pending());
        // A second drain in the same frame finds nothing
        assert!(state.take_pending().is_none());
    }
}
