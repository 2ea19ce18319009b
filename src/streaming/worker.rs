//! Background streaming worker
//!
//! One OS thread re-evaluates the LOD policy for every scene object, decodes
//! the image for any object whose desired tier changed, and publishes the
//! decoded buffer into the object's pending slot. Decoding always happens
//! outside the slot lock; the render thread adopts on its next frame.
//!
//! The worker and the render loop run at independent rates. The per-object
//! in-flight target keeps a pass from re-decoding an image it already
//! published, and the slot's last-publish-wins semantics make extra passes
//! between two frames harmless.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use glam::Mat4;

use crate::assets::{self, AssetPaths};
use crate::core::error::Error;
use crate::scene::object::ObjectState;
use crate::streaming::lod::{LodConfig, Tier};
use crate::streaming::slot::PendingImage;

/// Source image paths for the two tiers
#[derive(Debug, Clone)]
pub struct StreamSources {
    /// High tier: the full-resolution image
    pub detail: PathBuf,
    /// Low tier: the thumbnail
    pub thumb: PathBuf,
}

impl StreamSources {
    pub fn path_for(&self, tier: Tier) -> &Path {
        match tier {
            Tier::High => &self.detail,
            Tier::Low => &self.thumb,
        }
    }
}

impl From<AssetPaths> for StreamSources {
    fn from(paths: AssetPaths) -> Self {
        Self {
            detail: paths.detail,
            thumb: paths.thumb,
        }
    }
}

/// The current view matrix, shared render thread -> worker
///
/// Sixteen relaxed atomic cells instead of a lock: the render thread must
/// never wait on the worker to publish a camera update. A reader may see a
/// matrix mixing two frames; the worst outcome is one stale tier decision,
/// corrected on the next pass, which is an accepted part of the design.
pub struct SharedView {
    cells: [AtomicU32; 16],
}

impl SharedView {
    /// Start out with the identity view
    pub fn new() -> Self {
        let this = Self {
            cells: std::array::from_fn(|_| AtomicU32::new(0)),
        };
        this.store(&Mat4::IDENTITY);
        this
    }

    /// Publish the view matrix for this frame
    pub fn store(&self, view: &Mat4) {
        for (cell, value) in self.cells.iter().zip(view.to_cols_array()) {
            cell.store(value.to_bits(), Ordering::Relaxed);
        }
    }

    /// Snapshot the most recently published view
    pub fn load(&self) -> Mat4 {
        let mut values = [0.0f32; 16];
        for (value, cell) in values.iter_mut().zip(&self.cells) {
            *value = f32::from_bits(cell.load(Ordering::Relaxed));
        }
        Mat4::from_cols_array(&values)
    }
}

impl Default for SharedView {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single streaming pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    /// Images decoded and published
    pub decoded: usize,
    /// Objects whose desired tier matched the in-flight target
    pub skipped: usize,
    /// Decode failures, retried on the next pass
    pub failed: usize,
}

/// Evaluate every object once and publish any tier transitions
///
/// `targets` is the worker's in-flight bookkeeping: the tier it last
/// published (or observed at startup) per object. Comparing against it
/// instead of the object's own tier keeps the debounce correct while an
/// adoption is still outstanding; the object's tier field moves only when
/// the render thread adopts.
pub fn stream_pass(
    view: &Mat4,
    policy: &LodConfig,
    sources: &StreamSources,
    objects: &[Arc<ObjectState>],
    targets: &mut [Tier],
) -> PassStats {
    let mut stats = PassStats::default();

    for (object, target) in objects.iter().zip(targets.iter_mut()) {
        // An empty slot whose displayed tier disagrees with the in-flight
        // target means the render thread dropped the image without adopting
        // it (rejected upload). Fall back to the displayed tier so the
        // transition is decoded again instead of debounced forever.
        if object.has_no_pending() {
            let displayed = object.tier();
            if displayed != *target {
                *target = displayed;
            }
        }

        let desired = policy.desired_tier(view, object.transform());
        if desired == *target {
            stats.skipped += 1;
            continue;
        }

        // Decode before taking the slot lock; a failure skips this object
        // for the pass and leaves the target unchanged so it is retried
        match assets::decode(sources.path_for(desired)) {
            Ok(image) => {
                object.publish(PendingImage { tier: desired, image });
                *target = desired;
                stats.decoded += 1;
            }
            Err(e) => {
                log::warn!("tier {desired:?} decode failed: {e}");
                stats.failed += 1;
            }
        }
    }

    stats
}

/// Handle to the background streaming thread
///
/// The thread checks a stop flag every pass and sleeps between passes;
/// [`StreamingWorker::stop`] (or drop) raises the flag and joins.
pub struct StreamingWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StreamingWorker {
    /// Spawn the worker thread
    pub fn start(
        objects: Vec<Arc<ObjectState>>,
        view: Arc<SharedView>,
        policy: LodConfig,
        sources: StreamSources,
        interval: Duration,
    ) -> Result<Self, Error> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = std::thread::Builder::new()
            .name("lod-streaming".into())
            .spawn(move || {
                log::info!("streaming worker started, {} objects", objects.len());
                let mut targets: Vec<Tier> = objects.iter().map(|o| o.tier()).collect();

                while !stop_flag.load(Ordering::Relaxed) {
                    let snapshot = view.load();
                    let stats = stream_pass(&snapshot, &policy, &sources, &objects, &mut targets);
                    if stats.decoded > 0 || stats.failed > 0 {
                        log::debug!(
                            "streaming pass: {} decoded, {} failed",
                            stats.decoded,
                            stats.failed
                        );
                    }
                    std::thread::sleep(interval);
                }
                log::info!("streaming worker stopped");
            })
            .map_err(|e| Error::Streaming(format!("failed to spawn worker: {e}")))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the worker to stop and wait for it to finish
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("streaming worker panicked");
            }
        }
    }
}

impl Drop for StreamingWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
