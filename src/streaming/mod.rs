//! Asynchronous LOD texture streaming

pub mod lod;
pub mod slot;
pub mod worker;

pub use lod::{AtomicTier, LodConfig, Tier};
pub use slot::{PendingImage, PendingSlot};
pub use worker::{PassStats, SharedView, StreamSources, StreamingWorker, stream_pass};
