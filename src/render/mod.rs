//! GPU rendering: context, mesh, pipeline, and texture residency

pub mod context;
pub mod mesh;
pub mod pipeline;
pub mod texture;

pub use context::GpuContext;
pub use mesh::MeshBuffers;
pub use pipeline::ObjectPipeline;
pub use texture::ObjectTexture;
