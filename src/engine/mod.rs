//! Engine module containing graphics, mesh data, and vertex offsetting.

pub mod graphics;
pub mod mesh;
pub mod offset;

// Re-export commonly used types
pub use graphics::{HeadlessDevice, RenderThread, Renderer};
pub use mesh::SkeletalMesh;
pub use offset::VertexOffsetEngine;
