//! Mesh and render data provider.

pub mod loader;
pub mod render_data;

pub use loader::{load_skeletal_mesh, skeletal_mesh_from_slice, MeshLoadError};
pub use render_data::{LodRenderData, SkeletalMesh, SkeletalMeshRenderData};
