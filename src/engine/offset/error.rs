use thiserror::Error;

use crate::engine::graphics::vertex_buffer::BufferId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OffsetError {
    #[error("no mesh assigned")]
    NoMesh,
    #[error("mesh '{mesh}' has no render data")]
    MissingRenderData { mesh: String },
    #[error("mesh '{mesh}' has no LOD with a position vertex buffer")]
    MissingLod { mesh: String },
    #[error("vertex buffer {id} was released")]
    BufferReleased { id: BufferId },
    #[error("vertex count changed from {expected} to {found}")]
    VertexCountChanged { expected: usize, found: usize },
    #[error("vertex index {index} out of range for buffer of {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },
}

impl OffsetError {
    /// Expected conditions that should not be reported as warnings.
    pub fn is_benign(&self) -> bool {
        matches!(self, OffsetError::NoMesh)
    }
}
