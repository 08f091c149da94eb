use glam::Vec3;

use crate::engine::graphics::vertex_buffer::PositionVertexBuffer;

/// Original vertex positions captured at activation. Read-only once taken.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    positions: Box<[Vec3]>,
}

impl PositionSnapshot {
    pub fn capture(buffer: &PositionVertexBuffer) -> Self {
        Self {
            positions: buffer.positions().into(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }
}
