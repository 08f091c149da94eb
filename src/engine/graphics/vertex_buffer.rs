//! CPU side of a mesh's position vertex buffer.
//!
//! The buffer is owned by the mesh render data and shared with the render
//! thread through [`SharedVertexBuffer`]. Writes only become visible on the
//! device after a reinitialization request has been processed.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;

use crate::engine::graphics::vertex::Position;
use crate::engine::offset::OffsetError;

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vb#{}", self.0)
    }
}

pub type SharedVertexBuffer = Arc<RwLock<PositionVertexBuffer>>;

#[derive(Debug)]
pub struct PositionVertexBuffer {
    id: BufferId,
    positions: Vec<Vec3>,
}

impl PositionVertexBuffer {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            id: BufferId::next(),
            positions,
        }
    }

    pub fn shared(positions: Vec<Vec3>) -> SharedVertexBuffer {
        Arc::new(RwLock::new(Self::new(positions)))
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn vertex_position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    pub fn set_vertex_position(&mut self, index: usize, position: Vec3) -> Result<(), OffsetError> {
        let len = self.positions.len();
        match self.positions.get_mut(index) {
            Some(slot) => {
                *slot = position;
                Ok(())
            }
            None => Err(OffsetError::IndexOutOfRange { index, len }),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Mutable view for bulk writes. The length cannot change through it.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Contents in device layout, ready for upload.
    pub fn device_contents(&self) -> Vec<Position> {
        self.positions.iter().copied().map(Position::from).collect()
    }
}
