use std::sync::Arc;

use glam::Vec3;

use crate::engine::graphics::vertex_buffer::{PositionVertexBuffer, SharedVertexBuffer};

/// Render data for one level of detail.
pub struct LodRenderData {
    pub position_buffer: SharedVertexBuffer,
}

impl LodRenderData {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            position_buffer: PositionVertexBuffer::shared(positions),
        }
    }
}

pub struct SkeletalMeshRenderData {
    pub lods: Vec<LodRenderData>,
}

#[derive(Clone)]
pub struct SkeletalMesh {
    pub name: String,
    pub render_data: Option<Arc<SkeletalMeshRenderData>>,
}

impl SkeletalMesh {
    /// Mesh with a single LOD built from `positions`.
    pub fn from_positions(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self::from_lods(name, vec![positions])
    }

    pub fn from_lods(name: impl Into<String>, lods: Vec<Vec<Vec3>>) -> Self {
        Self {
            name: name.into(),
            render_data: Some(Arc::new(SkeletalMeshRenderData {
                lods: lods.into_iter().map(LodRenderData::new).collect(),
            })),
        }
    }

    pub fn without_render_data(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render_data: None,
        }
    }

    /// Position buffer of the highest-detail LOD, if the mesh has one.
    pub fn lod0_position_buffer(&self) -> Option<&SharedVertexBuffer> {
        self.render_data
            .as_ref()?
            .lods
            .first()
            .map(|lod| &lod.position_buffer)
    }

    pub fn num_lods(&self) -> usize {
        self.render_data.as_ref().map_or(0, |data| data.lods.len())
    }
}
