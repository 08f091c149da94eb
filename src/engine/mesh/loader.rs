//! glTF 2.0 loading for skeletal meshes.
//!
//! The selected glTF mesh becomes LOD 0. Its primitives' POSITION streams are
//! concatenated in document order.

use std::path::Path;

use glam::Vec3;
use log::{debug, info};
use thiserror::Error;

use crate::engine::mesh::render_data::SkeletalMesh;

#[derive(Debug, Error)]
pub enum MeshLoadError {
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("mesh '{0}' not found")]
    MeshNotFound(String),
    #[error("document contains no meshes")]
    NoMeshes,
    #[error("mesh '{0}' has no POSITION attribute")]
    NoPositions(String),
}

pub fn load_skeletal_mesh(path: impl AsRef<Path>, mesh_name: Option<&str>) -> Result<SkeletalMesh, MeshLoadError> {
    let path = path.as_ref();
    info!("Loading mesh from {}", path.display());
    let (document, buffers, _images) = gltf::import(path)?;
    build(&document, &buffers, mesh_name)
}

pub fn skeletal_mesh_from_slice(bytes: &[u8], mesh_name: Option<&str>) -> Result<SkeletalMesh, MeshLoadError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    build(&document, &buffers, mesh_name)
}

fn build(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    mesh_name: Option<&str>,
) -> Result<SkeletalMesh, MeshLoadError> {
    let mesh = match mesh_name {
        Some(wanted) => document
            .meshes()
            .find(|m| m.name() == Some(wanted))
            .ok_or_else(|| MeshLoadError::MeshNotFound(wanted.to_string()))?,
        None => document.meshes().next().ok_or(MeshLoadError::NoMeshes)?,
    };
    let name = mesh
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh{}", mesh.index()));

    let mut positions = Vec::new();
    let mut found = false;
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));
        if let Some(iter) = reader.read_positions() {
            found = true;
            positions.extend(iter.map(Vec3::from_array));
        }
    }
    if !found {
        return Err(MeshLoadError::NoPositions(name));
    }

    debug!("Mesh '{}': {} vertices", name, positions.len());
    Ok(SkeletalMesh::from_positions(name, positions))
}
