use glam::Vec3;

/// Device layout of a single entry in a position vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Position {
    pub position: [f32; 3],
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self { position: v.to_array() }
    }
}

impl From<Position> for Vec3 {
    fn from(p: Position) -> Self {
        Vec3::from_array(p.position)
    }
}

// Corner positions of a unit cube, 4 per face, used by the demo binary when no
// glTF file is given.
pub const CUBE_POSITIONS: &[[f32; 3]] = &[
    // Front face
    [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
    // Back face
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
    // Left face
    [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
    // Right face
    [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5],
    // Top face
    [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
    // Bottom face
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
];

pub fn cube_positions() -> Vec<Vec3> {
    CUBE_POSITIONS.iter().copied().map(Vec3::from_array).collect()
}
