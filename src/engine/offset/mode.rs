use std::f32::consts::TAU;

use glam::Vec3;

pub const DEFAULT_OFFSET: Vec3 = Vec3::new(10.0, 10.0, 10.0);

/// How the per-frame offset is derived. Every mode is applied relative to the
/// captured snapshot, so offsets never accumulate on the live buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OffsetMode {
    /// Same offset every frame, regardless of elapsed time.
    Constant(Vec3),
    /// Drifts linearly: `velocity * elapsed`.
    TimeScaled { velocity: Vec3 },
    /// `amplitude * sin(2π * frequency * elapsed)`.
    Oscillate { amplitude: Vec3, frequency: f32 },
}

impl Default for OffsetMode {
    fn default() -> Self {
        OffsetMode::Constant(DEFAULT_OFFSET)
    }
}

impl OffsetMode {
    /// Offset for a frame, `elapsed` seconds after activation.
    pub fn offset(&self, elapsed: f32) -> Vec3 {
        match *self {
            OffsetMode::Constant(offset) => offset,
            OffsetMode::TimeScaled { velocity } => velocity * elapsed,
            OffsetMode::Oscillate { amplitude, frequency } => {
                amplitude * (TAU * frequency * elapsed).sin()
            }
        }
    }
}
