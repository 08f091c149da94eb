//! Per-frame vertex offsetting of mesh position buffers.

pub mod engine;
pub mod error;
pub mod mode;
pub mod snapshot;

pub use engine::VertexOffsetEngine;
pub use error::OffsetError;
pub use mode::OffsetMode;
pub use snapshot::PositionSnapshot;
