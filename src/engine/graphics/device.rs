//! Device resource management for vertex buffers.

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;
use parking_lot::Mutex;

use crate::engine::graphics::vertex::Position;
use crate::engine::graphics::vertex_buffer::BufferId;

/// Owner of the device-side copies of vertex buffers.
///
/// Only ever driven from the render thread. A reinitialization is a
/// `release_vertex_buffer` followed by an `init_vertex_buffer` for the same id.
pub trait RenderDevice: Send {
    fn name(&self) -> &str;

    /// Create (or recreate) the device resource for `id` from `contents`.
    fn init_vertex_buffer(&mut self, id: BufferId, contents: &[Position]);

    /// Drop the device resource for `id`. Releasing an unknown id is a no-op.
    fn release_vertex_buffer(&mut self, id: BufferId);

    /// Counters since the device was created.
    fn stats(&self) -> DeviceStats;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub inits: u64,
    pub releases: u64,
    pub resident: usize,
}

/// One entry of the device operation log kept by [`HeadlessDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOp {
    Init(BufferId),
    Release(BufferId),
}

#[derive(Default)]
struct HeadlessState {
    buffers: HashMap<BufferId, Vec<Position>>,
    log: Vec<DeviceOp>,
    stats: DeviceStats,
}

/// Device that keeps device resources as CPU mirrors.
///
/// Clones share state, so one clone can be handed to the render thread while
/// another is kept around to inspect what the device holds.
#[derive(Clone, Default)]
pub struct HeadlessDevice {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self, id: BufferId) -> Option<Vec<Position>> {
        self.state.lock().buffers.get(&id).cloned()
    }

    pub fn is_resident(&self, id: BufferId) -> bool {
        self.state.lock().buffers.contains_key(&id)
    }

    pub fn stats(&self) -> DeviceStats {
        self.state.lock().stats
    }

    pub fn ops(&self) -> Vec<DeviceOp> {
        self.state.lock().log.clone()
    }
}

impl RenderDevice for HeadlessDevice {
    fn name(&self) -> &str {
        "headless"
    }

    fn init_vertex_buffer(&mut self, id: BufferId, contents: &[Position]) {
        let mut state = self.state.lock();
        state.buffers.insert(id, contents.to_vec());
        state.log.push(DeviceOp::Init(id));
        state.stats.inits += 1;
        state.stats.resident = state.buffers.len();
        trace!("headless: init {} ({} vertices)", id, contents.len());
    }

    fn release_vertex_buffer(&mut self, id: BufferId) {
        let mut state = self.state.lock();
        state.buffers.remove(&id);
        state.log.push(DeviceOp::Release(id));
        state.stats.releases += 1;
        state.stats.resident = state.buffers.len();
        trace!("headless: release {}", id);
    }

    fn stats(&self) -> DeviceStats {
        self.state.lock().stats
    }
}
