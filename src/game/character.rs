//! Character implementation.

use log::{debug, warn};

use crate::engine::graphics::render_thread::RenderCommandQueue;
use crate::engine::graphics::vertex_buffer::BufferId;
use crate::engine::mesh::SkeletalMesh;
use crate::engine::offset::{OffsetMode, VertexOffsetEngine};

pub struct Character {
    pub name: String,
    mesh: Option<SkeletalMesh>,
    vertex_offset: VertexOffsetEngine,
    queue: RenderCommandQueue,
    // Buffer captured during play. Its device resource is released once the
    // character moves on to another buffer.
    captured: Option<BufferId>,
    playing: bool,
}

impl Character {
    pub fn new(name: impl Into<String>, mesh: Option<SkeletalMesh>, queue: RenderCommandQueue) -> Self {
        Self {
            name: name.into(),
            mesh,
            vertex_offset: VertexOffsetEngine::new(queue.clone()),
            queue,
            captured: None,
            playing: false,
        }
    }

    pub fn with_offset_mode(mut self, mode: OffsetMode) -> Self {
        self.vertex_offset.set_mode(mode);
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.vertex_offset.set_parallel_threshold(threshold);
        self
    }

    pub fn begin_play(&mut self) {
        self.playing = true;
        self.capture();
    }

    pub fn tick(&mut self, delta_time: f32) {
        if !self.playing {
            return;
        }

        // Re-capture if the mesh's LOD 0 buffer is no longer the one bound,
        // including when nothing was bound yet.
        let current = self
            .mesh
            .as_ref()
            .and_then(|m| m.lod0_position_buffer())
            .map(|vb| vb.read().id());
        if current != self.vertex_offset.bound_buffer() {
            debug!("{}: mesh buffer changed, re-capturing", self.name);
            self.capture();
        }

        if let Err(e) = self.vertex_offset.tick(delta_time) {
            warn!("{}: vertex offset tick failed: {}", self.name, e);
        }
    }

    /// Restore the original positions. The restored buffer stays resident on
    /// the device.
    pub fn end_play(&mut self) {
        self.playing = false;
        self.captured = None;
        if let Err(e) = self.vertex_offset.deactivate() {
            warn!("{}: failed to restore vertex positions: {}", self.name, e);
        }
    }

    /// Swap the mesh. The old mesh gets its original positions back, and while
    /// playing its device buffer is released after the restoring upload.
    pub fn set_mesh(&mut self, mesh: Option<SkeletalMesh>) {
        if let Err(e) = self.vertex_offset.deactivate() {
            warn!("{}: failed to restore vertex positions: {}", self.name, e);
        }
        self.mesh = mesh;
        if self.playing {
            self.capture();
        }
    }

    pub fn mesh(&self) -> Option<&SkeletalMesh> {
        self.mesh.as_ref()
    }

    /// Mutable access, e.g. to swap render data in place. The next tick
    /// notices a changed LOD 0 buffer and re-captures.
    pub fn mesh_mut(&mut self) -> Option<&mut SkeletalMesh> {
        self.mesh.as_mut()
    }

    pub fn vertex_offset(&self) -> &VertexOffsetEngine {
        &self.vertex_offset
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn capture(&mut self) {
        match self.vertex_offset.activate(self.mesh.as_ref()) {
            Ok(()) => {}
            Err(e) if e.is_benign() => debug!("{}: {}, vertex offset disabled", self.name, e),
            Err(e) => warn!("{}: {}, vertex offset disabled", self.name, e),
        }

        let bound = self.vertex_offset.bound_buffer();
        if let Some(old) = self.captured.filter(|old| Some(*old) != bound) {
            debug!("{}: releasing device buffer {}", self.name, old);
            self.queue.release_vertex_buffer(old);
        }
        self.captured = bound;
    }
}

impl Drop for Character {
    fn drop(&mut self) {
        if self.playing {
            self.end_play();
        }
    }
}
