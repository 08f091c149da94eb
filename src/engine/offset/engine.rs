use std::sync::{Arc, Weak};

use glam::Vec3;
use log::{debug, info, trace, warn};
use parking_lot::RwLock;
use rayon::prelude::*;

use crate::engine::graphics::render_thread::RenderCommandQueue;
use crate::engine::graphics::vertex_buffer::{BufferId, PositionVertexBuffer, SharedVertexBuffer};
use crate::engine::mesh::SkeletalMesh;
use crate::engine::offset::error::OffsetError;
use crate::engine::offset::mode::OffsetMode;
use crate::engine::offset::snapshot::PositionSnapshot;

pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

struct Binding {
    buffer: Weak<RwLock<PositionVertexBuffer>>,
    buffer_id: BufferId,
    snapshot: PositionSnapshot,
    elapsed: f32,
}

/// Deforms a mesh's LOD 0 position buffer every frame, relative to the
/// positions captured at activation, and puts them back on deactivation.
///
/// The engine never owns the buffer. It keeps a weak back-reference and checks
/// it before every write.
pub struct VertexOffsetEngine {
    mode: OffsetMode,
    parallel_threshold: usize,
    queue: RenderCommandQueue,
    binding: Option<Binding>,
}

impl VertexOffsetEngine {
    pub fn new(queue: RenderCommandQueue) -> Self {
        Self {
            mode: OffsetMode::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            queue,
            binding: None,
        }
    }

    pub fn with_mode(mut self, mode: OffsetMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Takes effect from the next tick. Elapsed time is not reset.
    pub fn set_mode(&mut self, mode: OffsetMode) {
        self.mode = mode;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn mode(&self) -> OffsetMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.binding.is_some()
    }

    pub fn bound_buffer(&self) -> Option<BufferId> {
        self.binding.as_ref().map(|b| b.buffer_id)
    }

    pub fn snapshot(&self) -> Option<&PositionSnapshot> {
        self.binding.as_ref().map(|b| &b.snapshot)
    }

    /// Capture the LOD 0 positions of `mesh`. On error the engine stays
    /// inactive. An already active engine is deactivated first; a failed
    /// restore is logged and does not block the new capture.
    pub fn activate(&mut self, mesh: Option<&SkeletalMesh>) -> Result<(), OffsetError> {
        if let Err(e) = self.deactivate() {
            warn!("Could not restore previous buffer: {}", e);
        }

        let mesh = mesh.ok_or(OffsetError::NoMesh)?;
        let render_data = mesh
            .render_data
            .as_ref()
            .ok_or_else(|| OffsetError::MissingRenderData { mesh: mesh.name.clone() })?;
        let buffer = render_data
            .lods
            .first()
            .map(|lod| &lod.position_buffer)
            .ok_or_else(|| OffsetError::MissingLod { mesh: mesh.name.clone() })?;

        let (buffer_id, snapshot) = {
            let vb = buffer.read();
            (vb.id(), PositionSnapshot::capture(&vb))
        };
        info!(
            "Vertex offset active on '{}' ({}, {} vertices)",
            mesh.name,
            buffer_id,
            snapshot.len()
        );

        self.binding = Some(Binding {
            buffer: Arc::downgrade(buffer),
            buffer_id,
            snapshot,
            elapsed: 0.0,
        });
        Ok(())
    }

    /// Write `snapshot + offset` into the live buffer and request a device
    /// reinitialization. Does nothing while inactive. A released buffer or a
    /// changed vertex count deactivates the engine without writing.
    pub fn tick(&mut self, delta_time: f32) -> Result<(), OffsetError> {
        let Some(binding) = self.binding.as_mut() else {
            return Ok(());
        };

        let buffer = match upgrade(binding) {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!("{}, deactivating vertex offset", e);
                self.binding = None;
                return Err(e);
            }
        };

        binding.elapsed += delta_time;
        let offset = self.mode.offset(binding.elapsed);
        {
            let mut vb = buffer.write();
            if let Err(e) = check_len(&binding.snapshot, &vb) {
                drop(vb);
                warn!("{}, deactivating vertex offset", e);
                self.binding = None;
                return Err(e);
            }
            apply(binding.snapshot.positions(), vb.positions_mut(), offset, self.parallel_threshold);
        }
        trace!("Offset {} by {:?}", binding.buffer_id, offset);

        self.queue.reinit_vertex_buffer(buffer);
        Ok(())
    }

    /// Restore the captured positions and request a device reinitialization.
    /// A no-op while inactive.
    pub fn deactivate(&mut self) -> Result<(), OffsetError> {
        let Some(binding) = self.binding.take() else {
            return Ok(());
        };

        let buffer = match upgrade(&binding) {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!("{}, nothing to restore", e);
                return Ok(());
            }
        };

        {
            let mut vb = buffer.write();
            check_len(&binding.snapshot, &vb)?;
            vb.positions_mut().copy_from_slice(binding.snapshot.positions());
        }
        debug!("Restored {} original positions on {}", binding.snapshot.len(), binding.buffer_id);

        self.queue.reinit_vertex_buffer(buffer);
        Ok(())
    }
}

impl Drop for VertexOffsetEngine {
    fn drop(&mut self) {
        if let Err(e) = self.deactivate() {
            warn!("Failed to restore positions on drop: {}", e);
        }
    }
}

fn upgrade(binding: &Binding) -> Result<SharedVertexBuffer, OffsetError> {
    binding
        .buffer
        .upgrade()
        .ok_or(OffsetError::BufferReleased { id: binding.buffer_id })
}

fn check_len(snapshot: &PositionSnapshot, vb: &PositionVertexBuffer) -> Result<(), OffsetError> {
    if snapshot.len() == vb.num_vertices() {
        Ok(())
    } else {
        Err(OffsetError::VertexCountChanged {
            expected: snapshot.len(),
            found: vb.num_vertices(),
        })
    }
}

fn apply(snapshot: &[Vec3], live: &mut [Vec3], offset: Vec3, parallel_threshold: usize) {
    debug_assert_eq!(snapshot.len(), live.len(), "snapshot and buffer out of step");
    if live.len() >= parallel_threshold {
        live.par_iter_mut()
            .zip(snapshot.par_iter())
            .for_each(|(dst, src)| *dst = *src + offset);
    } else {
        for (dst, src) in live.iter_mut().zip(snapshot) {
            *dst = *src + offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graphics::render_thread::RenderCommand;
    use crossbeam_channel::Receiver;

    fn engine() -> (VertexOffsetEngine, Receiver<RenderCommand>) {
        let (queue, rx) = RenderCommandQueue::detached();
        (VertexOffsetEngine::new(queue), rx)
    }

    fn positions(mesh: &SkeletalMesh) -> Vec<Vec3> {
        mesh.lod0_position_buffer().unwrap().read().positions().to_vec()
    }

    fn triangle() -> SkeletalMesh {
        SkeletalMesh::from_positions("triangle", vec![Vec3::ZERO, Vec3::X, Vec3::Y])
    }

    #[test]
    fn snapshot_matches_buffer() {
        let (mut engine, _rx) = engine();
        let mesh = triangle();
        engine.activate(Some(&mesh)).unwrap();

        assert!(engine.is_active());
        assert_eq!(engine.snapshot().unwrap().positions(), positions(&mesh).as_slice());
        assert_eq!(engine.bound_buffer(), Some(mesh.lod0_position_buffer().unwrap().read().id()));
    }

    #[test]
    fn tick_offsets_from_snapshot_not_cumulatively() {
        let (mut engine, rx) = engine();
        let mesh = triangle();
        engine.activate(Some(&mesh)).unwrap();

        let expected = vec![
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(11.0, 10.0, 10.0),
            Vec3::new(10.0, 11.0, 10.0),
        ];
        engine.tick(0.016).unwrap();
        assert_eq!(positions(&mesh), expected);
        engine.tick(0.016).unwrap();
        assert_eq!(positions(&mesh), expected);

        assert_eq!(rx.len(), 2);
        assert!(rx.try_iter().all(|c| matches!(c, RenderCommand::ReinitVertexBuffer(_))));
    }

    #[test]
    fn deactivate_restores_and_is_idempotent() {
        let (mut engine, rx) = engine();
        let mesh = triangle();
        engine.activate(Some(&mesh)).unwrap();
        for _ in 0..5 {
            engine.tick(0.1).unwrap();
        }

        engine.deactivate().unwrap();
        assert_eq!(positions(&mesh), vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert!(!engine.is_active());
        assert_eq!(rx.len(), 6);

        engine.deactivate().unwrap();
        assert_eq!(positions(&mesh), vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(rx.len(), 6);
    }

    #[test]
    fn zero_vertices_still_request_reinit() {
        let (mut engine, rx) = engine();
        let mesh = SkeletalMesh::from_positions("empty", Vec::new());
        engine.activate(Some(&mesh)).unwrap();
        assert!(engine.snapshot().unwrap().is_empty());

        engine.tick(0.016).unwrap();
        engine.deactivate().unwrap();
        assert_eq!(rx.len(), 2);
    }

    #[test]
    fn inactive_tick_is_a_no_op() {
        let (mut engine, rx) = engine();
        engine.tick(0.016).unwrap();
        engine.deactivate().unwrap();
        assert!(rx.is_empty());
    }

    #[test]
    fn activation_failures_leave_engine_inactive() {
        let (mut engine, rx) = engine();

        assert_eq!(engine.activate(None), Err(OffsetError::NoMesh));
        assert!(matches!(
            engine.activate(Some(&SkeletalMesh::without_render_data("bare"))),
            Err(OffsetError::MissingRenderData { .. })
        ));
        assert!(matches!(
            engine.activate(Some(&SkeletalMesh::from_lods("nolod", Vec::new()))),
            Err(OffsetError::MissingLod { .. })
        ));
        assert!(!engine.is_active());
        engine.tick(0.016).unwrap();
        assert!(rx.is_empty());
    }

    #[test]
    fn released_buffer_deactivates() {
        let (mut engine, _rx) = engine();
        let mesh = triangle();
        engine.activate(Some(&mesh)).unwrap();
        let id = engine.bound_buffer().unwrap();
        drop(mesh);

        assert_eq!(engine.tick(0.016), Err(OffsetError::BufferReleased { id }));
        assert!(!engine.is_active());
    }

    #[test]
    fn changed_vertex_count_deactivates_without_writing() {
        let (mut engine, rx) = engine();
        let mesh = triangle();
        engine.activate(Some(&mesh)).unwrap();

        let buffer = mesh.lod0_position_buffer().unwrap();
        let resized = vec![Vec3::ONE; 4];
        *buffer.write() = PositionVertexBuffer::new(resized.clone());

        assert_eq!(
            engine.tick(0.016),
            Err(OffsetError::VertexCountChanged { expected: 3, found: 4 })
        );
        assert!(!engine.is_active());
        assert_eq!(positions(&mesh), resized);
        assert!(rx.is_empty());

        engine.activate(Some(&mesh)).unwrap();
        engine.tick(0.016).unwrap();
        assert_eq!(positions(&mesh), vec![Vec3::splat(11.0); 4]);
    }

    #[test]
    fn oscillation_is_relative_to_snapshot_across_a_period() {
        let amplitude = Vec3::new(2.0, 0.0, -1.0);
        let frequency = 0.5;
        let (queue, _rx) = RenderCommandQueue::detached();
        let mut engine = VertexOffsetEngine::new(queue)
            .with_mode(OffsetMode::Oscillate { amplitude, frequency });
        let original = vec![Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)];
        let mesh = SkeletalMesh::from_positions("m", original.clone());
        engine.activate(Some(&mesh)).unwrap();

        // 0.25s steps across 1.5 periods of a 0.5 Hz wave
        let dt = 0.25;
        for step in 1..=12 {
            engine.tick(dt).unwrap();
            let elapsed = dt * step as f32;
            let offset = amplitude * (std::f32::consts::TAU * frequency * elapsed).sin();
            for (live, base) in positions(&mesh).iter().zip(&original) {
                assert!(
                    live.abs_diff_eq(*base + offset, 1e-4),
                    "step {}: {:?} != {:?}",
                    step,
                    live,
                    *base + offset
                );
            }
        }

        engine.deactivate().unwrap();
        assert_eq!(positions(&mesh), original);
    }

    #[test]
    fn reactivation_restores_previous_mesh() {
        let (mut engine, _rx) = engine();
        let first = triangle();
        let second = SkeletalMesh::from_positions("second", vec![Vec3::Z]);

        engine.activate(Some(&first)).unwrap();
        engine.tick(0.016).unwrap();
        engine.activate(Some(&second)).unwrap();

        assert_eq!(positions(&first), vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(engine.snapshot().unwrap().positions(), &[Vec3::Z]);
    }

    #[test]
    fn time_scaled_mode_is_relative_to_snapshot() {
        let (queue, _rx) = RenderCommandQueue::detached();
        let mut engine = VertexOffsetEngine::new(queue)
            .with_mode(OffsetMode::TimeScaled { velocity: Vec3::X });
        let mesh = SkeletalMesh::from_positions("m", vec![Vec3::ZERO]);
        engine.activate(Some(&mesh)).unwrap();

        engine.tick(0.5).unwrap();
        assert_eq!(positions(&mesh), vec![Vec3::new(0.5, 0.0, 0.0)]);
        engine.tick(0.5).unwrap();
        assert_eq!(positions(&mesh), vec![Vec3::new(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn parallel_path_matches_serial() {
        let (queue, _rx) = RenderCommandQueue::detached();
        let mut engine = VertexOffsetEngine::new(queue).with_parallel_threshold(1);
        let original: Vec<Vec3> = (0..1000).map(|i| Vec3::splat(i as f32)).collect();
        let mesh = SkeletalMesh::from_positions("big", original.clone());
        engine.activate(Some(&mesh)).unwrap();
        engine.tick(0.016).unwrap();

        let expected: Vec<Vec3> = original.iter().map(|p| *p + Vec3::splat(10.0)).collect();
        assert_eq!(positions(&mesh), expected);
    }

    #[test]
    fn drop_restores_positions() {
        let mesh = triangle();
        {
            let (mut engine, _rx) = engine();
            engine.activate(Some(&mesh)).unwrap();
            engine.tick(0.016).unwrap();
        }
        assert_eq!(positions(&mesh), vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    }
}
