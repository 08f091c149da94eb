//! Render thread and its FIFO command queue.
//!
//! The simulation thread enqueues commands and moves on. Commands run on the
//! render thread strictly in enqueue order.

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::engine::graphics::device::{DeviceStats, RenderDevice};
use crate::engine::graphics::vertex_buffer::{BufferId, SharedVertexBuffer};

pub enum RenderCommand {
    /// Release then re-acquire the device resource from the buffer's current
    /// CPU contents.
    ReinitVertexBuffer(SharedVertexBuffer),
    ReleaseVertexBuffer(BufferId),
    QueryStats(Sender<DeviceStats>),
    Fence(Sender<()>),
    Shutdown,
}

/// Cloneable producer end of the render command queue.
#[derive(Clone)]
pub struct RenderCommandQueue {
    tx: Sender<RenderCommand>,
}

impl RenderCommandQueue {
    /// Fire and forget. A command sent after shutdown is dropped with a warning.
    pub fn enqueue(&self, command: RenderCommand) {
        if self.tx.send(command).is_err() {
            warn!("Render thread is gone, dropping command");
        }
    }

    pub fn reinit_vertex_buffer(&self, buffer: SharedVertexBuffer) {
        self.enqueue(RenderCommand::ReinitVertexBuffer(buffer));
    }

    pub fn release_vertex_buffer(&self, id: BufferId) {
        self.enqueue(RenderCommand::ReleaseVertexBuffer(id));
    }

    /// Commands enqueued but not yet picked up by the render thread.
    pub fn pending(&self) -> usize {
        self.tx.len()
    }

    /// Block until every command enqueued before this call has executed.
    /// Returns false if the render thread is not running.
    pub fn flush(&self) -> bool {
        let (done_tx, done_rx) = bounded(1);
        if self.tx.send(RenderCommand::Fence(done_tx)).is_err() {
            return false;
        }
        done_rx.recv().is_ok()
    }

    /// Device counters once every command enqueued before this call has
    /// executed. `None` if the render thread is not running.
    pub fn device_stats(&self) -> Option<DeviceStats> {
        let (stats_tx, stats_rx) = bounded(1);
        self.tx.send(RenderCommand::QueryStats(stats_tx)).ok()?;
        stats_rx.recv().ok()
    }

    /// A queue whose consumer is the returned receiver. Lets callers drive the
    /// queue without a thread.
    pub fn detached() -> (Self, Receiver<RenderCommand>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

pub struct RenderThread {
    queue: RenderCommandQueue,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    pub fn spawn(device: Box<dyn RenderDevice>) -> Self {
        let (queue, rx) = RenderCommandQueue::detached();
        let handle = std::thread::Builder::new()
            .name("render".into())
            .spawn(move || run(device, rx))
            .map_err(|e| {
                error!("Failed to spawn render thread: {:?}", e);
                e
            })
            .ok();

        Self { queue, handle }
    }

    pub fn queue(&self) -> RenderCommandQueue {
        self.queue.clone()
    }

    pub fn flush(&self) -> bool {
        self.queue.flush()
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.queue.enqueue(RenderCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Render thread panicked");
            }
        }
    }
}

fn run(mut device: Box<dyn RenderDevice>, rx: Receiver<RenderCommand>) {
    info!("Render thread started ({} device)", device.name());
    while let Ok(command) = rx.recv() {
        if !execute(device.as_mut(), command) {
            break;
        }
    }
    info!("Render thread stopped");
}

/// Run one command against `device`. Returns false on shutdown.
pub fn execute(device: &mut dyn RenderDevice, command: RenderCommand) -> bool {
    match command {
        RenderCommand::ReinitVertexBuffer(buffer) => {
            let buffer = buffer.read();
            let id = buffer.id();
            device.release_vertex_buffer(id);
            device.init_vertex_buffer(id, &buffer.device_contents());
            debug!("Reinitialized {} ({} vertices)", id, buffer.num_vertices());
        }
        RenderCommand::ReleaseVertexBuffer(id) => device.release_vertex_buffer(id),
        RenderCommand::QueryStats(reply) => {
            let _ = reply.send(device.stats());
        }
        RenderCommand::Fence(done) => {
            let _ = done.send(());
        }
        RenderCommand::Shutdown => return false,
    }
    true
}
