use std::collections::HashMap;

use log::{debug, info};
use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::engine::graphics::device::{DeviceStats, RenderDevice};
use crate::engine::graphics::vertex::Position;
use crate::engine::graphics::vertex_buffer::BufferId;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("no suitable graphics adapter found")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// wgpu-backed device. Runs without a surface; vertex buffers are created on
/// the device but nothing is drawn.
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffers: HashMap<BufferId, wgpu::Buffer>,
    stats: DeviceStats,
}

impl Renderer {
    pub async fn new_headless() -> Result<Self, RendererError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Vertex Offset Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        info!("Using adapter: {}", adapter.get_info().name);

        Ok(Self {
            device,
            queue,
            buffers: HashMap::new(),
            stats: DeviceStats::default(),
        })
    }
}

impl RenderDevice for Renderer {
    fn name(&self) -> &str {
        "wgpu"
    }

    fn init_vertex_buffer(&mut self, id: BufferId, contents: &[Position]) {
        let label = format!("Position Vertex Buffer {}", id);
        // Zero-sized buffers are valid in wgpu but cannot be bound; keep one
        // vertex of padding so the resource always exists.
        let padding = [Position::default()];
        let data: &[Position] = if contents.is_empty() { &padding } else { contents };

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label.as_str()),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        if let Some(old) = self.buffers.insert(id, buffer) {
            old.destroy();
        }
        self.stats.inits += 1;
        self.stats.resident = self.buffers.len();
        self.queue.submit(std::iter::empty());
        debug!("wgpu: init {} ({} vertices)", id, contents.len());
    }

    fn release_vertex_buffer(&mut self, id: BufferId) {
        self.stats.releases += 1;
        if let Some(buffer) = self.buffers.remove(&id) {
            buffer.destroy();
            self.stats.resident = self.buffers.len();
            debug!("wgpu: release {}", id);
        }
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }
}
