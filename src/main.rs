//! Application entry point. See `vertex-offset --help`.

use clap::Parser;
use log::{error, info, warn};

use vertex_offset::config::{Args, CliDevice};
use vertex_offset::engine::graphics::{HeadlessDevice, RenderDevice, RenderThread, Renderer};
use vertex_offset::engine::graphics::vertex::cube_positions;
use vertex_offset::engine::mesh::{load_skeletal_mesh, SkeletalMesh};
use vertex_offset::{App, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    info!("Logger initialized");

    let args = Args::parse();
    let settings = Settings::from(&args);

    let mesh = match &args.path {
        Some(path) => load_skeletal_mesh(path, args.mesh_name.as_deref()).map_err(|e| {
            error!("Failed to load mesh from {}: {}", path.display(), e);
            e
        })?,
        None => SkeletalMesh::from_positions("Cube", cube_positions()),
    };

    let device: Box<dyn RenderDevice> = match args.device {
        CliDevice::Headless => Box::new(HeadlessDevice::new()),
        CliDevice::Wgpu => Box::new(pollster::block_on(Renderer::new_headless()).map_err(|e| {
            error!("Failed to create wgpu device: {}", e);
            e
        })?),
        CliDevice::Auto => match pollster::block_on(Renderer::new_headless()) {
            Ok(renderer) => Box::new(renderer),
            Err(e) => {
                warn!("Failed to create wgpu device: {}, using headless device", e);
                Box::new(HeadlessDevice::new())
            }
        },
    };
    let render_thread = RenderThread::spawn(device);

    let mut app = App::new(settings, Some(mesh), render_thread.queue());
    let report = app.run();
    info!(
        "Ran {} frames ({:.2}s simulated, last FPS {}), vertex offset {}",
        report.frames,
        report.simulated_time,
        report.fps,
        if report.offset_active { "active" } else { "inactive" }
    );
    if let Some(stats) = report.device {
        info!(
            "Device: {} inits, {} releases, {} buffers resident",
            stats.inits, stats.releases, stats.resident
        );
    }

    Ok(())
}
