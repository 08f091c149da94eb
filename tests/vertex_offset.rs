use glam::Vec3;

use vertex_offset::engine::graphics::device::{DeviceOp, DeviceStats};
use vertex_offset::engine::graphics::render_thread::RenderCommandQueue;
use vertex_offset::engine::graphics::vertex::Position;
use vertex_offset::engine::graphics::{HeadlessDevice, RenderThread};
use vertex_offset::engine::mesh::SkeletalMesh;
use vertex_offset::engine::offset::VertexOffsetEngine;
use vertex_offset::game::Character;
use vertex_offset::{App, Settings};

fn triangle() -> SkeletalMesh {
    SkeletalMesh::from_positions("triangle", vec![Vec3::ZERO, Vec3::X, Vec3::Y])
}

fn device_positions(device: &HeadlessDevice, mesh: &SkeletalMesh) -> Vec<[f32; 3]> {
    let id = mesh.lod0_position_buffer().unwrap().read().id();
    device
        .contents(id)
        .unwrap_or_default()
        .into_iter()
        .map(|p: Position| p.position)
        .collect()
}

#[test]
fn device_sees_offset_then_restored_positions() {
    let device = HeadlessDevice::new();
    let render = RenderThread::spawn(Box::new(device.clone()));
    let mesh = triangle();
    let mut engine = VertexOffsetEngine::new(render.queue());

    engine.activate(Some(&mesh)).unwrap();
    engine.tick(1.0 / 60.0).unwrap();
    assert!(render.flush());
    assert_eq!(
        device_positions(&device, &mesh),
        vec![[10.0, 10.0, 10.0], [11.0, 10.0, 10.0], [10.0, 11.0, 10.0]]
    );

    engine.tick(1.0 / 60.0).unwrap();
    assert!(render.flush());
    assert_eq!(
        device_positions(&device, &mesh),
        vec![[10.0, 10.0, 10.0], [11.0, 10.0, 10.0], [10.0, 11.0, 10.0]]
    );

    engine.deactivate().unwrap();
    assert!(render.flush());
    assert_eq!(
        device_positions(&device, &mesh),
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    );

    let stats = device.stats();
    assert_eq!(stats.inits, 3);
    assert_eq!(stats.releases, 3);
}

#[test]
fn each_request_releases_before_init() {
    let device = HeadlessDevice::new();
    let render = RenderThread::spawn(Box::new(device.clone()));
    let mesh = triangle();
    let id = mesh.lod0_position_buffer().unwrap().read().id();

    let mut character = Character::new("hero", Some(mesh.clone()), render.queue());
    character.begin_play();
    character.tick(0.016);
    character.tick(0.016);
    character.end_play();
    assert!(render.flush());

    let ops = device.ops();
    assert_eq!(ops.len(), 6);
    for pair in ops.chunks(2) {
        assert_eq!(pair, &[DeviceOp::Release(id), DeviceOp::Init(id)]);
    }
}

#[test]
fn app_run_leaves_original_geometry_on_device() {
    let device = HeadlessDevice::new();
    let render = RenderThread::spawn(Box::new(device.clone()));
    let mesh = triangle();
    let settings = Settings {
        frames: 30,
        wait_for_render: true,
        ..Settings::default()
    };

    let mut app = App::new(settings, Some(mesh.clone()), render.queue());
    let report = app.run();

    assert_eq!(report.frames, 30);
    assert!(report.offset_active);
    assert_eq!(
        device_positions(&device, &mesh),
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    );
    assert_eq!(device.stats().inits, 31);
    assert_eq!(
        report.device,
        Some(DeviceStats { inits: 31, releases: 31, resident: 1 })
    );
    assert_eq!(report.fps, 0);
}

#[test]
fn app_without_mesh_never_touches_device() {
    let device = HeadlessDevice::new();
    let render = RenderThread::spawn(Box::new(device.clone()));

    let mut app = App::new(Settings { frames: 5, ..Settings::default() }, None, render.queue());
    let report = app.run();

    assert!(!report.offset_active);
    assert_eq!(device.stats().inits, 0);
    assert_eq!(report.device, Some(DeviceStats::default()));
}

#[test]
fn app_keeps_running_without_render_thread() {
    let (queue, rx) = RenderCommandQueue::detached();
    drop(rx);
    let settings = Settings {
        frames: 3,
        wait_for_render: true,
        ..Settings::default()
    };

    let mut app = App::new(settings, Some(triangle()), queue);
    let report = app.run();

    assert_eq!(report.frames, 3);
    assert_eq!(report.device, None);
}

#[test]
fn swapped_out_buffers_are_released_on_device() {
    let device = HeadlessDevice::new();
    let render = RenderThread::spawn(Box::new(device.clone()));
    let mut character = Character::new("hero", Some(triangle()), render.queue());
    character.begin_play();
    character.tick(0.016);

    let mut old_ids = Vec::new();
    for _ in 0..5 {
        old_ids.push(character.vertex_offset().bound_buffer().unwrap());
        let reimported = triangle();
        character.mesh_mut().unwrap().render_data = reimported.render_data.clone();
        character.tick(0.016);
    }
    let current = character.vertex_offset().bound_buffer().unwrap();
    character.end_play();
    drop(character);
    assert!(render.flush());

    assert!(old_ids.iter().all(|id| !device.is_resident(*id)));
    assert!(device.is_resident(current));
    assert_eq!(device.stats().resident, 1);
}
