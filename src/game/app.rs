use log::{info, warn};

use crate::config::Settings;
use crate::engine::graphics::device::DeviceStats;
use crate::engine::graphics::render_thread::RenderCommandQueue;
use crate::engine::mesh::SkeletalMesh;
use crate::game::character::Character;
use crate::game::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppReport {
    pub frames: u64,
    pub simulated_time: f32,
    pub offset_active: bool,
    /// Last FPS figure reported, 0 if no report interval elapsed.
    pub fps: u32,
    /// Device counters after the final upload; `None` if the render thread
    /// was gone.
    pub device: Option<DeviceStats>,
}

/// Fixed-step frame loop driving a single character.
pub struct App {
    settings: Settings,
    character: Character,
    state: GameState,
    queue: RenderCommandQueue,
}

impl App {
    pub fn new(settings: Settings, mesh: Option<SkeletalMesh>, queue: RenderCommandQueue) -> Self {
        let character = Character::new("Character", mesh, queue.clone())
            .with_offset_mode(settings.offset_mode)
            .with_parallel_threshold(settings.parallel_threshold);
        let state = GameState::new(settings.fps_report_interval);
        Self {
            settings,
            character,
            state,
            queue,
        }
    }

    /// Begin play, run the configured number of frames, end play, and wait for
    /// the restoring upload to reach the device.
    pub fn run(&mut self) -> AppReport {
        info!(
            "Running {} frames at {:.4}s ({:?})",
            self.settings.frames, self.settings.fixed_delta, self.settings.offset_mode
        );
        self.character.begin_play();
        let offset_active = self.character.vertex_offset().is_active();

        for _ in 0..self.settings.frames {
            self.step();
        }

        self.character.end_play();
        let device = self.queue.device_stats();
        if device.is_none() {
            warn!("Render thread stopped before the final upload");
        }

        AppReport {
            frames: self.state.frame_count,
            simulated_time: self.state.simulated_time,
            offset_active,
            fps: self.state.get_fps(),
            device,
        }
    }

    pub fn step(&mut self) {
        let dt = self.settings.fixed_delta;
        self.character.tick(dt);
        self.state.update(dt);
        if self.settings.wait_for_render && !self.queue.flush() {
            warn!("Render thread is not running, frame {} not uploaded", self.state.frame_count);
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }
}
