//! Frame statistics for the game loop.

use log::info;

/// Counts frames and reports frames-per-second of simulated time.
pub struct GameState {
    pub frame_count: u64,
    pub simulated_time: f32,
    report_interval: f32,
    since_report: f32,
    frames_since_report: u32,
    last_fps: u32,
}

impl GameState {
    pub fn new(report_interval: f32) -> Self {
        Self {
            frame_count: 0,
            simulated_time: 0.0,
            report_interval,
            since_report: 0.0,
            frames_since_report: 0,
            last_fps: 0,
        }
    }

    /// Record one frame of `delta_time` seconds. Returns the FPS figure when a
    /// report interval has elapsed.
    pub fn update(&mut self, delta_time: f32) -> Option<u32> {
        self.frame_count += 1;
        self.frames_since_report += 1;
        self.simulated_time += delta_time;
        self.since_report += delta_time;

        if self.report_interval > 0.0 && self.since_report >= self.report_interval {
            self.last_fps = (self.frames_since_report as f32 / self.since_report).round() as u32;
            self.frames_since_report = 0;
            self.since_report = 0.0;
            info!("FPS: {} | frames: {}", self.last_fps, self.frame_count);
            Some(self.last_fps)
        } else {
            None
        }
    }

    pub fn get_fps(&self) -> u32 {
        self.last_fps
    }
}
