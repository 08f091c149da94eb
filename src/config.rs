//! Runtime settings and the command line that produces them.
//!
//! [`Settings::default`] carries the built-in constants. [`Args`] exposes each
//! of them as a flag with a matching `VERTEX_OFFSET_*` environment variable.

use std::path::PathBuf;

use clap::Parser;

use crate::engine::offset::engine::DEFAULT_PARALLEL_THRESHOLD;
use crate::engine::offset::mode::DEFAULT_OFFSET;
use crate::engine::offset::OffsetMode;

pub const DEFAULT_FRAMES: u32 = 120;
pub const DEFAULT_FIXED_DELTA: f32 = 1.0 / 60.0;
pub const DEFAULT_FPS_REPORT_INTERVAL: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub offset_mode: OffsetMode,
    pub frames: u32,
    pub fixed_delta: f32,
    pub parallel_threshold: usize,
    /// Wait for the render thread to drain after every frame.
    pub wait_for_render: bool,
    pub fps_report_interval: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            offset_mode: OffsetMode::default(),
            frames: DEFAULT_FRAMES,
            fixed_delta: DEFAULT_FIXED_DELTA,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            wait_for_render: false,
            fps_report_interval: DEFAULT_FPS_REPORT_INTERVAL,
        }
    }
}

/// Offset mode selectable from the command line. The vector parameter of
/// every mode is [`DEFAULT_OFFSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliOffsetMode {
    /// Fixed offset every frame.
    #[default]
    Constant,
    /// Offset grows linearly with time since activation.
    #[value(name = "time-scaled", alias = "timescaled")]
    TimeScaled,
    /// Offset follows a 1 Hz sine wave.
    Oscillate,
}

impl From<CliOffsetMode> for OffsetMode {
    fn from(mode: CliOffsetMode) -> Self {
        match mode {
            CliOffsetMode::Constant => OffsetMode::Constant(DEFAULT_OFFSET),
            CliOffsetMode::TimeScaled => OffsetMode::TimeScaled { velocity: DEFAULT_OFFSET },
            CliOffsetMode::Oscillate => OffsetMode::Oscillate {
                amplitude: DEFAULT_OFFSET,
                frequency: 1.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliDevice {
    /// wgpu when an adapter is available, otherwise headless.
    #[default]
    Auto,
    /// wgpu only; fail if no adapter is found.
    Wgpu,
    /// CPU mirror of device buffers, no GPU needed.
    Headless,
}

/// Vertex offset demo arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "vertex-offset",
    about = "Offsets a skeletal mesh's LOD 0 vertex positions every frame and restores them on exit",
    version
)]
pub struct Args {
    /// glTF file to load. A unit cube is used when omitted.
    pub path: Option<PathBuf>,

    /// Mesh to pick from the glTF document. Defaults to the first one.
    pub mesh_name: Option<String>,

    /// How the per-frame offset is derived.
    #[arg(long, env = "VERTEX_OFFSET_MODE", default_value = "constant", value_enum)]
    pub mode: CliOffsetMode,

    /// Number of frames to simulate.
    #[arg(long, env = "VERTEX_OFFSET_FRAMES", default_value_t = DEFAULT_FRAMES)]
    pub frames: u32,

    /// Fixed time step in seconds.
    #[arg(long, env = "VERTEX_OFFSET_DELTA", default_value_t = DEFAULT_FIXED_DELTA)]
    pub delta: f32,

    /// Buffers with at least this many vertices are offset in parallel.
    #[arg(long, env = "VERTEX_OFFSET_PARALLEL_THRESHOLD", default_value_t = DEFAULT_PARALLEL_THRESHOLD)]
    pub parallel_threshold: usize,

    /// Wait for the render thread to drain after every frame.
    #[arg(long, env = "VERTEX_OFFSET_WAIT_FOR_RENDER")]
    pub wait_for_render: bool,

    /// Seconds of simulated time between FPS log lines. 0 disables them.
    #[arg(long, default_value_t = DEFAULT_FPS_REPORT_INTERVAL)]
    pub fps_interval: f32,

    /// Device that receives vertex buffer uploads.
    #[arg(long, env = "VERTEX_OFFSET_DEVICE", default_value = "auto", value_enum)]
    pub device: CliDevice,
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        Self {
            offset_mode: args.mode.into(),
            frames: args.frames,
            fixed_delta: args.delta,
            parallel_threshold: args.parallel_threshold,
            wait_for_render: args.wait_for_render,
            fps_report_interval: args.fps_interval,
        }
    }
}
