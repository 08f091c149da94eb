//! Library entry point for the vertex offset engine.

pub mod config;
pub mod engine;
pub mod game;

// Re-export main types for convenience
pub use config::Settings;
pub use game::App;
