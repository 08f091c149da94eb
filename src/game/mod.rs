//! Game-specific logic: the deforming character and the frame loop.

pub mod app;
pub mod character;
pub mod state;

// Re-export commonly used types
pub use app::{App, AppReport};
pub use character::Character;
pub use state::GameState;
