pub mod device;
pub mod render_thread;
pub mod renderer;
pub mod vertex;
pub mod vertex_buffer;

pub use device::{HeadlessDevice, RenderDevice};
pub use render_thread::{RenderCommand, RenderCommandQueue, RenderThread};
pub use renderer::Renderer;
pub use vertex::Position;
pub use vertex_buffer::{BufferId, PositionVertexBuffer, SharedVertexBuffer};
