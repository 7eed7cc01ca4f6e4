mod batch;
mod buffers;
mod context;
mod render;

pub use batch::FrameBatch;
pub use buffers::SceneBuffers;
pub use context::GpuContext;
pub use render::RenderPipeline;
