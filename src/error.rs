//! Error types
//!
//! Start-up can fail creating the window, the GPU device, the pipeline, or
//! loading the shared mesh. Nothing is recoverable at that point, so these
//! errors are surfaced to `main` and end the process. Once running, only an
//! out-of-memory surface is fatal; other surface errors skip a frame.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("failed to load mesh '{path}': {source}")]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("mesh '{0}' contains no triangles")]
    EmptyMesh(PathBuf),

    /// A fatal error after start-up, reported through the same exit path
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("shader '{0}' not loaded")]
    ShaderNotFound(String),

    #[error("pipeline '{0}' not registered")]
    PipelineNotFound(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error("GPU ran out of memory acquiring the next frame")]
    OutOfMemory,
}
