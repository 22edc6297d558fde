//! # Graphics Module
//!
//! GPU side of the application: the shared mesh, the scene pipeline and the
//! uniform buffers that carry the camera and per-instance model matrices.
//!
//! - **Geometry** ([`geometry`], [`mesh`]) - procedural sphere and OBJ loading
//! - **Rendering** ([`rendering`]) - surface, pipeline and frame submission
//! - **Resources** ([`resources`]) - depth buffer and uniform bind groups
//!
//! The renderer knows nothing about rigs or animation; it draws whatever
//! [`DrawInstance`](crate::scene::DrawInstance) list the scene produced.

pub mod geometry;
pub mod mesh;
pub mod rendering;
pub mod resources;
pub mod vertex;

// Re-export commonly used types
pub use mesh::{GpuMesh, MeshData};
pub use rendering::render_engine::{FrameStatus, RenderEngine};
pub use vertex::Vertex3D;
