// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Depth buffer, the per-frame camera uniform (group 0) and the per-instance
//! model uniform (group 1).

pub mod camera_bindings;
pub mod model_bindings;
pub mod texture_resource;

// Re-export main types
pub use camera_bindings::CameraBindings;
pub use model_bindings::{ModelBindings, ModelUniform};
pub use texture_resource::TextureResource;
