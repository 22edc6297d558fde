//! # Math Module
//!
//! Transform primitives used by the hierarchy evaluator and the renderer.
//! Matrices are `cgmath::Matrix4<f32>` in column-major order, composed so that
//! the left operand is the parent-side transform.

pub mod transform;

pub use transform::{
    compose, identity, perspective, rotate_z, scale, to_array, translate, OPENGL_TO_WGPU_MATRIX,
};
