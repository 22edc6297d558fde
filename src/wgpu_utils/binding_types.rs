// src/wgpu_utils/binding_types.rs
//! WGPU binding type utilities

use std::num::NonZeroU64;

pub fn uniform() -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: None,
    }
}

/// Uniform bound at a per-draw offset; `element_size` is the size of one slot's content.
pub fn dynamic_uniform(element_size: u64) -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: true,
        min_binding_size: NonZeroU64::new(element_size),
    }
}
