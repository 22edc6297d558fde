//! # Vertex Data Structures
//!
//! GPU vertex layout for the shared mesh.

/// A vertex with position and normal.
///
/// `#[repr(C)]` keeps the layout identical to the vertex buffer description
/// returned by [`Vertex3D::desc`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// Shader attribute `position` (location 0)
    pub position: [f32; 3],
    /// Shader attribute `normal` (location 1)
    pub normal: [f32; 3],
}

impl Vertex3D {
    pub const POSITION_LOCATION: u32 = 0;
    pub const NORMAL_LOCATION: u32 = 1;

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3)
    /// - Attribute 1: Normal (Float32x3)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: Self::POSITION_LOCATION,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: Self::NORMAL_LOCATION,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
