//! Camera uniform bindings
//!
//! Holds the view and projection matrices shared by every draw in a frame.
//! Bound to slot 0 of the scene pipeline.

use crate::{
    scene::camera::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

pub type CameraUBO = UniformBuffer<CameraUniform>;

pub struct CameraBindings {
    ubo: CameraUBO,
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl CameraBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = CameraUBO::new(device);
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Camera Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Camera Bind Group");

        Self {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    /// Writes new view/projection matrices; unchanged content is not re-uploaded
    pub fn update(&mut self, queue: &wgpu::Queue, camera: CameraUniform) {
        self.ubo.update_content(queue, camera);
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
