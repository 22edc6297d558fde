//! Per-instance model matrices
//!
//! Every draw instance gets its own slot in a dynamic-offset uniform buffer,
//! so all model matrices for a frame are uploaded with a single write and
//! each draw selects its slot when binding group 1.

use crate::{
    math::transform::to_array,
    scene::hierarchy::DrawInstance,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::DynamicUniformBuffer,
    },
};

/// The `model` uniform. MUST match the shader's `Model` struct.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl From<&DrawInstance> for ModelUniform {
    fn from(instance: &DrawInstance) -> Self {
        Self {
            model: to_array(instance.global),
        }
    }
}

pub struct ModelBindings {
    buffer: DynamicUniformBuffer<ModelUniform>,
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
    scratch: Vec<ModelUniform>,
}

impl ModelBindings {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let buffer = DynamicUniformBuffer::<ModelUniform>::new(device, capacity);
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::dynamic_uniform(
                std::mem::size_of::<ModelUniform>() as u64,
            ))
            .create(device, "Model Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(buffer.binding_resource())
            .create(device, "Model Bind Group");

        Self {
            buffer,
            bind_group_layout,
            bind_group,
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Uploads one model matrix per instance and returns how many fit.
    pub fn upload(&mut self, queue: &wgpu::Queue, instances: &[DrawInstance]) -> usize {
        self.scratch.clear();
        self.scratch.extend(instances.iter().map(ModelUniform::from));
        self.buffer.write(queue, &self.scratch)
    }

    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        self.buffer.offset(index)
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
