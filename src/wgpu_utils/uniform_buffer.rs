// src/wgpu_utils/uniform_buffer.rs
use std::{marker::PhantomData, num::NonZeroU64};

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    let pos = type_name.rfind(':').unwrap_or(0);
    if pos > 0 {
        &type_name[(pos + 1)..]
    } else {
        type_name
    }
}

/// Typed uniform buffer holding a single `Content` value
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Create a new uniform buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Update buffer content (skips the write when nothing changed)
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

/// Uniform buffer with one aligned slot per draw, bound with a dynamic offset
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    stride: u64,
    capacity: usize,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    /// Size of one slot: `Content` rounded up to `alignment`
    pub fn aligned_stride(alignment: u32) -> u64 {
        let size = std::mem::size_of::<Content>() as u64;
        let alignment = u64::from(alignment.max(1));
        size.div_ceil(alignment) * alignment
    }

    /// Lays `items` out at `stride` byte intervals
    pub fn pack(items: &[Content], stride: u64) -> Vec<u8> {
        let stride = stride as usize;
        let mut bytes = vec![0u8; items.len() * stride];
        for (slot, item) in bytes.chunks_exact_mut(stride).zip(items) {
            let raw = bytemuck::bytes_of(item);
            slot[..raw.len()].copy_from_slice(raw);
        }
        bytes
    }

    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let stride = Self::aligned_stride(device.limits().min_uniform_buffer_offset_alignment);
        let capacity = capacity.max(1);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformBuffer: {}", short_type_name::<Content>())),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        DynamicUniformBuffer {
            buffer,
            content_type: PhantomData,
            stride,
            capacity,
        }
    }

    /// Uploads `items` into consecutive slots.
    ///
    /// Items beyond the capacity are dropped with a warning; returns how many
    /// slots were written.
    pub fn write(&mut self, queue: &wgpu::Queue, items: &[Content]) -> usize {
        let count = items.len().min(self.capacity);
        if count < items.len() {
            log::warn!(
                "{} items exceed dynamic uniform capacity {}, dropping {}",
                items.len(),
                self.capacity,
                items.len() - count
            );
        }
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, &Self::pack(&items[..count], self.stride));
        }
        count
    }

    /// Dynamic offset of slot `index`
    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (index as u64 * self.stride) as wgpu::DynamicOffset
    }

    /// Binding covering one slot; the dynamic offset selects which
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: NonZeroU64::new(std::mem::size_of::<Content>() as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Slots = DynamicUniformBuffer<[[f32; 4]; 4]>;

    #[test]
    fn test_stride_rounds_up_to_alignment() {
        assert_eq!(Slots::aligned_stride(256), 256);
        assert_eq!(Slots::aligned_stride(64), 64);
        assert_eq!(Slots::aligned_stride(48), 96);
        assert_eq!(Slots::aligned_stride(0), 64);
    }

    #[test]
    fn test_pack_places_items_at_stride() {
        let a = [[1.0f32; 4]; 4];
        let b = [[2.0f32; 4]; 4];
        let bytes = Slots::pack(&[a, b], 256);
        assert_eq!(bytes.len(), 512);
        assert_eq!(&bytes[..64], bytemuck::bytes_of(&a));
        assert!(bytes[64..256].iter().all(|&x| x == 0));
        assert_eq!(&bytes[256..320], bytemuck::bytes_of(&b));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<std::string::String>(), "String");
    }
}
