use bytemuck::Pod;
use std::marker::PhantomData;
use wgpu::util::DeviceExt;

/// Size in bytes of `count` elements of `T`.
pub fn byte_len<T>(count: usize) -> u64 {
    (count * std::mem::size_of::<T>()) as u64
}

/// Fixed-capacity GPU buffer of `T`, filled from the CPU each batch.
///
/// Owns the native buffer; it is released when this is dropped.
pub struct GpuBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> GpuBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str, usage: wgpu::BufferUsages, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: byte_len::<T>(capacity.max(1)),
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity: capacity.max(1),
            len: 0,
            _marker: PhantomData,
        }
    }

    pub fn with_contents(
        device: &wgpu::Device,
        label: &str,
        usage: wgpu::BufferUsages,
        contents: &[T],
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage: usage | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            capacity: contents.len(),
            len: contents.len(),
            _marker: PhantomData,
        }
    }

    /// Replace the contents with `data`, truncated to capacity. Returns the
    /// number of elements written.
    pub fn write(&mut self, queue: &wgpu::Queue, data: &[T]) -> usize {
        let count = data.len().min(self.capacity);
        if count < data.len() {
            tracing::warn!(
                "buffer overflow: {} elements written, {} dropped",
                count,
                data.len() - count
            );
        }
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&data[..count]));
        }
        self.len = count;
        count
    }

    /// The written range.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..byte_len::<T>(self.len))
    }

    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mamba_render::{MAX_VERTICES, QuadVertex};

    #[test]
    fn byte_lengths() {
        assert_eq!(byte_len::<u32>(6), 24);
        assert_eq!(byte_len::<QuadVertex>(MAX_VERTICES), 44 * MAX_VERTICES as u64);
        assert_eq!(byte_len::<[[f32; 4]; 4]>(1), 64);
    }
}
