use crate::buffer::GpuBuffer;
use crate::shader::{Shader, ShaderKind, ShaderSources};
use crate::texture::Texture;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use mamba_render::batch::quad_indices;
use mamba_render::{
    Batch, CircleVertex, MAX_QUADS_PER_BATCH, MAX_TEXTURE_SLOTS, MAX_VERTICES, QuadVertex,
    RenderBackend, TextVertex, TextureHandle,
};
use std::sync::Arc;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_projection: [[f32; 4]; 4],
}

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x4,
    1 => Float32x2,
    2 => Float32x4,
    3 => Uint32,
];

const CIRCLE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    0 => Float32x4,
    1 => Float32x2,
    2 => Float32x4,
    3 => Float32,
    4 => Float32,
];

const TEXT_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x4,
    1 => Float32x2,
    2 => Float32x4,
];

/// The sampler follows the last texture binding in the quad bind group.
const QUAD_SAMPLER_BINDING: u32 = MAX_TEXTURE_SLOTS as u32;

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &Shader,
    vertex: wgpu::VertexBufferLayout<'_>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader.module(),
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader.module(),
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// GPU side of [`mamba_render::Renderer2D`].
///
/// Each flushed batch is recorded into its own render pass and submitted
/// immediately, so buffer writes and draws stay in submission order.
/// Draws between frames (no target set) are dropped.
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    camera: GpuBuffer<CameraUniform>,
    camera_bind_group: wgpu::BindGroup,
    quad_textures_layout: wgpu::BindGroupLayout,
    text_atlas_layout: wgpu::BindGroupLayout,
    quad_pipeline: wgpu::RenderPipeline,
    circle_pipeline: wgpu::RenderPipeline,
    text_pipeline: wgpu::RenderPipeline,
    quad_vertices: GpuBuffer<QuadVertex>,
    circle_vertices: GpuBuffer<CircleVertex>,
    text_vertices: GpuBuffer<TextVertex>,
    indices: GpuBuffer<u32>,
    texture_sampler: wgpu::Sampler,
    atlas_sampler: wgpu::Sampler,
    /// Bound to quad slots the batch leaves empty.
    filler: Arc<wgpu::TextureView>,
    target: Option<wgpu::TextureView>,
    viewport: Option<(u32, u32)>,
}

impl WgpuBackend {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        shaders: &ShaderSources,
        white: &Texture,
    ) -> Self {
        let camera = GpuBuffer::with_contents(
            &device,
            "camera_uniform",
            wgpu::BufferUsages::UNIFORM,
            &[CameraUniform {
                view_projection: Mat4::IDENTITY.to_cols_array_2d(),
            }],
        );

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera.raw().as_entire_binding(),
            }],
        });

        let mut quad_entries: Vec<_> = (0..MAX_TEXTURE_SLOTS as u32).map(texture_entry).collect();
        quad_entries.push(sampler_entry(QUAD_SAMPLER_BINDING));
        let quad_textures_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quad_textures_layout"),
                entries: &quad_entries,
            });

        let text_atlas_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("text_atlas_layout"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let textured_layout = |label, textures: &wgpu::BindGroupLayout| {
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[&camera_layout, textures],
                push_constant_ranges: &[],
            })
        };
        let quad_layout = textured_layout("quad_pipeline_layout", &quad_textures_layout);
        let text_layout = textured_layout("text_pipeline_layout", &text_atlas_layout);
        let circle_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("circle_pipeline_layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let quad_shader = Shader::compile_or_builtin(&device, ShaderKind::Quad, shaders);
        let circle_shader = Shader::compile_or_builtin(&device, ShaderKind::Circle, shaders);
        let text_shader = Shader::compile_or_builtin(&device, ShaderKind::Text, shaders);

        let quad_pipeline = create_pipeline(
            &device,
            "quad_pipeline",
            &quad_layout,
            &quad_shader,
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &QUAD_ATTRIBUTES,
            },
            format,
        );
        let circle_pipeline = create_pipeline(
            &device,
            "circle_pipeline",
            &circle_layout,
            &circle_shader,
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<CircleVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &CIRCLE_ATTRIBUTES,
            },
            format,
        );
        let text_pipeline = create_pipeline(
            &device,
            "text_pipeline",
            &text_layout,
            &text_shader,
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<TextVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &TEXT_ATTRIBUTES,
            },
            format,
        );

        let vertex = wgpu::BufferUsages::VERTEX;
        let quad_vertices = GpuBuffer::new(&device, "quad_vertices", vertex, MAX_VERTICES);
        let circle_vertices = GpuBuffer::new(&device, "circle_vertices", vertex, MAX_VERTICES);
        let text_vertices = GpuBuffer::new(&device, "text_vertices", vertex, MAX_VERTICES);
        let indices = GpuBuffer::with_contents(
            &device,
            "quad_indices",
            wgpu::BufferUsages::INDEX,
            &quad_indices(MAX_QUADS_PER_BATCH),
        );

        let texture_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let atlas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("atlas_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            device,
            queue,
            camera,
            camera_bind_group,
            quad_textures_layout,
            text_atlas_layout,
            quad_pipeline,
            circle_pipeline,
            text_pipeline,
            quad_vertices,
            circle_vertices,
            text_vertices,
            indices,
            texture_sampler,
            atlas_sampler,
            filler: white.binding(),
            target: None,
            viewport: None,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Render into `view` until [`Self::end_frame`].
    pub fn begin_frame(&mut self, view: wgpu::TextureView) {
        self.target = Some(view);
    }

    pub fn end_frame(&mut self) {
        self.target = None;
    }

    fn quad_bind_group(&self, batch: &Batch<Arc<wgpu::TextureView>>) -> wgpu::BindGroup {
        let views: Vec<&wgpu::TextureView> = batch
            .textures
            .handles()
            .map(|v| v.as_ref())
            .chain(std::iter::repeat(self.filler.as_ref()))
            .take(MAX_TEXTURE_SLOTS)
            .collect();
        let mut entries: Vec<wgpu::BindGroupEntry<'_>> = views
            .into_iter()
            .enumerate()
            .map(|(i, view)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: QUAD_SAMPLER_BINDING,
            resource: wgpu::BindingResource::Sampler(&self.texture_sampler),
        });
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad_textures"),
            layout: &self.quad_textures_layout,
            entries: &entries,
        })
    }

    fn atlas_bind_group(&self, atlas: &wgpu::TextureView) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text_atlas"),
            layout: &self.text_atlas_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(atlas),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.atlas_sampler),
                },
            ],
        })
    }
}

impl RenderBackend for WgpuBackend {
    type Binding = Arc<wgpu::TextureView>;

    fn set_view_projection(&mut self, view_projection: Mat4) {
        self.camera.write(
            &self.queue,
            &[CameraUniform {
                view_projection: view_projection.to_cols_array_2d(),
            }],
        );
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width > 0 && height > 0).then_some((width, height));
    }

    fn clear(&mut self, color: Vec4) {
        let Some(target) = &self.target else {
            tracing::warn!("clear outside a frame, dropped");
            return;
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear_encoder"),
            });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: color.x as f64,
                        g: color.y as f64,
                        b: color.z as f64,
                        a: color.w as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw_batch(&mut self, batch: &Batch<Arc<wgpu::TextureView>>) {
        if self.target.is_none() {
            tracing::warn!("batch submitted outside a frame, dropped");
            return;
        }

        let quads = self.quad_vertices.write(&self.queue, &batch.quads) / 4;
        let circles = self.circle_vertices.write(&self.queue, &batch.circles) / 4;
        let glyphs = self.text_vertices.write(&self.queue, &batch.text) / 4;

        let quad_group = (quads > 0).then(|| self.quad_bind_group(batch));
        let text_group = match (&batch.text_atlas, glyphs > 0) {
            (Some((_, atlas)), true) => Some(self.atlas_bind_group(atlas)),
            _ => None,
        };

        let Some(target) = &self.target else {
            return;
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("batch_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("batch_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            if let Some((width, height)) = self.viewport {
                pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            }
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            if let Some(group) = &quad_group {
                pass.set_pipeline(&self.quad_pipeline);
                pass.set_bind_group(1, group, &[]);
                pass.set_vertex_buffer(0, self.quad_vertices.slice());
                pass.set_index_buffer(self.indices.slice(), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..(quads * 6) as u32, 0, 0..1);
            }

            if circles > 0 {
                pass.set_pipeline(&self.circle_pipeline);
                pass.set_vertex_buffer(0, self.circle_vertices.slice());
                pass.set_index_buffer(self.indices.slice(), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..(circles * 6) as u32, 0, 0..1);
            }

            if let Some(group) = &text_group {
                pass.set_pipeline(&self.text_pipeline);
                pass.set_bind_group(1, group, &[]);
                pass.set_vertex_buffer(0, self.text_vertices.slice());
                pass.set_index_buffer(self.indices.slice(), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..(glyphs * 6) as u32, 0, 0..1);
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
