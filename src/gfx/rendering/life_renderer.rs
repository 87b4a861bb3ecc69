//! # Generation Presentation
//!
//! Draws the current generation as a full-screen quad. The fragment stage
//! maps each pixel to a grid cell and shows it white when alive and black
//! when dead. Presentation only samples the image; it never writes cell
//! state.
//!
//! One bind group is built per generation slot, and [`LifeRenderer::draw`]
//! picks the one matching [`GpuLife::current_index`] at record time.

use wgpu::util::DeviceExt;

use crate::error::Result;
use crate::gfx::context::with_validation_scope;
use crate::shaders::{FRAGMENT_ENTRY_POINT, LIFE_RENDER_SHADER, VERTEX_ENTRY_POINT};
use crate::simulation::gpu::GpuLife;
use crate::simulation::grid::GridSize;
use crate::wgpu_utils::binding_types;

/// Clip-space corner of the presentation quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Two triangles covering clip space
pub const FULLSCREEN_QUAD: [QuadVertex; 6] = [
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Cell a fragment at `uv` samples, as `fs_main` computes it
pub fn fragment_cell(uv: [f32; 2], size: GridSize) -> (u32, u32) {
    let pick = |t: f32, n: u32| ((t * n as f32).floor() as i64).clamp(0, n as i64 - 1) as u32;
    (pick(uv[0], size.width()), pick(uv[1], size.height()))
}

pub struct LifeRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; 2],
}

impl LifeRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        life: &GpuLife,
    ) -> Result<Self> {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Life Present Layout"),
            entries: &[binding_types::layout_entry(
                0,
                wgpu::ShaderStages::FRAGMENT,
                binding_types::texture_2d_unfilterable(),
            )],
        });

        let pipeline = with_validation_scope(device, "Life Render Shader", || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Life Render Shader"),
                source: wgpu::ShaderSource::Wgsl(LIFE_RENDER_SHADER.into()),
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Life Render Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Life Render Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(VERTEX_ENTRY_POINT),
                    buffers: &[QuadVertex::desc()],
                    compilation_options: Default::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                    unclipped_depth: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(FRAGMENT_ENTRY_POINT),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                multiview: None,
                cache: None,
            })
        })?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Life Quad Vertices"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_groups = life.slot_views().map(|view| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Life Present Bind Group"),
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                }],
            })
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            bind_groups,
        })
    }

    /// Records a pass drawing the current generation into `target`
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView, life: &GpuLife) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Life Present Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_groups[life.current_index()], &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..FULLSCREEN_QUAD.len() as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_covers_clip_space() {
        let corners: Vec<[f32; 2]> = FULLSCREEN_QUAD.iter().map(|v| v.position).collect();
        for corner in [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]] {
            assert!(corners.contains(&corner));
        }
    }

    #[test]
    fn test_fragment_cell_mapping() {
        let size = GridSize::new(10, 5).unwrap();
        assert_eq!(fragment_cell([0.0, 0.0], size), (0, 0));
        assert_eq!(fragment_cell([0.05, 0.1], size), (0, 0));
        assert_eq!(fragment_cell([0.15, 0.3], size), (1, 1));
        assert_eq!(fragment_cell([0.55, 0.5], size), (5, 2));
        // The far edge lands on the last cell, not one past it
        assert_eq!(fragment_cell([1.0, 1.0], size), (9, 4));
    }

    #[test]
    fn test_vertex_layout() {
        let layout = QuadVertex::desc();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
    }
}
