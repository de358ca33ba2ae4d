//! Sphere renderer.
//!
//! Owns its GPU resources (pipelines, buffers) and issues one indexed draw
//! per shape. Geometry is uploaded once; the uniform block (model matrix,
//! camera, color mode) is rewritten every frame.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use orbis_engine::render::{RenderCtx, RenderTarget};

use crate::mesh::{SphereMesh, Vertex};
use crate::shape::Shape;

/// Per-frame render options controlled by the keyboard toggles.
#[derive(Debug, Copy, Clone)]
pub struct RenderSettings {
    pub wireframe: bool,
    pub color_mode: u32,
    pub use_solid_color: bool,
}

/// Uniform block layout shared with `shaders/sphere.wgsl` (224 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SphereUniforms {
    model: [[f32; 4]; 4],
    aspect: [[f32; 4]; 4],
    view_proj: [[f32; 4]; 4],
    solid_color: [f32; 4],
    color_mode: u32,
    use_solid_color: u32,
    _pad: [u32; 2],
}

pub struct SphereRenderer {
    mesh: SphereMesh,

    pipeline_format: Option<wgpu::TextureFormat>,
    fill_pipeline: Option<wgpu::RenderPipeline>,
    /// Present only when the adapter supports `POLYGON_MODE_LINE`.
    line_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    /// One uniform buffer + bind group per shape, grown on demand.
    bindings: Vec<(wgpu::Buffer, wgpu::BindGroup)>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
    index_count: u32,

    warned_empty: bool,
}

impl SphereRenderer {
    pub fn new(mesh: SphereMesh) -> Self {
        Self {
            mesh,
            pipeline_format: None,
            fill_pipeline: None,
            line_pipeline: None,
            bind_group_layout: None,
            bindings: Vec::new(),
            vbo: None,
            ibo: None,
            index_count: 0,
            warned_empty: false,
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        shapes: &[Shape],
        settings: RenderSettings,
    ) {
        if self.mesh.vertices.is_empty() || self.mesh.indices.is_empty() {
            if !self.warned_empty {
                log::error!("sphere mesh is empty; nothing to draw");
                self.warned_empty = true;
            }
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_geometry(ctx);
        self.ensure_bindings(ctx, shapes.len());

        let pipeline = if settings.wireframe {
            self.line_pipeline.as_ref().or(self.fill_pipeline.as_ref())
        } else {
            self.fill_pipeline.as_ref()
        };
        let Some(pipeline) = pipeline else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };

        let aspect = aspect_matrix(ctx.viewport.aspect());
        let view_proj = view_projection();

        for (shape, (ubo, bind_group)) in shapes.iter().zip(self.bindings.iter()) {
            ctx.queue.write_buffer(
                ubo,
                0,
                bytemuck::bytes_of(&SphereUniforms {
                    model: shape.model.to_cols_array_2d(),
                    aspect: aspect.to_cols_array_2d(),
                    view_proj: view_proj.to_cols_array_2d(),
                    solid_color: shape.color,
                    color_mode: settings.color_mode,
                    use_solid_color: settings.use_solid_color as u32,
                    _pad: [0; 2],
                }),
            );

            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("orbis sphere pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.fill_pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orbis sphere shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sphere.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("orbis sphere bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(uniform_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("orbis sphere pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let vertex_layouts = [Vertex::layout()];
        let color_targets = [Some(wgpu::ColorTargetState {
            format: ctx.surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let descriptor = |polygon_mode: wgpu::PolygonMode| wgpu::RenderPipelineDescriptor {
            label: Some("orbis sphere pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &vertex_layouts,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &color_targets,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        };

        let fill = ctx
            .device
            .create_render_pipeline(&descriptor(wgpu::PolygonMode::Fill));

        let line = if ctx
            .device
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE)
        {
            Some(
                ctx.device
                    .create_render_pipeline(&descriptor(wgpu::PolygonMode::Line)),
            )
        } else {
            None
        };

        self.pipeline_format = Some(ctx.surface_format);
        self.fill_pipeline = Some(fill);
        self.line_pipeline = line;
        self.bind_group_layout = Some(bind_group_layout);
        self.bindings.clear();
    }

    fn ensure_geometry(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() && self.ibo.is_some() {
            return;
        }

        self.vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("orbis sphere vbo"),
            contents: bytemuck::cast_slice(&self.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("orbis sphere ibo"),
            contents: bytemuck::cast_slice(&self.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
        self.index_count = self.mesh.indices.len() as u32;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        while self.bindings.len() < required {
            let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("orbis sphere ubo"),
                size: uniform_binding_size().get(),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("orbis sphere bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                }],
            });

            self.bindings.push((ubo, bind_group));
        }
    }
}

/// Minimum binding size for the sphere uniform block.
///
/// `SphereUniforms` holds three matrices plus color state, so its size is
/// non-zero by construction.
fn uniform_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<SphereUniforms>() as u64)
        .expect("SphereUniforms has non-zero size by construction")
}

/// Aspect correction for non-square windows.
///
/// Shrinks the longer axis so the sphere stays round:
/// `diag(1, min(1/aspect, 1), min(aspect, 1), 1)` with `aspect = w / h`.
pub fn aspect_matrix(aspect: f32) -> Mat4 {
    Mat4::from_diagonal(Vec4::new(
        1.0,
        (1.0 / aspect).min(1.0),
        aspect.min(1.0),
        1.0,
    ))
}

/// Fixed camera on the +x axis: world y maps to clip x, world z to clip y,
/// and depth runs along -x.
const FIXED_VIEW: Mat4 = Mat4::from_cols(
    Vec4::new(0.0, 0.0, -1.0, 0.0),
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 1.0),
);

/// Remaps the GL-style [-1, 1] clip z produced by `FIXED_VIEW` into wgpu's
/// [0, 1] depth range.
const DEPTH_RANGE_CORRECTION: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 1.0),
);

pub fn view_projection() -> Mat4 {
    DEPTH_RANGE_CORRECTION * FIXED_VIEW
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn uniform_block_is_224_bytes() {
        // Must match the WGSL struct layout (three mat4x4 + vec4 + two u32,
        // rounded up to 16-byte struct alignment).
        assert_eq!(std::mem::size_of::<SphereUniforms>(), 224);
    }

    #[test]
    fn aspect_matrix_shrinks_the_long_axis() {
        let wide = aspect_matrix(2.0);
        assert_eq!(wide.col(1).y, 0.5);
        assert_eq!(wide.col(2).z, 1.0);

        let tall = aspect_matrix(0.5);
        assert_eq!(tall.col(1).y, 1.0);
        assert_eq!(tall.col(2).z, 0.5);

        let square = aspect_matrix(1.0);
        assert_eq!(square, Mat4::IDENTITY);
    }

    #[test]
    fn camera_sits_on_the_x_axis() {
        let vp = view_projection();

        // World +y maps to clip +x, world +z to clip +y.
        let y = vp * Vec3::Y.extend(1.0);
        assert_eq!((y.x, y.y), (1.0, 0.0));
        let z = vp * Vec3::Z.extend(1.0);
        assert_eq!((z.x, z.y), (0.0, 1.0));
    }

    #[test]
    fn front_hemisphere_depth_is_in_wgpu_range() {
        let vp = view_projection();

        // Nearest point of the unit sphere (+x towards the camera).
        let near = vp * Vec3::X.extend(1.0);
        assert_eq!(near.z / near.w, 0.5);

        // Sphere center.
        let center = vp * Vec3::ZERO.extend(1.0);
        assert_eq!(center.z / center.w, 1.0);
    }
}
