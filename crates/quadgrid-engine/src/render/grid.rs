use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::grid::GridConfig;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::GpuTimer;

use super::mesh::{QuadVertex, QUAD_VERTICES};
use super::raster::RasterState;

/// Instanced grid renderer.
///
/// Draws the static quad `cells_x * cells_y * layers` times with a single
/// instanced draw call; the vertex shader places each instance from its index
/// and the grid uniform. GPU resources are created lazily on first use and
/// rebuilt when the target format or size changes.
#[derive(Default)]
pub struct GridRenderer {
    raster: RasterState,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    grid_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,

    depth: Option<DepthTarget>,
}

struct DepthTarget {
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl GridRenderer {
    pub fn new(raster: RasterState) -> Self {
        Self {
            raster,
            ..Self::default()
        }
    }

    pub fn raster(&self) -> RasterState {
        self.raster
    }

    /// Records one frame of the grid into `target`.
    ///
    /// The color attachment is loaded, not cleared. When depth testing is
    /// enabled the depth buffer is cleared in a separate pass first, so a
    /// timer only covers the draw pass itself.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        grid: &GridConfig,
        mut timer: Option<&mut GpuTimer>,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.ensure_depth_target(ctx);
        self.write_grid_uniform(ctx, grid);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let depth_view = self.depth.as_ref().map(|d| &d.view);

        if let Some(view) = depth_view {
            let _clear = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadgrid depth clear"),
                color_attachments: &[],
                depth_stencil_attachment: Some(depth_attachment(view, wgpu::LoadOp::Clear(1.0))),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        if let Some(t) = timer.as_deref_mut() {
            t.begin();
        }

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadgrid grid pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: depth_view
                    .map(|view| depth_attachment(view, wgpu::LoadOp::Load)),
                timestamp_writes: timer.as_deref().and_then(|t| t.timestamp_writes()),
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_vertex_buffer(0, quad_vbo.slice(..));
            rpass.draw(0..QUAD_VERTICES.len() as u32, 0..grid.instance_count());
        }

        if let Some(t) = timer {
            t.resolve(target.encoder);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadgrid grid shader"),
            source: wgpu::ShaderSource::Wgsl(GRID_SHADER.into()),
        });
        log_compilation_messages(&shader);

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("quadgrid grid bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<GridUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("quadgrid grid pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quadgrid grid pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: self.raster.primitive(),
            depth_stencil: self.raster.depth_stencil(),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "grid pipeline built for {:?} with {:?}",
            ctx.format,
            self.raster
        );

        self.pipeline_format = Some(ctx.format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.grid_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.grid_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let grid_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadgrid grid ubo"),
            size: std::mem::size_of::<GridUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadgrid grid bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: grid_ubo.as_entire_binding(),
            }],
        });

        self.grid_ubo = Some(grid_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadgrid quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn ensure_depth_target(&mut self, ctx: &RenderCtx<'_>) {
        if !self.raster.depth_test {
            self.depth = None;
            return;
        }

        let size = (ctx.size.0.max(1), ctx.size.1.max(1));
        if self.depth.as_ref().is_some_and(|d| d.size == size) {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quadgrid depth"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: RasterState::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        self.depth = Some(DepthTarget {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            size,
        });
    }

    fn write_grid_uniform(&self, ctx: &RenderCtx<'_>, grid: &GridConfig) {
        let Some(ubo) = self.grid_ubo.as_ref() else { return };
        let u = GridUniform::from(grid);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

/// WGSL source of the grid pipeline.
pub const GRID_SHADER: &str = include_str!("shaders/grid.wgsl");

fn depth_attachment(
    view: &wgpu::TextureView,
    load: wgpu::LoadOp<f32>,
) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    }
}

/// Logs shader compiler output. Errors do not stop the program.
fn log_compilation_messages(shader: &wgpu::ShaderModule) {
    let info = pollster::block_on(shader.get_compilation_info());
    for msg in &info.messages {
        let line = msg.location.as_ref().map_or(0, |l| l.line_number);
        let level = match msg.message_type {
            wgpu::CompilationMessageType::Error => log::Level::Error,
            wgpu::CompilationMessageType::Warning => log::Level::Warn,
            _ => log::Level::Debug,
        };
        log::log!(level, "grid shader:{line}: {}", msg.message);
    }
}

/// Grid dimensions as the shader's `Grid` uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
struct GridUniform {
    cell_x: i32,
    cell_y: i32,
    layers: i32,
    _pad: i32, // 16-byte block
}

impl From<&GridConfig> for GridUniform {
    fn from(grid: &GridConfig) -> Self {
        // Lossless: a GridConfig never exceeds GridConfig::MAX_INSTANCES (i32::MAX).
        Self {
            cell_x: grid.cells_x() as i32,
            cell_y: grid.cells_y() as i32,
            layers: grid.layers() as i32,
            _pad: 0,
        }
    }
}
