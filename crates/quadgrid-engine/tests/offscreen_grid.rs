//! Renders the grid into an offscreen texture. Skipped when no adapter exists.

use quadgrid_engine::grid::GridConfig;
use quadgrid_engine::render::{GridRenderer, RasterState, RenderCtx, RenderTarget};
use quadgrid_engine::time::GpuTimer;

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter =
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
            .ok()?;

    let features = adapter.features() & wgpu::Features::TIMESTAMP_QUERY;
    let limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());

    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("quadgrid test device"),
        required_features: features,
        required_limits: limits,
        ..Default::default()
    }))
    .ok()
}

struct Run {
    pixels: Vec<u8>,
    frame_ns: Vec<u64>,
}

fn render(grid: GridConfig, raster: RasterState, frames: usize) -> Option<Run> {
    let Some((device, queue)) = headless_device() else {
        eprintln!("Skipping test: no GPU adapter found");
        return None;
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen color"),
        size: wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let ctx = RenderCtx::new(&device, &queue, FORMAT, (SIZE, SIZE));
    let mut renderer = GridRenderer::new(raster);
    let mut timer = GpuTimer::new(&device, &queue);
    let mut frame_ns = Vec::new();

    for _ in 0..frames {
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        {
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("offscreen clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        {
            let mut target = RenderTarget::new(&mut encoder, &view);
            renderer.render(&ctx, &mut target, &grid, Some(&mut timer));
        }
        queue.submit(Some(encoder.finish()));
        frame_ns.push(timer.read(&device).expect("timer result should be available"));
    }

    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("offscreen readback"),
        size: u64::from(SIZE * SIZE * 4),
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(SIZE * 4),
                rows_per_image: Some(SIZE),
            },
        },
        wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(Some(encoder.finish()));

    let slice = readback.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    let _ = device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: None,
    });
    receiver
        .recv()
        .expect("map callback should fire")
        .expect("readback should map");

    let pixels = slice.get_mapped_range().to_vec();
    readback.unmap();

    Some(Run { pixels, frame_ns })
}

fn assert_fully_covered(pixels: &[u8]) {
    for (i, px) in pixels.chunks_exact(4).enumerate() {
        let rgb = u32::from(px[0]) + u32::from(px[1]) + u32::from(px[2]);
        assert!(rgb > 0, "pixel {} ({}, {}) is uncovered", i, i as u32 % SIZE, i as u32 / SIZE);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn grid_tiles_the_whole_target() {
    let grid = GridConfig::new(4, 3, 2).unwrap();
    let Some(run) = render(grid, RasterState::default(), 3) else { return };
    assert_eq!(run.frame_ns.len(), 3);
    assert_fully_covered(&run.pixels);
}

#[test]
fn depth_test_and_culling_keep_the_nearest_layer() {
    let grid = GridConfig::new(8, 8, 3).unwrap();
    let raster = RasterState {
        depth_test: true,
        cull_face: true,
        ..RasterState::default()
    };
    let Some(run) = render(grid, raster, 2) else { return };
    assert_eq!(run.frame_ns.len(), 2);
    assert_fully_covered(&run.pixels);
}
