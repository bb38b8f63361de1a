//! WebGPU render pipeline setup

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::vertex::wave_instance_layout;
use crate::consts::*;
use crate::error::RenderError;
use crate::layout::Viewport;
use crate::sim::{WaveFrame, WaveInstance};

// ============================================================================
// GPU DATA STRUCTURES (must match shaders)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],     // offset 0
    time: f32,                // offset 8
    aspect: f32,              // offset 12
    cover_scale: [f32; 2],    // offset 16
    cover_offset: [f32; 2],   // offset 24
    title_y: f32,             // offset 32
    subtitle_y: f32,          // offset 36
    _pad: [f32; 2],           // offset 40 - align colors to 16 bytes
    title_color: [f32; 4],    // offset 48
    subtitle_color: [f32; 4], // offset 64, total 80
}

impl Globals {
    fn new(viewport: &Viewport, time: f32) -> Self {
        let (w, h) = viewport.physical_size();
        let fit = viewport.cover_fit(BACKDROP_ASPECT);
        Self {
            resolution: [w as f32, h as f32],
            time,
            aspect: viewport.aspect(),
            cover_scale: fit.scale.to_array(),
            cover_offset: fit.offset.to_array(),
            title_y: viewport.band_anchor(TITLE_OFFSET),
            subtitle_y: viewport.band_anchor(SUBTITLE_OFFSET),
            _pad: [0.0; 2],
            title_color: TITLE_COLOR,
            subtitle_color: SUBTITLE_COLOR,
        }
    }
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    backdrop_pipeline: wgpu::RenderPipeline,
    wave_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    wave_buffer: wgpu::Buffer,
    /// Instances the wave buffer can hold
    wave_capacity: usize,
    bind_group: wgpu::BindGroup,
    viewport: Viewport,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        viewport: Viewport,
        wave_capacity: usize,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("ripple-field-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        log::info!("Using surface format: {:?}", surface_format);

        let (width, height) = viewport.physical_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let backdrop_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("backdrop_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("backdrop_shader.wgsl").into()),
        });
        let wave_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("wave_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("wave_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::new(&viewport, 0.0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let wave_buffer = create_wave_buffer(&device, wave_capacity);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let backdrop_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("backdrop_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &backdrop_shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &backdrop_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let wave_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("wave_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &wave_shader,
                entry_point: Some("vs_main"),
                buffers: &[wave_instance_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &wave_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            backdrop_pipeline,
            wave_pipeline,
            globals_buffer,
            wave_buffer,
            wave_capacity,
            bind_group,
            viewport,
        })
    }

    pub fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.physical_size();
        self.viewport = viewport;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        log::debug!("Surface resized to {}x{}", width, height);
    }

    /// Reconfigure with the current size (after `SurfaceError::Lost`)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload the wave frame and draw backdrop + ripples
    pub fn render(
        &mut self,
        frame: WaveFrame<'_>,
        ripples: bool,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        // time is ms from requestAnimationFrame, convert to seconds
        let elapsed = (time / 1000.0) as f32;
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::new(&self.viewport, elapsed)),
        );

        let instance_count = if ripples {
            let count = frame.instances().len();
            if count > self.wave_capacity {
                self.wave_buffer = create_wave_buffer(&self.device, count);
                self.wave_capacity = count;
            }
            self.queue.write_buffer(&self.wave_buffer, 0, frame.bytes());
            frame.instance_count()
        } else {
            0
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = CLEAR_COLOR;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);

            render_pass.set_pipeline(&self.backdrop_pipeline);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle

            if instance_count > 0 {
                render_pass.set_pipeline(&self.wave_pipeline);
                render_pass.set_vertex_buffer(0, self.wave_buffer.slice(..));
                render_pass.draw(0..6, 0..instance_count); // One quad per slot
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Pick an adapter, preferring one that can present to `surface`
pub async fn request_adapter<'a>(
    instance: &wgpu::Instance,
    surface: Option<&'a wgpu::Surface<'a>>,
) -> Result<wgpu::Adapter, RenderError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await?;

    log::info!("Using adapter: {:?}", adapter.get_info().name);
    Ok(adapter)
}

fn create_wave_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("waves"),
        size: (std::mem::size_of::<WaveInstance>() * capacity.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globals_size_matches_shader() {
        assert_eq!(std::mem::size_of::<Globals>(), 80);
    }

    #[test]
    fn test_globals_cover_fit_for_wide_canvas() {
        let viewport = Viewport::new(1920.0, 720.0, 1.0);
        let globals = Globals::new(&viewport, 0.0);
        // 16:9 art on a 8:3 surface fits width and crops vertically
        assert_eq!(globals.cover_scale[0], 1.0);
        assert!(globals.cover_scale[1] < 1.0);
        assert!(globals.title_y > 0.0 && globals.subtitle_y < 0.0);
    }

    #[test]
    fn test_wave_phase_reads_time() {
        let globals = Globals::new(&Viewport::new(800.0, 600.0, 1.0), 2.5);
        assert_eq!(globals.time, 2.5);
        // Offset 8 in the uniform, read by the ripple phase
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&globals));
        assert_eq!(floats[2], 2.5);
        assert!(include_str!("wave_shader.wgsl").contains("globals.time"));
    }

    #[test]
    fn test_missing_adapter_is_a_render_error() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::empty(),
            ..Default::default()
        });
        let result = pollster::block_on(request_adapter(&instance, None));
        assert!(matches!(result, Err(RenderError::RequestAdapter(_))));
    }
}
