use anyhow::Result;
use identicon::{GpuError, ImageData, ProgramCache, ShaderExecutor, Surface, UniformBundle};
use tracing::{debug, warn};

use crate::compile::{compile_fragment_shader, compile_vertex_shader};
use crate::context::GpuContext;
use crate::target::{OffscreenTarget, TARGET_FORMAT};
use crate::uniforms::IdenticonUniforms;

/// Device-side state that must be rebuilt after a device loss.
struct GpuState {
    context: GpuContext,
    _uniform_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    vertex_module: wgpu::ShaderModule,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    target: Option<OffscreenTarget>,
}

impl GpuState {
    fn new() -> Result<Self> {
        let context = GpuContext::new()?;
        let device = &context.device;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("identicon uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("identicon pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let vertex_module = compile_vertex_shader(device);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("identicon uniforms"),
            size: std::mem::size_of::<IdenticonUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("identicon uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            context,
            _uniform_layout: uniform_layout,
            pipeline_layout,
            vertex_module,
            uniform_buffer,
            uniform_bind_group,
            target: None,
        })
    }

    fn build_pipeline(&self, fragment_source: &str) -> Result<wgpu::RenderPipeline, GpuError> {
        let device = &self.context.device;
        let fragment_module = compile_fragment_shader(device, fragment_source)?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("identicon pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.vertex_module,
                entry_point: Some("main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
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
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });
        match pollster::block_on(device.pop_error_scope()) {
            Some(err) => Err(GpuError::Compile {
                message: err.to_string(),
            }),
            None => Ok(pipeline),
        }
    }

    /// Draws one frame into the offscreen target and reads it back.
    fn draw(
        &mut self,
        pipeline: &wgpu::RenderPipeline,
        params: &IdenticonUniforms,
        (width, height): (u32, u32),
    ) -> Result<Vec<u8>, GpuError> {
        if self.target.as_ref().is_some_and(|target| !target.matches(width, height)) {
            self.target = None;
        }
        let device = &self.context.device;
        let queue = &self.context.queue;
        let target = self.target.get_or_insert_with(|| {
            debug!(width, height, "allocating offscreen target");
            OffscreenTarget::new(device, width, height)
        });

        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(params));
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("identicon encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("identicon pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }
        target.encode_copy(&mut encoder);
        queue.submit(Some(encoder.finish()));
        target.read(device)
    }
}

/// [`ShaderExecutor`] backed by a headless wgpu device.
///
/// Pipelines are cached by fragment source text. A lost device drops the
/// cache and the device together; the next call rebuilds both.
pub struct WgpuExecutor {
    state: Option<GpuState>,
    programs: ProgramCache<wgpu::RenderPipeline>,
}

impl WgpuExecutor {
    /// Opens a GPU device, failing when no adapter is available.
    pub fn new() -> Result<Self> {
        Ok(Self {
            state: Some(GpuState::new()?),
            programs: ProgramCache::new(),
        })
    }

    /// Number of compiled pipelines currently cached.
    pub fn cached_programs(&self) -> usize {
        self.programs.len()
    }

    /// Rebuilds the device if it was lost or never opened.
    fn ensure_state(&mut self) -> Result<(), GpuError> {
        if self.state.as_ref().is_some_and(|state| state.context.is_lost()) {
            warn!("GPU device was lost; recreating");
            self.invalidate();
        }
        if self.state.is_none() {
            let state = GpuState::new().map_err(|err| {
                warn!("cannot open GPU device: {err:#}");
                GpuError::Unavailable
            })?;
            self.state = Some(state);
        }
        Ok(())
    }
}

impl ShaderExecutor for WgpuExecutor {
    fn execute(
        &mut self,
        target: &mut dyn Surface,
        (width, height): (u32, u32),
        fragment_source: &str,
        uniforms: &UniformBundle,
    ) -> Result<(), GpuError> {
        if width == 0 || height == 0 {
            return Err(GpuError::Readback(format!(
                "cannot render a {width}x{height} frame"
            )));
        }
        self.ensure_state()?;
        let Self { state, programs } = self;
        let gpu = state.as_mut().ok_or(GpuError::Unavailable)?;
        let max = gpu.context.max_dimension;
        if width > max || height > max {
            return Err(GpuError::Readback(format!(
                "{width}x{height} exceeds the GPU texture limit of {max}"
            )));
        }

        let pipeline = programs.get_or_try_insert(fragment_source, |source| {
            debug!(bytes = source.len(), "compiling identicon program");
            gpu.build_pipeline(source)
        })?;
        let params = IdenticonUniforms::new(uniforms, width, height);
        let pixels = gpu.draw(pipeline, &params, (width, height))?;
        if gpu.context.is_lost() {
            return Err(GpuError::ContextLost);
        }

        let image = ImageData::from_raw(width, height, pixels)
            .ok_or_else(|| GpuError::Readback("readback size mismatch".into()))?;
        target
            .resize(width, height)
            .map_err(|err| GpuError::Readback(err.to_string()))?;
        target.put_image_data(&image, 0, 0);
        Ok(())
    }

    fn invalidate(&mut self) {
        self.programs.invalidate();
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identicon::{derive_uniforms, ColorScheme, ShaderProgram, SkiaSurface};

    fn executor_or_skip() -> Option<WgpuExecutor> {
        match WgpuExecutor::new() {
            Ok(executor) => Some(executor),
            Err(err) => {
                eprintln!("skipping GPU test: {err:#}");
                None
            }
        }
    }

    #[test]
    fn flat_program_fills_the_target() {
        let Some(mut executor) = executor_or_skip() else {
            return;
        };
        let program = ShaderProgram::from_body("void main(){gl_FragColor=vec4(C1,1.);}", false);
        let uniforms = derive_uniforms("evilrabbit", ColorScheme::OklchMono);
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        executor
            .execute(&mut surface, (8, 4), &program.fragment_source, &uniforms)
            .unwrap();
        assert_eq!((surface.width(), surface.height()), (8, 4));
        let expected = uniforms.c1.map(|c| (c * 255.0).round() as i32);
        let pixel = surface.image_data().pixel_at(3, 2);
        for (channel, want) in pixel.iter().zip(expected) {
            assert!((i32::from(*channel) - want).abs() <= 1);
        }
        assert_eq!(pixel[3], 255);
        assert_eq!(executor.cached_programs(), 1);
    }

    #[test]
    fn fragment_coordinates_start_bottom_left() {
        let Some(mut executor) = executor_or_skip() else {
            return;
        };
        let program =
            ShaderProgram::from_body("void main(){gl_FragColor=vec4(0.,UV.y,0.,1.);}", false);
        let uniforms = derive_uniforms("a", ColorScheme::OklchMono);
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        executor
            .execute(&mut surface, (4, 4), &program.fragment_source, &uniforms)
            .unwrap();
        let image = surface.image_data();
        assert!(image.pixel_at(0, 0)[1] > image.pixel_at(0, 3)[1]);
    }

    #[test]
    fn broken_program_reports_compile_error_and_leaves_target() {
        let Some(mut executor) = executor_or_skip() else {
            return;
        };
        let uniforms = derive_uniforms("a", ColorScheme::OklchMono);
        let mut surface = SkiaSurface::new(2, 2).unwrap();
        let before = surface.image_data();
        let result = executor.execute(&mut surface, (2, 2), "void main(){ not glsl", &uniforms);
        assert!(matches!(result, Err(GpuError::Compile { .. })));
        assert_eq!(surface.image_data(), before);
        assert_eq!(executor.cached_programs(), 0);
    }

    #[test]
    fn invalidate_drops_cached_programs() {
        let Some(mut executor) = executor_or_skip() else {
            return;
        };
        let program = ShaderProgram::from_body("void main(){gl_FragColor=vec4(1.);}", false);
        let uniforms = derive_uniforms("a", ColorScheme::OklchMono);
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        executor
            .execute(&mut surface, (2, 2), &program.fragment_source, &uniforms)
            .unwrap();
        executor.invalidate();
        assert_eq!(executor.cached_programs(), 0);
        executor
            .execute(&mut surface, (2, 2), &program.fragment_source, &uniforms)
            .unwrap();
        assert_eq!(executor.cached_programs(), 1);
    }
}
