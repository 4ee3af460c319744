use tracing::{debug, warn};

use crate::animation::Animation;
use crate::color::ColorScheme;
use crate::executor::{GpuError, ShaderExecutor, Unavailable};
use crate::registry::{registry, GeneratorKind, Registry};
use crate::surface::Surface;
use crate::uniforms::{derive_uniforms, UniformBundle};

/// Edge length used when a request does not name one.
pub const DEFAULT_SIZE: u32 = 32;
/// Variant used when a request does not name one.
pub const DEFAULT_VARIANT: &str = "bayer-4x4-oklch-mono";

/// What to draw and how large.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub value: String,
    /// Logical edge length in pixels.
    pub size: u32,
    pub variant: String,
    pub color_scheme: ColorScheme,
    /// Device pixels per logical pixel. Only shader variants honour it.
    pub pixel_ratio: f64,
}

impl RenderRequest {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            size: DEFAULT_SIZE,
            variant: DEFAULT_VARIANT.to_owned(),
            color_scheme: ColorScheme::default(),
            pixel_ratio: 1.0,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Backing-store edge for shader output. Fractions are truncated the way
    /// a canvas truncates its width.
    pub fn device_size(&self) -> u32 {
        let scaled = f64::from(self.size) * self.pixel_ratio;
        if scaled.is_finite() && scaled > 0.0 {
            scaled as u32
        } else {
            0
        }
    }
}

/// Outcome of one render call. Nothing here is an error the caller must
/// handle; every failure has already been logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Rendered,
    /// The variant id is not registered. The surface was not touched.
    UnknownVariant,
    /// The surface could not be resized to the requested size.
    SurfaceFailed,
    /// The executor could not run the program. The surface was not touched.
    ShaderFailed,
}

impl RenderStatus {
    pub fn is_rendered(self) -> bool {
        self == RenderStatus::Rendered
    }
}

/// Resolves variants and routes them to the raster catalog or to the shader
/// executor.
pub struct Renderer<E> {
    executor: E,
    registry: &'static Registry,
}

impl Renderer<Unavailable> {
    /// Renderer for hosts without a GPU: shader variants always report
    /// [`RenderStatus::ShaderFailed`].
    pub fn raster_only() -> Self {
        Self::new(Unavailable)
    }
}

impl<E: ShaderExecutor> Renderer<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            registry: registry(),
        }
    }

    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn is_animated_variant(&self, variant: &str) -> bool {
        self.registry.is_animated(variant)
    }

    /// Renders a single still. Animated shaders are frozen at `T = 0`.
    pub fn render(&mut self, surface: &mut dyn Surface, request: &RenderRequest) -> RenderStatus {
        self.render_frame(surface, request, 0.0)
    }

    /// Renders a still of an animated shader at `seconds`. Other variants
    /// render exactly as [`Renderer::render`] does.
    pub fn render_at(
        &mut self,
        surface: &mut dyn Surface,
        request: &RenderRequest,
        seconds: f32,
    ) -> RenderStatus {
        self.render_frame(surface, request, seconds)
    }

    fn render_frame(
        &mut self,
        surface: &mut dyn Surface,
        request: &RenderRequest,
        seconds: f32,
    ) -> RenderStatus {
        let Some(generator) = self.registry.resolve(&request.variant) else {
            warn!(variant = %request.variant, "unknown identicon variant");
            return RenderStatus::UnknownVariant;
        };

        match generator.kind() {
            GeneratorKind::Raster(render) => {
                if let Err(err) = surface.resize(request.size, request.size) {
                    warn!(
                        variant = %request.variant,
                        size = request.size,
                        "cannot size surface: {err}"
                    );
                    return RenderStatus::SurfaceFailed;
                }
                render(surface, request.size, &request.value, request.color_scheme);
                RenderStatus::Rendered
            }
            GeneratorKind::Shader(program) => {
                let mut uniforms = derive_uniforms(&request.value, request.color_scheme);
                if program.animated {
                    uniforms = uniforms.with_time(seconds);
                }
                let edge = request.device_size();
                self.execute(surface, &program.fragment_source, &uniforms, edge)
            }
        }
    }

    /// Runs a fragment program at `edge` x `edge` device pixels.
    pub(crate) fn execute(
        &mut self,
        surface: &mut dyn Surface,
        fragment_source: &str,
        uniforms: &UniformBundle,
        edge: u32,
    ) -> RenderStatus {
        match self
            .executor
            .execute(surface, (edge, edge), fragment_source, uniforms)
        {
            Ok(()) => {
                debug!(edge, time = ?uniforms.time, "shader frame rendered");
                RenderStatus::Rendered
            }
            Err(GpuError::ContextLost) => {
                warn!("GPU context lost; dropping cached programs");
                self.executor.invalidate();
                RenderStatus::ShaderFailed
            }
            Err(err) => {
                warn!("shader render failed: {err}");
                RenderStatus::ShaderFailed
            }
        }
    }

    /// Prepares a frame loop for `request`. Variants that are unknown or do
    /// not animate give an animation that is already stopped.
    pub fn animate(&self, request: &RenderRequest) -> Animation {
        match self.registry.resolve(&request.variant) {
            Some(generator) if generator.is_animated() => {
                let Some(program) = generator.as_shader() else {
                    return Animation::stopped();
                };
                let uniforms = derive_uniforms(&request.value, request.color_scheme);
                Animation::new(program.fragment_source.clone(), uniforms, request.device_size())
            }
            Some(_) => {
                debug!(variant = %request.variant, "variant does not animate");
                Animation::stopped()
            }
            None => {
                warn!(variant = %request.variant, "unknown identicon variant");
                Animation::stopped()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::surface::{ImageData, SkiaSurface};

    /// Executor that fills the target with the `C1` colour, or fails on
    /// demand.
    #[derive(Default)]
    pub(crate) struct FlatExecutor {
        pub calls: Vec<(String, UniformBundle, (u32, u32))>,
        pub fail_with_context_loss: bool,
        pub invalidations: usize,
    }

    impl ShaderExecutor for FlatExecutor {
        fn execute(
            &mut self,
            target: &mut dyn Surface,
            (width, height): (u32, u32),
            fragment_source: &str,
            uniforms: &UniformBundle,
        ) -> Result<(), GpuError> {
            if self.fail_with_context_loss {
                return Err(GpuError::ContextLost);
            }
            self.calls
                .push((fragment_source.to_owned(), *uniforms, (width, height)));
            target
                .resize(width, height)
                .map_err(|err| GpuError::Readback(err.to_string()))?;
            let rgb = uniforms.c1.map(|c| (c * 255.0).round() as u8);
            let mut image = ImageData::new(width, height);
            for i in 0..(width * height) as usize {
                image.set_pixel(i, rgb);
            }
            target.put_image_data(&image, 0, 0);
            Ok(())
        }

        fn invalidate(&mut self) {
            self.invalidations += 1;
        }
    }

    fn filled_surface() -> SkiaSurface {
        let mut surface = SkiaSurface::new(8, 8).unwrap();
        surface.set_fill_style([1, 2, 3].into());
        surface.fill_rect(0.0, 0.0, 8.0, 8.0);
        surface
    }

    #[test]
    fn default_request_renders_deterministically() {
        let mut renderer = Renderer::raster_only();
        let request = RenderRequest::new("evilrabbit");
        let mut first = SkiaSurface::new(1, 1).unwrap();
        let mut second = SkiaSurface::new(1, 1).unwrap();
        assert_eq!(renderer.render(&mut first, &request), RenderStatus::Rendered);
        assert_eq!(renderer.render(&mut second, &request), RenderStatus::Rendered);
        assert_eq!(first.width(), DEFAULT_SIZE);
        assert_eq!(first.image_data(), second.image_data());
    }

    #[test]
    fn every_raster_variant_renders_through_the_dispatcher() {
        let mut renderer = Renderer::raster_only();
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        let ids: Vec<_> = renderer.registry().raster().map(|g| g.id()).collect();
        for id in ids {
            let request = RenderRequest::new("dispatch").with_variant(id).with_size(16);
            assert_eq!(renderer.render(&mut surface, &request), RenderStatus::Rendered, "{id}");
        }
    }

    #[test]
    fn unknown_variant_leaves_surface_untouched() {
        let mut renderer = Renderer::raster_only();
        let mut surface = filled_surface();
        let before = surface.image_data();
        let request = RenderRequest::new("x").with_variant("nonexistent-id");
        assert_eq!(renderer.render(&mut surface, &request), RenderStatus::UnknownVariant);
        assert_eq!(surface.image_data(), before);
    }

    #[test]
    fn shader_without_gpu_is_a_no_op() {
        let mut renderer = Renderer::raster_only();
        let mut surface = filled_surface();
        let before = surface.image_data();
        let request = RenderRequest::new("x").with_variant("rothko-fields");
        assert_eq!(renderer.render(&mut surface, &request), RenderStatus::ShaderFailed);
        assert_eq!(surface.image_data(), before);
    }

    #[test]
    fn shader_request_scales_by_pixel_ratio_and_freezes_time() {
        let mut renderer = Renderer::new(FlatExecutor::default());
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        let still = RenderRequest::new("x").with_variant("layered-ridges").with_size(16);
        let animated = RenderRequest::new("x")
            .with_variant("aurora-bands")
            .with_size(16)
            .with_pixel_ratio(2.0);
        assert!(renderer.render(&mut surface, &still).is_rendered());
        assert!(renderer.render(&mut surface, &animated).is_rendered());
        assert_eq!(surface.width(), 32);

        let calls = &renderer.executor_mut().calls;
        assert_eq!(calls[0].1.time, None);
        assert_eq!(calls[0].2, (16, 16));
        assert_eq!(calls[1].1.time, Some(0.0));
        assert_eq!(calls[1].2, (32, 32));
        assert!(calls[1].0.contains("uniform float T;"));
    }

    #[test]
    fn render_at_binds_the_requested_time() {
        let mut renderer = Renderer::new(FlatExecutor::default());
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        let request = RenderRequest::new("x").with_variant("ink-drop");
        assert!(renderer.render_at(&mut surface, &request, 2.5).is_rendered());
        assert_eq!(renderer.executor_mut().calls[0].1.time, Some(2.5));
    }

    #[test]
    fn context_loss_invalidates_the_executor() {
        let mut renderer = Renderer::new(FlatExecutor {
            fail_with_context_loss: true,
            ..FlatExecutor::default()
        });
        let mut surface = filled_surface();
        let request = RenderRequest::new("x").with_variant("eclipse");
        assert_eq!(renderer.render(&mut surface, &request), RenderStatus::ShaderFailed);
        assert_eq!(renderer.executor_mut().invalidations, 1);
    }

    #[test]
    fn device_size_truncates_fractional_ratios() {
        let request = RenderRequest::new("x").with_size(10).with_pixel_ratio(1.25);
        assert_eq!(request.device_size(), 12);
        assert_eq!(request.with_pixel_ratio(f64::NAN).device_size(), 0);
    }
}
