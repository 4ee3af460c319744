//! Deterministic identicons.
//!
//! A value string is hashed into a [`Digest`], which seeds a random stream and
//! a hue. A named variant turns those into pixels, either on the CPU through
//! a [`Surface`] or on the GPU through a [`ShaderExecutor`]. The same value,
//! variant, scheme and size always give the same image.
//!
//! ```no_run
//! use identicon::{RenderRequest, Renderer, SkiaSurface};
//!
//! let mut surface = SkiaSurface::new(64, 64)?;
//! let request = RenderRequest::new("evilrabbit").with_size(64).with_variant("maze");
//! Renderer::raster_only().render(&mut surface, &request);
//! # Ok::<(), identicon::SurfaceError>(())
//! ```

pub mod animation;
pub mod color;
pub mod executor;
pub mod hash;
mod raster;
pub mod registry;
pub mod render;
pub mod shader;
pub mod surface;
pub mod uniforms;

pub use animation::{
    Animation, FrameStatus, StopHandle, SteppedTimeSource, SystemTimeSource, TimeSample,
    TimeSource,
};
pub use color::{get_colors, ColorScheme, Rgb, UnknownScheme};
pub use executor::{GpuError, ProgramCache, ShaderExecutor, Unavailable};
pub use hash::{derive_hue, get_bits, hash_string, Digest, Rng};
pub use raster::RasterFn;
pub use registry::{registry, variant_ids, Generator, GeneratorKind, Registry};
pub use render::{RenderRequest, RenderStatus, Renderer, DEFAULT_SIZE, DEFAULT_VARIANT};
pub use shader::{ShaderProgram, PREAMBLE};
pub use surface::{ImageData, SkiaSurface, Surface, SurfaceError};
pub use uniforms::{derive_uniforms, UniformBundle, UniformValue};
