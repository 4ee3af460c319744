//! wgpu execution of identicon shader variants.
//!
//! [`WgpuExecutor`] implements [`identicon::ShaderExecutor`] on a headless
//! device: the WebGL payload is rewrapped as GLSL 450, compiled through
//! naga, drawn as a full-screen triangle into an offscreen `Rgba8Unorm`
//! texture, read back, and copied into the caller's surface.

mod compile;
mod context;
mod executor;
mod target;
mod uniforms;

pub use compile::wrap_fragment;
pub use executor::WgpuExecutor;
