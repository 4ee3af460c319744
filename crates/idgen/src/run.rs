use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use identicon::{
    ColorScheme, ImageData, RenderRequest, RenderStatus, Renderer, ShaderExecutor, SkiaSurface,
    SteppedTimeSource, Surface, Unavailable,
};
use identicon_gpu::WgpuExecutor;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{AnimateArgs, BatchArgs, ListArgs, RenderArgs, StyleArgs, VariantKind};
use crate::config::{Defaults, IdgenConfig, LoadedConfig};

type DynRenderer = Renderer<Box<dyn ShaderExecutor>>;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn render(args: RenderArgs, config: Option<&LoadedConfig>) -> Result<()> {
    let request = build_request(&args.value, &args.style, defaults_of(config));
    let output = args.output.unwrap_or_else(|| default_output(&request));

    let mut renderer = renderer_for([request.variant.as_str()])?;
    let image = render_image(&mut renderer, &request, args.time)?;
    save_png(image, &output)?;
    println!("{}", output.display());
    Ok(())
}

pub fn list(args: ListArgs) -> Result<()> {
    let registry = identicon::registry();
    for generator in registry.iter() {
        let label = if generator.is_animated() {
            "animated"
        } else if generator.is_shader() {
            "shader"
        } else {
            "raster"
        };
        let keep = match args.kind {
            None => true,
            Some(VariantKind::Raster) => !generator.is_shader(),
            Some(VariantKind::Shader) => generator.is_shader(),
            Some(VariantKind::Animated) => generator.is_animated(),
        };
        if !keep {
            continue;
        }
        if args.long {
            println!("{:<32} {label}", generator.id());
        } else {
            println!("{}", generator.id());
        }
    }
    Ok(())
}

pub fn schemes() -> Result<()> {
    for scheme in ColorScheme::ALL {
        if scheme == ColorScheme::default() {
            println!("{scheme} (default)");
        } else {
            println!("{scheme}");
        }
    }
    Ok(())
}

pub fn animate(args: AnimateArgs, config: Option<&LoadedConfig>) -> Result<()> {
    let request = build_request(&args.value, &args.style, defaults_of(config));
    if !identicon::registry().is_animated(&request.variant) {
        bail!(
            "variant '{}' does not animate; `idgen list --kind animated` shows the ones that do",
            request.variant
        );
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let mut renderer = Renderer::new(gpu_executor()?);
    let mut animation = renderer.animate(&request);
    let stop = animation.stop_handle();
    let mut surface = SkiaSurface::new(1, 1)?;
    let mut source = SteppedTimeSource::from_fps(args.fps);
    let mut write_error = None;

    let drawn = animation.run(
        &mut renderer,
        &mut surface,
        &mut source,
        Some(args.frames),
        |surface, sample, time| {
            let path = frame_path(&args.out_dir, sample.frame_index);
            match save_png(surface.image_data(), &path) {
                Ok(()) => debug!(frame = sample.frame_index, time, "frame written"),
                Err(err) => {
                    write_error = Some(err);
                    stop.stop();
                }
            }
        },
    );

    if let Some(err) = write_error {
        return Err(err);
    }
    if drawn < args.frames {
        bail!(
            "animation stopped after {drawn} of {} frames; rerun with RUST_LOG=debug for details",
            args.frames
        );
    }
    info!(frames = drawn, time = animation.time(), "animation exported");
    println!("{}", args.out_dir.display());
    Ok(())
}

pub fn batch(args: BatchArgs, config: Option<&LoadedConfig>) -> Result<()> {
    let loaded = config.ok_or_else(|| {
        anyhow!("batch needs a configuration file; pass --config or set IDGEN_CONFIG")
    })?;
    let config = &loaded.config;
    if config.identicons.is_empty() {
        println!("No [[identicon]] entries in {}.", loaded.path.display());
        return Ok(());
    }

    let jobs: Vec<(RenderRequest, Option<f32>, PathBuf)> = config
        .identicons
        .iter()
        .map(|entry| {
            (
                entry.resolved_request(&config.defaults),
                entry.time,
                loaded.output_path(entry),
            )
        })
        .collect();

    if args.dry_run {
        for (request, _, output) in &jobs {
            println!("{} [{}] -> {}", request.value, request.variant, output.display());
        }
        return Ok(());
    }

    let mut renderer = renderer_for(jobs.iter().map(|(request, _, _)| request.variant.as_str()))?;
    for (request, time, output) in &jobs {
        let image = render_image(&mut renderer, request, *time)
            .with_context(|| format!("failed to render '{}'", request.value))?;
        save_png(image, output)?;
        println!("{}", output.display());
    }
    info!(count = jobs.len(), "batch complete");
    Ok(())
}

pub fn load_config(explicit: Option<&Path>) -> Result<Option<LoadedConfig>> {
    IdgenConfig::discover(explicit).context("failed to load configuration")
}

fn defaults_of(config: Option<&LoadedConfig>) -> Defaults {
    config
        .map(|loaded| loaded.config.defaults.clone())
        .unwrap_or_default()
}

/// Command line flags win over `[defaults]`, which win over the library.
fn build_request(value: &str, style: &StyleArgs, defaults: Defaults) -> RenderRequest {
    let mut request = defaults.request(value);
    if let Some(variant) = &style.variant {
        request = request.with_variant(variant.as_str());
    }
    if let Some(scheme) = style.scheme {
        request = request.with_color_scheme(scheme);
    }
    if let Some(size) = style.size {
        request = request.with_size(size);
    }
    if let Some(ratio) = style.pixel_ratio {
        request = request.with_pixel_ratio(ratio);
    }
    request
}

/// Opens the GPU only when one of `variants` is a shader.
fn renderer_for<'a>(variants: impl IntoIterator<Item = &'a str>) -> Result<DynRenderer> {
    let registry = identicon::registry();
    let needs_gpu = variants
        .into_iter()
        .any(|id| registry.resolve(id).is_some_and(|generator| generator.is_shader()));
    let executor: Box<dyn ShaderExecutor> = if needs_gpu {
        gpu_executor()?
    } else {
        Box::new(Unavailable)
    };
    Ok(Renderer::new(executor))
}

fn gpu_executor() -> Result<Box<dyn ShaderExecutor>> {
    let executor = WgpuExecutor::new().context("shader variants need a usable GPU adapter")?;
    Ok(Box::new(executor))
}

fn render_image(
    renderer: &mut DynRenderer,
    request: &RenderRequest,
    time: Option<f32>,
) -> Result<ImageData> {
    let mut surface = SkiaSurface::new(1, 1)?;
    let status = match time {
        Some(seconds) => renderer.render_at(&mut surface, request, seconds),
        None => renderer.render(&mut surface, request),
    };
    match status {
        RenderStatus::Rendered => Ok(surface.image_data()),
        RenderStatus::UnknownVariant => Err(anyhow!(
            "unknown variant '{}'; run `idgen list` to see every id",
            request.variant
        )),
        RenderStatus::SurfaceFailed => Err(anyhow!(
            "cannot allocate a {0}x{0} surface",
            request.size
        )),
        RenderStatus::ShaderFailed => Err(anyhow!(
            "shader variant '{}' failed to render; rerun with RUST_LOG=debug for details",
            request.variant
        )),
    }
}

fn save_png(pixels: ImageData, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let (width, height) = (pixels.width(), pixels.height());
    let buffer = image::RgbaImage::from_raw(width, height, pixels.into_raw())
        .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))?;
    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn frame_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("frame_{index:04}.png"))
}

/// `<value>-<variant>.png`, with anything outside `[A-Za-z0-9._-]` in the
/// value replaced by `_`.
fn default_output(request: &RenderRequest) -> PathBuf {
    let stem: String = request
        .value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.trim_matches('.').is_empty() {
        "identicon".to_string()
    } else {
        stem
    };
    PathBuf::from(format!("{stem}-{}.png", request.variant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_defaults() {
        let defaults = Defaults {
            size: Some(64),
            variant: Some("maze".into()),
            scheme: Some("hsl-mono".into()),
            pixel_ratio: None,
        };
        let style = StyleArgs {
            size: Some(20),
            ..StyleArgs::default()
        };
        let request = build_request("a", &style, defaults);
        assert_eq!(request.size, 20);
        assert_eq!(request.variant, "maze");
        assert_eq!(request.color_scheme, ColorScheme::HslMono);
    }

    #[test]
    fn default_output_is_filesystem_safe() {
        let request = RenderRequest::new("me@example.com/x").with_variant("maze");
        assert_eq!(default_output(&request), PathBuf::from("me_example.com_x-maze.png"));
        let request = RenderRequest::new("..").with_variant("maze");
        assert_eq!(default_output(&request), PathBuf::from("identicon-maze.png"));
    }

    #[test]
    fn frames_are_zero_padded() {
        assert_eq!(frame_path(Path::new("out"), 7), PathBuf::from("out/frame_0007.png"));
    }

    #[test]
    fn raster_renders_without_a_gpu() {
        let mut renderer = renderer_for(["maze"]).unwrap();
        let request = RenderRequest::new("evilrabbit").with_variant("maze").with_size(24);
        let image = render_image(&mut renderer, &request, None).unwrap();
        assert_eq!((image.width(), image.height()), (24, 24));
    }

    #[test]
    fn unknown_variant_is_an_error() {
        let mut renderer = renderer_for(["nope"]).unwrap();
        let request = RenderRequest::new("a").with_variant("nope");
        let err = render_image(&mut renderer, &request, None).unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }
}
