use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use identicon::ColorScheme;

/// Largest edge, in pixels, the CLI agrees to render.
pub const MAX_SIZE: u32 = 4096;

#[derive(Parser, Debug)]
#[command(
    name = "idgen",
    author,
    version,
    about = "Render deterministic identicons to PNG"
)]
pub struct Cli {
    /// Configuration file with render defaults and batch entries.
    #[arg(long, global = true, value_name = "FILE", env = "IDGEN_CONFIG")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one identicon to a PNG file.
    Render(RenderArgs),
    /// List variant ids in catalog order.
    List(ListArgs),
    /// List colour scheme names.
    Schemes,
    /// Export the frames of an animated shader variant.
    Animate(AnimateArgs),
    /// Render every `[[identicon]]` entry of the configuration file.
    Batch(BatchArgs),
}

/// Options shared by every command that renders.
#[derive(Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Variant id (see `idgen list`).
    #[arg(long, value_name = "ID", value_parser = parse_variant)]
    pub variant: Option<String>,

    /// Colour scheme name (see `idgen schemes`).
    #[arg(long, value_name = "SCHEME", value_parser = parse_scheme)]
    pub scheme: Option<ColorScheme>,

    /// Edge length in CSS pixels.
    #[arg(long, value_name = "PIXELS", value_parser = parse_size)]
    pub size: Option<u32>,

    /// Device pixel ratio applied to shader variants.
    #[arg(long, value_name = "RATIO", value_parser = parse_pixel_ratio)]
    pub pixel_ratio: Option<f64>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Value to hash, e.g. a user name or email address.
    #[arg(value_name = "VALUE")]
    pub value: String,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Time in seconds at which to freeze an animated shader.
    #[arg(long, value_name = "SECONDS", value_parser = parse_time)]
    pub time: Option<f32>,

    /// Output PNG path. Defaults to `<value>-<variant>.png`.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantKind {
    Raster,
    Shader,
    Animated,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list variants of this kind.
    #[arg(long, value_enum, value_name = "KIND")]
    pub kind: Option<VariantKind>,

    /// Print the kind next to each id.
    #[arg(long)]
    pub long: bool,
}

#[derive(Args, Debug)]
pub struct AnimateArgs {
    /// Value to hash.
    #[arg(value_name = "VALUE")]
    pub value: String,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Number of frames to write.
    #[arg(long, value_name = "N", default_value_t = 60, value_parser = parse_frames)]
    pub frames: u64,

    /// Frame rate of the exported sequence. Each frame advances the clock by
    /// at most 50ms, so rates below 20 play back slowed down.
    #[arg(long, value_name = "FPS", default_value_t = 30.0, value_parser = parse_fps)]
    pub fps: f64,

    /// Directory that receives `frame_0000.png`, `frame_0001.png`, ...
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Print the planned outputs without rendering.
    #[arg(long)]
    pub dry_run: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_variant(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("variant must not be empty".to_string());
    }
    if identicon::registry().resolve(trimmed).is_none() {
        return Err(format!(
            "unknown variant '{trimmed}'; run `idgen list` to see every id"
        ));
    }
    Ok(trimmed.to_string())
}

pub fn parse_scheme(value: &str) -> Result<ColorScheme, String> {
    value.parse().map_err(|_| {
        let names: Vec<&str> = ColorScheme::ALL.iter().map(|scheme| scheme.name()).collect();
        format!(
            "unknown colour scheme '{}'; expected one of {}",
            value.trim(),
            names.join(", ")
        )
    })
}

pub fn parse_size(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    let size: u32 = trimmed
        .parse()
        .map_err(|_| format!("invalid size '{trimmed}'; expected a whole number of pixels"))?;
    if size == 0 || size > MAX_SIZE {
        return Err(format!("size must be between 1 and {MAX_SIZE}, got {size}"));
    }
    Ok(size)
}

pub fn parse_pixel_ratio(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    let ratio: f64 = trimmed
        .parse()
        .map_err(|_| format!("invalid pixel ratio '{trimmed}'"))?;
    check_pixel_ratio(ratio)
}

pub fn check_pixel_ratio(ratio: f64) -> Result<f64, String> {
    if !ratio.is_finite() || ratio <= 0.0 || ratio > 8.0 {
        return Err(format!("pixel ratio must be in (0, 8], got {ratio}"));
    }
    Ok(ratio)
}

pub fn parse_time(value: &str) -> Result<f32, String> {
    let trimmed = value.trim();
    let seconds: f32 = trimmed
        .parse()
        .map_err(|_| format!("invalid time '{trimmed}'; expected seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("time must be a non-negative number of seconds, got {trimmed}"));
    }
    Ok(seconds)
}

pub fn parse_frames(value: &str) -> Result<u64, String> {
    let trimmed = value.trim();
    match trimmed.parse::<u64>() {
        Ok(0) => Err("frame count must be at least 1".to_string()),
        Ok(frames) => Ok(frames),
        Err(_) => Err(format!("invalid frame count '{trimmed}'")),
    }
}

pub fn parse_fps(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    let fps: f64 = trimmed
        .parse()
        .map_err(|_| format!("invalid fps '{trimmed}'"))?;
    if !fps.is_finite() || fps <= 0.0 {
        return Err(format!("fps must be greater than zero, got {trimmed}"));
    }
    Ok(fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_must_exist() {
        assert_eq!(parse_variant(" maze ").unwrap(), "maze");
        assert!(parse_variant("").is_err());
        assert!(parse_variant("no-such-variant").unwrap_err().contains("idgen list"));
    }

    #[test]
    fn scheme_names_are_strict() {
        assert_eq!(parse_scheme("OKLCH-Golden").unwrap(), ColorScheme::OklchGolden);
        let err = parse_scheme("sepia").unwrap_err();
        assert!(err.contains("oklch-mono"));
    }

    #[test]
    fn size_is_bounded() {
        assert_eq!(parse_size("64").unwrap(), 64);
        assert!(parse_size("0").is_err());
        assert!(parse_size("-3").is_err());
        assert!(parse_size("5000").is_err());
    }

    #[test]
    fn ratio_time_and_rates_reject_nonsense() {
        assert_eq!(parse_pixel_ratio("2").unwrap(), 2.0);
        assert!(parse_pixel_ratio("0").is_err());
        assert!(parse_pixel_ratio("NaN").is_err());
        assert_eq!(parse_time("1.5").unwrap(), 1.5);
        assert!(parse_time("-1").is_err());
        assert!(parse_frames("0").is_err());
        assert_eq!(parse_frames("12").unwrap(), 12);
        assert!(parse_fps("0").is_err());
        assert_eq!(parse_fps("24").unwrap(), 24.0);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_parse() {
        let cli = Cli::try_parse_from([
            "idgen", "render", "evilrabbit", "--variant", "maze", "--size", "48", "-o", "x.png",
        ])
        .unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.value, "evilrabbit");
        assert_eq!(args.style.variant.as_deref(), Some("maze"));
        assert_eq!(args.style.size, Some(48));
        assert_eq!(args.output, Some(PathBuf::from("x.png")));
    }
}
