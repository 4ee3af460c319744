//! `idgen.toml`: render defaults plus the identicons `idgen batch` renders.
//!
//! ```toml
//! [defaults]
//! size = 64
//! scheme = "oklch-golden"
//!
//! [[identicon]]
//! value = "evilrabbit"
//! variant = "maze"
//! output = "avatars/evilrabbit.png"
//! ```
//!
//! Relative `output` paths are resolved against the directory holding the
//! configuration file.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;
use identicon::{ColorScheme, RenderRequest};
use serde::{Deserialize, Serialize};

use crate::cli;

pub const ENV_CONFIG_DIR: &str = "IDGEN_CONFIG_DIR";
pub const CONFIG_FILE: &str = "idgen.toml";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "idgen";
const APPLICATION: &str = "idgen";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub size: Option<u32>,
    pub variant: Option<String>,
    pub scheme: Option<String>,
    pub pixel_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdenticonEntry {
    pub value: String,
    pub output: PathBuf,
    pub variant: Option<String>,
    pub scheme: Option<String>,
    pub size: Option<u32>,
    pub pixel_ratio: Option<f64>,
    /// Freeze time for animated shader variants.
    pub time: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdgenConfig {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default, rename = "identicon")]
    pub identicons: Vec<IdenticonEntry>,
}

/// A configuration together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: IdgenConfig,
}

impl LoadedConfig {
    /// Where an entry's output lands once resolved against the config file.
    pub fn output_path(&self, entry: &IdenticonEntry) -> PathBuf {
        if entry.output.is_absolute() {
            return entry.output.clone();
        }
        let base = self.path.parent().unwrap_or_else(|| Path::new(""));
        base.join(&entry.output)
    }
}

impl IdgenConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: IdgenConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads `explicit` when given, otherwise the platform config file if it
    /// exists. An explicit path that cannot be read is an error.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<LoadedConfig>, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(None),
            },
        };
        tracing::debug!(path = %path.display(), "loading configuration");
        let config = Self::load(&path)?;
        Ok(Some(LoadedConfig { path, config }))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let defaults = &self.defaults;
        check_style(
            "[defaults]",
            defaults.variant.as_deref(),
            defaults.scheme.as_deref(),
            defaults.size,
            defaults.pixel_ratio,
        )?;

        let mut outputs = HashSet::new();
        for (index, entry) in self.identicons.iter().enumerate() {
            let label = format!("identicon #{} ('{}')", index + 1, entry.value);
            check_style(
                &label,
                entry.variant.as_deref(),
                entry.scheme.as_deref(),
                entry.size,
                entry.pixel_ratio,
            )?;

            if let Some(time) = entry.time {
                if !time.is_finite() || time < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "{label} time must be a non-negative number of seconds"
                    )));
                }
            }

            if entry.output.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!("{label} output must not be empty")));
            }
            if !outputs.insert(&entry.output) {
                return Err(ConfigError::Invalid(format!(
                    "{label} writes to '{}', which an earlier entry already uses",
                    entry.output.display()
                )));
            }
        }

        Ok(())
    }
}

impl Defaults {
    /// Request for `value` with these defaults applied over the library ones.
    pub fn request(&self, value: &str) -> RenderRequest {
        let mut request = RenderRequest::new(value);
        if let Some(variant) = &self.variant {
            request = request.with_variant(variant.as_str());
        }
        if let Some(scheme) = &self.scheme {
            request = request.with_color_scheme(ColorScheme::from_name_or_default(scheme));
        }
        if let Some(size) = self.size {
            request = request.with_size(size);
        }
        if let Some(ratio) = self.pixel_ratio {
            request = request.with_pixel_ratio(ratio);
        }
        request
    }
}

impl IdenticonEntry {
    pub fn resolved_request(&self, defaults: &Defaults) -> RenderRequest {
        let merged = Defaults {
            size: self.size.or(defaults.size),
            variant: self.variant.clone().or_else(|| defaults.variant.clone()),
            scheme: self.scheme.clone().or_else(|| defaults.scheme.clone()),
            pixel_ratio: self.pixel_ratio.or(defaults.pixel_ratio),
        };
        merged.request(&self.value)
    }
}

/// Platform configuration file, honouring `IDGEN_CONFIG_DIR`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(dir) = env::var_os(ENV_CONFIG_DIR).filter(|dir| !dir.is_empty()) {
        return Some(PathBuf::from(dir).join(CONFIG_FILE));
    }
    ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn check_style(
    label: &str,
    variant: Option<&str>,
    scheme: Option<&str>,
    size: Option<u32>,
    pixel_ratio: Option<f64>,
) -> Result<(), ConfigError> {
    let invalid = |err: String| ConfigError::Invalid(format!("{label}: {err}"));
    if let Some(variant) = variant {
        cli::parse_variant(variant).map_err(invalid)?;
    }
    if let Some(scheme) = scheme {
        cli::parse_scheme(scheme).map_err(invalid)?;
    }
    if let Some(size) = size {
        cli::parse_size(&size.to_string()).map_err(invalid)?;
    }
    if let Some(ratio) = pixel_ratio {
        cli::check_pixel_ratio(ratio).map_err(invalid)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use identicon::DEFAULT_VARIANT;

    const SAMPLE: &str = r#"
[defaults]
size = 64
scheme = "oklch-golden"

[[identicon]]
value = "evilrabbit"
variant = "maze"
output = "avatars/evilrabbit.png"

[[identicon]]
value = "rauchg"
size = 16
pixel_ratio = 2
output = "/tmp/rauchg.png"
"#;

    #[test]
    fn parses_sample_config() {
        let config = IdgenConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.defaults.size, Some(64));
        assert_eq!(config.identicons.len(), 2);
        assert_eq!(config.identicons[0].variant.as_deref(), Some("maze"));
        assert_eq!(config.identicons[1].pixel_ratio, Some(2.0));
    }

    #[test]
    fn empty_file_is_a_valid_config() {
        assert_eq!(IdgenConfig::from_toml_str("").unwrap(), IdgenConfig::default());
    }

    #[test]
    fn entries_fall_back_to_defaults() {
        let config = IdgenConfig::from_toml_str(SAMPLE).unwrap();
        let first = config.identicons[0].resolved_request(&config.defaults);
        assert_eq!(first.variant, "maze");
        assert_eq!(first.size, 64);
        assert_eq!(first.color_scheme, ColorScheme::OklchGolden);

        let second = config.identicons[1].resolved_request(&config.defaults);
        assert_eq!(second.variant, DEFAULT_VARIANT);
        assert_eq!(second.size, 16);
        assert_eq!(second.device_size(), 32);
    }

    #[test]
    fn rejects_unknown_variant() {
        let err = IdgenConfig::from_toml_str(
            r#"
[[identicon]]
value = "a"
variant = "no-such-variant"
output = "a.png"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_defaults() {
        let err = IdgenConfig::from_toml_str("[defaults]\nscheme = \"sepia\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = IdgenConfig::from_toml_str("[defaults]\nsize = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_outputs() {
        let err = IdgenConfig::from_toml_str(
            r#"
[[identicon]]
value = "a"
output = "same.png"

[[identicon]]
value = "b"
output = "same.png"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn syntax_and_unknown_keys_are_parse_errors() {
        assert!(matches!(
            IdgenConfig::from_toml_str("[defaults\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            IdgenConfig::from_toml_str("[defaults]\ncolour = \"red\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn outputs_resolve_next_to_the_config_file() {
        let config = IdgenConfig::from_toml_str(SAMPLE).unwrap();
        let loaded = LoadedConfig {
            path: PathBuf::from("/srv/avatars/idgen.toml"),
            config,
        };
        assert_eq!(
            loaded.output_path(&loaded.config.identicons[0]),
            PathBuf::from("/srv/avatars/avatars/evilrabbit.png")
        );
        assert_eq!(
            loaded.output_path(&loaded.config.identicons[1]),
            PathBuf::from("/tmp/rauchg.png")
        );
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let err = IdgenConfig::discover(Some(Path::new("/definitely/not/here/idgen.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
