//! Colour space conversion and the named two-colour schemes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::hash::{derive_hue, Digest};

/// 8-bit sRGB triple.
pub type Rgb = [u8; 3];

const GOLDEN_ANGLE: f64 = 137.508;

/// Converts HSL (`h` in degrees, `s` and `l` in percent) to sRGB.
pub fn hsl(h: f64, s: f64, l: f64) -> Rgb {
    let s = s / 100.0;
    let l = l / 100.0;
    let a = s * l.min(1.0 - l);
    let f = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let v = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        to_channel((v * 255.0).round())
    };
    [f(0.0), f(8.0), f(4.0)]
}

/// Converts OKLCH (`l` and `c` as fractions, `h` in degrees) to sRGB.
///
/// Out-of-gamut inputs are clamped per channel after gamma encoding.
pub fn oklch_to_rgb(l: f64, c: f64, h: f64) -> Rgb {
    let h_rad = h * std::f64::consts::PI / 180.0;
    let a = c * h_rad.cos();
    let b = c * h_rad.sin();

    let l_ = l + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let m_ = l - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let s_ = l - 0.089_484_177_5 * a - 1.291_485_548 * b;

    let l3 = l_ * l_ * l_;
    let m3 = m_ * m_ * m_;
    let s3 = s_ * s_ * s_;

    let r = 4.076_741_662_1 * l3 - 3.307_711_591_3 * m3 + 0.230_969_929_2 * s3;
    let g = -1.268_438_004_6 * l3 + 2.609_757_401_1 * m3 - 0.341_319_396_5 * s3;
    let b = -0.004_196_086_3 * l3 - 0.703_418_614_7 * m3 + 1.707_614_701 * s3;

    let encode = |v: f64| {
        let gamma = if v <= 0.003_130_8 {
            12.92 * v
        } else {
            1.055 * v.powf(1.0 / 2.4) - 0.055
        };
        to_channel((gamma.clamp(0.0, 1.0) * 255.0).round())
    };
    [encode(r), encode(g), encode(b)]
}

/// Stores a float into a byte channel the way a clamped pixel buffer does:
/// clamp to `[0, 255]`, round half to even, NaN becomes zero.
pub fn to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Linear blend from `from` towards `to`, rounded per channel.
pub fn lerp_rgb(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let mix = |a: u8, b: u8| {
        let a = f64::from(a);
        to_channel((a + (f64::from(b) - a) * t).round())
    };
    [mix(from[0], to[0]), mix(from[1], to[1]), mix(from[2], to[2])]
}

/// Named hue to colour-pair mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    HslTriadic,
    HslComplement,
    HslAnalogous,
    HslMono,
    #[default]
    OklchMono,
    OklchTriadic,
    OklchGolden,
    OklchComplement,
    OklchAnalogous,
    OklchSplit,
    OklchTetrad,
    OklchWarmcool,
    OklchVivid,
    OklchPastel,
    OklchCinema,
    OklchSunset,
    OklchEarth,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 17] = [
        ColorScheme::HslTriadic,
        ColorScheme::HslComplement,
        ColorScheme::HslAnalogous,
        ColorScheme::HslMono,
        ColorScheme::OklchMono,
        ColorScheme::OklchTriadic,
        ColorScheme::OklchGolden,
        ColorScheme::OklchComplement,
        ColorScheme::OklchAnalogous,
        ColorScheme::OklchSplit,
        ColorScheme::OklchTetrad,
        ColorScheme::OklchWarmcool,
        ColorScheme::OklchVivid,
        ColorScheme::OklchPastel,
        ColorScheme::OklchCinema,
        ColorScheme::OklchSunset,
        ColorScheme::OklchEarth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::HslTriadic => "hsl-triadic",
            ColorScheme::HslComplement => "hsl-complement",
            ColorScheme::HslAnalogous => "hsl-analogous",
            ColorScheme::HslMono => "hsl-mono",
            ColorScheme::OklchMono => "oklch-mono",
            ColorScheme::OklchTriadic => "oklch-triadic",
            ColorScheme::OklchGolden => "oklch-golden",
            ColorScheme::OklchComplement => "oklch-complement",
            ColorScheme::OklchAnalogous => "oklch-analogous",
            ColorScheme::OklchSplit => "oklch-split",
            ColorScheme::OklchTetrad => "oklch-tetrad",
            ColorScheme::OklchWarmcool => "oklch-warmcool",
            ColorScheme::OklchVivid => "oklch-vivid",
            ColorScheme::OklchPastel => "oklch-pastel",
            ColorScheme::OklchCinema => "oklch-cinema",
            ColorScheme::OklchSunset => "oklch-sunset",
            ColorScheme::OklchEarth => "oklch-earth",
        }
    }

    /// Resolves a scheme name, falling back to [`ColorScheme::OklchMono`].
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Foreground and background colours for `hue` in degrees.
    pub fn pair(self, hue: f64) -> (Rgb, Rgb) {
        match self {
            ColorScheme::HslTriadic => {
                (hsl(hue, 95.0, 50.0), hsl((hue + 120.0) % 360.0, 95.0, 50.0))
            }
            ColorScheme::HslComplement => {
                (hsl(hue, 90.0, 50.0), hsl((hue + 180.0) % 360.0, 90.0, 50.0))
            }
            ColorScheme::HslAnalogous => {
                (hsl(hue, 85.0, 50.0), hsl((hue + 30.0) % 360.0, 85.0, 45.0))
            }
            ColorScheme::HslMono => (hsl(hue, 70.0, 35.0), hsl(hue, 70.0, 65.0)),
            ColorScheme::OklchTriadic => (
                oklch_to_rgb(0.7, 0.22, hue),
                oklch_to_rgb(0.62, 0.22, (hue + 120.0) % 360.0),
            ),
            ColorScheme::OklchGolden => (
                oklch_to_rgb(0.72, 0.22, hue),
                oklch_to_rgb(0.6, 0.22, (hue + GOLDEN_ANGLE) % 360.0),
            ),
            ColorScheme::OklchComplement => (
                oklch_to_rgb(0.75, 0.22, hue),
                oklch_to_rgb(0.55, 0.22, (hue + 180.0) % 360.0),
            ),
            ColorScheme::OklchAnalogous => (
                oklch_to_rgb(0.72, 0.24, hue),
                oklch_to_rgb(0.58, 0.2, (hue + 35.0) % 360.0),
            ),
            ColorScheme::OklchSplit => (
                oklch_to_rgb(0.7, 0.22, hue),
                oklch_to_rgb(0.6, 0.22, (hue + 150.0) % 360.0),
            ),
            ColorScheme::OklchTetrad => (
                oklch_to_rgb(0.7, 0.22, hue),
                oklch_to_rgb(0.62, 0.22, (hue + 90.0) % 360.0),
            ),
            ColorScheme::OklchMono => (oklch_to_rgb(0.8, 0.18, hue), oklch_to_rgb(0.45, 0.18, hue)),
            ColorScheme::OklchWarmcool => {
                let warm = hue % 80.0 + 15.0;
                let cool = 180.0 + hue % 60.0;
                (oklch_to_rgb(0.72, 0.24, warm), oklch_to_rgb(0.58, 0.2, cool))
            }
            ColorScheme::OklchVivid => (
                oklch_to_rgb(0.72, 0.3, hue),
                oklch_to_rgb(0.6, 0.3, (hue + GOLDEN_ANGLE) % 360.0),
            ),
            ColorScheme::OklchPastel => (
                oklch_to_rgb(0.82, 0.12, hue),
                oklch_to_rgb(0.75, 0.12, (hue + 120.0) % 360.0),
            ),
            ColorScheme::OklchCinema => {
                let warm = 40.0 + hue % 40.0;
                let cool = 220.0 + hue % 30.0;
                (oklch_to_rgb(0.74, 0.22, warm), oklch_to_rgb(0.55, 0.18, cool))
            }
            ColorScheme::OklchSunset => (
                oklch_to_rgb(0.68, 0.26, hue % 50.0 + 10.0),
                oklch_to_rgb(0.55, 0.22, hue % 50.0 + 300.0),
            ),
            ColorScheme::OklchEarth => {
                let earth = hue % 60.0 + 30.0;
                (
                    oklch_to_rgb(0.55, 0.12, earth),
                    oklch_to_rgb(0.7, 0.1, (earth + 30.0) % 360.0),
                )
            }
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown colour scheme '{0}'")]
pub struct UnknownScheme(pub String);

impl FromStr for ColorScheme {
    type Err = UnknownScheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ColorScheme::ALL
            .into_iter()
            .find(|scheme| scheme.name() == normalized)
            .ok_or_else(|| UnknownScheme(value.to_string()))
    }
}

/// Foreground/background pair for a digest under `scheme`.
pub fn get_colors(digest: Digest, scheme: ColorScheme) -> (Rgb, Rgb) {
    scheme.pair(f64::from(derive_hue(digest)))
}

/// Same as [`get_colors`] but accepts a scheme name, unknown names fall back
/// to `oklch-mono`.
pub fn colors_for_name(digest: Digest, name: &str) -> (Rgb, Rgb) {
    get_colors(digest, ColorScheme::from_name_or_default(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_string;

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl(0.0, 100.0, 50.0), [255, 0, 0]);
        assert_eq!(hsl(120.0, 100.0, 50.0), [0, 255, 0]);
        assert_eq!(hsl(240.0, 100.0, 50.0), [0, 0, 255]);
        assert_eq!(hsl(0.0, 0.0, 100.0), [255, 255, 255]);
        assert_eq!(hsl(200.0, 50.0, 0.0), [0, 0, 0]);
    }

    #[test]
    fn oklch_white_and_black() {
        assert_eq!(oklch_to_rgb(1.0, 0.0, 0.0), [255, 255, 255]);
        assert_eq!(oklch_to_rgb(0.0, 0.0, 0.0), [0, 0, 0]);
    }

    #[test]
    fn out_of_gamut_oklch_clamps_instead_of_wrapping() {
        for hue in (0..360).step_by(15) {
            let vivid = oklch_to_rgb(0.9, 0.5, f64::from(hue));
            let dark = oklch_to_rgb(0.1, 0.5, f64::from(hue));
            let beyond = oklch_to_rgb(1.5, 0.4, f64::from(hue));
            // Saturated channels pin to the edges instead of wrapping.
            assert!(vivid.contains(&255) || vivid.iter().any(|&c| c > 200));
            assert!(dark.contains(&0));
            assert!(beyond.contains(&255));
        }
    }

    #[test]
    fn channel_store_rounds_half_to_even() {
        assert_eq!(to_channel(2.5), 2);
        assert_eq!(to_channel(3.5), 4);
        assert_eq!(to_channel(-12.0), 0);
        assert_eq!(to_channel(300.0), 255);
        assert_eq!(to_channel(f64::NAN), 0);
    }

    #[test]
    fn unknown_scheme_falls_back_to_oklch_mono() {
        let digest = hash_string("evilrabbit");
        assert_eq!(
            colors_for_name(digest, "not-a-real-scheme"),
            get_colors(digest, ColorScheme::OklchMono)
        );
        assert!("not-a-real-scheme".parse::<ColorScheme>().is_err());
    }

    #[test]
    fn scheme_names_round_trip() {
        for scheme in ColorScheme::ALL {
            assert_eq!(scheme.name().parse::<ColorScheme>(), Ok(scheme));
            assert_eq!(scheme.to_string(), scheme.name());
        }
    }

    #[test]
    fn schemes_are_pure_functions_of_hue() {
        for scheme in ColorScheme::ALL {
            for hue in [0.0, 59.0, 137.0, 359.0] {
                assert_eq!(scheme.pair(hue), scheme.pair(hue));
            }
        }
    }
}
