//! Parameters handed to every shader generator.
//!
//! The bundle is a pure function of the value and colour scheme, apart from
//! the optional animation clock. The resolution uniform `R` is not part of it:
//! executors bind it from the size of the target they draw into.

use crate::color::{get_colors, ColorScheme, Rgb};
use crate::hash::{derive_hue, hash_string};

/// A single uniform as seen by name-based binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformBundle {
    /// `S`: first digest half over 2^32, in `[0, 1)`.
    pub seed: f32,
    /// `H`: derived hue over 360, in `[0, 1)`.
    pub hue: f32,
    /// `P`: the first four draws of the value's random stream.
    pub p: [f32; 4],
    /// `Q`: the next four draws.
    pub q: [f32; 4],
    /// `C1`: primary colour, channels in `[0, 1]`.
    pub c1: [f32; 3],
    /// `C2`: secondary colour.
    pub c2: [f32; 3],
    /// `T`: seconds of animation, bound only when set.
    pub time: Option<f32>,
}

fn unit(rgb: Rgb) -> [f32; 3] {
    rgb.map(|channel| (f64::from(channel) / 255.0) as f32)
}

/// Derives the uniform bundle for `value`. Two calls with the same inputs
/// produce identical bundles.
pub fn derive_uniforms(value: &str, scheme: ColorScheme) -> UniformBundle {
    let digest = hash_string(value);
    let mut rng = digest.rng();
    let (c1, c2) = get_colors(digest, scheme);
    let draws = rng.take::<8>().map(|v| v as f32);
    UniformBundle {
        seed: digest.seed_fraction() as f32,
        hue: (f64::from(derive_hue(digest)) / 360.0) as f32,
        p: [draws[0], draws[1], draws[2], draws[3]],
        q: [draws[4], draws[5], draws[6], draws[7]],
        c1: unit(c1),
        c2: unit(c2),
        time: None,
    }
}

impl UniformBundle {
    pub fn with_time(self, seconds: f32) -> Self {
        Self {
            time: Some(seconds),
            ..self
        }
    }

    /// Named values in binding order; `T` appears only when a time is set.
    pub fn entries(&self) -> Vec<(&'static str, UniformValue)> {
        let mut entries = vec![
            ("S", UniformValue::Float(self.seed)),
            ("H", UniformValue::Float(self.hue)),
            ("P", UniformValue::Vec4(self.p)),
            ("Q", UniformValue::Vec4(self.q)),
            ("C1", UniformValue::Vec3(self.c1)),
            ("C2", UniformValue::Vec3(self.c2)),
        ];
        if let Some(time) = self.time {
            entries.push(("T", UniformValue::Float(time)));
        }
        entries
    }
}
