use bytemuck::{Pod, Zeroable};
use identicon::UniformBundle;

/// CPU mirror of the `IdenticonParams` std140 block. Every member is a
/// float, so the 16-byte vec3 slots are closed by the scalar that follows.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct IdenticonUniforms {
    pub p: [f32; 4],
    pub q: [f32; 4],
    pub c1: [f32; 3],
    pub seed: f32,
    pub c2: [f32; 3],
    pub hue: f32,
    pub resolution: [f32; 2],
    pub time: f32,
    pub _padding0: f32,
}

impl IdenticonUniforms {
    pub fn new(bundle: &UniformBundle, width: u32, height: u32) -> Self {
        Self {
            p: bundle.p,
            q: bundle.q,
            c1: bundle.c1,
            seed: bundle.seed,
            c2: bundle.c2,
            hue: bundle.hue,
            resolution: [width as f32, height as f32],
            time: bundle.time.unwrap_or(0.0),
            _padding0: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identicon::{derive_uniforms, ColorScheme};

    #[test]
    fn block_is_eighty_bytes() {
        assert_eq!(std::mem::size_of::<IdenticonUniforms>(), 80);
    }

    #[test]
    fn members_land_on_std140_offsets() {
        let bundle = derive_uniforms("evilrabbit", ColorScheme::OklchMono).with_time(3.0);
        let uniforms = IdenticonUniforms::new(&bundle, 64, 32);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniforms));
        assert_eq!(&floats[0..4], &bundle.p);
        assert_eq!(&floats[8..11], &bundle.c1);
        assert_eq!(floats[11], bundle.seed);
        assert_eq!(floats[15], bundle.hue);
        assert_eq!(&floats[16..19], &[64.0, 32.0, 3.0]);
    }

    #[test]
    fn missing_time_binds_zero() {
        let bundle = derive_uniforms("a", ColorScheme::OklchMono);
        assert_eq!(IdenticonUniforms::new(&bundle, 1, 1).time, 0.0);
    }
}
