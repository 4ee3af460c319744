use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::raster::{self, RasterFn};
use crate::shader::{self, ShaderProgram};

/// How a generator produces pixels.
#[derive(Clone)]
pub enum GeneratorKind {
    Raster(RasterFn),
    Shader(ShaderProgram),
}

impl fmt::Debug for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster(_) => f.write_str("Raster"),
            Self::Shader(program) => f
                .debug_struct("Shader")
                .field("animated", &program.animated)
                .finish_non_exhaustive(),
        }
    }
}

/// A named rendering algorithm.
#[derive(Debug, Clone)]
pub struct Generator {
    id: &'static str,
    kind: GeneratorKind,
}

impl Generator {
    pub fn raster(id: &'static str, render: RasterFn) -> Self {
        Self {
            id,
            kind: GeneratorKind::Raster(render),
        }
    }

    /// Shader generator whose fragment source is the preamble followed by
    /// `body`.
    pub fn shader(id: &'static str, body: &str, animated: bool) -> Self {
        Self {
            id,
            kind: GeneratorKind::Shader(ShaderProgram::from_body(body, animated)),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn kind(&self) -> &GeneratorKind {
        &self.kind
    }

    pub fn as_raster(&self) -> Option<RasterFn> {
        match self.kind {
            GeneratorKind::Raster(render) => Some(render),
            GeneratorKind::Shader(_) => None,
        }
    }

    pub fn as_shader(&self) -> Option<&ShaderProgram> {
        match &self.kind {
            GeneratorKind::Shader(program) => Some(program),
            GeneratorKind::Raster(_) => None,
        }
    }

    pub fn is_shader(&self) -> bool {
        matches!(self.kind, GeneratorKind::Shader(_))
    }

    pub fn is_animated(&self) -> bool {
        self.as_shader().is_some_and(|program| program.animated)
    }
}

/// Every generator in catalog order: the raster categories first, then the
/// shader collections.
pub fn catalog() -> Vec<Generator> {
    let groups = [
        raster::bayer::generators(),
        raster::diffusion::generators(),
        raster::pattern::generators(),
        raster::organic::generators(),
        raster::terminal::generators(),
        raster::retro::generators(),
        raster::striking::generators(),
        raster::algorithmic::generators(),
        raster::generative::generators(),
        raster::nature::generators(),
        raster::textile::generators(),
        shader::scene_generators(),
        shader::art_generators(),
        shader::effect_generators(),
    ];
    groups.into_iter().flatten().collect()
}

/// Id to generator lookup, read-only once built.
#[derive(Debug)]
pub struct Registry {
    order: Vec<&'static str>,
    by_id: HashMap<&'static str, Generator>,
}

impl Registry {
    /// Builds the registry from the full [`catalog`].
    pub fn build() -> Self {
        Self::from_generators(catalog())
    }

    /// Inserts `generators` in order. A repeated id replaces the earlier
    /// entry and keeps the earlier listing position.
    pub fn from_generators(generators: Vec<Generator>) -> Self {
        let mut order = Vec::with_capacity(generators.len());
        let mut by_id = HashMap::with_capacity(generators.len());
        for generator in generators {
            let id = generator.id;
            if by_id.insert(id, generator).is_some() {
                warn!(variant = %id, "duplicate identicon generator id; later entry wins");
            } else {
                order.push(id);
            }
        }
        debug!(variants = order.len(), "identicon registry built");
        Self { order, by_id }
    }

    pub fn resolve(&self, id: &str) -> Option<&Generator> {
        self.by_id.get(id)
    }

    /// Registered ids in catalog order.
    pub fn variant_ids(&self) -> &[&'static str] {
        &self.order
    }

    pub fn is_animated(&self, id: &str) -> bool {
        self.resolve(id).is_some_and(Generator::is_animated)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Generators in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Generator> + '_ {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn raster(&self) -> impl Iterator<Item = &Generator> + '_ {
        self.iter().filter(|generator| !generator.is_shader())
    }

    pub fn shaders(&self) -> impl Iterator<Item = &Generator> + '_ {
        self.iter().filter(|generator| generator.is_shader())
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry, built on first use.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::build)
}

/// Ids of every registered variant in catalog order.
pub fn variant_ids() -> &'static [&'static str] {
    registry().variant_ids()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScheme;
    use crate::surface::{SkiaSurface, Surface};

    fn paint_black(surface: &mut dyn Surface, size: u32, _: &str, _: ColorScheme) {
        surface.set_fill_style([0, 0, 0].into());
        surface.fill_rect(0.0, 0.0, f64::from(size), f64::from(size));
    }

    fn paint_white(surface: &mut dyn Surface, size: u32, _: &str, _: ColorScheme) {
        surface.set_fill_style([255, 255, 255].into());
        surface.fill_rect(0.0, 0.0, f64::from(size), f64::from(size));
    }

    #[test]
    fn every_listed_id_resolves() {
        let registry = registry();
        for id in registry.variant_ids() {
            let generator = registry.resolve(id).expect("listed id resolves");
            assert_eq!(generator.id(), *id);
        }
    }

    #[test]
    fn unknown_id_is_not_found() {
        assert!(registry().resolve("nonexistent-id").is_none());
        assert!(!registry().is_animated("nonexistent-id"));
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: Vec<_> = catalog().iter().map(Generator::id).collect();
        assert_eq!(ids.len(), registry().len());
    }

    #[test]
    fn catalog_splits_into_raster_and_shader_variants() {
        let registry = registry();
        assert_eq!(registry.raster().count(), 82);
        assert_eq!(registry.shaders().count(), 39);
        assert_eq!(registry.len(), 121);
    }

    #[test]
    fn listing_follows_catalog_order() {
        let ids = variant_ids();
        assert_eq!(ids[0], "bayer-2x2");
        assert!(ids.iter().position(|id| *id == "floyd-steinberg").unwrap() > 6);
        assert_eq!(ids[82], "aurora-bands");
        assert_eq!(*ids.last().unwrap(), "gradient-orb");
    }

    #[test]
    fn animation_flags_come_from_the_shader_catalog() {
        let registry = registry();
        assert!(registry.is_animated("aurora-bands"));
        assert!(registry.is_animated("bayer-4x4-animated"));
        assert!(!registry.is_animated("layered-ridges"));
        assert!(!registry.is_animated("bayer-4x4-oklch-mono"));
    }

    #[test]
    fn duplicate_ids_keep_the_later_generator() {
        let registry = Registry::from_generators(vec![
            Generator::raster("dup", paint_black),
            Generator::raster("other", paint_black),
            Generator::raster("dup", paint_white),
        ]);
        assert_eq!(registry.variant_ids(), &["dup", "other"]);
        let render = registry.resolve("dup").and_then(Generator::as_raster).unwrap();
        let mut surface = SkiaSurface::new(4, 4).unwrap();
        render(&mut surface, 4, "x", ColorScheme::OklchMono);
        assert_eq!(surface.image_data().pixel_at(1, 1), [255, 255, 255, 255]);
    }
}
