//! Contract between the renderer and whatever runs fragment programs.
//!
//! The core never talks to a graphics API. A [`ShaderExecutor`] receives the
//! complete fragment source plus the uniform bundle, draws a full-frame quad
//! at the requested size, and replaces the target's pixels with the result.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use thiserror::Error;

use crate::surface::Surface;
use crate::uniforms::UniformBundle;

/// Failures reported by a shader executor. None of them are fatal to the
/// caller: the renderer logs them and leaves the surface untouched.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no GPU adapter is available")]
    Unavailable,
    #[error("fragment program failed to compile: {message}")]
    Compile { message: String },
    #[error("failed to read back rendered pixels: {0}")]
    Readback(String),
    #[error("GPU device was lost")]
    ContextLost,
}

/// Executes a fragment program into a target surface.
pub trait ShaderExecutor {
    /// Draws `fragment_source` over a `size` offscreen target, binding `R`
    /// from it, then resizes `target` and copies the result in. On failure
    /// `target` must be left exactly as it was.
    fn execute(
        &mut self,
        target: &mut dyn Surface,
        size: (u32, u32),
        fragment_source: &str,
        uniforms: &UniformBundle,
    ) -> Result<(), GpuError>;

    /// Drops every cached program and offscreen resource. Called when the
    /// underlying context is lost; the next `execute` recreates what it needs.
    fn invalidate(&mut self);
}

impl<E: ShaderExecutor + ?Sized> ShaderExecutor for Box<E> {
    fn execute(
        &mut self,
        target: &mut dyn Surface,
        size: (u32, u32),
        fragment_source: &str,
        uniforms: &UniformBundle,
    ) -> Result<(), GpuError> {
        (**self).execute(target, size, fragment_source, uniforms)
    }

    fn invalidate(&mut self) {
        (**self).invalidate();
    }
}

/// Executor for hosts without a GPU. Every call fails with
/// [`GpuError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl ShaderExecutor for Unavailable {
    fn execute(
        &mut self,
        _: &mut dyn Surface,
        _: (u32, u32),
        _: &str,
        _: &UniformBundle,
    ) -> Result<(), GpuError> {
        Err(GpuError::Unavailable)
    }

    fn invalidate(&mut self) {}
}

/// Compiled programs keyed by their exact fragment source text.
///
/// Entries live until [`ProgramCache::invalidate`]; a failed compile is never
/// stored, so the next request for the same source tries again.
#[derive(Debug)]
pub struct ProgramCache<P> {
    entries: HashMap<String, P>,
}

impl<P> Default for ProgramCache<P> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<P> ProgramCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<&P> {
        self.entries.get(source)
    }

    pub fn insert(&mut self, source: &str, program: P) -> &P {
        self.entries.entry(source.to_owned()).or_insert(program)
    }

    /// Returns the cached program for `source`, compiling and storing it on a
    /// miss.
    pub fn get_or_try_insert<E>(
        &mut self,
        source: &str,
        compile: impl FnOnce(&str) -> Result<P, E>,
    ) -> Result<&P, E> {
        match self.entries.entry(source.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(compile(source)?)),
        }
    }

    /// Discards every entry at once.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScheme;
    use crate::surface::SkiaSurface;
    use crate::uniforms::derive_uniforms;

    #[test]
    fn cache_compiles_each_source_once() {
        let mut cache = ProgramCache::new();
        let mut compiles = 0;
        for _ in 0..3 {
            let program = cache
                .get_or_try_insert("void main(){}", |source| {
                    compiles += 1;
                    Ok::<_, GpuError>(source.len())
                })
                .unwrap();
            assert_eq!(*program, 13);
        }
        assert_eq!(compiles, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_compiles_are_not_cached() {
        let mut cache: ProgramCache<usize> = ProgramCache::new();
        let result = cache.get_or_try_insert("broken", |_| {
            Err(GpuError::Compile {
                message: "syntax error".into(),
            })
        });
        assert!(matches!(result, Err(GpuError::Compile { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_clears_everything() {
        let mut cache = ProgramCache::new();
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get("a"), Some(&1));
        cache.invalidate();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn unavailable_executor_reports_and_leaves_target_alone() {
        let mut surface = SkiaSurface::new(4, 4).unwrap();
        surface.set_fill_style([9, 9, 9].into());
        surface.fill_rect(0.0, 0.0, 4.0, 4.0);
        let before = surface.image_data();
        let uniforms = derive_uniforms("a", ColorScheme::OklchMono);
        let result = Unavailable.execute(&mut surface, (4, 4), "void main(){}", &uniforms);
        assert!(matches!(result, Err(GpuError::Unavailable)));
        assert_eq!(surface.image_data(), before);
    }
}
