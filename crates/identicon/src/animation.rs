//! Frame loop state for animated shader variants.
//!
//! An [`Animation`] owns everything a frame needs except the executor and
//! the target: the fragment source, the uniform bundle, and the clock. Hosts
//! either drive it from their own frame callback via [`Animation::frame`] or
//! hand it a [`TimeSource`] and let [`Animation::run`] pump frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::executor::ShaderExecutor;
use crate::render::{RenderStatus, Renderer};
use crate::surface::Surface;
use crate::uniforms::UniformBundle;

/// Longest step the animation clock takes between two frames, in seconds.
pub const MAX_FRAME_STEP: f64 = 0.05;

/// Cancels an animation from anywhere. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    fn stopped() -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stops the animation. Calling it again has no further effect.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Result of asking for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStatus {
    /// A frame was drawn with `T` set to `time`.
    Rendered { time: f32 },
    /// The animation has been stopped; nothing was drawn.
    Stopped,
    /// The executor failed; the surface was left as it was.
    Failed,
}

/// One reading of a [`TimeSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Milliseconds since the source was reset.
    pub millis: f64,
    /// Number of samples taken before this one.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(millis: f64, frame_index: u64) -> Self {
        Self {
            millis,
            frame_index,
        }
    }
}

/// Where frame timestamps come from.
pub trait TimeSource {
    /// Restarts the source at zero.
    fn reset(&mut self);
    /// Produces the timestamp for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Wall-clock timestamps from the monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.origin.elapsed().as_secs_f64() * 1000.0, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Deterministic timestamps advancing a fixed step per frame. Used for
/// exporting frame sequences.
#[derive(Debug, Clone, Copy)]
pub struct SteppedTimeSource {
    step_millis: f64,
    frame: u64,
}

impl SteppedTimeSource {
    pub fn new(step_millis: f64) -> Self {
        Self {
            step_millis,
            frame: 0,
        }
    }

    /// Steps at `fps` frames per second.
    pub fn from_fps(fps: f64) -> Self {
        Self::new(1000.0 / fps)
    }
}

impl TimeSource for SteppedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.frame as f64 * self.step_millis, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

struct Program {
    fragment_source: String,
    uniforms: UniformBundle,
    edge: u32,
}

/// A running (or stopped) animation of one shader variant.
pub struct Animation {
    program: Option<Program>,
    time: f64,
    last_timestamp: Option<f64>,
    frames: u64,
    stop: StopHandle,
}

impl Animation {
    pub(crate) fn new(fragment_source: String, uniforms: UniformBundle, edge: u32) -> Self {
        Self {
            program: Some(Program {
                fragment_source,
                uniforms,
                edge,
            }),
            time: 0.0,
            last_timestamp: None,
            frames: 0,
            stop: StopHandle::default(),
        }
    }

    /// An animation that never draws.
    pub fn stopped() -> Self {
        Self {
            program: None,
            time: 0.0,
            last_timestamp: None,
            frames: 0,
            stop: StopHandle::stopped(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.program.is_some() && !self.stop.is_stopped()
    }

    /// Seconds of animation time accumulated so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advances the clock to `timestamp_ms` and draws one frame.
    ///
    /// The first frame has no elapsed time. After that the clock moves by the
    /// elapsed wall time, capped at [`MAX_FRAME_STEP`] so a stalled host does
    /// not jump ahead.
    pub fn frame<E: ShaderExecutor>(
        &mut self,
        renderer: &mut Renderer<E>,
        surface: &mut dyn Surface,
        timestamp_ms: f64,
    ) -> FrameStatus {
        if self.stop.is_stopped() {
            return FrameStatus::Stopped;
        }
        let Some(program) = &self.program else {
            return FrameStatus::Stopped;
        };

        let last = self.last_timestamp.unwrap_or(timestamp_ms);
        let step = ((timestamp_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_STEP);
        self.last_timestamp = Some(timestamp_ms);
        self.time += step;
        self.frames += 1;

        let time = self.time as f32;
        let uniforms = program.uniforms.with_time(time);
        match renderer.execute(surface, &program.fragment_source, &uniforms, program.edge) {
            RenderStatus::Rendered => FrameStatus::Rendered { time },
            _ => FrameStatus::Failed,
        }
    }

    /// Pumps frames from `source` until the animation is stopped, a frame
    /// fails, or `max_frames` frames have been drawn. `on_frame` sees the
    /// surface after each successful frame and may stop the loop through the
    /// animation's [`StopHandle`]. Returns the number of frames drawn.
    pub fn run<E: ShaderExecutor>(
        &mut self,
        renderer: &mut Renderer<E>,
        surface: &mut dyn Surface,
        source: &mut dyn TimeSource,
        max_frames: Option<u64>,
        mut on_frame: impl FnMut(&dyn Surface, TimeSample, f32),
    ) -> u64 {
        source.reset();
        let mut drawn = 0;
        while max_frames.map_or(true, |max| drawn < max) {
            let sample = source.sample();
            match self.frame(renderer, surface, sample.millis) {
                FrameStatus::Rendered { time } => {
                    drawn += 1;
                    on_frame(&*surface, sample, time);
                }
                FrameStatus::Stopped => break,
                FrameStatus::Failed => {
                    debug!(frame = sample.frame_index, "animation halted after a failed frame");
                    self.stop();
                    break;
                }
            }
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::FlatExecutor;
    use crate::render::RenderRequest;
    use crate::surface::SkiaSurface;

    fn animated_request() -> RenderRequest {
        RenderRequest::new("evilrabbit")
            .with_variant("aurora-bands")
            .with_size(8)
    }

    #[test]
    fn clock_starts_at_zero_and_caps_each_step() {
        let mut renderer = Renderer::new(FlatExecutor::default());
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        let mut animation = renderer.animate(&animated_request());
        assert!(animation.is_running());

        let times: Vec<f32> = [1000.0, 1016.0, 2016.0, 2026.0]
            .into_iter()
            .map(|ts| match animation.frame(&mut renderer, &mut surface, ts) {
                FrameStatus::Rendered { time } => time,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        let expected = [0.0, 0.016, 0.066, 0.076];
        for (time, want) in times.iter().zip(expected) {
            assert!((time - want).abs() < 1e-6, "{time} != {want}");
        }
        assert!((animation.time() - 0.076).abs() < 1e-9);
        assert_eq!(animation.frames(), 4);
    }

    #[test]
    fn stop_handle_halts_frames() {
        let mut renderer = Renderer::new(FlatExecutor::default());
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        let mut animation = renderer.animate(&animated_request());
        let handle = animation.stop_handle();
        assert!(matches!(
            animation.frame(&mut renderer, &mut surface, 0.0),
            FrameStatus::Rendered { .. }
        ));
        handle.stop();
        handle.stop();
        assert_eq!(animation.frame(&mut renderer, &mut surface, 16.0), FrameStatus::Stopped);
        assert_eq!(renderer.executor_mut().calls.len(), 1);
    }

    #[test]
    fn still_and_unknown_variants_do_not_animate() {
        let renderer = Renderer::new(FlatExecutor::default());
        for variant in ["layered-ridges", "bayer-2x2", "nonexistent-id"] {
            let animation = renderer.animate(&RenderRequest::new("x").with_variant(variant));
            assert!(!animation.is_running(), "{variant}");
        }
    }

    #[test]
    fn run_draws_up_to_the_frame_limit() {
        let mut renderer = Renderer::new(FlatExecutor::default());
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        let mut animation = renderer.animate(&animated_request());
        let mut source = SteppedTimeSource::from_fps(50.0);
        let mut seen = Vec::new();
        let drawn = animation.run(
            &mut renderer,
            &mut surface,
            &mut source,
            Some(5),
            |surface, sample, time| {
                assert_eq!(surface.width(), 8);
                seen.push((sample.frame_index, time));
            },
        );
        assert_eq!(drawn, 5);
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0], (0, 0.0));
        assert!((f64::from(seen[4].1) - 0.08).abs() < 1e-6);
    }

    #[test]
    fn run_stops_when_a_frame_fails() {
        let mut renderer = Renderer::new(FlatExecutor {
            fail_with_context_loss: true,
            ..FlatExecutor::default()
        });
        let mut surface = SkiaSurface::new(1, 1).unwrap();
        let mut animation = renderer.animate(&animated_request());
        let mut source = SteppedTimeSource::new(16.0);
        let drawn = animation.run(&mut renderer, &mut surface, &mut source, None, |_, _, _| {});
        assert_eq!(drawn, 0);
        assert!(!animation.is_running());
    }

    #[test]
    fn stepped_source_restarts_on_reset() {
        let mut source = SteppedTimeSource::new(10.0);
        source.sample();
        assert_eq!(source.sample(), TimeSample::new(10.0, 1));
        source.reset();
        assert_eq!(source.sample(), TimeSample::new(0.0, 0));
    }
}
