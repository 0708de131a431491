//! L3 Molecular Layer: Section transition driver
//!
//! Interpolates the container offset from one section to another across
//! display refreshes. Frames are requested through a `FrameQueue` and the
//! driver only reacts to the token it holds, so a cancelled or superseded
//! registration can never move the container.

use std::time::{Duration, Instant};

use tracing::trace;

use super::easing::Easing;
use super::frames::{FrameQueue, FrameToken};
use super::timing::{lerp, progress, section_offset};

/// Receives the output of a running transition
pub trait FrameSink {
    /// Container offset for this frame
    fn on_frame(&mut self, offset: f64);
    /// The transition reached its destination
    fn on_complete(&mut self, to: usize);
}

/// What to animate
#[derive(Debug, Clone, Copy)]
pub struct TransitionSpec {
    pub from: usize,
    pub to: usize,
    pub duration: Duration,
    pub easing: Easing,
}

/// Transition in flight
#[derive(Debug, Clone)]
struct ActiveTransition {
    spec: TransitionSpec,
    start: Instant,
    /// Refresh registration for the next frame
    token: FrameToken,
    /// Progress of the last emitted frame
    last_t: Option<f64>,
}

/// Drives at most one transition at a time
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    active: Option<ActiveTransition>,
    reduced_motion: bool,
}

impl AnimationDriver {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            active: None,
            reduced_motion,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Destination of the running transition
    pub fn target(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.spec.to)
    }

    /// Start a transition, replacing any running one
    ///
    /// Zero duration or reduced motion commits synchronously: one frame at
    /// the final offset, then completion, with nothing scheduled.
    pub fn start(
        &mut self,
        spec: TransitionSpec,
        extent: f64,
        now: Instant,
        frames: &mut FrameQueue,
        sink: &mut impl FrameSink,
    ) {
        self.cancel(frames);

        if spec.duration.is_zero() || self.reduced_motion {
            sink.on_frame(section_offset(spec.to, extent));
            sink.on_complete(spec.to);
            return;
        }

        let token = frames.request();
        trace!(from = spec.from, to = spec.to, "transition scheduled");
        self.active = Some(ActiveTransition {
            spec,
            start: now,
            token,
            last_t: None,
        });
    }

    /// Service one display refresh
    ///
    /// Returns false when `token` does not belong to the running transition.
    /// `extent` is read every frame so a resize rescales the transition.
    pub fn on_refresh(
        &mut self,
        token: FrameToken,
        extent: f64,
        now: Instant,
        frames: &mut FrameQueue,
        sink: &mut impl FrameSink,
    ) -> bool {
        let Some(anim) = self.active.as_mut() else {
            return false;
        };
        if anim.token != token {
            return false;
        }

        let t = progress(anim.start, now, anim.spec.duration);
        let to = anim.spec.to;

        if t >= 1.0 {
            self.active = None;
            // Exact final offset, no accumulated interpolation error
            sink.on_frame(section_offset(to, extent));
            sink.on_complete(to);
            return true;
        }

        if anim.last_t.map_or(true, |last| t > last) {
            let eased = anim.spec.easing.apply(t);
            let from_offset = section_offset(anim.spec.from, extent);
            let to_offset = section_offset(to, extent);
            anim.last_t = Some(t);
            sink.on_frame(lerp(from_offset, to_offset, eased));
        }
        anim.token = frames.request();
        true
    }

    /// Stop the running transition where it is
    pub fn cancel(&mut self, frames: &mut FrameQueue) {
        if let Some(anim) = self.active.take() {
            frames.cancel(anim.token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EasingType;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<f64>,
        completed: Vec<usize>,
    }

    impl FrameSink for Recorder {
        fn on_frame(&mut self, offset: f64) {
            assert!(self.completed.is_empty(), "frame after completion");
            self.frames.push(offset);
        }

        fn on_complete(&mut self, to: usize) {
            self.completed.push(to);
        }
    }

    fn spec(from: usize, to: usize, ms: u64) -> TransitionSpec {
        TransitionSpec {
            from,
            to,
            duration: Duration::from_millis(ms),
            easing: Easing::Curve(EasingType::Linear),
        }
    }

    /// Drain and service the queue once
    fn refresh(
        driver: &mut AnimationDriver,
        frames: &mut FrameQueue,
        extent: f64,
        now: Instant,
        sink: &mut Recorder,
    ) {
        for token in frames.drain() {
            driver.on_refresh(token, extent, now, frames, sink);
        }
    }

    #[test]
    fn test_zero_duration_commits_synchronously() {
        let mut driver = AnimationDriver::default();
        let mut frames = FrameQueue::new();
        let mut sink = Recorder::default();

        driver.start(spec(0, 2, 0), 500.0, Instant::now(), &mut frames, &mut sink);

        assert_eq!(sink.frames, vec![-1000.0]);
        assert_eq!(sink.completed, vec![2]);
        assert!(!frames.is_pending());
        assert!(!driver.is_running());
    }

    #[test]
    fn test_reduced_motion_skips_interpolation() {
        let mut driver = AnimationDriver::new(true);
        let mut frames = FrameQueue::new();
        let mut sink = Recorder::default();

        driver.start(spec(3, 1, 800), 10.0, Instant::now(), &mut frames, &mut sink);

        assert_eq!(sink.frames, vec![-10.0]);
        assert_eq!(sink.completed, vec![1]);
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_interpolates_and_snaps() {
        let mut driver = AnimationDriver::default();
        let mut frames = FrameQueue::new();
        let mut sink = Recorder::default();
        let start = Instant::now();

        driver.start(spec(0, 1, 100), 100.0, start, &mut frames, &mut sink);
        assert!(sink.frames.is_empty());
        assert_eq!(frames.pending_count(), 1);

        refresh(&mut driver, &mut frames, 100.0, start + Duration::from_millis(50), &mut sink);
        assert_eq!(sink.frames.len(), 1);
        assert!((sink.frames[0] + 50.0).abs() < 1e-9);
        assert!(sink.completed.is_empty());

        refresh(&mut driver, &mut frames, 100.0, start + Duration::from_millis(150), &mut sink);
        assert_eq!(*sink.frames.last().unwrap(), -100.0);
        assert_eq!(sink.completed, vec![1]);
        assert!(!frames.is_pending());
        assert!(!driver.is_running());
    }

    #[test]
    fn test_frames_strictly_increase_in_t() {
        let mut driver = AnimationDriver::default();
        let mut frames = FrameQueue::new();
        let mut sink = Recorder::default();
        let start = Instant::now();

        driver.start(spec(0, 4, 1000), 10.0, start, &mut frames, &mut sink);
        let at = start + Duration::from_millis(200);
        refresh(&mut driver, &mut frames, 10.0, at, &mut sink);
        refresh(&mut driver, &mut frames, 10.0, at, &mut sink);
        assert_eq!(sink.frames.len(), 1, "repeated instant must not re-emit");
        assert!(frames.is_pending(), "driver keeps polling");

        for ms in [400, 600, 800] {
            refresh(&mut driver, &mut frames, 10.0, start + Duration::from_millis(ms), &mut sink);
        }
        for pair in sink.frames.windows(2) {
            assert!(pair[1] < pair[0], "offsets move monotonically toward target");
        }
    }

    #[test]
    fn test_restart_cancels_pending_registration() {
        let mut driver = AnimationDriver::default();
        let mut frames = FrameQueue::new();
        let mut sink = Recorder::default();
        let start = Instant::now();

        driver.start(spec(0, 1, 100), 10.0, start, &mut frames, &mut sink);
        driver.start(spec(0, 3, 100), 10.0, start, &mut frames, &mut sink);
        assert_eq!(frames.pending_count(), 1);
        assert_eq!(driver.target(), Some(3));
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut driver = AnimationDriver::default();
        let mut frames = FrameQueue::new();
        let mut sink = Recorder::default();
        let start = Instant::now();

        driver.start(spec(0, 1, 100), 10.0, start, &mut frames, &mut sink);
        let stale = frames.drain()[0];
        driver.cancel(&mut frames);
        assert!(!driver.on_refresh(stale, 10.0, start, &mut frames, &mut sink));
        assert!(sink.frames.is_empty());
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_resize_rescales_in_flight() {
        let mut driver = AnimationDriver::default();
        let mut frames = FrameQueue::new();
        let mut sink = Recorder::default();
        let start = Instant::now();

        driver.start(spec(0, 1, 100), 100.0, start, &mut frames, &mut sink);
        refresh(&mut driver, &mut frames, 40.0, start + Duration::from_millis(200), &mut sink);
        assert_eq!(sink.frames, vec![-40.0]);
    }
}
