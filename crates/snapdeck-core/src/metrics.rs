//! Frame-rate and input-latency readouts

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames slower than this count as stutters (below 30 fps)
pub const STUTTER_DT_MS: f64 = 33.3;
/// The latest frame is flagged when slower than this
pub const LAST_STUTTER_DT_MS: f64 = 50.0;
pub const DEFAULT_SAMPLES: usize = 180;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub at: Instant,
    pub dt_ms: f64,
    pub fps: f64,
}

/// Rolling window of frame timings
#[derive(Debug, Clone)]
pub struct FpsMeter {
    samples: VecDeque<FrameSample>,
    capacity: usize,
    last: Option<Instant>,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLES)
    }
}

impl FpsMeter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            last: None,
        }
    }

    /// Record a drawn frame; the first frame has `dt = 0`
    pub fn record(&mut self, now: Instant) {
        let dt_ms = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        self.last = Some(now);

        let fps = if dt_ms > 0.0 { 1000.0 / dt_ms } else { 0.0 };
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(FrameSample { at: now, dt_ms, fps });
    }

    pub fn samples(&self) -> impl Iterator<Item = &FrameSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn current_fps(&self) -> f64 {
        self.samples.back().map(|s| s.fps).unwrap_or(0.0)
    }

    /// Frames in the window slower than 30 fps
    pub fn stutters(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.dt_ms > STUTTER_DT_MS)
            .count()
    }

    pub fn last_stutter(&self) -> bool {
        self.samples
            .back()
            .is_some_and(|s| s.dt_ms > LAST_STUTTER_DT_MS)
    }
}

/// Delay between reading an input event and handling it
#[derive(Debug, Clone, Copy)]
pub struct LatencyProbe {
    last: Option<Duration>,
    warn_after: Duration,
}

impl LatencyProbe {
    pub fn new(warn_after: Duration) -> Self {
        Self {
            last: None,
            warn_after,
        }
    }

    pub fn record(&mut self, read_at: Instant, handled_at: Instant) -> Duration {
        let latency = handled_at.saturating_duration_since(read_at);
        self.last = Some(latency);
        latency
    }

    pub fn last(&self) -> Option<Duration> {
        self.last
    }

    pub fn last_ms(&self) -> u64 {
        self.last.map(|d| d.as_millis() as u64).unwrap_or(0)
    }

    pub fn is_degraded(&self) -> bool {
        self.last.is_some_and(|d| d > self.warn_after)
    }
}

impl Default for LatencyProbe {
    fn default() -> Self {
        Self::new(Duration::from_millis(80))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fps_from_frame_gaps() {
        let t0 = Instant::now();
        let mut meter = FpsMeter::default();
        meter.record(t0);
        assert_eq!(meter.current_fps(), 0.0);

        meter.record(t0 + ms(20));
        assert!((meter.current_fps() - 50.0).abs() < 1e-6);
        assert_eq!(meter.stutters(), 0);
        assert!(!meter.last_stutter());
    }

    #[test]
    fn test_stutter_thresholds() {
        let t0 = Instant::now();
        let mut meter = FpsMeter::default();
        meter.record(t0);
        meter.record(t0 + ms(40));
        assert_eq!(meter.stutters(), 1);
        assert!(!meter.last_stutter(), "40ms is a stutter but not flagged");

        meter.record(t0 + ms(100));
        assert_eq!(meter.stutters(), 2);
        assert!(meter.last_stutter());
    }

    #[test]
    fn test_window_is_bounded() {
        let t0 = Instant::now();
        let mut meter = FpsMeter::new(3);
        for i in 0..10 {
            meter.record(t0 + ms(i * 16));
        }
        assert_eq!(meter.len(), 3);
        assert!(meter.samples().all(|s| s.dt_ms > 0.0));
    }

    #[test]
    fn test_latency_probe() {
        let t0 = Instant::now();
        let mut probe = LatencyProbe::default();
        assert!(!probe.is_degraded());
        assert_eq!(probe.last_ms(), 0);

        probe.record(t0, t0 + ms(12));
        assert_eq!(probe.last_ms(), 12);
        assert!(!probe.is_degraded());

        probe.record(t0, t0 + ms(250));
        assert!(probe.is_degraded());
    }
}
