//! Main-thread stress helpers
//!
//! `blocking_busy_loop` holds the calling thread until the time is up and
//! cannot be interrupted. The chunked jobs do the same kind of work in small
//! slices, one per refresh, so the UI keeps drawing between slices and an
//! `AbortHandle` can stop them.

use std::hint::black_box;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use crate::worker::task::big_json_roundtrip;
use crate::Result;

/// Burn CPU on the calling thread for `duration`
pub fn blocking_busy_loop(duration: Duration) {
    let mut rng = rand::rng();
    let started = Instant::now();
    while started.elapsed() < duration {
        black_box(rng.random::<f64>().sqrt());
    }
}

/// Shared stop switch for a chunked job
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }
}

/// Result of one slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkStep {
    /// More slices to go; progress in `[0, 1]`
    Progress(f64),
    Finished,
    Aborted,
}

impl ChunkStep {
    pub fn is_done(self) -> bool {
        !matches!(self, ChunkStep::Progress(_))
    }
}

/// Cooperative CPU load: `slice` of work per call until `total` has elapsed
#[derive(Debug)]
pub struct ChunkedCpu {
    total: Duration,
    slice: Duration,
    started: Option<Instant>,
    abort: AbortHandle,
}

impl ChunkedCpu {
    pub fn new(total: Duration, slice: Duration) -> Self {
        Self {
            total,
            slice,
            started: None,
            abort: AbortHandle::new(),
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Run one slice; call once per refresh
    pub fn step(&mut self) -> ChunkStep {
        if self.abort.is_aborted() {
            return ChunkStep::Aborted;
        }
        let started = *self.started.get_or_insert_with(Instant::now);

        let mut rng = rand::rng();
        let slice_end = Instant::now() + self.slice;
        while Instant::now() < slice_end {
            let n = (rng.random::<f64>() * 1e7) as u64;
            black_box(n.wrapping_mul(7919));
            black_box(rng.random::<f64>().sqrt());
        }

        let elapsed = started.elapsed();
        if elapsed >= self.total || self.total.is_zero() {
            debug!(elapsed_ms = elapsed.as_millis() as u64, "cpu chunks finished");
            ChunkStep::Finished
        } else {
            ChunkStep::Progress(elapsed.as_secs_f64() / self.total.as_secs_f64())
        }
    }
}

impl Default for ChunkedCpu {
    fn default() -> Self {
        Self::new(Duration::from_secs(8), Duration::from_millis(8))
    }
}

/// Cooperative JSON load: build `chunks` batches of records, then round-trip them
#[derive(Debug)]
pub struct JsonChunks {
    chunks: usize,
    chunk_size: usize,
    done: usize,
    abort: AbortHandle,
}

impl JsonChunks {
    pub fn new(chunks: usize, chunk_size: usize) -> Self {
        Self {
            chunks,
            chunk_size,
            done: 0,
            abort: AbortHandle::new(),
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn step(&mut self) -> Result<ChunkStep> {
        if self.abort.is_aborted() {
            return Ok(ChunkStep::Aborted);
        }
        if self.done >= self.chunks {
            return Ok(ChunkStep::Finished);
        }
        big_json_roundtrip(self.chunk_size)?;
        self.done += 1;
        if self.done == self.chunks {
            Ok(ChunkStep::Finished)
        } else {
            Ok(ChunkStep::Progress(self.done as f64 / self.chunks as f64))
        }
    }
}

impl Default for JsonChunks {
    fn default() -> Self {
        Self::new(40, 1800)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_loop_blocks_for_duration() {
        let started = Instant::now();
        blocking_busy_loop(Duration::from_millis(20));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_cpu_chunks_progress_then_finish() {
        let mut job = ChunkedCpu::new(Duration::from_millis(30), Duration::from_millis(5));
        let mut last = 0.0;
        loop {
            match job.step() {
                ChunkStep::Progress(p) => {
                    assert!((0.0..1.0).contains(&p));
                    assert!(p >= last);
                    last = p;
                }
                ChunkStep::Finished => break,
                ChunkStep::Aborted => panic!("not aborted"),
            }
        }
    }

    #[test]
    fn test_cpu_chunks_abort() {
        let mut job = ChunkedCpu::new(Duration::from_secs(10), Duration::from_millis(1));
        assert!(!job.step().is_done());
        job.abort_handle().abort();
        assert_eq!(job.step(), ChunkStep::Aborted);
    }

    #[test]
    fn test_json_chunks_count() {
        let mut job = JsonChunks::new(3, 10);
        assert!(matches!(job.step().unwrap(), ChunkStep::Progress(p) if (p - 1.0 / 3.0).abs() < 1e-9));
        assert!(!job.step().unwrap().is_done());
        assert_eq!(job.step().unwrap(), ChunkStep::Finished);
        assert_eq!(job.step().unwrap(), ChunkStep::Finished);

        let mut aborted = JsonChunks::new(3, 10);
        aborted.abort_handle().abort();
        assert_eq!(aborted.step().unwrap(), ChunkStep::Aborted);
    }
}
