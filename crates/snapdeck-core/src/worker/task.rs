//! The CPU-bound demo workload
//!
//! Until the deadline passes: random-float array math, a JSON round trip,
//! and a grayscale pass over the surface. The run ends by inverting the
//! surface's colours as a visible "done" marker. The same task runs on the
//! UI thread (blocking it) or inside the worker thread.

use std::hint::black_box;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::canvas::Surface2d;
use crate::config::WorkerConfig;
use crate::{Error, Result};

/// Sizes of one workload pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    pub array_len: usize,
    pub json_items: usize,
    pub grayscale_passes: u32,
}

impl Default for Workload {
    fn default() -> Self {
        (&WorkerConfig::default()).into()
    }
}

impl From<&WorkerConfig> for Workload {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            array_len: config.array_len,
            json_items: config.json_items,
            grayscale_passes: config.grayscale_passes,
        }
    }
}

/// Summary of a finished (or abandoned) run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskReport {
    pub passes: u32,
    pub elapsed: Duration,
    /// Sum of square roots from the last array pass
    pub checksum: f64,
    /// Records that survived the last JSON round trip
    pub records: usize,
    pub cancelled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    i: usize,
    v: String,
    t: i64,
}

/// Fill with opaque gray noise
pub fn seed_noise(image: &mut RgbaImage) {
    let mut rng = rand::rng();
    for pixel in image.pixels_mut() {
        let v: u8 = rng.random();
        pixel.0 = [v, v, v, 255];
    }
}

/// Fill `n` random floats and sum their square roots
pub fn heavy_array_ops(n: usize) -> f64 {
    let mut rng = rand::rng();
    let values: Vec<f64> = (0..n).map(|_| rng.random::<f64>()).collect();
    black_box(values.iter().map(|v| v.sqrt()).sum())
}

/// Serialize and parse `items` records; returns the parsed count
pub fn big_json_roundtrip(items: usize) -> Result<usize> {
    let mut rng = rand::rng();
    let now = chrono::Utc::now().timestamp_millis();
    let records: Vec<Record> = (0..items)
        .map(|i| Record {
            i,
            v: base36(rng.random::<u64>()),
            t: now,
        })
        .collect();
    let text = serde_json::to_string(&records)?;
    let parsed: Vec<Record> = serde_json::from_str(&text)?;
    Ok(black_box(parsed.len()))
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::with_capacity(13);
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Average RGB into gray, `passes` times
pub fn grayscale(image: &mut RgbaImage, passes: u32) {
    for _ in 0..passes {
        for pixel in image.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let gray = ((r as u16 + g as u16 + b as u16) / 3) as u8;
            pixel.0 = [gray, gray, gray, a];
        }
    }
}

/// Invert RGB, keep alpha
pub fn invert(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [255 - r, 255 - g, 255 - b, a];
    }
}

/// One configured workload, abortable from another thread
#[derive(Debug, Clone)]
pub struct HeavyTask {
    workload: Workload,
    cancel: Arc<AtomicBool>,
}

impl HeavyTask {
    pub fn new(workload: Workload) -> Self {
        Self {
            workload,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an existing cancel flag
    pub fn with_cancel(workload: Workload, cancel: Arc<AtomicBool>) -> Self {
        Self { workload, cancel }
    }

    pub fn workload(&self) -> Workload {
        self.workload
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Run against `surface` for `seconds`
    ///
    /// `on_pass` sees the surface after every grayscale pass. A raised cancel
    /// flag stops the run before the invert marker is drawn.
    pub fn run<S: Surface2d>(
        &self,
        seconds: f64,
        surface: &mut S,
        mut on_pass: impl FnMut(&S),
    ) -> Result<TaskReport> {
        let started = Instant::now();
        let deadline = Duration::try_from_secs_f64(seconds.max(0.0))
            .ok()
            .and_then(|budget| started.checked_add(budget))
            .ok_or_else(|| Error::Config(format!("task duration out of range: {}s", seconds)))?;
        let mut report = TaskReport {
            passes: 0,
            elapsed: Duration::ZERO,
            checksum: 0.0,
            records: 0,
            cancelled: false,
        };

        while Instant::now() < deadline {
            if self.cancelled() {
                report.cancelled = true;
                break;
            }
            report.checksum = heavy_array_ops(self.workload.array_len);
            report.records = big_json_roundtrip(self.workload.json_items)?;

            let mut image = surface.get_image_data();
            grayscale(&mut image, self.workload.grayscale_passes);
            surface.put_image_data(&image);
            report.passes += 1;
            on_pass(surface);
        }

        if !report.cancelled && !self.cancelled() {
            let mut image = surface.get_image_data();
            invert(&mut image);
            surface.put_image_data(&image);
        } else {
            report.cancelled = true;
        }

        report.elapsed = started.elapsed();
        debug!(
            passes = report.passes,
            elapsed_ms = report.elapsed.as_millis() as u64,
            cancelled = report.cancelled,
            "heavy task finished"
        );
        Ok(report)
    }
}
