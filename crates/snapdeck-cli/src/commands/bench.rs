use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use image::RgbaImage;
use tracing::info;

use snapdeck_core::metrics::FpsMeter;
use snapdeck_core::worker::{
    save_png, BridgeEvent, BridgeSettings, Canvas, HeavyTask, TaskReport, WorkerBridge,
};
use snapdeck_core::AppConfig;

use crate::BenchMode;

/// One simulated UI frame
const FRAME: Duration = Duration::from_millis(16);

/// What the UI loop saw while a run was in flight
struct RunStats {
    report: TaskReport,
    frames: usize,
    stutters: usize,
    longest_frame: Duration,
    pixels: RgbaImage,
}

pub async fn run(
    config: Arc<AppConfig>,
    seconds: f64,
    mode: BenchMode,
    png: Option<PathBuf>,
) -> Result<()> {
    println!("Running the heavy task for {:.1}s per run...\n", seconds);

    let mut results = Vec::new();
    if matches!(mode, BenchMode::Main | BenchMode::Both) {
        results.push(("main thread", on_main_thread(&config, seconds)?));
    }
    if matches!(mode, BenchMode::Worker | BenchMode::Both) {
        let label = if config.worker.offscreen {
            "worker (offscreen)"
        } else {
            "worker (fallback)"
        };
        results.push((label, in_worker(&config, seconds).await?));
    }

    for (label, stats) in &results {
        println!("  {}", label);
        println!(
            "    passes: {}  elapsed: {} ms  records: {}",
            stats.report.passes,
            stats.report.elapsed.as_millis(),
            stats.report.records
        );
        println!(
            "    ui frames: {}  stutters(>33ms): {}  longest frame: {} ms",
            stats.frames,
            stats.stutters,
            stats.longest_frame.as_millis()
        );
        println!();
    }

    if let Some(path) = png {
        let several = results.len() > 1;
        for (label, stats) in &results {
            let target = if several {
                suffixed(&path, label.split_whitespace().next().unwrap_or("run"))
            } else {
                path.clone()
            };
            save_png(&stats.pixels, &target)?;
            println!("Saved {} canvas to {}", label, target.display());
        }
    }

    Ok(())
}

/// `out.png` + `main` -> `out-main.png`
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "canvas".to_string());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    path.with_file_name(format!("{}-{}.{}", stem, suffix, ext))
}

fn canvas(config: &AppConfig) -> Canvas {
    Canvas::new(config.worker.canvas_width, config.worker.canvas_height)
}

/// The UI loop is the thread doing the work, so it gets no frames in between
fn on_main_thread(config: &AppConfig, seconds: f64) -> Result<RunStats> {
    info!(seconds, "bench: main thread");
    let task = HeavyTask::new((&config.worker).into());
    let mut canvas = canvas(config);

    let mut fps = FpsMeter::default();
    fps.record(Instant::now());
    let report = tokio::task::block_in_place(|| task.run(seconds, &mut canvas, |_| {}))?;
    fps.record(Instant::now());

    Ok(RunStats {
        report,
        frames: fps.len() - 1,
        stutters: fps.stutters(),
        longest_frame: longest(&fps),
        pixels: canvas.pixels().clone(),
    })
}

/// The UI loop keeps ticking while the worker computes
async fn in_worker(config: &AppConfig, seconds: f64) -> Result<RunStats> {
    info!(seconds, offscreen = config.worker.offscreen, "bench: worker");
    let mut bridge = WorkerBridge::spawn(canvas(config), BridgeSettings::from(&config.worker))?;
    if !bridge.start(seconds) {
        return Err(anyhow!("worker refused the job"));
    }

    let mut fps = FpsMeter::default();
    let mut ticker = tokio::time::interval(FRAME);
    let report = loop {
        ticker.tick().await;
        fps.record(Instant::now());
        let mut finished = None;
        for event in bridge.poll() {
            match event {
                BridgeEvent::Finished(report) => finished = Some(report),
                BridgeEvent::Failed(message) => return Err(anyhow!("worker failed: {}", message)),
                BridgeEvent::Painted => {}
            }
        }
        if let Some(report) = finished {
            break report;
        }
    };

    let pixels = bridge.snapshot();
    bridge.terminate();
    Ok(RunStats {
        report,
        frames: fps.len().saturating_sub(1),
        stutters: fps.stutters(),
        longest_frame: longest(&fps),
        pixels,
    })
}

fn longest(fps: &FpsMeter) -> Duration {
    let ms = fps.samples().map(|s| s.dt_ms).fold(0.0, f64::max);
    Duration::from_secs_f64(ms / 1000.0)
}
