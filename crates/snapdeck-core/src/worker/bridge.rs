//! Worker bridge
//!
//! Spawns the background worker thread, hands it the canvas when offscreen
//! transfer is available, and tracks a single in-flight job. Without
//! offscreen transfer the canvas stays on the UI thread and its pixels travel
//! to the worker and back inside messages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use image::RgbaImage;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::canvas::{Canvas, CanvasView, OffscreenSurface, Surface2d};
use super::protocol::{JobId, WorkerRequest, WorkerResponse};
use super::task::{seed_noise, HeavyTask, TaskReport, Workload};
use crate::config::WorkerConfig;
use crate::{Error, Result};

/// How the bridge is set up
#[derive(Debug, Clone, Copy)]
pub struct BridgeSettings {
    /// Transfer the canvas to the worker (false forces the fallback path)
    pub offscreen: bool,
    pub workload: Workload,
    /// Fallback path: minimum gap between partial images, `None` for final only
    pub partial_interval: Option<Duration>,
}

impl From<&WorkerConfig> for BridgeSettings {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            offscreen: config.offscreen,
            workload: config.into(),
            partial_interval: (config.partial_interval_ms > 0)
                .then(|| Duration::from_millis(config.partial_interval_ms)),
        }
    }
}

/// What changed after draining worker replies
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// Fallback pixels were painted onto the canvas
    Painted,
    Finished(TaskReport),
    Failed(String),
}

enum Display {
    /// Canvas transferred; the UI only reads committed frames
    Offscreen(CanvasView),
    /// Canvas still owned here (fallback path)
    Main(Canvas),
}

pub struct WorkerBridge {
    requests: mpsc::UnboundedSender<WorkerRequest>,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
    display: Display,
    cancel: Arc<AtomicBool>,
    busy: Option<JobId>,
    last_report: Option<TaskReport>,
    terminated: bool,
}

impl std::fmt::Debug for WorkerBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerBridge")
            .field("offscreen", &self.is_offscreen())
            .field("busy", &self.busy)
            .field("terminated", &self.terminated)
            .finish()
    }
}

impl WorkerBridge {
    /// Spawn the worker and set up the canvas
    pub fn spawn(canvas: Canvas, settings: BridgeSettings) -> Result<Self> {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let worker = HeavyWorker {
            surface: None,
            task: HeavyTask::with_cancel(settings.workload, cancel.clone()),
            responses: response_tx,
            partial_interval: settings.partial_interval,
        };
        thread::Builder::new()
            .name("snapdeck-worker".to_string())
            .spawn(move || worker.run(request_rx))
            .map_err(|e| Error::WorkerUnavailable(e.to_string()))?;

        let display = if settings.offscreen {
            let (width, height) = (canvas.width(), canvas.height());
            let (surface, view) = canvas.transfer_control_to_offscreen();
            request_tx
                .send(WorkerRequest::Init {
                    surface,
                    width,
                    height,
                })
                .map_err(|_| Error::WorkerUnavailable("worker exited during init".to_string()))?;
            info!(width, height, "canvas transferred to worker");
            Display::Offscreen(view)
        } else {
            let mut canvas = canvas;
            let mut noise = canvas.get_image_data();
            seed_noise(&mut noise);
            canvas.put_image_data(&noise);
            info!("offscreen transfer unavailable, using pixel-buffer fallback");
            Display::Main(canvas)
        };

        Ok(Self {
            requests: request_tx,
            responses: response_rx,
            display,
            cancel,
            busy: None,
            last_report: None,
            terminated: false,
        })
    }

    #[inline]
    pub fn is_offscreen(&self) -> bool {
        matches!(self.display, Display::Offscreen(_))
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    pub fn last_report(&self) -> Option<TaskReport> {
        self.last_report
    }

    /// Ask the worker to run for `seconds`; ignored while a job is in flight
    pub fn start(&mut self, seconds: f64) -> bool {
        if self.busy.is_some() || self.terminated {
            return false;
        }
        let job = Uuid::new_v4();
        let image = match &self.display {
            Display::Offscreen(_) => None,
            Display::Main(canvas) => Some(canvas.get_image_data()),
        };
        if self
            .requests
            .send(WorkerRequest::Start {
                job,
                seconds,
                image,
            })
            .is_err()
        {
            warn!("worker is gone, start ignored");
            return false;
        }
        debug!(%job, seconds, "worker job started");
        self.busy = Some(job);
        true
    }

    /// Apply every reply that has arrived, without blocking
    pub fn poll(&mut self) -> Vec<BridgeEvent> {
        let mut events = Vec::new();
        while let Ok(response) = self.responses.try_recv() {
            if let Some(event) = self.apply(response) {
                events.push(event);
            }
        }
        events
    }

    /// Wait for the next reply that changes anything
    ///
    /// Returns `None` once the worker has exited.
    pub async fn recv(&mut self) -> Option<BridgeEvent> {
        loop {
            let response = self.responses.recv().await?;
            if let Some(event) = self.apply(response) {
                return Some(event);
            }
        }
    }

    fn apply(&mut self, response: WorkerResponse) -> Option<BridgeEvent> {
        if self.busy != Some(response.job()) {
            debug!(job = %response.job(), "stale worker reply ignored");
            return None;
        }
        match response {
            WorkerResponse::PartialImage { image, .. }
            | WorkerResponse::FinalImage { image, .. } => match &mut self.display {
                Display::Main(canvas) => {
                    canvas.put_image_data(&image);
                    Some(BridgeEvent::Painted)
                }
                Display::Offscreen(_) => None,
            },
            WorkerResponse::Done { report, .. } => {
                self.busy = None;
                self.last_report = Some(report);
                Some(BridgeEvent::Finished(report))
            }
            WorkerResponse::Failed { message, .. } => {
                self.busy = None;
                warn!(%message, "worker job failed");
                Some(BridgeEvent::Failed(message))
            }
        }
    }

    /// Borrow the pixels currently on screen
    pub fn with_pixels<R>(&self, f: impl FnOnce(&RgbaImage) -> R) -> R {
        match &self.display {
            Display::Offscreen(view) => f(&view.latest()),
            Display::Main(canvas) => f(canvas.pixels()),
        }
    }

    /// Copy of the pixels currently on screen
    pub fn snapshot(&self) -> RgbaImage {
        self.with_pixels(|pixels| pixels.clone())
    }

    /// Stop the worker; in-flight work is dropped
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.cancel.store(true, Ordering::Relaxed);
        let _ = self.requests.send(WorkerRequest::Terminate);
        self.busy = None;
        self.terminated = true;
        debug!("worker terminated");
    }
}

impl Drop for WorkerBridge {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// State owned by the worker thread
struct HeavyWorker {
    surface: Option<OffscreenSurface>,
    task: HeavyTask,
    responses: mpsc::UnboundedSender<WorkerResponse>,
    partial_interval: Option<Duration>,
}

impl HeavyWorker {
    fn run(mut self, mut requests: mpsc::UnboundedReceiver<WorkerRequest>) {
        while let Some(request) = requests.blocking_recv() {
            match request {
                WorkerRequest::Init {
                    mut surface,
                    width,
                    height,
                } => {
                    let mut noise = RgbaImage::new(width, height);
                    seed_noise(&mut noise);
                    surface.put_image_data(&noise);
                    self.surface = Some(surface);
                }
                WorkerRequest::Start {
                    job,
                    seconds,
                    image,
                } => {
                    if !self.start(job, seconds, image) {
                        break;
                    }
                }
                WorkerRequest::Terminate => break,
            }
        }
        debug!("worker loop exited");
    }

    /// Run one job; false when the UI side is gone
    fn start(&mut self, job: JobId, seconds: f64, image: Option<RgbaImage>) -> bool {
        let outcome = match (image, self.surface.as_mut()) {
            (Some(mut image), _) => {
                let responses = &self.responses;
                let interval = self.partial_interval;
                let mut last_sent = Instant::now();
                let result = self.task.run(seconds, &mut image, |pixels| {
                    if let Some(interval) = interval {
                        if last_sent.elapsed() >= interval {
                            last_sent = Instant::now();
                            let _ = responses.send(WorkerResponse::PartialImage {
                                job,
                                image: pixels.clone(),
                            });
                        }
                    }
                });
                if result.is_ok()
                    && self
                        .responses
                        .send(WorkerResponse::FinalImage { job, image })
                        .is_err()
                {
                    return false;
                }
                result
            }
            (None, Some(surface)) => self.task.run(seconds, surface, |_| {}),
            (None, None) => Err(Error::WorkerUnavailable("no surface to draw on".to_string())),
        };

        let response = match outcome {
            Ok(report) => WorkerResponse::Done { job, report },
            Err(e) => WorkerResponse::Failed {
                job,
                message: e.to_string(),
            },
        };
        self.responses.send(response).is_ok()
    }
}
