//! Messages between the UI thread and the worker thread
//!
//! Values moved into a message are transferred: the sender no longer has
//! them. That is how the offscreen surface and the fallback pixel buffers
//! change hands.

use image::RgbaImage;
use uuid::Uuid;

use super::canvas::OffscreenSurface;
use super::task::TaskReport;

/// Correlates a `Start` with its replies
pub type JobId = Uuid;

/// Message from UI thread to worker
#[derive(Debug)]
pub enum WorkerRequest {
    /// Hand over the drawing surface; sent once at setup
    Init {
        surface: OffscreenSurface,
        width: u32,
        height: u32,
    },
    /// Run the workload. `image` carries the pixels when no surface was transferred.
    Start {
        job: JobId,
        seconds: f64,
        image: Option<RgbaImage>,
    },
    /// Stop the worker loop
    Terminate,
}

/// Message from worker to UI thread
#[derive(Debug)]
pub enum WorkerResponse {
    /// Job finished
    Done { job: JobId, report: TaskReport },
    /// Fallback path: intermediate pixels
    PartialImage { job: JobId, image: RgbaImage },
    /// Fallback path: final pixels, sent before `Done`
    FinalImage { job: JobId, image: RgbaImage },
    /// Job could not run
    Failed { job: JobId, message: String },
}

impl WorkerResponse {
    pub fn job(&self) -> JobId {
        match self {
            WorkerResponse::Done { job, .. }
            | WorkerResponse::PartialImage { job, .. }
            | WorkerResponse::FinalImage { job, .. }
            | WorkerResponse::Failed { job, .. } => *job,
        }
    }
}
