//! Background execution
//!
//! - `canvas` - Drawing surfaces and the offscreen transfer
//! - `task` - The CPU-bound workload
//! - `protocol` - Worker request / response messages
//! - `bridge` - UI-side handle that owns the worker thread
//! - `clock` - Once-a-second clocks, on a task and on the UI loop

pub mod bridge;
pub mod canvas;
pub mod clock;
pub mod protocol;
pub mod task;

pub use bridge::{BridgeEvent, BridgeSettings, WorkerBridge};
pub use canvas::{save_png, Canvas, CanvasView, OffscreenSurface, Surface2d};
pub use clock::{ClockCommand, ClockLog, ClockWorker, LoopClock};
pub use protocol::{JobId, WorkerRequest, WorkerResponse};
pub use task::{HeavyTask, TaskReport, Workload};
