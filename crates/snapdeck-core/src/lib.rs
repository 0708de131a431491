pub mod config;
pub mod error;
pub mod fullpage;
pub mod metrics;
pub mod stress;
pub mod worker;

pub use config::{AppConfig, EasingType, FullPageConfig, WorkerConfig};
pub use error::{Error, Result};
pub use fullpage::{ControllerOptions, SectionController, Target};
pub use worker::{BridgeSettings, Canvas, ClockWorker, WorkerBridge};
