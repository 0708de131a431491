use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};

use snapdeck_core::fullpage::{ControllerOptions, Location, SectionController};
use snapdeck_core::metrics::{FpsMeter, LatencyProbe};
use snapdeck_core::stress::{blocking_busy_loop, AbortHandle, ChunkStep, ChunkedCpu, JsonChunks};
use snapdeck_core::worker::task::seed_noise;
use snapdeck_core::worker::{
    BridgeEvent, BridgeSettings, Canvas, ClockLog, ClockWorker, HeavyTask, LoopClock, Surface2d,
    TaskReport, WorkerBridge,
};
use snapdeck_core::AppConfig;

use crate::input::Action;
use crate::theme::Theme;

/// The fixed list of demo sections, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Intro,
    Clock,
    Stress,
    Canvas,
    About,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Intro,
        SectionKind::Clock,
        SectionKind::Stress,
        SectionKind::Canvas,
        SectionKind::About,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Intro => "Main thread vs worker",
            SectionKind::Clock => "Clock worker",
            SectionKind::Stress => "Main-thread load",
            SectionKind::Canvas => "Canvas: main vs worker",
            SectionKind::About => "About",
        }
    }
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal browsing mode
    Normal,
    /// Typing into the latency box
    Input,
    /// Help overlay
    Help,
}

/// Cooperative main-thread load currently running
#[derive(Debug)]
pub enum StressJob {
    Cpu(ChunkedCpu),
    Json(JsonChunks),
}

impl StressJob {
    fn label(&self) -> &'static str {
        match self {
            StressJob::Cpu(_) => "cpu chunks",
            StressJob::Json(_) => "json chunks",
        }
    }

    fn abort_handle(&self) -> AbortHandle {
        match self {
            StressJob::Cpu(job) => job.abort_handle(),
            StressJob::Json(job) => job.abort_handle(),
        }
    }

    fn step(&mut self) -> ChunkStep {
        match self {
            StressJob::Cpu(job) => job.step(),
            StressJob::Json(job) => job.step().unwrap_or(ChunkStep::Aborted),
        }
    }
}

const LOG_LINES: usize = 50;
const BLOCKING_LOOP: Duration = Duration::from_secs(3);

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    /// Full-page section deck
    pub deck: SectionController,
    pub sections: Vec<SectionKind>,
    /// Worker that owns (or borrows pixels of) the worker-side canvas
    pub bridge: WorkerBridge,
    /// Canvas drawn by the UI thread itself
    pub main_canvas: Canvas,
    main_task: HeavyTask,
    pub main_report: Option<TaskReport>,
    pub clock: Option<ClockWorker>,
    pub clock_time: Option<DateTime<Utc>>,
    /// Clock ticked by this loop; freezes while the loop is blocked
    pub loop_clock: LoopClock,
    pub clock_logging: bool,
    pub fps: FpsMeter,
    pub latency: LatencyProbe,
    pub stress: Option<StressJob>,
    pub stress_progress: f64,
    /// Current application mode
    pub mode: Mode,
    /// Text typed into the latency box
    pub input: String,
    /// Newest first
    pub log: VecDeque<String>,
    /// Status message
    pub status_message: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Build the deck and spawn the worker
    ///
    /// `section` is an initial deep link (anchor or `section-N`).
    pub fn new(config: Arc<AppConfig>, theme: Theme, section: Option<&str>) -> Result<Self> {
        let sections = SectionKind::ALL.to_vec();
        let mut options = ControllerOptions::from(&config.fullpage)
            .on_leave(|from, to| debug!(from, to, "leaving section"))
            .after_load(|index| debug!(index, "section loaded"));
        if let Some(fragment) = section {
            options = options.location(Location::with_fragment(fragment));
        }
        let deck = SectionController::new(sections.len(), options)?;

        let worker = &config.worker;
        let bridge = WorkerBridge::spawn(
            Canvas::new(worker.canvas_width, worker.canvas_height),
            BridgeSettings::from(worker),
        )?;

        let mut main_canvas = Canvas::new(worker.canvas_width, worker.canvas_height);
        let mut noise = main_canvas.get_image_data();
        seed_noise(&mut noise);
        main_canvas.put_image_data(&noise);

        let latency = LatencyProbe::new(Duration::from_millis(config.ui.latency_warn_ms));
        let clock_log = ClockLog {
            enabled: config.clock.log_ticks,
        };
        let mut app = Self {
            clock_logging: clock_log.enabled,
            loop_clock: LoopClock::new(Utc::now(), clock_log, Instant::now()),
            main_task: HeavyTask::new(worker.into()),
            config,
            theme,
            deck,
            sections,
            bridge,
            main_canvas,
            main_report: None,
            clock: None,
            clock_time: None,
            fps: FpsMeter::default(),
            latency,
            stress: None,
            stress_progress: 0.0,
            mode: Mode::Normal,
            input: String::new(),
            log: VecDeque::with_capacity(LOG_LINES),
            status_message: None,
            should_quit: false,
        };
        let path = if app.bridge.is_offscreen() {
            "offscreen canvas"
        } else {
            "pixel-buffer fallback"
        };
        app.log_line(format!("worker ready ({})", path));
        Ok(app)
    }

    /// Start the clock task; needs a running tokio runtime
    pub fn attach_clock(&mut self) {
        self.clock = Some(ClockWorker::spawn(
            Utc::now(),
            ClockLog {
                enabled: self.clock_logging,
            },
        ));
    }

    pub fn active_section(&self) -> SectionKind {
        self.sections[self.deck.current_index()]
    }

    /// Location fragment shown in the status bar
    pub fn location_hash(&self) -> String {
        self.deck.location().hash()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn log_line(&mut self, msg: impl Into<String>) {
        let line = format!("{} {}", Local::now().format("%H:%M:%S"), msg.into());
        if self.log.len() == LOG_LINES {
            self.log.pop_back();
        }
        self.log.push_front(line);
    }

    /// Keep the deck's section height in step with the viewport
    pub fn resize(&mut self, rows: u16) {
        if self.deck.viewport_extent() != rows as f64 {
            self.deck.resize(rows as f64);
        }
    }

    /// Whether the loop should run at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.deck.needs_refresh() || self.stress.is_some() || self.bridge.is_busy()
    }

    /// Per-frame housekeeping
    pub fn on_refresh(&mut self, now: Instant) {
        if self.deck.needs_refresh() {
            self.deck.on_refresh(now);
        }
        self.step_stress();

        for event in self.bridge.poll() {
            match event {
                BridgeEvent::Painted => {}
                BridgeEvent::Finished(report) => self.log_line(format!(
                    "worker done: {} passes in {} ms",
                    report.passes,
                    report.elapsed.as_millis()
                )),
                BridgeEvent::Failed(message) => self.log_line(format!("worker failed: {}", message)),
            }
        }

        self.loop_clock.poll(now);
        if let Some(clock) = self.clock.as_mut() {
            if let Some(time) = clock.try_latest() {
                self.clock_time = Some(time);
            }
        }
    }

    /// Record how long an input event waited before being handled
    pub fn record_latency(&mut self, read_at: Instant, now: Instant) {
        let latency = self.latency.record(read_at, now);
        if self.latency.is_degraded() {
            debug!(latency_ms = latency.as_millis() as u64, "input latency degraded");
        }
    }

    fn step_stress(&mut self) {
        let Some(job) = self.stress.as_mut() else {
            return;
        };
        match job.step() {
            ChunkStep::Progress(p) => self.stress_progress = p,
            ChunkStep::Finished => {
                let label = job.label();
                self.stress = None;
                self.stress_progress = 1.0;
                self.log_line(format!("{} finished", label));
            }
            ChunkStep::Aborted => {
                let label = job.label();
                self.stress = None;
                self.log_line(format!("{} aborted", label));
            }
        }
    }

    /// Apply an action
    ///
    /// `RunMainThread` and `BlockingLoop` block the calling thread on
    /// purpose; the caller decides how that thread is parked.
    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Nav(key) => {
                self.deck.on_key(key, now);
            }
            Action::NextSection => {
                self.deck.next(now);
            }
            Action::PrevSection => {
                self.deck.previous(now);
            }
            Action::GoTo(index) => {
                if index < self.deck.section_count() {
                    self.deck.go_to(index, now);
                }
            }
            Action::Wheel(delta) => {
                self.deck.on_wheel(delta, now);
            }
            Action::TouchStart(y) => self.deck.on_touch_start(y),
            Action::TouchMove(y) => {
                self.deck.on_touch_move(y, now);
            }
            Action::TouchEnd => self.deck.on_touch_end(),
            Action::StartWorker => self.start_worker(),
            Action::RunMainThread => self.run_main_thread_task(),
            Action::BlockingLoop => self.run_blocking_loop(),
            Action::StartCpuChunks => self.start_stress(StressJob::Cpu(ChunkedCpu::default())),
            Action::StartJsonChunks => self.start_stress(StressJob::Json(JsonChunks::default())),
            Action::AbortStress => {
                if let Some(job) = &self.stress {
                    job.abort_handle().abort();
                }
            }
            Action::ToggleClockLog => {
                self.clock_logging = !self.clock_logging;
                self.loop_clock.set_logging(self.clock_logging);
                if let Some(clock) = &self.clock {
                    clock.set_logging(self.clock_logging);
                }
                let state = if self.clock_logging { "on" } else { "off" };
                self.set_status(format!("Clock logging {}", state));
            }
            Action::StartInput => self.mode = Mode::Input,
            Action::ToggleHelp => {
                self.mode = if self.mode == Mode::Help {
                    Mode::Normal
                } else {
                    Mode::Help
                };
            }
            Action::ExitMode => {
                self.mode = Mode::Normal;
                self.status_message = None;
            }
            Action::Confirm => {
                let text = std::mem::take(&mut self.input);
                self.log_line(format!("typed: {}", text));
                self.mode = Mode::Normal;
            }
            Action::InputChar(c) => self.input.push(c),
            Action::Backspace => {
                self.input.pop();
            }
            Action::None => {}
        }
    }

    fn start_worker(&mut self) {
        let seconds = self.config.worker.seconds;
        if self.bridge.start(seconds) {
            self.log_line(format!("worker start ({:.1}s)", seconds));
        } else {
            self.set_status("Worker busy");
        }
    }

    fn start_stress(&mut self, job: StressJob) {
        if self.stress.is_some() {
            self.set_status("Stress job already running");
            return;
        }
        self.log_line(format!("{} start", job.label()));
        self.stress_progress = 0.0;
        self.stress = Some(job);
    }

    /// Run the heavy task on this thread against the main canvas
    pub fn run_main_thread_task(&mut self) {
        let seconds = self.config.worker.seconds;
        info!(seconds, "running heavy task on the UI thread");
        match self.main_task.run(seconds, &mut self.main_canvas, |_| {}) {
            Ok(report) => {
                self.main_report = Some(report);
                self.log_line(format!(
                    "main thread done: {} passes in {} ms",
                    report.passes,
                    report.elapsed.as_millis()
                ));
            }
            Err(e) => self.log_line(format!("main thread failed: {}", e)),
        }
    }

    /// Hold this thread with no way to interrupt
    pub fn run_blocking_loop(&mut self) {
        info!(ms = BLOCKING_LOOP.as_millis() as u64, "blocking busy loop");
        blocking_busy_loop(BLOCKING_LOOP);
        self.log_line(format!("blocked for {} ms", BLOCKING_LOOP.as_millis()));
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let mut config = AppConfig::default();
        config.fullpage.duration_ms = 0;
        config.worker.canvas_width = 8;
        config.worker.canvas_height = 4;
        config.worker.seconds = 0.0;
        config.worker.array_len = 100;
        config.worker.json_items = 10;
        match App::new(Arc::new(config), Theme::default(), None) {
            Ok(app) => app,
            Err(e) => panic!("test app: {}", e),
        }
    }
}
