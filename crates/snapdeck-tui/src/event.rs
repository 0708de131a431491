use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;
use tracing::debug;

/// Event handler for terminal events
///
/// Terminal input is read on its own thread and stamped with the instant it
/// was read, so events keep queueing while the UI thread is blocked and the
/// delay can be measured once they are handled.
pub struct EventHandler {
    tick_rate: Duration,
    animation_interval: Duration,
    events: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self::with_animation_fps(tick_rate_ms, 60)
    }

    /// Create an event handler with a faster tick while animating
    pub fn with_animation_fps(tick_rate_ms: u64, animation_fps: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let spawned = thread::Builder::new()
            .name("snapdeck-input".to_string())
            .spawn(move || read_loop(tx));
        if let Err(e) = spawned {
            debug!(error = %e, "input thread failed to start");
        }

        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            animation_interval: Duration::from_micros(1_000_000 / animation_fps.max(1) as u64),
            events: rx,
        }
    }

    /// Wait for the next event, or a tick after the idle tick rate
    pub async fn next(&mut self) -> Result<AppEvent> {
        self.next_within(self.tick_rate).await
    }

    /// Wait for the next event, or a tick after one animation frame
    pub async fn next_animation(&mut self) -> Result<AppEvent> {
        self.next_within(self.animation_interval).await
    }

    async fn next_within(&mut self, timeout: Duration) -> Result<AppEvent> {
        match tokio::time::timeout(timeout, self.events.recv()).await {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(anyhow!("terminal input closed")),
            Err(_) => Ok(AppEvent::Tick),
        }
    }

    /// Next already-queued event, without waiting
    pub fn try_next(&mut self) -> Option<AppEvent> {
        self.events.try_recv().ok()
    }
}

fn read_loop(tx: mpsc::UnboundedSender<AppEvent>) {
    loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(_) => break,
        }
        let Ok(event) = event::read() else {
            break;
        };
        let read_at = Instant::now();
        let app_event = match event {
            // Only handle key press events, ignore release events
            Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key, read_at),
            Event::Mouse(mouse) => AppEvent::Mouse(mouse, read_at),
            Event::Resize(w, h) => AppEvent::Resize(w, h),
            _ => continue,
        };
        if tx.send(app_event).is_err() {
            break;
        }
    }
    debug!("input thread exited");
}

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A key was pressed, with the instant it was read
    Key(KeyEvent, Instant),
    /// Mouse wheel, click or drag, with the instant it was read
    Mouse(MouseEvent, Instant),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

impl AppEvent {
    /// When the event was read from the terminal
    pub fn read_at(&self) -> Option<Instant> {
        match self {
            AppEvent::Key(_, at) | AppEvent::Mouse(_, at) => Some(*at),
            _ => None,
        }
    }
}
