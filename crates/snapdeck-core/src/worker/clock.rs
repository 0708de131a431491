//! Clock worker
//!
//! A background task that keeps its own copy of the time, publishes it right
//! away and then once a second, advancing the copy by one second per tick.
//! The UI never shares the task's state; it only receives ticks and sends
//! commands.
//!
//! `LoopClock` is the same clock driven by the UI loop instead, so it stops
//! whenever the loop is held up.

use std::time::Instant;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info};

/// Tick logging switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockLog {
    pub enabled: bool,
}

/// Message from the UI to the clock task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    Configure(ClockLog),
}

#[derive(Debug)]
struct ClockState {
    current: DateTime<Utc>,
    log_enabled: bool,
}

impl ClockState {
    /// Return the time to publish and move one second forward
    fn tick(&mut self) -> DateTime<Utc> {
        let now = self.current;
        if self.log_enabled {
            info!(time = %now.format("%H:%M:%S"), "clock tick");
        }
        self.current = now + ChronoDuration::seconds(1);
        now
    }

    fn apply(&mut self, command: ClockCommand) {
        match command {
            ClockCommand::Configure(ClockLog { enabled }) => self.log_enabled = enabled,
        }
    }
}

/// Handle to the running clock task
#[derive(Debug)]
pub struct ClockWorker {
    commands: mpsc::UnboundedSender<ClockCommand>,
    ticks: watch::Receiver<Option<DateTime<Utc>>>,
    handle: JoinHandle<()>,
}

impl ClockWorker {
    /// Spawn on the current tokio runtime, starting from `start`
    pub fn spawn(start: DateTime<Utc>, log: ClockLog) -> Self {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let (tick_tx, tick_rx) = watch::channel(None);
        let mut state = ClockState {
            current: start,
            log_enabled: log.enabled,
        };

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if tick_tx.send(Some(state.tick())).is_err() {
                            break;
                        }
                    }
                    command = command_rx.recv() => match command {
                        Some(command) => state.apply(command),
                        None => break,
                    },
                }
            }
            debug!("clock task exited");
        });

        Self {
            commands: command_tx,
            ticks: tick_rx,
            handle,
        }
    }

    pub fn set_logging(&self, enabled: bool) {
        let _ = self
            .commands
            .send(ClockCommand::Configure(ClockLog { enabled }));
    }

    /// Latest tick if one arrived since the last call
    pub fn try_latest(&mut self) -> Option<DateTime<Utc>> {
        if self.ticks.has_changed().unwrap_or(false) {
            *self.ticks.borrow_and_update()
        } else {
            None
        }
    }

    /// Wait for the next tick; `None` once the task has stopped
    pub async fn next_tick(&mut self) -> Option<DateTime<Utc>> {
        self.ticks.changed().await.ok()?;
        *self.ticks.borrow_and_update()
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for ClockWorker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Once-a-second clock polled by the UI loop
///
/// Ticks missed while the loop was blocked collapse into one, so a blocked
/// loop leaves this clock behind the task clock.
#[derive(Debug)]
pub struct LoopClock {
    current: DateTime<Utc>,
    next_tick: Instant,
    log_enabled: bool,
}

impl LoopClock {
    pub fn new(start: DateTime<Utc>, log: ClockLog, now: Instant) -> Self {
        Self {
            current: start,
            next_tick: now + Duration::from_secs(1),
            log_enabled: log.enabled,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.current
    }

    pub fn set_logging(&mut self, enabled: bool) {
        self.log_enabled = enabled;
    }

    /// Advance one second if a tick is due; returns whether it ticked
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_tick {
            return false;
        }
        self.current += ChronoDuration::seconds(1);
        self.next_tick = now + Duration::from_secs(1);
        if self.log_enabled {
            info!(time = %self.current.format("%H:%M:%S"), "loop clock tick");
        }
        true
    }
}
