//! L3 Molecular Layer: Gesture normalization
//!
//! Turns wheel ticks, drag/swipe movement and navigation keys into at most
//! one navigation `Intent` per physical gesture. Anything arriving while a
//! transition is running is dropped, never queued.

use std::time::{Duration, Instant};

/// Direction of a one-section move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Normalized navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Advance(Direction),
    Absolute(usize),
}

/// Keys the normalizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    PageDown,
    PageUp,
    Space,
    Home,
    End,
}

/// Result of feeding a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    pub intent: Option<Intent>,
    /// The host should swallow the key instead of applying its default scroll
    pub prevent_default: bool,
}

/// Controller state a gesture is judged against
#[derive(Debug, Clone, Copy)]
pub struct GestureContext {
    pub animating: bool,
    pub active_index: usize,
    pub section_count: usize,
    pub looping: bool,
}

impl GestureContext {
    /// Whether a one-section move in `direction` lands on a section
    pub fn allows(&self, direction: Direction) -> bool {
        if self.section_count == 0 {
            return false;
        }
        if self.looping {
            return true;
        }
        match direction {
            Direction::Forward => self.active_index + 1 < self.section_count,
            Direction::Backward => self.active_index > 0,
        }
    }
}

/// Tunables for gesture recognition
#[derive(Debug, Clone, Copy)]
pub struct GestureSettings {
    pub wheel_cooldown: Duration,
    pub touch_threshold: f64,
    pub keyboard: bool,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            wheel_cooldown: Duration::from_millis(500),
            touch_threshold: 60.0,
            keyboard: true,
        }
    }
}

/// Drag tracking between touch start and touch end
#[derive(Debug, Clone, Copy)]
struct TouchTrack {
    start_y: f64,
    /// Set once this gesture produced (or was refused) its one intent
    locked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GestureNormalizer {
    settings: GestureSettings,
    last_gesture_at: Option<Instant>,
    touch: Option<TouchTrack>,
}

impl GestureNormalizer {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            last_gesture_at: None,
            touch: None,
        }
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    /// Feed one wheel tick
    ///
    /// The cooldown clock only restarts when an intent is emitted.
    pub fn wheel(&mut self, delta_y: f64, now: Instant, ctx: GestureContext) -> Option<Intent> {
        if ctx.animating {
            return None;
        }
        if let Some(last) = self.last_gesture_at {
            if now.saturating_duration_since(last) < self.settings.wheel_cooldown {
                return None;
            }
        }

        let direction = if delta_y > 0.0 {
            Direction::Forward
        } else if delta_y < 0.0 {
            Direction::Backward
        } else {
            return None;
        };

        if !ctx.allows(direction) {
            return None;
        }
        self.last_gesture_at = Some(now);
        Some(Intent::Advance(direction))
    }

    /// A finger (or mouse button) went down at `y`
    pub fn touch_start(&mut self, y: f64, ctx: GestureContext) {
        if ctx.animating {
            return;
        }
        self.touch = Some(TouchTrack {
            start_y: y,
            locked: false,
        });
    }

    /// The pointer moved to `y`; emits once the swipe passes the threshold
    pub fn touch_move(&mut self, y: f64, ctx: GestureContext) -> Option<Intent> {
        if ctx.animating {
            return None;
        }
        let track = self.touch.as_mut()?;
        if track.locked {
            return None;
        }

        let dy = y - track.start_y;
        if dy.abs() <= self.settings.touch_threshold {
            return None;
        }
        track.locked = true;

        // Swiping up pulls the next section into view
        let direction = if dy < 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        };
        ctx.allows(direction).then_some(Intent::Advance(direction))
    }

    pub fn touch_end(&mut self) {
        self.touch = None;
    }

    /// Feed a navigation key
    pub fn key(&mut self, key: NavKey, ctx: GestureContext) -> KeyOutcome {
        if !self.settings.keyboard {
            return KeyOutcome::default();
        }
        if ctx.animating {
            return KeyOutcome {
                intent: None,
                prevent_default: true,
            };
        }

        let intent = match key {
            NavKey::ArrowDown | NavKey::PageDown | NavKey::Space => {
                Intent::Advance(Direction::Forward)
            }
            NavKey::ArrowUp | NavKey::PageUp => Intent::Advance(Direction::Backward),
            NavKey::Home => Intent::Absolute(0),
            NavKey::End => Intent::Absolute(ctx.section_count.saturating_sub(1)),
        };
        KeyOutcome {
            intent: Some(intent),
            prevent_default: true,
        }
    }

    /// Forget all in-progress gesture state
    pub fn reset(&mut self) {
        self.last_gesture_at = None;
        self.touch = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(active_index: usize) -> GestureContext {
        GestureContext {
            animating: false,
            active_index,
            section_count: 3,
            looping: false,
        }
    }

    #[test]
    fn test_wheel_direction_and_cooldown() {
        let mut gestures = GestureNormalizer::default();
        let t0 = Instant::now();

        assert_eq!(
            gestures.wheel(3.0, t0, ctx(0)),
            Some(Intent::Advance(Direction::Forward))
        );
        assert_eq!(gestures.wheel(3.0, t0 + Duration::from_millis(100), ctx(1)), None);
        assert_eq!(
            gestures.wheel(-1.0, t0 + Duration::from_millis(600), ctx(1)),
            Some(Intent::Advance(Direction::Backward))
        );
        assert_eq!(gestures.wheel(0.0, t0 + Duration::from_secs(5), ctx(1)), None);
    }

    #[test]
    fn test_wheel_at_edge_keeps_cooldown_open() {
        let mut gestures = GestureNormalizer::default();
        let t0 = Instant::now();

        assert_eq!(gestures.wheel(1.0, t0, ctx(2)), None);
        // Refused tick did not start a cooldown window
        assert_eq!(
            gestures.wheel(-1.0, t0 + Duration::from_millis(10), ctx(2)),
            Some(Intent::Advance(Direction::Backward))
        );
    }

    #[test]
    fn test_wheel_dropped_while_animating() {
        let mut gestures = GestureNormalizer::default();
        let busy = GestureContext {
            animating: true,
            ..ctx(0)
        };
        assert_eq!(gestures.wheel(1.0, Instant::now(), busy), None);
        // Dropped tick leaves the cooldown untouched
        assert!(gestures.wheel(1.0, Instant::now(), ctx(0)).is_some());
    }

    #[test]
    fn test_swipe_emits_once_per_gesture() {
        let mut gestures = GestureNormalizer::default();
        gestures.touch_start(300.0, ctx(1));
        assert_eq!(gestures.touch_move(270.0, ctx(1)), None);
        assert_eq!(
            gestures.touch_move(200.0, ctx(1)),
            Some(Intent::Advance(Direction::Forward))
        );
        assert_eq!(gestures.touch_move(100.0, ctx(1)), None);
        gestures.touch_end();

        gestures.touch_start(100.0, ctx(1));
        assert_eq!(
            gestures.touch_move(161.0, ctx(1)),
            Some(Intent::Advance(Direction::Backward))
        );
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut gestures = GestureNormalizer::default();
        assert_eq!(gestures.touch_move(0.0, ctx(0)), None);
    }

    #[test]
    fn test_keys() {
        let mut gestures = GestureNormalizer::default();
        let outcome = gestures.key(NavKey::Space, ctx(0));
        assert_eq!(outcome.intent, Some(Intent::Advance(Direction::Forward)));
        assert!(outcome.prevent_default);
        assert_eq!(
            gestures.key(NavKey::PageUp, ctx(1)).intent,
            Some(Intent::Advance(Direction::Backward))
        );
        assert_eq!(gestures.key(NavKey::Home, ctx(2)).intent, Some(Intent::Absolute(0)));
        assert_eq!(gestures.key(NavKey::End, ctx(0)).intent, Some(Intent::Absolute(2)));

        let busy = GestureContext {
            animating: true,
            ..ctx(0)
        };
        let dropped = gestures.key(NavKey::ArrowDown, busy);
        assert_eq!(dropped.intent, None);
        assert!(dropped.prevent_default);
    }

    #[test]
    fn test_keyboard_opt_out() {
        let mut gestures = GestureNormalizer::new(GestureSettings {
            keyboard: false,
            ..Default::default()
        });
        assert_eq!(gestures.key(NavKey::ArrowDown, ctx(0)), KeyOutcome::default());
    }

    #[test]
    fn test_looping_allows_edges() {
        let looping = GestureContext {
            looping: true,
            ..ctx(2)
        };
        assert!(looping.allows(Direction::Forward));
        assert!(!ctx(2).allows(Direction::Forward));
        assert!(!ctx(0).allows(Direction::Backward));
    }
}
