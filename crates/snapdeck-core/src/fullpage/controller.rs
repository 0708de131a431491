//! L2 Organism Layer: Full-page section controller
//!
//! Owns which section is in view and composes the gesture normalizer, the
//! animation driver and the deep-link location. State machine:
//! `Idle(i)` → `Animating { from, to }` → `Idle(to)`.
//!
//! Routine navigation never fails: out-of-range, redundant and concurrent
//! requests are absorbed as no-ops. Only a malformed anchor list is rejected,
//! at construction.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::animation::{AnimationDriver, FrameSink, TransitionSpec};
use super::easing::Easing;
use super::frames::FrameQueue;
use super::gesture::{
    Direction, GestureContext, GestureNormalizer, GestureSettings, Intent, KeyOutcome, NavKey,
};
use super::location::Location;
use super::timing::section_offset;
use crate::config::FullPageConfig;
use crate::{Error, Result};

pub type LeaveHook = Box<dyn FnMut(usize, usize) + Send>;
pub type ArriveHook = Box<dyn FnMut(usize) + Send>;

/// Where `go_to` should navigate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Section index; may be out of range (clamped or wrapped)
    Index(i64),
    /// Anchor name
    Anchor(String),
}

impl From<usize> for Target {
    fn from(index: usize) -> Self {
        Target::Index(index as i64)
    }
}

impl From<i64> for Target {
    fn from(index: i64) -> Self {
        Target::Index(index)
    }
}

impl From<i32> for Target {
    fn from(index: i32) -> Self {
        Target::Index(index as i64)
    }
}

impl From<&str> for Target {
    fn from(anchor: &str) -> Self {
        Target::Anchor(anchor.to_string())
    }
}

impl From<String> for Target {
    fn from(anchor: String) -> Self {
        Target::Anchor(anchor)
    }
}

/// Controller construction options
pub struct ControllerOptions {
    pub duration: Duration,
    pub easing: Easing,
    pub looping: bool,
    pub anchors: Vec<String>,
    pub wheel_cooldown: Duration,
    pub touch_threshold: f64,
    pub keyboard: bool,
    pub replace_history: bool,
    pub reduced_motion: bool,
    pub location: Location,
    on_leave: Option<LeaveHook>,
    after_load: Option<ArriveHook>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(800),
            easing: Easing::default(),
            looping: false,
            anchors: Vec::new(),
            wheel_cooldown: Duration::from_millis(500),
            touch_threshold: 60.0,
            keyboard: true,
            replace_history: true,
            reduced_motion: false,
            location: Location::default(),
            on_leave: None,
            after_load: None,
        }
    }
}

impl From<&FullPageConfig> for ControllerOptions {
    fn from(config: &FullPageConfig) -> Self {
        Self {
            duration: Duration::from_millis(config.duration_ms),
            easing: config.easing.into(),
            looping: config.looping,
            anchors: config.anchors.clone(),
            wheel_cooldown: Duration::from_millis(config.wheel_cooldown_ms),
            touch_threshold: config.touch_threshold,
            keyboard: config.keyboard,
            replace_history: config.replace_history,
            reduced_motion: config.reduced_motion,
            ..Default::default()
        }
    }
}

impl fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("looping", &self.looping)
            .field("anchors", &self.anchors)
            .field("wheel_cooldown", &self.wheel_cooldown)
            .field("touch_threshold", &self.touch_threshold)
            .field("keyboard", &self.keyboard)
            .field("replace_history", &self.replace_history)
            .field("reduced_motion", &self.reduced_motion)
            .field("location", &self.location.hash())
            .field("on_leave", &self.on_leave.is_some())
            .field("after_load", &self.after_load.is_some())
            .finish()
    }
}

impl ControllerOptions {
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = easing.into();
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn anchors<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.anchors = anchors.into_iter().map(Into::into).collect();
        self
    }

    pub fn wheel_cooldown(mut self, cooldown: Duration) -> Self {
        self.wheel_cooldown = cooldown;
        self
    }

    pub fn touch_threshold(mut self, threshold: f64) -> Self {
        self.touch_threshold = threshold;
        self
    }

    pub fn keyboard(mut self, keyboard: bool) -> Self {
        self.keyboard = keyboard;
        self
    }

    pub fn replace_history(mut self, replace: bool) -> Self {
        self.replace_history = replace;
        self
    }

    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Called with `(from, to)` when a transition starts, before its first frame
    pub fn on_leave(mut self, hook: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_leave = Some(Box::new(hook));
        self
    }

    /// Called once with the destination after a transition completes
    pub fn after_load(mut self, hook: impl FnMut(usize) + Send + 'static) -> Self {
        self.after_load = Some(Box::new(hook));
        self
    }
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Animating { from: usize, to: usize },
}

/// Position of one section inside the container
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub index: usize,
    /// Top edge relative to the container
    pub top: f64,
    /// Not the active section (hidden from assistive readers)
    pub hidden: bool,
}

/// Everything needed to draw the sliding container
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerView {
    /// Current vertical translation of the container
    pub offset: f64,
    /// Height of one section
    pub extent: f64,
    /// Height of the whole container
    pub total_extent: f64,
    pub active_index: usize,
    pub sections: Vec<SectionView>,
}

/// One dot of the position indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorDot {
    pub index: usize,
    pub active: bool,
    pub label: String,
}

/// The part of the controller a running transition writes into
struct Stage {
    active_index: usize,
    offset: f64,
    phase: Phase,
    after_load: Option<ArriveHook>,
}

impl FrameSink for Stage {
    fn on_frame(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn on_complete(&mut self, to: usize) {
        self.active_index = to;
        self.phase = Phase::Idle;
        debug!(index = to, "section arrived");
        if let Some(hook) = self.after_load.as_mut() {
            hook(to);
        }
    }
}

pub struct SectionController {
    section_count: usize,
    anchors: Vec<String>,
    extent: f64,
    duration: Duration,
    easing: Easing,
    looping: bool,
    replace_history: bool,
    gestures: GestureNormalizer,
    driver: AnimationDriver,
    frames: FrameQueue,
    location: Location,
    on_leave: Option<LeaveHook>,
    stage: Stage,
    disposed: bool,
}

impl fmt::Debug for SectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionController")
            .field("section_count", &self.section_count)
            .field("active_index", &self.stage.active_index)
            .field("phase", &self.stage.phase)
            .field("offset", &self.stage.offset)
            .field("extent", &self.extent)
            .field("location", &self.location.hash())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl SectionController {
    /// Build a controller for `section_count` sections
    ///
    /// Fails only on a malformed anchor list: duplicate names or more names
    /// than sections.
    pub fn new(section_count: usize, options: ControllerOptions) -> Result<Self> {
        validate_anchors(&options.anchors, section_count)?;

        let ControllerOptions {
            duration,
            easing,
            looping,
            anchors,
            wheel_cooldown,
            touch_threshold,
            keyboard,
            replace_history,
            reduced_motion,
            location,
            on_leave,
            after_load,
        } = options;

        let active_index = resolve_fragment(&anchors, section_count, &location.fragment()).unwrap_or(0);
        if active_index != 0 {
            debug!(index = active_index, fragment = %location.fragment(), "initial section from location");
        }

        Ok(Self {
            section_count,
            anchors,
            extent: 0.0,
            duration,
            easing,
            looping,
            replace_history,
            gestures: GestureNormalizer::new(GestureSettings {
                wheel_cooldown,
                touch_threshold,
                keyboard,
            }),
            driver: AnimationDriver::new(reduced_motion),
            frames: FrameQueue::new(),
            location,
            on_leave,
            stage: Stage {
                active_index,
                offset: 0.0,
                phase: Phase::Idle,
                after_load,
            },
            disposed: false,
        })
    }

    #[inline]
    pub fn section_count(&self) -> usize {
        self.section_count
    }

    /// Index of the committed section (the source while a transition runs)
    #[inline]
    pub fn current_index(&self) -> usize {
        self.stage.active_index
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.stage.phase
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        matches!(self.stage.phase, Phase::Animating { .. })
    }

    /// Current container offset
    #[inline]
    pub fn offset(&self) -> f64 {
        self.stage.offset
    }

    #[inline]
    pub fn viewport_extent(&self) -> f64 {
        self.extent
    }

    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Pending refresh registrations; the host refreshes while this is non-empty
    pub fn frames(&self) -> &FrameQueue {
        &self.frames
    }

    /// Whether the host should schedule a display refresh
    #[inline]
    pub fn needs_refresh(&self) -> bool {
        !self.disposed && self.frames.is_pending()
    }

    /// Fragment written for `index`: its anchor, or `section-<n>` when unnamed
    pub fn fragment_for(&self, index: usize) -> String {
        match self.anchors.get(index) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("section-{}", index + 1),
        }
    }

    /// Viewport height changed
    ///
    /// Never starts a transition. A running transition picks up the new
    /// extent on its next frame.
    pub fn resize(&mut self, extent: f64) {
        self.extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
        if !self.is_animating() {
            self.stage.offset = section_offset(self.stage.active_index, self.extent);
        }
    }

    pub fn next(&mut self, now: Instant) -> bool {
        self.advance(Direction::Forward, now)
    }

    pub fn previous(&mut self, now: Instant) -> bool {
        self.advance(Direction::Backward, now)
    }

    /// Move one section; returns whether a transition started
    ///
    /// Past either end this is a no-op unless looping.
    pub fn advance(&mut self, direction: Direction, now: Instant) -> bool {
        if self.disposed || self.section_count == 0 {
            return false;
        }
        let count = self.section_count as i64;
        let candidate = self.stage.active_index as i64 + direction.step();
        let to = if self.looping {
            candidate.rem_euclid(count)
        } else if (0..count).contains(&candidate) {
            candidate
        } else {
            trace!(candidate, "advance out of range ignored");
            return false;
        };
        self.transition_to(to as usize, now)
    }

    /// Navigate to an index or anchor; returns whether a transition started
    ///
    /// Unknown anchors and the already-active section are no-ops. Indices are
    /// clamped, or wrapped when looping.
    pub fn go_to(&mut self, target: impl Into<Target>, now: Instant) -> bool {
        if self.disposed || self.section_count == 0 {
            return false;
        }
        let to = match target.into() {
            Target::Anchor(name) => match self.anchors.iter().position(|a| *a == name) {
                Some(index) => index,
                None => {
                    trace!(anchor = %name, "unknown anchor ignored");
                    return false;
                }
            },
            Target::Index(index) => {
                let count = self.section_count as i64;
                if self.looping {
                    index.rem_euclid(count) as usize
                } else {
                    index.clamp(0, count - 1) as usize
                }
            }
        };
        self.transition_to(to, now)
    }

    /// Apply a gesture-originated intent; dropped while animating
    pub fn handle_intent(&mut self, intent: Intent, now: Instant) -> bool {
        if self.is_animating() {
            return false;
        }
        match intent {
            Intent::Advance(direction) => self.advance(direction, now),
            Intent::Absolute(index) => self.go_to(index, now),
        }
    }

    pub fn on_wheel(&mut self, delta_y: f64, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let ctx = self.gesture_context();
        match self.gestures.wheel(delta_y, now, ctx) {
            Some(intent) => self.handle_intent(intent, now),
            None => false,
        }
    }

    pub fn on_touch_start(&mut self, y: f64) {
        if self.disposed {
            return;
        }
        let ctx = self.gesture_context();
        self.gestures.touch_start(y, ctx);
    }

    pub fn on_touch_move(&mut self, y: f64, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let ctx = self.gesture_context();
        match self.gestures.touch_move(y, ctx) {
            Some(intent) => self.handle_intent(intent, now),
            None => false,
        }
    }

    pub fn on_touch_end(&mut self) {
        self.gestures.touch_end();
    }

    pub fn on_key(&mut self, key: NavKey, now: Instant) -> KeyOutcome {
        if self.disposed {
            return KeyOutcome::default();
        }
        let ctx = self.gesture_context();
        let outcome = self.gestures.key(key, ctx);
        if let Some(intent) = outcome.intent {
            self.handle_intent(intent, now);
        }
        outcome
    }

    /// Service one display refresh
    pub fn on_refresh(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        for token in self.frames.drain() {
            self.driver
                .on_refresh(token, self.extent, now, &mut self.frames, &mut self.stage);
        }
    }

    /// Render data for the sliding container
    pub fn container(&self) -> ContainerView {
        ContainerView {
            offset: self.stage.offset,
            extent: self.extent,
            total_extent: self.extent * self.section_count as f64,
            active_index: self.stage.active_index,
            sections: (0..self.section_count)
                .map(|index| SectionView {
                    index,
                    top: index as f64 * self.extent,
                    hidden: index != self.stage.active_index,
                })
                .collect(),
        }
    }

    /// Render data for the position indicator
    pub fn indicator(&self) -> Vec<IndicatorDot> {
        (0..self.section_count)
            .map(|index| IndicatorDot {
                index,
                active: index == self.stage.active_index,
                label: format!("Go to section {}", index + 1),
            })
            .collect()
    }

    /// Tear down: cancel pending frames and stop reacting to input
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.driver.cancel(&mut self.frames);
        self.frames.clear();
        self.gestures.reset();
        self.stage.phase = Phase::Idle;
        self.disposed = true;
        debug!("section controller disposed");
    }

    fn gesture_context(&self) -> GestureContext {
        GestureContext {
            animating: self.is_animating(),
            active_index: self.stage.active_index,
            section_count: self.section_count,
            looping: self.looping,
        }
    }

    fn transition_to(&mut self, to: usize, now: Instant) -> bool {
        let from = self.stage.active_index;
        if to == from {
            return false;
        }
        if self.stage.phase == (Phase::Animating { from, to }) {
            trace!(to, "already heading there");
            return false;
        }

        if let Some(hook) = self.on_leave.as_mut() {
            hook(from, to);
        }

        let fragment = self.fragment_for(to);
        if self.replace_history {
            self.location.replace(&fragment);
        } else {
            self.location.push(&fragment);
        }

        debug!(from, to, fragment = %fragment, "section transition");
        self.stage.phase = Phase::Animating { from, to };
        let spec = TransitionSpec {
            from,
            to,
            duration: self.duration,
            easing: self.easing,
        };
        self.driver
            .start(spec, self.extent, now, &mut self.frames, &mut self.stage);
        true
    }
}

impl Drop for SectionController {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn validate_anchors(anchors: &[String], section_count: usize) -> Result<()> {
    if anchors.len() > section_count {
        return Err(Error::Config(format!(
            "{} anchors given for {} sections",
            anchors.len(),
            section_count
        )));
    }
    let mut seen = HashSet::new();
    for name in anchors.iter().filter(|a| !a.is_empty()) {
        if !seen.insert(name.as_str()) {
            return Err(Error::Config(format!("duplicate anchor name: {}", name)));
        }
    }
    Ok(())
}

/// Section named by a location fragment: an anchor, or `section-<n>`
fn resolve_fragment(anchors: &[String], section_count: usize, fragment: &str) -> Option<usize> {
    if fragment.is_empty() {
        return None;
    }
    if let Some(index) = anchors.iter().position(|a| a == fragment) {
        return Some(index);
    }
    fragment
        .strip_prefix("section-")
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| (1..=section_count).contains(n))
        .map(|n| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::config::EasingType;

    fn instant(count: usize) -> SectionController {
        SectionController::new(count, ControllerOptions::default().duration(Duration::ZERO)).unwrap()
    }

    /// Run refreshes until the transition settles
    fn settle(controller: &mut SectionController, start: Instant) {
        let mut now = start;
        while controller.needs_refresh() {
            now += Duration::from_millis(16);
            controller.on_refresh(now);
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Leave(usize, usize),
        Arrive(usize),
    }

    fn recorded(options: ControllerOptions) -> (ControllerOptions, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let leave = events.clone();
        let arrive = events.clone();
        let options = options
            .on_leave(move |from, to| leave.lock().unwrap().push(Event::Leave(from, to)))
            .after_load(move |index| arrive.lock().unwrap().push(Event::Arrive(index)));
        (options, events)
    }

    #[test]
    fn test_index_stays_in_range() {
        let now = Instant::now();
        for looping in [false, true] {
            let mut controller = SectionController::new(
                4,
                ControllerOptions::default().duration(Duration::ZERO).looping(looping),
            )
            .unwrap();
            let steps = [1, 1, 1, 1, 1, -1, -1, -1, -1, -1, -1, 1, -1, 1, 1];
            for step in steps {
                let direction = if step > 0 { Direction::Forward } else { Direction::Backward };
                controller.advance(direction, now);
                assert!(controller.current_index() < 4);
            }
        }
    }

    #[test]
    fn test_bounds_without_loop() {
        let now = Instant::now();
        let mut controller = instant(3);
        assert!(!controller.previous(now));
        assert_eq!(controller.current_index(), 0);

        controller.go_to(2usize, now);
        assert!(!controller.next(now));
        assert_eq!(controller.current_index(), 2);
    }

    #[test]
    fn test_loop_wraps() {
        let now = Instant::now();
        let mut controller = SectionController::new(
            3,
            ControllerOptions::default().duration(Duration::ZERO).looping(true),
        )
        .unwrap();
        controller.go_to(2usize, now);
        assert!(controller.next(now));
        assert_eq!(controller.current_index(), 0);
        assert!(controller.previous(now));
        assert_eq!(controller.current_index(), 2);
        controller.go_to(-1, now);
        assert_eq!(controller.current_index(), 2);
        controller.go_to(4, now);
        assert_eq!(controller.current_index(), 1);
    }

    #[test]
    fn test_go_to_clamps_without_loop() {
        let now = Instant::now();
        let mut controller = instant(3);
        assert!(controller.go_to(10, now));
        assert_eq!(controller.current_index(), 2);
        assert!(controller.go_to(-5, now));
        assert_eq!(controller.current_index(), 0);
    }

    #[test]
    fn test_go_to_current_is_noop() {
        let now = Instant::now();
        let (options, events) = recorded(ControllerOptions::default().duration(Duration::ZERO));
        let mut controller = SectionController::new(3, options).unwrap();
        controller.go_to(1usize, now);
        events.lock().unwrap().clear();
        let history = controller.location().hash();

        let current = controller.current_index();
        assert!(!controller.go_to(current, now));
        assert!(events.lock().unwrap().is_empty());
        assert!(!controller.frames().is_pending());
        assert_eq!(controller.location().hash(), history);
    }

    #[test]
    fn test_anchor_resolution() {
        let now = Instant::now();
        let mut controller = SectionController::new(
            3,
            ControllerOptions::default()
                .duration(Duration::ZERO)
                .anchors(["home", "work"]),
        )
        .unwrap();
        assert!(controller.go_to("work", now));
        assert_eq!(controller.current_index(), 1);
        assert!(!controller.go_to("missing", now));
        assert_eq!(controller.current_index(), 1);
    }

    #[test]
    fn test_duplicate_anchors_rejected() {
        let err = SectionController::new(3, ControllerOptions::default().anchors(["a", "b", "a"]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = SectionController::new(1, ControllerOptions::default().anchors(["a", "b"]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_duration_commits_with_no_frame_scheduled() {
        let now = Instant::now();
        let mut controller = instant(3);
        controller.resize(500.0);
        assert!(controller.go_to(2usize, now));
        assert_eq!(controller.offset(), -1000.0);
        assert_eq!(controller.current_index(), 2);
        assert!(!controller.is_animating());
        assert!(!controller.frames().is_pending());
    }

    #[test]
    fn test_hook_order_for_animated_transition() {
        let start = Instant::now();
        let (options, events) = recorded(ControllerOptions::default().duration(Duration::from_millis(100)));
        let mut controller = SectionController::new(3, options).unwrap();
        controller.resize(10.0);

        assert!(controller.next(start));
        assert_eq!(*events.lock().unwrap(), vec![Event::Leave(0, 1)]);
        assert_eq!(controller.phase(), Phase::Animating { from: 0, to: 1 });
        assert_eq!(controller.current_index(), 0);

        settle(&mut controller, start);
        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::Leave(0, 1), Event::Arrive(1)]
        );
        assert_eq!(controller.current_index(), 1);
        assert_eq!(controller.offset(), -10.0);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_gestures_dropped_while_animating() {
        let start = Instant::now();
        let mut controller = SectionController::new(
            4,
            ControllerOptions::default().duration(Duration::from_millis(100)),
        )
        .unwrap();
        controller.resize(10.0);

        assert!(controller.on_wheel(1.0, start));
        assert!(controller.is_animating());
        let later = start + Duration::from_secs(2);
        assert!(!controller.on_wheel(1.0, later));
        assert!(!controller.handle_intent(Intent::Absolute(3), later));
        let outcome = controller.on_key(NavKey::End, later);
        assert!(outcome.prevent_default);
        assert!(outcome.intent.is_none());
        assert_eq!(controller.phase(), Phase::Animating { from: 0, to: 1 });
    }

    #[test]
    fn test_fragment_updates_at_transition_start() {
        let start = Instant::now();
        let mut controller = SectionController::new(
            3,
            ControllerOptions::default()
                .duration(Duration::from_millis(100))
                .anchors(["home", "", "contact"]),
        )
        .unwrap();

        controller.next(start);
        assert!(controller.is_animating());
        assert_eq!(controller.location().hash(), "#section-2");
        assert_eq!(controller.location().history_len(), 1);
    }

    #[test]
    fn test_push_history_when_configured() {
        let now = Instant::now();
        let mut controller = SectionController::new(
            3,
            ControllerOptions::default()
                .duration(Duration::ZERO)
                .replace_history(false)
                .anchors(["home", "work", "contact"]),
        )
        .unwrap();
        controller.next(now);
        controller.next(now);
        assert_eq!(controller.location().history_len(), 3);
        assert_eq!(controller.location().hash(), "#contact");
    }

    #[test]
    fn test_initial_index_from_location() {
        let controller = SectionController::new(
            3,
            ControllerOptions::default()
                .anchors(["home", "work"])
                .location(Location::with_fragment("#work")),
        )
        .unwrap();
        assert_eq!(controller.current_index(), 1);

        let controller = SectionController::new(
            3,
            ControllerOptions::default().location(Location::with_fragment("section-3")),
        )
        .unwrap();
        assert_eq!(controller.current_index(), 2);

        let controller = SectionController::new(
            3,
            ControllerOptions::default().location(Location::with_fragment("nowhere")),
        )
        .unwrap();
        assert_eq!(controller.current_index(), 0);
    }

    #[test]
    fn test_resize_does_not_transition() {
        let start = Instant::now();
        let mut controller = SectionController::new(
            3,
            ControllerOptions::default().duration(Duration::from_millis(100)),
        )
        .unwrap();
        controller.go_to(1usize, start);
        settle(&mut controller, start);
        controller.resize(40.0);
        assert_eq!(controller.offset(), -40.0);
        assert!(!controller.is_animating());
        assert!(!controller.frames().is_pending());
    }

    #[test]
    fn test_api_call_mid_transition_replaces_it() {
        let start = Instant::now();
        let mut controller = SectionController::new(
            4,
            ControllerOptions::default()
                .duration(Duration::from_millis(100))
                .easing(EasingType::Linear),
        )
        .unwrap();
        controller.resize(10.0);

        controller.next(start);
        controller.go_to(3usize, start + Duration::from_millis(10));
        assert_eq!(controller.frames().pending_count(), 1);
        assert_eq!(controller.phase(), Phase::Animating { from: 0, to: 3 });

        settle(&mut controller, start + Duration::from_millis(10));
        assert_eq!(controller.current_index(), 3);
        assert_eq!(controller.offset(), -30.0);
    }

    #[test]
    fn test_repeat_request_for_inflight_target_is_absorbed() {
        let start = Instant::now();
        let (options, events) = recorded(
            ControllerOptions::default()
                .duration(Duration::from_millis(100))
                .easing(EasingType::Linear),
        );
        let mut controller = SectionController::new(3, options).unwrap();
        controller.resize(10.0);

        controller.next(start);
        controller.on_refresh(start + Duration::from_millis(50));
        let offset = controller.offset();
        assert!(offset < 0.0);

        // held key: the same target again neither restarts nor re-fires hooks
        assert!(!controller.next(start + Duration::from_millis(60)));
        assert!(!controller.go_to(1usize, start + Duration::from_millis(60)));
        assert_eq!(controller.offset(), offset);
        assert_eq!(controller.frames().pending_count(), 1);

        settle(&mut controller, start + Duration::from_millis(60));
        assert_eq!(controller.current_index(), 1);
        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::Leave(0, 1), Event::Arrive(1)]
        );
    }

    #[test]
    fn test_deep_link_to_encoded_anchor() {
        let controller = SectionController::new(
            3,
            ControllerOptions::default()
                .anchors(["home", "my work", "café"])
                .location(Location::with_fragment("my work")),
        )
        .unwrap();
        assert_eq!(controller.current_index(), 1);

        let mut controller = SectionController::new(
            3,
            ControllerOptions::default()
                .duration(Duration::ZERO)
                .anchors(["home", "my work", "café"])
                .location(Location::with_fragment("#café")),
        )
        .unwrap();
        assert_eq!(controller.current_index(), 2);

        controller.go_to(1usize, Instant::now());
        assert_eq!(controller.location().hash(), "#my work");
    }

    #[test]
    fn test_dispose_cancels_frames_and_input() {
        let start = Instant::now();
        let (options, events) = recorded(ControllerOptions::default().duration(Duration::from_millis(100)));
        let mut controller = SectionController::new(3, options).unwrap();
        controller.resize(10.0);
        controller.next(start);
        controller.dispose();

        assert!(!controller.needs_refresh());
        controller.on_refresh(start + Duration::from_secs(1));
        assert_eq!(*events.lock().unwrap(), vec![Event::Leave(0, 1)]);
        assert!(!controller.next(start));
        assert!(!controller.on_wheel(1.0, start + Duration::from_secs(5)));
        assert_eq!(controller.on_key(NavKey::Home, start), KeyOutcome::default());
    }

    #[test]
    fn test_touch_swipe_navigates() {
        let now = Instant::now();
        let mut controller = instant(3);
        controller.on_touch_start(400.0);
        assert!(controller.on_touch_move(300.0, now));
        assert_eq!(controller.current_index(), 1);
        assert!(!controller.on_touch_move(100.0, now));
        controller.on_touch_end();
    }

    #[test]
    fn test_empty_deck() {
        let now = Instant::now();
        let mut controller = instant(0);
        assert!(!controller.next(now));
        assert!(!controller.go_to(0usize, now));
        assert_eq!(controller.current_index(), 0);
        assert!(controller.indicator().is_empty());
    }

    #[test]
    fn test_render_data() {
        let now = Instant::now();
        let mut controller = instant(3);
        controller.resize(20.0);
        controller.go_to(1usize, now);

        let view = controller.container();
        assert_eq!(view.total_extent, 60.0);
        assert_eq!(view.offset, -20.0);
        let hidden: Vec<bool> = view.sections.iter().map(|s| s.hidden).collect();
        assert_eq!(hidden, vec![true, false, true]);

        let dots = controller.indicator();
        assert!(dots[1].active);
        assert_eq!(dots[2].label, "Go to section 3");
    }
}
