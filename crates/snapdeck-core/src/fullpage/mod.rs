//! Full-page section scrolling
//!
//! One section fills the viewport; wheel ticks, swipes and navigation keys
//! snap the deck to the neighbouring section with an eased transition, and
//! the location fragment tracks the section in view.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves (cubic in-out by default, swappable)
//! - `timing` - Progress, interpolation and section offsets
//! - `frames` - Display-refresh registrations with cancellation tokens
//!
//! ## L3 Molecular Layer
//! - `animation` - Transition driver
//! - `gesture` - Wheel / swipe / key normalization
//! - `location` - Deep-link fragment and history
//!
//! ## L2 Organism Layer
//! - `controller` - Section controller composing the above
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Instant;
//! use snapdeck_core::fullpage::{ControllerOptions, SectionController};
//!
//! let mut deck = SectionController::new(
//!     3,
//!     ControllerOptions::default().anchors(["home", "work", "contact"]),
//! )?;
//! deck.resize(viewport_height);
//! deck.go_to("work", Instant::now());
//!
//! // In the main loop, once per display refresh
//! if deck.needs_refresh() {
//!     deck.on_refresh(Instant::now());
//! }
//! let offset = deck.offset();
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod frames;
pub mod timing;

// L3 Molecular Layer
pub mod animation;
pub mod gesture;
pub mod location;

// L2 Organism Layer
pub mod controller;

pub use animation::{AnimationDriver, FrameSink, TransitionSpec};
pub use controller::{
    ContainerView, ControllerOptions, IndicatorDot, Phase, SectionController, SectionView, Target,
};
pub use easing::{Easing, EasingType};
pub use frames::{FrameQueue, FrameToken};
pub use gesture::{Direction, GestureNormalizer, GestureSettings, Intent, KeyOutcome, NavKey};
pub use location::Location;
