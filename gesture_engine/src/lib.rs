//! # gesture_engine
//!
//! Turns per-frame hand landmark observations into debounced control
//! events.  Two layers:
//!
//! * [`classifier`] — pure, stateless heuristics mapping one
//!   [`HandObservation`](hand_landmark::HandObservation) to a gesture label.
//! * [`controller`] — the per-process state machine that tracks the
//!   palm-open edge, applies the global action cooldown, and emits at most
//!   a couple of [`ActionEvent`]s per frame.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Trigger | Action |
//! |---|---|---|
//! | Open palm → closed | falling edge, cooldown-gated | `Screenshot` |
//! | Fist | held, cooldown-gated | `PlayPause` |
//! | Peace sign | first sighting, not gated | `EnterDrawingMode` (sticky) |
//! | Thumbs up | held, cooldown-gated | `VolumeUp` |
//! | Thumbs down | held, cooldown-gated | `VolumeDown` |
//!
//! The cooldown is global across all gated actions: any emitted action
//! blocks every other gated action for the next cooldown interval.

pub mod classifier;
pub mod controller;

pub use classifier::{classify, discrete_gesture, is_open_palm, Gesture};
pub use controller::{ActionEvent, Controller, ControllerConfig};
