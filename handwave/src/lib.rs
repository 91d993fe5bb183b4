//! # handwave
//!
//! Hand-gesture media controller with a freehand annotation overlay.
//!
//! Landmark frames arrive from a frame source, the gesture engine turns
//! them into debounced action events, and the dispatcher performs the OS
//! effects while the overlay window reflects current state.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Open palm, then close | Screenshot (saved with annotations composited) |
//! | Fist | Play/Pause (space tap) |
//! | Peace sign | Enter drawing mode (sticky) |
//! | Thumbs up | Volume up |
//! | Thumbs down | Volume down |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard keys stand in for hand
//!   poses, so the whole pipeline runs with no camera attached.
//! * `mediapipe` — **Tracker mode**: a helper process owns the webcam and
//!   the hand-landmark model and streams landmark JSON per frame.
//!
//! ### Simulation keyboard poses
//!
//! | Key | Pose |
//! |---|---|
//! | `O` / hold | Open palm |
//! | `N` / hold | Closed (relaxed) hand |
//! | `F` / hold | Fist |
//! | `P` / hold | Peace sign |
//! | `U` / hold | Thumbs up |
//! | `J` / hold | Thumbs down |
//! | (none held) | No hands detected |
//! | `C` | Clear the annotation canvas |
//! | `Q` | Quit |

pub mod app;
pub mod overlay;
pub mod source;

#[cfg(feature = "mediapipe")]
pub mod bridge;
