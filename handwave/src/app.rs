//! Top-level application state and run loop.
//!
//! `AppState` owns the gesture `Controller` and the OS `Dispatcher`; the
//! run loop drains landmark frames from the source channel, steps the state
//! machine, performs the resulting actions, and hands the overlay its
//! per-frame snapshots.  One frame is fully classified and dispatched
//! before the next is read.

use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use gesture_dispatch::{DispatchError, Dispatcher, RgbaImage};
use gesture_engine::{ActionEvent, Controller, ControllerConfig};

#[cfg(feature = "mediapipe")]
use crate::bridge::MediaPipeSource;
use crate::overlay::Overlay;
use crate::source::{spawn_frame_source, HandFrame, SimPose};
#[cfg(not(feature = "mediapipe"))]
use crate::source::SimFrameSource;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
pub struct AppConfig {
    /// Minimum seconds between cooldown-gated actions.
    pub cooldown: f64,
    /// Directory screenshots are saved into.
    pub shot_dir: PathBuf,
    /// Tracker helper script, launched with `python3`.
    #[cfg(feature = "mediapipe")]
    pub tracker_script: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            cooldown: 1.0,
            shot_dir: PathBuf::from("."),
            #[cfg(feature = "mediapipe")]
            tracker_script: PathBuf::from("hand_tracker.py"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    controller: Controller,
    dispatcher: Dispatcher,

    /// Status-bar line, always showable.
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        AppState::with_dispatcher(cfg, Dispatcher::new(cfg.shot_dir.clone()))
    }

    /// Explicit dispatcher (tests, headless operation).
    pub fn with_dispatcher(cfg: &AppConfig, dispatcher: Dispatcher) -> Self {
        AppState {
            controller: Controller::new(ControllerConfig { cooldown: cfg.cooldown }),
            dispatcher,
            status: "Ready — hold a pose key or show a gesture".to_string(),
        }
    }

    pub fn drawing_mode(&self) -> bool {
        self.controller.drawing_mode()
    }

    /// Step the state machine over every hand of one frame.
    pub fn step_frame(&mut self, frame: &HandFrame, now: f64) -> Vec<ActionEvent> {
        self.controller.classify_and_step(&frame.hands, now)
    }

    /// Perform one emitted event.
    ///
    /// `annotate` gets to draw on the captured image before a screenshot is
    /// saved; the run loop passes the overlay's compositor, tests pass a
    /// no-op.  Dispatch failures are logged and surfaced in the status
    /// line, never propagated.
    pub fn apply(&mut self, event: ActionEvent, annotate: impl FnOnce(&mut RgbaImage)) {
        match event {
            ActionEvent::Screenshot => match self.dispatcher.capture_screen() {
                Ok(mut image) => {
                    annotate(&mut image);
                    match self.dispatcher.save_screenshot(&image) {
                        Ok(path) => {
                            self.status = format!("Screenshot saved: {}", path.display());
                        }
                        Err(e) => self.report_failure(e),
                    }
                }
                Err(e) => self.report_failure(e),
            },
            ActionEvent::EnterDrawingMode => {
                self.status = "Drawing mode on: drag the mouse to annotate".to_string();
            }
            other => match self.dispatcher.dispatch(other) {
                Ok(()) => self.status = other.notification().to_string(),
                Err(e) => self.report_failure(e),
            },
        }
    }

    fn report_failure(&mut self, e: DispatchError) {
        log::warn!("dispatch failure: {e}");
        self.status = format!("Failed: {e}");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the frame source (keyboard simulation by default, the MediaPipe
/// bridge with `--features mediapipe`), the overlay window, and the app
/// state, then drives the event/render loop at ~60 fps until the window
/// closes or the source disconnects.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    // ── Sim pose channel (inert when a real tracker drives frames) ────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimPose>();

    #[cfg(feature = "mediapipe")]
    let frame_rx = {
        drop(sim_rx);
        spawn_frame_source(MediaPipeSource {
            python: PathBuf::from("python3"),
            script: cfg.tracker_script.clone(),
        })
    };
    #[cfg(not(feature = "mediapipe"))]
    let frame_rx = spawn_frame_source(SimFrameSource { rx: sim_rx });

    // ── Overlay (owns the window, the canvas, and the sim sender) ─────────
    let mut overlay = Overlay::new(sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg);

    // Monotonic clock for the state machine's cooldown.
    let epoch = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    while overlay.is_open() {
        // 1. Poll window input (pose keys, pen strokes, clear, quit).
        if !overlay.poll_input(app.drawing_mode()) {
            break;
        }

        // 2. Drain pending landmark frames, oldest first.
        loop {
            match frame_rx.try_recv() {
                Ok(frame) => {
                    let now = epoch.elapsed().as_secs_f64();
                    for event in app.step_frame(&frame, now) {
                        overlay.show_notification(event.notification());
                        app.apply(event, |image| overlay.composite_onto(image));
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        // 3. Render from read-only snapshots.
        overlay.render(app.drawing_mode(), &app.status);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_dispatch::{InputBackend, NullCapture, NullInput};
    use hand_landmark::poses;

    fn frame(hands: Vec<hand_landmark::HandObservation>) -> HandFrame {
        HandFrame { hands }
    }

    fn null_app() -> AppState {
        let cfg = AppConfig::default();
        let dispatcher = Dispatcher::with_backends(
            Box::new(NullInput),
            Box::new(NullCapture),
            std::env::temp_dir(),
        );
        AppState::with_dispatcher(&cfg, dispatcher)
    }

    #[test]
    fn peace_frame_latches_drawing_mode() {
        let mut app = null_app();
        assert!(!app.drawing_mode());
        let events = app.step_frame(&frame(vec![poses::peace_sign()]), 0.0);
        assert_eq!(events, vec![ActionEvent::EnterDrawingMode]);
        assert!(app.drawing_mode());

        app.apply(ActionEvent::EnterDrawingMode, |_| {});
        assert!(app.status.starts_with("Drawing mode on"));
    }

    #[test]
    fn palm_edge_sequence_emits_screenshot_event() {
        let mut app = null_app();
        assert!(app.step_frame(&frame(vec![poses::open_palm()]), 0.0).is_empty());
        let events = app.step_frame(&frame(vec![poses::closed()]), 0.2);
        assert_eq!(events, vec![ActionEvent::Screenshot]);
    }

    #[test]
    fn empty_frame_is_a_no_op() {
        let mut app = null_app();
        assert!(app.step_frame(&frame(Vec::new()), 0.0).is_empty());
    }

    #[test]
    fn transport_event_updates_status() {
        let mut app = null_app();
        app.apply(ActionEvent::PlayPause, |_| {});
        assert_eq!(app.status, "Play/Pause");
    }

    #[test]
    fn capture_failure_is_reported_not_fatal() {
        // NullCapture refuses; the app keeps running with a status line.
        let mut app = null_app();
        app.apply(ActionEvent::Screenshot, |_| {});
        assert!(app.status.starts_with("Failed:"), "status was {:?}", app.status);
    }

    #[test]
    fn input_failure_is_reported_not_fatal() {
        struct BrokenInput;
        impl InputBackend for BrokenInput {
            fn play_pause(&mut self) -> Result<(), DispatchError> {
                Err(DispatchError::Input("no display".to_string()))
            }
            fn volume_up(&mut self) -> Result<(), DispatchError> {
                Err(DispatchError::Input("no display".to_string()))
            }
            fn volume_down(&mut self) -> Result<(), DispatchError> {
                Err(DispatchError::Input("no display".to_string()))
            }
        }

        let cfg = AppConfig::default();
        let dispatcher = Dispatcher::with_backends(
            Box::new(BrokenInput),
            Box::new(NullCapture),
            std::env::temp_dir(),
        );
        let mut app = AppState::with_dispatcher(&cfg, dispatcher);

        app.apply(ActionEvent::VolumeUp, |_| {});
        assert!(app.status.contains("no display"));
    }
}
