//! MediaPipe tracker bridge (feature = "mediapipe").
//!
//! A helper process owns the webcam and the hand-landmark model; this side
//! only reads its stdout.  Protocol:
//!
//! 1. the helper prints `READY` once the model is loaded,
//! 2. then one JSON line per capture frame:
//!    `{"hands":[{"landmarks":[{"x":..,"y":..}, ...21 total]}]}`,
//!    with coordinates already in pixels against the 1280×720 frame,
//! 3. an `{"error": "..."}` line reports a recoverable tracker fault.
//!
//! Malformed hands (wrong landmark count) are skipped with a warning and
//! the rest of the frame survives; the frame loop never dies on tracker
//! noise.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{SyncSender, TrySendError};

use serde::Deserialize;

use hand_landmark::{HandObservation, Point};

use crate::source::{FrameSource, HandFrame};

// ════════════════════════════════════════════════════════════════════════════
// Wire format
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct LandmarkJson {
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
struct HandJson {
    landmarks: Vec<LandmarkJson>,
}

#[derive(Debug, Deserialize)]
struct FrameJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

fn frame_from_json(parsed: FrameJson) -> HandFrame {
    let mut hands = Vec::with_capacity(parsed.hands.len());
    for hand in parsed.hands {
        let points: Vec<Point> = hand
            .landmarks
            .iter()
            .map(|l| Point::new(l.x, l.y))
            .collect();
        match HandObservation::from_points(points) {
            Ok(obs) => hands.push(obs),
            Err(e) => log::warn!("skipping hand from tracker: {e}"),
        }
    }
    HandFrame { hands }
}

// ════════════════════════════════════════════════════════════════════════════
// MediaPipeSource
// ════════════════════════════════════════════════════════════════════════════

/// Frame source backed by the MediaPipe helper process.
pub struct MediaPipeSource {
    /// Interpreter to launch, normally `python3`.
    pub python: PathBuf,
    /// Path to the tracker helper script.
    pub script: PathBuf,
}

impl FrameSource for MediaPipeSource {
    fn run(self: Box<Self>, tx: SyncSender<HandFrame>) {
        let mut child = match Command::new(&self.python)
            .arg(&self.script)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                log::error!("failed to start tracker {}: {e}", self.script.display());
                return;
            }
        };

        let stdout = match child.stdout.take() {
            Some(out) => out,
            None => {
                log::error!("tracker spawned without a stdout pipe");
                let _ = child.kill();
                return;
            }
        };
        let mut reader = BufReader::new(stdout);

        let mut ready = String::new();
        if reader.read_line(&mut ready).is_err() || ready.trim() != "READY" {
            log::error!("tracker did not signal READY, got: {}", ready.trim());
            let _ = child.kill();
            return;
        }
        log::info!("hand tracker ready");

        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break, // tracker exited
                Ok(_) => {}
                Err(e) => {
                    log::warn!("tracker read error: {e}");
                    break;
                }
            }

            let parsed: FrameJson = match serde_json::from_str(&line) {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("unparseable tracker frame: {e}");
                    continue;
                }
            };
            if let Some(err) = parsed.error {
                log::warn!("tracker error: {err}");
                continue;
            }

            match tx.try_send(frame_from_json(parsed)) {
                Ok(()) => {}
                // Consumer lags: shed the frame rather than queue it.
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }
        }

        let _ = child.kill();
        log::info!("hand tracker stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks_json(n: usize) -> String {
        let pts: Vec<String> = (0..n)
            .map(|i| format!("{{\"x\":{}.0,\"y\":{}.0}}", i, i * 2))
            .collect();
        format!("{{\"hands\":[{{\"landmarks\":[{}]}}]}}", pts.join(","))
    }

    #[test]
    fn full_hand_parses_into_one_observation() {
        let parsed: FrameJson = serde_json::from_str(&landmarks_json(21)).unwrap();
        let frame = frame_from_json(parsed);
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].point(hand_landmark::WRIST), Point::new(0.0, 0.0));
    }

    #[test]
    fn short_hand_is_skipped_not_fatal() {
        let parsed: FrameJson = serde_json::from_str(&landmarks_json(19)).unwrap();
        let frame = frame_from_json(parsed);
        assert!(frame.hands.is_empty());
    }

    #[test]
    fn empty_frame_parses() {
        let parsed: FrameJson = serde_json::from_str("{\"hands\":[]}").unwrap();
        assert!(frame_from_json(parsed).hands.is_empty());
    }

    #[test]
    fn error_field_is_optional() {
        let parsed: FrameJson = serde_json::from_str("{\"error\":\"camera lost\"}").unwrap();
        assert_eq!(parsed.error.as_deref(), Some("camera lost"));
        assert!(parsed.hands.is_empty());
    }
}
