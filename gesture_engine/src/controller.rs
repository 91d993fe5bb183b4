//! The gesture state machine.
//!
//! Consumes per-frame classifications and emits debounced
//! [`ActionEvent`]s under a single global cooldown.  Timestamps are
//! monotonic seconds supplied by the caller, so the machine is a pure
//! function of its inputs plus the three fields of state below — tests
//! inject time directly, and the host owns the clock.

use hand_landmark::HandObservation;

use crate::classifier::{discrete_gesture, is_open_palm, Gesture};

// ════════════════════════════════════════════════════════════════════════════
// ActionEvent
// ════════════════════════════════════════════════════════════════════════════

/// A debounced control event, tag only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionEvent {
    /// Open palm closed: grab the screen.
    Screenshot,
    /// Fist: toggle media playback.
    PlayPause,
    VolumeUp,
    VolumeDown,
    /// Peace sign first seen: the overlay's drawing mode latched on.
    EnterDrawingMode,
}

impl ActionEvent {
    /// Overlay notification text, 1:1 with the event tag.
    pub fn notification(self) -> &'static str {
        match self {
            ActionEvent::Screenshot => "Screenshot taken",
            ActionEvent::PlayPause => "Play/Pause",
            ActionEvent::VolumeUp => "Volume Up",
            ActionEvent::VolumeDown => "Volume Down",
            ActionEvent::EnterDrawingMode => "Drawing Mode",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ControllerConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tunables for the state machine.
#[derive(Clone, Copy, Debug)]
pub struct ControllerConfig {
    /// Minimum elapsed seconds between two cooldown-gated actions.  The
    /// cooldown is shared across all gated action kinds: a screenshot
    /// blocks a play/pause for this long and vice versa.
    pub cooldown: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig { cooldown: 1.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Controller
// ════════════════════════════════════════════════════════════════════════════

/// Process-wide gesture state.
///
/// One instance serves every hand in the frame: the palm-edge flag and the
/// cooldown slot are shared, so two simultaneously tracked hands race to
/// flip `palm_open` and contend for the same cooldown.  Single-hand
/// operation is the assumed posture; per-hand keying would be the fix if
/// that assumption ever changes.
#[derive(Debug)]
pub struct Controller {
    cfg: ControllerConfig,
    /// Last frame's open-palm result.
    palm_open: bool,
    /// Monotonic time of the last cooldown-gated action.
    last_action: f64,
    /// Sticky drawing-mode latch, not cooldown-gated.
    drawing_mode: bool,
}

impl Controller {
    pub fn new(cfg: ControllerConfig) -> Self {
        Controller {
            cfg,
            palm_open: false,
            last_action: f64::NEG_INFINITY,
            drawing_mode: false,
        }
    }

    /// Whether the overlay should accept freehand drawing.
    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    /// Last frame's palm state (exposed for status display).
    pub fn palm_open(&self) -> bool {
        self.palm_open
    }

    fn cooldown_elapsed(&self, now: f64) -> bool {
        now - self.last_action > self.cfg.cooldown
    }

    /// Process every hand of one frame, in delivery order.
    ///
    /// Zero hands means zero events and untouched state.  Per frame the
    /// result holds at most two events per hand, since the palm-edge check
    /// and the discrete chain can both fire on the same observation.
    pub fn classify_and_step(&mut self, hands: &[HandObservation], now: f64) -> Vec<ActionEvent> {
        let mut events = Vec::new();
        for obs in hands {
            events.extend(self.step(obs, now));
        }
        events
    }

    /// Advance the machine by one hand observation.
    ///
    /// Order matters and matches the event contract:
    ///
    /// 1. the palm falling edge (cooldown-gated) emits [`ActionEvent::Screenshot`],
    /// 2. the palm flag is updated unconditionally,
    /// 3. the discrete chain runs on the same observation — not as an
    ///    `else` of the edge check — and emits its own event if any.
    pub fn step(&mut self, obs: &HandObservation, now: f64) -> Vec<ActionEvent> {
        let mut events = Vec::new();

        let current = is_open_palm(obs);
        if self.palm_open && !current && self.cooldown_elapsed(now) {
            events.push(ActionEvent::Screenshot);
            self.last_action = now;
        }
        self.palm_open = current;

        match discrete_gesture(obs) {
            Some(Gesture::Fist) => {
                if self.cooldown_elapsed(now) {
                    events.push(ActionEvent::PlayPause);
                    self.last_action = now;
                }
            }
            Some(Gesture::PeaceSign) => {
                // Sticky and free of the cooldown; a repeat sighting while
                // already latched is a no-op.
                if !self.drawing_mode {
                    self.drawing_mode = true;
                    events.push(ActionEvent::EnterDrawingMode);
                }
            }
            Some(Gesture::ThumbsUp) => {
                if self.cooldown_elapsed(now) {
                    events.push(ActionEvent::VolumeUp);
                    self.last_action = now;
                }
            }
            Some(Gesture::ThumbsDown) => {
                if self.cooldown_elapsed(now) {
                    events.push(ActionEvent::VolumeDown);
                    self.last_action = now;
                }
            }
            Some(Gesture::OpenPalm) | None => {}
        }

        events
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmark::poses;

    fn controller() -> Controller {
        Controller::new(ControllerConfig::default())
    }

    #[test]
    fn falling_edge_emits_one_screenshot() {
        let mut c = controller();
        assert!(c.step(&poses::open_palm(), 0.0).is_empty());
        assert_eq!(c.step(&poses::closed(), 0.1), vec![ActionEvent::Screenshot]);
    }

    #[test]
    fn edge_within_cooldown_is_swallowed() {
        let mut c = controller();
        c.step(&poses::open_palm(), 0.0);
        assert_eq!(c.step(&poses::closed(), 0.1), vec![ActionEvent::Screenshot]);
        // Second edge at 0.5s: still inside the 1s window.
        c.step(&poses::open_palm(), 0.3);
        assert!(c.step(&poses::closed(), 0.5).is_empty());
        // Third edge past the window fires again.
        c.step(&poses::open_palm(), 1.0);
        assert_eq!(c.step(&poses::closed(), 1.2), vec![ActionEvent::Screenshot]);
    }

    #[test]
    fn rising_edge_is_silent() {
        let mut c = controller();
        c.step(&poses::closed(), 0.0);
        assert!(c.step(&poses::open_palm(), 0.1).is_empty());
    }

    #[test]
    fn cooldown_is_global_across_action_kinds() {
        let mut c = controller();
        assert_eq!(c.step(&poses::fist(), 0.0), vec![ActionEvent::PlayPause]);
        // Same hand switches to thumbs-up inside the window: nothing.
        assert!(c.step(&poses::thumbs_up(), 0.3).is_empty());
        // Past the window it fires.
        assert_eq!(c.step(&poses::thumbs_up(), 1.1), vec![ActionEvent::VolumeUp]);
    }

    #[test]
    fn screenshot_blocks_play_pause_and_vice_versa() {
        let mut c = controller();
        c.step(&poses::open_palm(), 0.0);
        assert_eq!(c.step(&poses::closed(), 0.1), vec![ActionEvent::Screenshot]);
        assert!(c.step(&poses::fist(), 0.5).is_empty());
        assert_eq!(c.step(&poses::fist(), 1.2), vec![ActionEvent::PlayPause]);
    }

    #[test]
    fn peace_sign_latches_drawing_mode_ignoring_cooldown() {
        let mut c = controller();
        assert_eq!(c.step(&poses::fist(), 0.0), vec![ActionEvent::PlayPause]);
        assert!(!c.drawing_mode());
        // Inside the cooldown window, peace still latches.
        assert_eq!(c.step(&poses::peace_sign(), 0.1), vec![ActionEvent::EnterDrawingMode]);
        assert!(c.drawing_mode());
    }

    #[test]
    fn peace_sign_is_idempotent_once_latched() {
        let mut c = controller();
        assert_eq!(c.step(&poses::peace_sign(), 0.0), vec![ActionEvent::EnterDrawingMode]);
        assert!(c.step(&poses::peace_sign(), 0.1).is_empty());
        assert!(c.step(&poses::peace_sign(), 5.0).is_empty());
        assert!(c.drawing_mode());
    }

    #[test]
    fn fist_that_also_reads_thumbs_up_plays_pauses() {
        // Evaluation order: the fist pose satisfies both predicates.
        let mut c = controller();
        assert_eq!(c.step(&poses::fist(), 0.0), vec![ActionEvent::PlayPause]);
    }

    #[test]
    fn empty_frame_changes_nothing() {
        let mut c = controller();
        c.step(&poses::open_palm(), 0.0);
        let palm_before = c.palm_open();
        let drawing_before = c.drawing_mode();

        assert!(c.classify_and_step(&[], 0.5).is_empty());
        assert_eq!(c.palm_open(), palm_before);
        assert_eq!(c.drawing_mode(), drawing_before);
        // The cooldown slot is also untouched: an edge right after still fires.
        assert_eq!(c.step(&poses::closed(), 0.6), vec![ActionEvent::Screenshot]);
    }

    #[test]
    fn closed_open_closed_scenario() {
        // Closed shape at t=0, open at t=0.2, closed again at t=1.3:
        // the rising edge is silent, the falling edge past the cooldown
        // emits exactly one screenshot.
        let mut c = controller();
        assert!(c.step(&poses::closed(), 0.0).is_empty());
        assert!(c.step(&poses::open_palm(), 0.2).is_empty());
        assert_eq!(c.step(&poses::closed(), 1.3), vec![ActionEvent::Screenshot]);
    }

    #[test]
    fn edge_and_discrete_can_fire_in_one_frame() {
        // Palm open, then straight into a fist: the falling edge takes the
        // cooldown slot first, so only the screenshot fires this frame.
        let mut c = controller();
        c.step(&poses::open_palm(), 0.0);
        assert_eq!(c.step(&poses::fist(), 0.1), vec![ActionEvent::Screenshot]);

        let mut c2 = controller();
        c2.step(&poses::open_palm(), 0.0);
        // Drawing-mode entry is not gated, so edge + peace emits two events.
        let events = c2.step(&poses::peace_sign(), 0.1);
        assert_eq!(
            events,
            vec![ActionEvent::Screenshot, ActionEvent::EnterDrawingMode]
        );
    }

    #[test]
    fn multiple_hands_share_the_cooldown_slot() {
        let mut c = controller();
        let events = c.classify_and_step(&[poses::fist(), poses::thumbs_up()], 0.0);
        // First hand takes the slot; the second is debounced.
        assert_eq!(events, vec![ActionEvent::PlayPause]);
    }

    #[test]
    fn notification_text_is_one_to_one() {
        assert_eq!(ActionEvent::Screenshot.notification(), "Screenshot taken");
        assert_eq!(ActionEvent::PlayPause.notification(), "Play/Pause");
        assert_eq!(ActionEvent::VolumeUp.notification(), "Volume Up");
        assert_eq!(ActionEvent::VolumeDown.notification(), "Volume Down");
        assert_eq!(ActionEvent::EnterDrawingMode.notification(), "Drawing Mode");
    }
}
