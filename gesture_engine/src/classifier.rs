//! Pure per-frame gesture classification.
//!
//! Every function here is a total, stateless map from one
//! [`HandObservation`] to a boolean or a label.  Memory, debouncing and
//! cooldowns live in [`controller`](crate::controller); nothing in this
//! module looks at more than one frame.
//!
//! Thresholds and joint comparisons are in frame pixels against the
//! 1280×720 reference capture (y grows downward).  The fist pinch distance
//! in particular is absolute, not scale-normalized, so classification
//! accuracy degrades for hands much nearer or farther than the tuning
//! distance.

use hand_landmark::{
    HandObservation, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP,
    RING_PIP, RING_TIP, THUMB_IP, THUMB_MCP, THUMB_TIP,
};

/// Thumb-tip-to-fingertip pinch distance below which a hand reads as a
/// fist, in pixels.
pub const FIST_PINCH_PX: f32 = 50.0;

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// One hand's gesture label for one frame.
///
/// "No gesture" is `Option::<Gesture>::None` at the call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// All four fingers and the thumb extended.
    OpenPalm,
    /// Thumb tip pinched against the index and middle tips.
    Fist,
    /// Index and middle extended, ring and pinky curled.
    PeaceSign,
    /// Thumb tip above the thumb MCP joint.
    ThumbsUp,
    /// Thumb tip below the thumb MCP joint.
    ThumbsDown,
}

// ════════════════════════════════════════════════════════════════════════════
// Predicates
// ════════════════════════════════════════════════════════════════════════════

/// True when the palm is fully open.
///
/// Each of index/middle/ring/pinky must have its tip at or above its
/// proximal joint, and the thumb tip must be at or above the thumb IP
/// joint.  Any single curled digit defeats the whole test.
pub fn is_open_palm(obs: &HandObservation) -> bool {
    const FINGERS: [(usize, usize); 4] = [
        (INDEX_TIP, INDEX_PIP),
        (MIDDLE_TIP, MIDDLE_PIP),
        (RING_TIP, RING_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
    for (tip, joint) in FINGERS {
        if obs.point(tip).y > obs.point(joint).y {
            return false;
        }
    }
    obs.point(THUMB_TIP).y <= obs.point(THUMB_IP).y
}

/// True when the thumb tip is pinched against both the index and middle
/// fingertips (within [`FIST_PINCH_PX`]).
pub fn is_fist(obs: &HandObservation) -> bool {
    obs.distance(THUMB_TIP, INDEX_TIP) < FIST_PINCH_PX
        && obs.distance(THUMB_TIP, MIDDLE_TIP) < FIST_PINCH_PX
}

/// True when index and middle are extended while ring and pinky are curled.
pub fn is_peace_sign(obs: &HandObservation) -> bool {
    obs.point(INDEX_TIP).y < obs.point(INDEX_PIP).y
        && obs.point(MIDDLE_TIP).y < obs.point(MIDDLE_PIP).y
        && obs.point(RING_TIP).y > obs.point(RING_PIP).y
        && obs.point(PINKY_TIP).y > obs.point(PINKY_PIP).y
}

/// True when the thumb tip sits above the thumb MCP joint.
pub fn is_thumbs_up(obs: &HandObservation) -> bool {
    obs.point(THUMB_TIP).y < obs.point(THUMB_MCP).y
}

/// True when the thumb tip sits below the thumb MCP joint.
pub fn is_thumbs_down(obs: &HandObservation) -> bool {
    obs.point(THUMB_TIP).y > obs.point(THUMB_MCP).y
}

// ════════════════════════════════════════════════════════════════════════════
// Labelers
// ════════════════════════════════════════════════════════════════════════════

/// The discrete-gesture chain the state machine consumes, first match wins:
/// Fist, then PeaceSign, then ThumbsUp, then ThumbsDown.
///
/// Never returns [`Gesture::OpenPalm`]; the palm test runs independently of
/// this chain (see [`is_open_palm`]).  ThumbsUp and ThumbsDown are
/// exhaustive complements on the thumb-only signal, which is why Fist and
/// PeaceSign are checked first — a pinched or two-finger hand always has
/// the thumb somewhere, and the more specific shape must win.
pub fn discrete_gesture(obs: &HandObservation) -> Option<Gesture> {
    if is_fist(obs) {
        Some(Gesture::Fist)
    } else if is_peace_sign(obs) {
        Some(Gesture::PeaceSign)
    } else if is_thumbs_up(obs) {
        Some(Gesture::ThumbsUp)
    } else if is_thumbs_down(obs) {
        Some(Gesture::ThumbsDown)
    } else {
        None
    }
}

/// Full labeler: the open-palm test first, then the discrete chain.
pub fn classify(obs: &HandObservation) -> Option<Gesture> {
    if is_open_palm(obs) {
        Some(Gesture::OpenPalm)
    } else {
        discrete_gesture(obs)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
