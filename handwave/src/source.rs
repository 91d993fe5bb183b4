//! Landmark frame sources.
//!
//! The public interface is [`HandFrame`] delivered over a bounded channel.
//! Consumers don't need to know whether frames came from a real tracker or
//! the keyboard simulator, and a producer never blocks on a lagging
//! consumer: the channel holds [`FRAME_QUEUE_DEPTH`] frames and anything
//! beyond that is dropped at the sending side.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread;

use hand_landmark::{poses, HandObservation};

/// Depth of the frame channel.  Small on purpose: stale frames are worth
/// less than fresh ones, so a slow consumer sheds load instead of queueing.
pub const FRAME_QUEUE_DEPTH: usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// Every validated hand observation for one capture frame.
///
/// Zero hands is a perfectly normal frame.
#[derive(Clone, Debug, Default)]
pub struct HandFrame {
    pub hands: Vec<HandObservation>,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait — unified interface for tracker and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: SyncSender<HandFrame>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<HandFrame> {
    let (tx, rx) = mpsc::sync_channel(FRAME_QUEUE_DEPTH);
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// One simulated pose per overlay input poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    OpenPalm,
    Closed,
    Fist,
    PeaceSign,
    ThumbsUp,
    ThumbsDown,
    NoHands,
}

impl SimPose {
    /// The canonical observation for this pose, or `None` for an empty
    /// frame.
    pub fn observation(self) -> Option<HandObservation> {
        match self {
            SimPose::OpenPalm => Some(poses::open_palm()),
            SimPose::Closed => Some(poses::closed()),
            SimPose::Fist => Some(poses::fist()),
            SimPose::PeaceSign => Some(poses::peace_sign()),
            SimPose::ThumbsUp => Some(poses::thumbs_up()),
            SimPose::ThumbsDown => Some(poses::thumbs_down()),
            SimPose::NoHands => None,
        }
    }
}

/// Frame source driven by [`SimPose`] events from the overlay window.
///
/// The overlay sends one pose per input poll; this translator turns each
/// into a landmark frame.  Decouples the window event loop from frame
/// production.
pub struct SimFrameSource {
    pub rx: Receiver<SimPose>,
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: SyncSender<HandFrame>) {
        for pose in self.rx {
            let hands = match pose.observation() {
                Some(obs) => vec![obs],
                None => Vec::new(),
            };
            match tx.try_send(HandFrame { hands }) {
                Ok(()) => {}
                // Consumer lags: shed the frame rather than queue it.
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_engine::classifier;

    #[test]
    fn sim_poses_match_their_gestures() {
        let palm = SimPose::OpenPalm.observation().unwrap();
        assert!(classifier::is_open_palm(&palm));

        let fist = SimPose::Fist.observation().unwrap();
        assert!(classifier::is_fist(&fist));

        let peace = SimPose::PeaceSign.observation().unwrap();
        assert!(classifier::is_peace_sign(&peace));

        assert!(classifier::is_thumbs_up(&SimPose::ThumbsUp.observation().unwrap()));
        assert!(classifier::is_thumbs_down(&SimPose::ThumbsDown.observation().unwrap()));
    }

    #[test]
    fn no_hands_is_an_empty_frame() {
        assert!(SimPose::NoHands.observation().is_none());
    }

    #[test]
    fn sim_source_forwards_frames() {
        let (pose_tx, pose_rx) = mpsc::channel();
        let frame_rx = spawn_frame_source(SimFrameSource { rx: pose_rx });

        pose_tx.send(SimPose::Fist).unwrap();
        let frame = frame_rx.recv().unwrap();
        assert_eq!(frame.hands.len(), 1);
        assert!(classifier::is_fist(&frame.hands[0]));

        pose_tx.send(SimPose::NoHands).unwrap();
        let frame = frame_rx.recv().unwrap();
        assert!(frame.hands.is_empty());
    }

    #[test]
    fn sim_source_stops_when_poses_stop() {
        let (pose_tx, pose_rx) = mpsc::channel();
        let frame_rx = spawn_frame_source(SimFrameSource { rx: pose_rx });
        drop(pose_tx);
        // Source thread exits; the frame channel reports disconnect.
        assert!(frame_rx.recv().is_err());
    }
}
