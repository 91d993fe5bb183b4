//! # gesture_dispatch
//!
//! The boundary between gesture events and the operating system.  Key
//! injection and screen capture sit behind small backend traits with null
//! fallbacks, so the pipeline keeps running on machines where a real
//! backend cannot initialize (headless CI, missing portals) and tests can
//! substitute recording fakes.
//!
//! * [`InputBackend`] — media-transport and volume key taps
//!   ([`EnigoInput`] real, [`NullInput`] fallback).
//! * [`CaptureBackend`] — whole-screen grabs ([`XcapCapture`] real,
//!   [`NullCapture`] fallback).
//! * [`Dispatcher`] — owns one of each plus the screenshot directory, and
//!   routes [`ActionEvent`]s.
//!
//! Screenshots are not saved inside [`Dispatcher::dispatch`]: the app
//! captures through [`Dispatcher::capture_screen`], lets the overlay
//! composite its annotation canvas onto the image, then saves through
//! [`Dispatcher::save_screenshot`].

use std::path::{Path, PathBuf};

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use thiserror::Error;

use gesture_engine::ActionEvent;

pub use xcap::image::{Rgba, RgbaImage};

// ════════════════════════════════════════════════════════════════════════════
// DispatchError
// ════════════════════════════════════════════════════════════════════════════

/// Collaborator failures.  Logged by the caller; never fatal to the frame
/// loop.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("input injection failed: {0}")]
    Input(String),
    #[error("screen capture failed: {0}")]
    Capture(String),
    #[error("screenshot encode failed: {0}")]
    Encode(String),
}

// ════════════════════════════════════════════════════════════════════════════
// InputBackend — key injection behind a seam
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can tap the three control keys.
pub trait InputBackend {
    fn play_pause(&mut self) -> Result<(), DispatchError>;
    fn volume_up(&mut self) -> Result<(), DispatchError>;
    fn volume_down(&mut self) -> Result<(), DispatchError>;
}

// ── enigo backend ─────────────────────────────────────────────────────────

/// Real key injection via `enigo`.
///
/// Play/pause is a space tap (the media player in focus interprets it);
/// volume uses the dedicated volume keys.
pub struct EnigoInput {
    enigo: Enigo,
}

impl EnigoInput {
    pub fn new() -> Result<Self, DispatchError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| DispatchError::Input(e.to_string()))?;
        Ok(EnigoInput { enigo })
    }

    fn tap(&mut self, key: Key) -> Result<(), DispatchError> {
        self.enigo
            .key(key, Direction::Click)
            .map_err(|e| DispatchError::Input(e.to_string()))
    }
}

impl InputBackend for EnigoInput {
    fn play_pause(&mut self) -> Result<(), DispatchError> {
        self.tap(Key::Space)
    }
    fn volume_up(&mut self) -> Result<(), DispatchError> {
        self.tap(Key::VolumeUp)
    }
    fn volume_down(&mut self) -> Result<(), DispatchError> {
        self.tap(Key::VolumeDown)
    }
}

// ── null backend (used when key injection is unavailable) ─────────────────

/// Swallows every tap.
pub struct NullInput;

impl InputBackend for NullInput {
    fn play_pause(&mut self) -> Result<(), DispatchError> {
        Ok(())
    }
    fn volume_up(&mut self) -> Result<(), DispatchError> {
        Ok(())
    }
    fn volume_down(&mut self) -> Result<(), DispatchError> {
        Ok(())
    }
}

/// Open the real input backend, falling back to [`NullInput`] with a
/// warning when the platform refuses.
pub fn open_input() -> Box<dyn InputBackend> {
    match EnigoInput::new() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            log::warn!("key injection unavailable: {e} — using null input");
            Box::new(NullInput)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CaptureBackend — screen grabs behind a seam
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can grab the screen as an RGBA image.
pub trait CaptureBackend {
    fn capture(&mut self) -> Result<RgbaImage, DispatchError>;
}

// ── xcap backend ──────────────────────────────────────────────────────────

/// Grabs the first monitor via `xcap`.
pub struct XcapCapture;

impl CaptureBackend for XcapCapture {
    fn capture(&mut self) -> Result<RgbaImage, DispatchError> {
        let monitor = xcap::Monitor::all()
            .map_err(|e| DispatchError::Capture(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| DispatchError::Capture("no monitors found".to_string()))?;
        monitor
            .capture_image()
            .map_err(|e| DispatchError::Capture(e.to_string()))
    }
}

// ── null backend ──────────────────────────────────────────────────────────

/// Always reports capture as unavailable.
pub struct NullCapture;

impl CaptureBackend for NullCapture {
    fn capture(&mut self) -> Result<RgbaImage, DispatchError> {
        Err(DispatchError::Capture("screen capture unavailable".to_string()))
    }
}

/// Probe for monitors once and pick the capture backend accordingly.
pub fn open_capture() -> Box<dyn CaptureBackend> {
    match xcap::Monitor::all() {
        Ok(monitors) if !monitors.is_empty() => Box::new(XcapCapture),
        Ok(_) => {
            log::warn!("no monitors visible — using null capture");
            Box::new(NullCapture)
        }
        Err(e) => {
            log::warn!("screen capture unavailable: {e} — using null capture");
            Box::new(NullCapture)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Dispatcher
// ════════════════════════════════════════════════════════════════════════════

/// Owns the OS backends and the screenshot directory.
pub struct Dispatcher {
    input: Box<dyn InputBackend>,
    capture: Box<dyn CaptureBackend>,
    shot_dir: PathBuf,
}

impl Dispatcher {
    /// Real backends, with null fallbacks where the platform refuses.
    pub fn new(shot_dir: impl Into<PathBuf>) -> Self {
        Dispatcher {
            input: open_input(),
            capture: open_capture(),
            shot_dir: shot_dir.into(),
        }
    }

    /// Explicit backends (tests, headless operation).
    pub fn with_backends(
        input: Box<dyn InputBackend>,
        capture: Box<dyn CaptureBackend>,
        shot_dir: impl Into<PathBuf>,
    ) -> Self {
        Dispatcher {
            input,
            capture,
            shot_dir: shot_dir.into(),
        }
    }

    /// Route one event to its OS effect.
    ///
    /// `Screenshot` is a no-op here — the app drives it through
    /// [`capture_screen`](Self::capture_screen) /
    /// [`save_screenshot`](Self::save_screenshot) so overlay compositing
    /// can interpose.  `EnterDrawingMode` is purely an overlay concern.
    pub fn dispatch(&mut self, event: ActionEvent) -> Result<(), DispatchError> {
        match event {
            ActionEvent::PlayPause => self.input.play_pause(),
            ActionEvent::VolumeUp => self.input.volume_up(),
            ActionEvent::VolumeDown => self.input.volume_down(),
            ActionEvent::Screenshot | ActionEvent::EnterDrawingMode => Ok(()),
        }
    }

    /// Grab the screen through the capture backend.
    pub fn capture_screen(&mut self) -> Result<RgbaImage, DispatchError> {
        self.capture.capture()
    }

    /// Write a (possibly annotated) capture as
    /// `screenshot_YYYYmmdd-HHMMSS.png` in the screenshot directory.
    pub fn save_screenshot(&self, image: &RgbaImage) -> Result<PathBuf, DispatchError> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = self.shot_dir.join(format!("screenshot_{stamp}.png"));
        image
            .save(&path)
            .map_err(|e| DispatchError::Encode(e.to_string()))?;
        Ok(path)
    }

    pub fn shot_dir(&self) -> &Path {
        &self.shot_dir
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
