//! Software-rendered annotation overlay using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ [DRAW]                                                      │
//! │                                                             │
//! │              (freehand annotation canvas)                   │
//! │                                                             │
//! │                    ┌───────────────┐                        │
//! │                    │ notification  │                        │
//! │                    └───────────────┘                        │
//! │ status bar                                                  │
//! │ key legend                                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The overlay owns the annotation canvas exclusively.  The rest of the
//! app hands it read-only snapshots per frame: the drawing-mode flag and
//! the status line.  When a screenshot is taken the canvas is composited
//! over the captured image before it is saved.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::sync::mpsc::Sender;

use gesture_dispatch::RgbaImage;

use crate::source::SimPose;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

// Window matches the 1280×720 capture frame the gesture heuristics are
// tuned against, so sim poses land where a camera would put them.
pub const WIN_W: usize = 1280;
pub const WIN_H: usize = 720;

const STATUS_Y: usize = WIN_H - 36;
const NOTIFY_Y: usize = WIN_H - 110;

const BG_COLOR: u32 = 0xFF14141E;
const TEXT_BG: u32 = 0xFF0F3460;
const NOTIFY_BG: u32 = 0xFF161616;
const MODE_ON: u32 = 0xFF1FA24A; // green chip while drawing
const MODE_OFF: u32 = 0xFF3A3A4E;

/// Annotation pen: semi-transparent red, 5 px stroke.
const PEN_COLOR: u32 = 0xB4FF0000;
const PEN_RADIUS: isize = 2;

/// Notification hold time in rendered frames (~2 s at 60 fps).
const NOTIFY_FRAMES: u32 = 120;

// ════════════════════════════════════════════════════════════════════════════
// Overlay
// ════════════════════════════════════════════════════════════════════════════

pub struct Overlay {
    window: Window,
    buf: Vec<u32>,
    /// Annotation canvas, ARGB.  Zero alpha = untouched.
    canvas: Vec<u32>,
    sim_tx: Sender<SimPose>,

    notification: String,
    notify_frames: u32,

    /// Previous pen position while the left button is held.
    last_pen: Option<(usize, usize)>,
}

impl Overlay {
    pub fn new(sim_tx: Sender<SimPose>) -> Result<Self, String> {
        let mut window = Window::new(
            "HandWave — Gesture Overlay",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Overlay {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            canvas: vec![0; WIN_W * WIN_H],
            sim_tx,
            notification: String::new(),
            notify_frames: 0,
            last_pen: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard and mouse.  Sends one simulated pose per call and
    /// applies pen strokes while drawing mode is on.  Returns false on
    /// quit.
    pub fn poll_input(&mut self, drawing_mode: bool) -> bool {
        if !self.window.is_open() {
            return false;
        }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            return false;
        }
        if self.window.is_key_pressed(Key::C, KeyRepeat::No) {
            self.clear_canvas();
        }

        // Held pose keys; first match wins, nothing held means no hands.
        let pose = if self.window.is_key_down(Key::O) {
            SimPose::OpenPalm
        } else if self.window.is_key_down(Key::N) {
            SimPose::Closed
        } else if self.window.is_key_down(Key::F) {
            SimPose::Fist
        } else if self.window.is_key_down(Key::P) {
            SimPose::PeaceSign
        } else if self.window.is_key_down(Key::U) {
            SimPose::ThumbsUp
        } else if self.window.is_key_down(Key::J) {
            SimPose::ThumbsDown
        } else {
            SimPose::NoHands
        };
        let _ = self.sim_tx.send(pose);

        // Freehand pen.
        if drawing_mode && self.window.get_mouse_down(MouseButton::Left) {
            if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Discard) {
                let to = (
                    (mx.max(0.0) as usize).min(WIN_W - 1),
                    (my.max(0.0) as usize).min(WIN_H - 1),
                );
                let from = self.last_pen.unwrap_or(to);
                stroke_line(&mut self.canvas, from, to);
                self.last_pen = Some(to);
            }
        } else {
            self.last_pen = None;
        }

        true
    }

    /// Wipe every annotation.
    pub fn clear_canvas(&mut self) {
        self.canvas.fill(0);
    }

    /// Show `message` centered near the bottom for ~2 seconds.
    pub fn show_notification(&mut self, message: &str) {
        self.notification = message.to_string();
        self.notify_frames = NOTIFY_FRAMES;
    }

    /// Blend the annotation canvas over a captured screenshot, top-left
    /// aligned, before it is saved.
    pub fn composite_onto(&self, shot: &mut RgbaImage) {
        composite_canvas(&self.canvas, shot);
    }

    /// Render one frame from read-only state snapshots.
    pub fn render(&mut self, drawing_mode: bool, status: &str) {
        self.buf.fill(BG_COLOR);

        // ── Annotations ───────────────────────────────────────────────────
        for (dst, &src) in self.buf.iter_mut().zip(self.canvas.iter()) {
            if src >> 24 != 0 {
                *dst = blend_over(*dst, src);
            }
        }

        // ── Drawing-mode chip ─────────────────────────────────────────────
        let chip = if drawing_mode { MODE_ON } else { MODE_OFF };
        self.fill_rect(10, 10, 72, 26, chip);
        self.draw_label("DRAW", 26, 20, 0xFFFFFFFF);

        // ── Notification banner ───────────────────────────────────────────
        if self.notify_frames > 0 {
            self.notify_frames -= 1;
            let text_w = self.notification.chars().count() * 4;
            let box_w = text_w + 24;
            let x0 = (WIN_W - box_w) / 2;
            self.fill_rect(x0, NOTIFY_Y, box_w, 24, NOTIFY_BG);
            self.draw_border(x0, NOTIFY_Y, box_w, 24, 0xFF888888);
            let text = self.notification.clone();
            self.draw_label(&text, x0 + 12, NOTIFY_Y + 10, 0xFFFFFFFF);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(status, 10, STATUS_Y + 8, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "O=palm  N=close  F=fist  P=peace  U=vol+  J=vol-  C=clear  Q=quit",
            10,
            WIN_H - 14,
            0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Minimal bitmap font — 3×5 characters for label rendering.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W {
                break;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas helpers (free functions so they test without a window)
// ════════════════════════════════════════════════════════════════════════════

/// Stamp one 5 px pen disc onto the canvas.
fn stamp_pen(canvas: &mut [u32], cx: usize, cy: usize) {
    for dy in -PEN_RADIUS..=PEN_RADIUS {
        for dx in -PEN_RADIUS..=PEN_RADIUS {
            if dx * dx + dy * dy > PEN_RADIUS * PEN_RADIUS {
                continue;
            }
            let x = cx as isize + dx;
            let y = cy as isize + dy;
            if x >= 0 && (x as usize) < WIN_W && y >= 0 && (y as usize) < WIN_H {
                canvas[y as usize * WIN_W + x as usize] = PEN_COLOR;
            }
        }
    }
}

/// Stroke a pen line by stamping discs along it.
fn stroke_line(canvas: &mut [u32], from: (usize, usize), to: (usize, usize)) {
    let (x0, y0) = (from.0 as f32, from.1 as f32);
    let (x1, y1) = (to.0 as f32, to.1 as f32);
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (x0 + (x1 - x0) * t).round() as usize;
        let y = (y0 + (y1 - y0) * t).round() as usize;
        stamp_pen(canvas, x.min(WIN_W - 1), y.min(WIN_H - 1));
    }
}

/// Blend `src` (ARGB, premultiplied by nothing) over `dst` by src alpha.
fn blend_over(dst: u32, src: u32) -> u32 {
    let a = ((src >> 24) & 0xFF) as f32 / 255.0;
    let lerp = |d: u32, s: u32| (d as f32 * (1.0 - a) + s as f32 * a) as u32;
    let dr = (dst >> 16) & 0xFF;
    let dg = (dst >> 8) & 0xFF;
    let db = dst & 0xFF;
    let sr = (src >> 16) & 0xFF;
    let sg = (src >> 8) & 0xFF;
    let sb = src & 0xFF;
    0xFF000000 | (lerp(dr, sr) << 16) | (lerp(dg, sg) << 8) | lerp(db, sb)
}

/// Blend the annotation canvas over a captured image, top-left aligned and
/// clipped to whichever is smaller.  Untouched (zero-alpha) canvas pixels
/// leave the capture alone.
fn composite_canvas(canvas: &[u32], shot: &mut RgbaImage) {
    let (w, h) = shot.dimensions();
    let w = (w as usize).min(WIN_W);
    let h = (h as usize).min(WIN_H);
    for y in 0..h {
        for x in 0..w {
            let src = canvas[y * WIN_W + x];
            let a = (src >> 24) & 0xFF;
            if a == 0 {
                continue;
            }
            let af = a as f32 / 255.0;
            let sr = ((src >> 16) & 0xFF) as f32;
            let sg = ((src >> 8) & 0xFF) as f32;
            let sb = (src & 0xFF) as f32;
            let px = shot.get_pixel_mut(x as u32, y as u32);
            px.0[0] = (px.0[0] as f32 * (1.0 - af) + sr * af) as u8;
            px.0[1] = (px.0[1] as f32 * (1.0 - af) + sg * af) as u8;
            px.0[2] = (px.0[2] as f32 * (1.0 - af) + sb * af) as u8;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_dispatch::Rgba;

    #[test]
    fn blend_over_full_alpha_replaces() {
        assert_eq!(blend_over(0xFF000000, 0xFFFF0000), 0xFFFF0000);
    }

    #[test]
    fn blend_over_zero_alpha_keeps_destination() {
        assert_eq!(blend_over(0xFF123456, 0x00FFFFFF), 0xFF123456);
    }

    #[test]
    fn stroke_line_marks_both_endpoints() {
        let mut canvas = vec![0u32; WIN_W * WIN_H];
        stroke_line(&mut canvas, (100, 100), (140, 120));
        assert_eq!(canvas[100 * WIN_W + 100], PEN_COLOR);
        assert_eq!(canvas[120 * WIN_W + 140], PEN_COLOR);
    }

    #[test]
    fn stamp_clips_at_canvas_edges() {
        let mut canvas = vec![0u32; WIN_W * WIN_H];
        stroke_line(&mut canvas, (0, 0), (0, 0));
        stroke_line(&mut canvas, (WIN_W - 1, WIN_H - 1), (WIN_W - 1, WIN_H - 1));
        assert_eq!(canvas[0], PEN_COLOR);
        assert_eq!(canvas[(WIN_H - 1) * WIN_W + WIN_W - 1], PEN_COLOR);
    }

    #[test]
    fn composite_blends_pen_pixels_only() {
        let mut canvas = vec![0u32; WIN_W * WIN_H];
        canvas[5 * WIN_W + 5] = 0xFFFF0000; // opaque red annotation

        let mut shot = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 255, 255]));
        composite_canvas(&canvas, &mut shot);

        assert_eq!(shot.get_pixel(5, 5).0, [255, 0, 0, 255]);
        // Untouched pixel keeps the capture color.
        assert_eq!(shot.get_pixel(6, 6).0, [0, 0, 255, 255]);
    }

    #[test]
    fn composite_clips_to_the_smaller_image() {
        let canvas = vec![0xFFFF0000u32; WIN_W * WIN_H];
        let mut shot = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        composite_canvas(&canvas, &mut shot); // must not panic
        assert_eq!(shot.get_pixel(3, 3).0, [255, 0, 0, 255]);
    }
}
