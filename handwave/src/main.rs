//! handwave — interactive entry point.

use handwave::app::{run, AppConfig};
use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        HandWave — Hand-Gesture Media Controller              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "mediapipe")]
    println!("  Mode: MediaPipe hand tracking");
    #[cfg(not(feature = "mediapipe"))]
    println!("  Mode: Keyboard simulation  (use --features mediapipe for a tracker)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: 1.0 s cooldown, screenshots in the current directory\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening overlay window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let cooldown: f64 = {
        let c: f64 = read_line("  Action cooldown seconds (default 1.0): ")
            .trim()
            .parse()
            .unwrap_or(1.0);
        c.clamp(0.1, 10.0)
    };

    let shot_dir = {
        let d = read_line("  Screenshot directory (default .): ");
        let d = d.trim();
        if d.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(d)
        }
    };

    #[cfg(feature = "mediapipe")]
    let tracker_script = {
        let s = read_line("  Tracker script (default hand_tracker.py): ");
        let s = s.trim();
        if s.is_empty() {
            PathBuf::from("hand_tracker.py")
        } else {
            PathBuf::from(s)
        }
    };

    AppConfig {
        cooldown,
        shot_dir,
        #[cfg(feature = "mediapipe")]
        tracker_script,
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
