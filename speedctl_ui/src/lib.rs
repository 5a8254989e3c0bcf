#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Text rendering of the controller status.
//!
//! Two screens are produced from a `StatusSnapshot`: the operator screen
//! with speed, run state and the active key hints, and the debug screen
//! with saved speed and accumulated run time.

use std::error::Error;
use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use speedctl_traits::{StatusDisplay, StatusSnapshot};

/// `HHh MMm SSs`; hours are not wrapped.
pub fn format_run_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!(
        "{:02}h {:02}m {:02}s",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

fn on_off(running: bool) -> &'static str {
    if running { "ON" } else { "OFF" }
}

/// Lines of the operator screen.
pub fn operator_screen(s: &StatusSnapshot, hint: &str) -> Vec<String> {
    let mut speed = format!("Speed: {}", s.speed);
    if s.unsaved {
        speed.push_str(" (Unsaved)");
    }
    let mut lines = vec![
        "Motor Speed Control".to_string(),
        format!("Status: {}", on_off(s.running)),
        speed,
    ];
    if !hint.is_empty() {
        lines.push(hint.to_string());
    }
    lines
}

/// Lines of the debug screen.
pub fn debug_screen(s: &StatusSnapshot) -> Vec<String> {
    vec![
        "Debug Info".to_string(),
        format!("Motor: {}", on_off(s.running)),
        format!("Speed: {}", s.speed),
        format!("Run Time: {}", format_run_time(s.run_time)),
        format!("Saved: {}", s.saved_speed),
    ]
}

/// Which screens a `TextDisplay` writes per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screens {
    Operator,
    Debug,
    #[default]
    Both,
}

/// Renders status frames to any `io::Write` sink.
///
/// A frame is written only when the visible text would change, so polling
/// at the control-loop rate does not flood the sink.
pub struct TextDisplay<W: Write> {
    sink: W,
    hint: String,
    screens: Screens,
    last: Option<String>,
    frames: u64,
}

impl<W: Write> core::fmt::Debug for TextDisplay<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextDisplay")
            .field("hint", &self.hint)
            .field("screens", &self.screens)
            .field("frames", &self.frames)
            .finish()
    }
}

impl<W: Write> TextDisplay<W> {
    pub fn new(sink: W, hint: impl Into<String>) -> Self {
        Self {
            sink,
            hint: hint.into(),
            screens: Screens::default(),
            last: None,
            frames: 0,
        }
    }

    pub fn with_screens(mut self, screens: Screens) -> Self {
        self.screens = screens;
        self
    }

    /// Frames actually written.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn compose(&self, s: &StatusSnapshot) -> String {
        let mut lines = Vec::new();
        if matches!(self.screens, Screens::Operator | Screens::Both) {
            lines.extend(operator_screen(s, &self.hint));
        }
        if matches!(self.screens, Screens::Debug | Screens::Both) {
            lines.extend(debug_screen(s));
        }
        let mut frame = String::new();
        for line in lines {
            let _ = writeln!(frame, "{line}");
        }
        frame
    }
}

impl<W: Write> StatusDisplay for TextDisplay<W> {
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), Box<dyn Error + Send + Sync>> {
        let frame = self.compose(snapshot);
        if self.last.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }
        self.sink.write_all(frame.as_bytes())?;
        writeln!(self.sink)?;
        self.sink.flush()?;
        self.frames += 1;
        tracing::trace!(frames = self.frames, "status frame written");
        self.last = Some(frame);
        Ok(())
    }
}
