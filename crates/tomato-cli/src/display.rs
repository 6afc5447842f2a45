//! Terminal rendering of timer notifications.

use std::io::{IsTerminal, Write};

use chrono::Local;
use serde::Serialize;
use tomato_core::{Display, Event, Notification, PhaseStyle};

const BAR_WIDTH: usize = 20;

/// Draws the timer on stdout: a single redrawn status line, or one JSON
/// object per line with `--json`.
pub struct TerminalDisplay {
    json: bool,
    color: bool,
    style: PhaseStyle,
    out: std::io::Stdout,
}

#[derive(Serialize)]
struct Frame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    notification: &'a Notification,
}

impl TerminalDisplay {
    pub fn new(json: bool, style: PhaseStyle) -> Self {
        let out = std::io::stdout();
        let color = !json && out.is_terminal();
        Self {
            json,
            color,
            style,
            out,
        }
    }

    /// End the status line so the shell prompt starts on a fresh line.
    pub fn finish(&mut self) {
        if !self.json {
            let _ = writeln!(self.out);
        }
    }

    fn completion_line(&self, event: &Event) -> Option<String> {
        let Event::PhaseCompleted { completed, next, .. } = event else {
            return None;
        };
        Some(format!(
            "{} finished at {}, {} is next",
            self.style.label(*completed),
            event.at().with_timezone(&Local).format("%H:%M:%S"),
            self.style.label(*next),
        ))
    }

    fn status_line(&self, n: &Notification) -> String {
        let filled = ((n.progress_fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
        let bar = match hex_rgb(&n.color) {
            Some((r, g, b)) if self.color => format!("\x1b[38;2;{r};{g};{b}m{bar}\x1b[0m"),
            _ => bar,
        };
        format!(
            "[{}] {}  [{}] {:>3}%  {}",
            n.label,
            n.remaining_formatted,
            bar,
            (n.progress_fraction * 100.0).round() as u32,
            if n.running { "running" } else { "paused" },
        )
    }
}

impl Display for TerminalDisplay {
    fn render(&mut self, notification: &Notification) {
        if self.json {
            let frame = Frame {
                kind: "notification",
                notification,
            };
            if let Ok(line) = serde_json::to_string(&frame) {
                let _ = writeln!(self.out, "{line}");
            }
        } else {
            let line = self.status_line(notification);
            let _ = write!(self.out, "\r\x1b[2K{line}");
            let _ = self.out.flush();
        }
    }

    fn event(&mut self, event: &Event) {
        if self.json {
            if let Ok(line) = serde_json::to_string(event) {
                let _ = writeln!(self.out, "{line}");
            }
        } else if let Some(line) = self.completion_line(event) {
            let _ = writeln!(self.out, "\r\x1b[2K{line}");
        }
    }
}

fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
