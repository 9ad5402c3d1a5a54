//! Output formatting for the stopwatch display.
//!
//! Produces the status line, the plain lap labels, and the lap table.
//! Coloring follows the effective dark/light theme.

use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::Phase;

/// Time string colored for the given theme.
#[must_use]
pub fn themed_time(time: &str, dark: bool) -> ColoredString {
    if dark {
        time.bright_cyan().bold()
    } else {
        time.blue().bold()
    }
}

/// Phase badge: green while running, yellow while paused, dimmed when idle.
#[must_use]
pub fn phase_badge(phase: Phase) -> ColoredString {
    match phase {
        Phase::Running => "running".green().bold(),
        Phase::Paused => "paused".yellow().bold(),
        Phase::Idle => "idle".dimmed(),
    }
}

/// One-line status: badge, time, lap count.
#[must_use]
pub fn format_status(phase: Phase, time: &str, lap_count: usize, dark: bool) -> String {
    let laps = match lap_count {
        0 => String::new(),
        1 => "  (1 lap)".to_string(),
        n => format!("  ({n} laps)"),
    };
    format!("[{}] {}{}", phase_badge(phase), themed_time(time, dark), laps)
}

/// Plain lap labels, one per lap: `Lap 1: 00:00:01.23`.
#[must_use]
pub fn format_lap_lines(laps: &[String]) -> Vec<String> {
    laps.iter()
        .enumerate()
        .map(|(idx, time)| format!("Lap {}: {}", idx + 1, time))
        .collect()
}

/// Lap table with 1-based numbering.
#[must_use]
pub fn format_laps_table(laps: &[String]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(["Lap", "Time"]);

    for (idx, time) in laps.iter().enumerate() {
        table.add_row([(idx + 1).to_string(), time.clone()]);
    }

    table.to_string()
}
