//! Application layer.
//!
//! Services that wire the domain state machine to the persistence and
//! theme ports, plus output formatting and the live watch loop.

pub mod formatter;
pub mod stopwatch;
pub mod theme;
pub mod watch;

pub use formatter::{format_lap_lines, format_laps_table, format_status};
pub use stopwatch::StopwatchService;
pub use theme::{ThemeController, ThemeSource};
pub use watch::run_watch;
