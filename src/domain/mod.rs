//! Domain layer.
//!
//! This layer contains the pure timer state machine, theme model, the
//! persistence and clock ports, and error types. No I/O happens here.

pub mod error;
pub mod store;
pub mod theme;
pub mod timer;

pub use error::{AppError, Result};
pub use store::KvStore;
pub use theme::{SystemThemeSignal, ThemePreference};
pub use timer::{format_elapsed, Clock, Phase, Snapshot, SystemClock, TimerState};
