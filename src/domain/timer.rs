//! Stopwatch timer state machine.
//!
//! `TimerState` is a pure value type: every operation takes the current
//! wall-clock time in epoch milliseconds, so the whole state machine can be
//! driven by a fake clock in tests. Wall-clock access goes through the
//! [`Clock`] trait.

use chrono::Utc;

/// Source of the current wall-clock time in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // timestamp_millis is negative only before 1970
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Lifecycle phase of the stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not running and nothing accumulated.
    Idle,
    /// Not running, elapsed time frozen.
    Paused,
    /// Running, elapsed time derived from the start timestamp.
    Running,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Paused => write!(f, "paused"),
            Self::Running => write!(f, "running"),
        }
    }
}

/// Persisted representation of a timer, sufficient to reconstruct it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Whether the timer was running when the snapshot was written.
    pub running: bool,
    /// Start timestamp in epoch milliseconds, present while running.
    pub start_epoch_ms: Option<u64>,
    /// Frozen elapsed milliseconds, meaningful while paused.
    pub elapsed_ms: u64,
}

/// Elapsed-time state machine: running or paused, with accumulated time.
///
/// While running, elapsed time is always recomputed from `start_epoch_ms`
/// rather than accumulated tick by tick, so a missed or delayed tick never
/// loses time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerState {
    running: bool,
    elapsed_ms: u64,
    /// Valid only while `running` is true.
    start_epoch_ms: u64,
}

impl TimerState {
    /// Fresh stopped timer with nothing accumulated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct a timer from a persisted snapshot.
    ///
    /// A running snapshot with a start timestamp resumes with
    /// `elapsed = now - start`; a stopped snapshot restores its frozen
    /// elapsed value; anything else yields the fresh default.
    #[must_use]
    pub fn restore(snapshot: &Snapshot, now_ms: u64) -> Self {
        if snapshot.running {
            if let Some(start) = snapshot.start_epoch_ms {
                return Self {
                    running: true,
                    elapsed_ms: now_ms.saturating_sub(start),
                    start_epoch_ms: start,
                };
            }
        }
        Self {
            running: false,
            elapsed_ms: snapshot.elapsed_ms,
            start_epoch_ms: 0,
        }
    }

    /// Start or resume. Returns false (no-op) if already running.
    ///
    /// The start timestamp is back-dated by the accumulated elapsed time so
    /// resuming continues from the paused value instead of zero.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.start_epoch_ms = now_ms.saturating_sub(self.elapsed_ms);
        true
    }

    /// Freeze elapsed time. Returns false (no-op) if not running.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms = self.elapsed_at(now_ms);
        self.running = false;
        true
    }

    /// Unconditionally back to the fresh default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Elapsed milliseconds at the given instant.
    #[must_use]
    pub const fn elapsed_at(&self, now_ms: u64) -> u64 {
        if self.running {
            now_ms.saturating_sub(self.start_epoch_ms)
        } else {
            self.elapsed_ms
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Start timestamp, present only while running.
    #[must_use]
    pub const fn start_epoch_ms(&self) -> Option<u64> {
        if self.running {
            Some(self.start_epoch_ms)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.running {
            Phase::Running
        } else if self.elapsed_ms > 0 {
            Phase::Paused
        } else {
            Phase::Idle
        }
    }

    /// Snapshot of the current state for persistence.
    #[must_use]
    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        Snapshot {
            running: self.running,
            start_epoch_ms: self.start_epoch_ms(),
            elapsed_ms: self.elapsed_at(now_ms),
        }
    }
}

/// Format elapsed milliseconds as zero-padded `HH:MM:SS.CC` (centiseconds).
///
/// Hours are unbounded: the field grows past two digits instead of wrapping.
#[must_use]
pub fn format_elapsed(ms: u64) -> String {
    let centis = (ms % 1000) / 10;
    let secs = (ms / 1000) % 60;
    let mins = (ms / 60_000) % 60;
    let hours = ms / 3_600_000;
    format!("{hours:02}:{mins:02}:{secs:02}.{centis:02}")
}
