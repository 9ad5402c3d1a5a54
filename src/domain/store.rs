//! Key-value persistence port.
//!
//! The stopwatch persists its state as plain strings under fixed keys, so
//! any string-keyed store works. Implementations live in `infrastructure`;
//! tests substitute an in-memory fake.

use super::error::Result;

/// Storage keys. Missing keys mean "no preference" / "no laps" /
/// "not running".
pub mod keys {
    /// Stored theme preference: `"dark"` or `"light"`.
    pub const THEME: &str = "stopwatch_theme";
    /// Lap list as a JSON array of formatted time strings.
    pub const LAPS: &str = "stopwatch_laps";
    /// Running flag: `"true"` or `"false"`.
    pub const RUNNING: &str = "stopwatch_running";
    /// Start timestamp in decimal epoch milliseconds.
    pub const START_MS: &str = "stopwatch_start_ms";
    /// Frozen elapsed value in decimal milliseconds.
    pub const ELAPSED_MS: &str = "stopwatch_elapsed_ms";
}

/// String-keyed get/set/remove store.
pub trait KvStore {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
