//! Stopwatch service: the timer state machine plus lap log, wired to the
//! key-value store.
//!
//! Every store access is best-effort: a failed read falls back to the
//! fresh-start default and a failed write is logged and ignored, so the
//! in-memory state is never corrupted by storage trouble.

use crate::domain::store::keys;
use crate::domain::{format_elapsed, Clock, KvStore, Phase, Snapshot, TimerState};

/// Stopwatch with laps, persisted across invocations through a `KvStore`.
pub struct StopwatchService<'a> {
    store: &'a dyn KvStore,
    clock: &'a dyn Clock,
    timer: TimerState,
    laps: Vec<String>,
}

impl<'a> StopwatchService<'a> {
    /// Restore the stopwatch from whatever the store holds.
    ///
    /// Missing keys mean "not running" / "no laps"; malformed values
    /// default to zero/false with a warning.
    pub fn load(store: &'a dyn KvStore, clock: &'a dyn Clock) -> Self {
        let snapshot = Snapshot {
            running: read_key(store, keys::RUNNING).as_deref() == Some("true"),
            start_epoch_ms: read_key(store, keys::START_MS)
                .and_then(|v| parse_ms(keys::START_MS, &v)),
            elapsed_ms: read_key(store, keys::ELAPSED_MS)
                .and_then(|v| parse_ms(keys::ELAPSED_MS, &v))
                .unwrap_or(0),
        };
        let timer = TimerState::restore(&snapshot, clock.now_ms());
        let laps = load_laps(store);

        tracing::debug!(
            phase = %timer.phase(),
            laps = laps.len(),
            "Restored stopwatch state"
        );

        Self {
            store,
            clock,
            timer,
            laps,
        }
    }

    /// Start or resume. Returns false if already running.
    pub fn start(&mut self) -> bool {
        let now = self.clock.now_ms();
        if !self.timer.start(now) {
            return false;
        }
        tracing::info!(elapsed_ms = self.timer.elapsed_at(now), "Stopwatch started");

        write_key(self.store, keys::RUNNING, "true");
        if let Some(start) = self.timer.start_epoch_ms() {
            write_key(self.store, keys::START_MS, &start.to_string());
        }
        true
    }

    /// Freeze the elapsed time. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        let now = self.clock.now_ms();
        if !self.timer.pause(now) {
            return false;
        }
        tracing::info!(elapsed_ms = self.timer.elapsed_at(now), "Stopwatch paused");

        write_key(self.store, keys::RUNNING, "false");
        write_key(self.store, keys::ELAPSED_MS, &self.timer.elapsed_at(now).to_string());
        true
    }

    /// Back to zero: stop, clear laps, erase the persisted snapshot.
    /// The theme preference is left untouched.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.laps.clear();
        tracing::info!("Stopwatch reset");

        for key in [keys::RUNNING, keys::START_MS, keys::ELAPSED_MS, keys::LAPS] {
            remove_key(self.store, key);
        }
    }

    /// Record the current elapsed time as a lap. `None` when not running.
    pub fn record_lap(&mut self) -> Option<String> {
        if !self.timer.is_running() {
            tracing::debug!("Lap ignored: stopwatch is not running");
            return None;
        }

        let time = format_elapsed(self.timer.elapsed_at(self.clock.now_ms()));
        self.laps.push(time.clone());
        self.persist_laps();

        tracing::info!(lap = self.laps.len(), time = %time, "Lap recorded");
        Some(time)
    }

    /// Rewrite the full snapshot. Idempotent; used as a durability
    /// safeguard by the watch loop's coarse tick.
    pub fn persist_snapshot(&self) {
        let now = self.clock.now_ms();
        if let Some(start) = self.timer.start_epoch_ms() {
            write_key(self.store, keys::RUNNING, "true");
            write_key(self.store, keys::START_MS, &start.to_string());
        } else {
            write_key(self.store, keys::RUNNING, "false");
            write_key(self.store, keys::ELAPSED_MS, &self.timer.elapsed_at(now).to_string());
        }
        self.persist_laps();
    }

    fn persist_laps(&self) {
        match serde_json::to_string(&self.laps) {
            Ok(json) => write_key(self.store, keys::LAPS, &json),
            Err(e) => tracing::warn!(error = %e, "Could not serialize laps"),
        }
    }

    /// Elapsed milliseconds right now.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed_at(self.clock.now_ms())
    }

    /// Elapsed time formatted as `HH:MM:SS.CC`.
    #[must_use]
    pub fn formatted_elapsed(&self) -> String {
        format_elapsed(self.elapsed_ms())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.timer.phase()
    }

    /// Recorded lap times, in insertion order.
    #[must_use]
    pub fn laps(&self) -> &[String] {
        &self.laps
    }
}

fn read_key(store: &dyn KvStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Could not read from store");
            None
        }
    }
}

fn write_key(store: &dyn KvStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!(key, error = %e, "Could not write to store");
    }
}

fn remove_key(store: &dyn KvStore, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key, error = %e, "Could not remove from store");
    }
}

fn parse_ms(key: &str, value: &str) -> Option<u64> {
    match value.parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(_) => {
            tracing::warn!(key, value, "Malformed millisecond value, ignoring");
            None
        }
    }
}

/// Stored lap list; anything that is not a JSON array of strings is
/// treated as empty.
fn load_laps(store: &dyn KvStore) -> Vec<String> {
    let Some(raw) = read_key(store, keys::LAPS) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(laps) => laps,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed lap data, starting with an empty list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::store::keys;
    use crate::domain::{AppError, Result};
    use crate::infrastructure::MemoryStore;

    /// Manually advanced clock.
    struct FakeClock {
        now: Cell<u64>,
    }

    impl FakeClock {
        fn at(now: u64) -> Self {
            Self { now: Cell::new(now) }
        }

        fn advance(&self, ms: u64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl Clock for FakeClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }
    }

    /// Store whose writes fail but reads work, for the degradation tests.
    #[derive(Default)]
    struct ReadOnlyStore {
        values: Mutex<HashMap<String, String>>,
    }

    impl KvStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AppError::InvalidData {
                message: "store is read-only".into(),
            })
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(AppError::InvalidData {
                message: "store is read-only".into(),
            })
        }
    }

    #[test]
    fn test_fresh_load_is_idle() {
        let store = MemoryStore::new();
        let clock = FakeClock::at(1_000);
        let service = StopwatchService::load(&store, &clock);

        assert_eq!(service.phase(), Phase::Idle);
        assert_eq!(service.elapsed_ms(), 0);
        assert!(service.laps().is_empty());
    }

    #[test]
    fn test_resume_continues_from_paused_value() {
        let store = MemoryStore::new();
        let clock = FakeClock::at(10_000);
        let mut service = StopwatchService::load(&store, &clock);

        assert!(service.start());
        clock.advance(2_000);
        assert!(service.pause());
        assert_eq!(service.elapsed_ms(), 2_000);

        clock.advance(60_000);
        assert!(service.start());
        clock.advance(500);
        assert_eq!(service.elapsed_ms(), 2_500);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let store = MemoryStore::new();
        let clock = FakeClock::at(0);
        let mut service = StopwatchService::load(&store, &clock);

        assert!(service.start());
        assert!(!service.start());
    }

    #[test]
    fn test_lap_while_paused_is_noop() {
        let store = MemoryStore::new();
        let clock = FakeClock::at(0);
        let mut service = StopwatchService::load(&store, &clock);

        assert_eq!(service.record_lap(), None);
        assert!(service.laps().is_empty());

        service.start();
        service.pause();
        assert_eq!(service.record_lap(), None);
        assert!(service.laps().is_empty());
    }

    #[test]
    fn test_three_laps_in_insertion_order() {
        let store = MemoryStore::new();
        let clock = FakeClock::at(0);
        let mut service = StopwatchService::load(&store, &clock);

        service.start();
        clock.advance(1_230);
        service.record_lap();
        clock.advance(1_000);
        service.record_lap();
        clock.advance(1_000);
        service.record_lap();

        assert_eq!(
            service.laps(),
            ["00:00:01.23", "00:00:02.23", "00:00:03.23"]
        );
    }

    #[test]
    fn test_reset_clears_everything_but_theme() {
        let store = MemoryStore::new();
        store.set(keys::THEME, "dark").unwrap();

        let clock = FakeClock::at(0);
        let mut service = StopwatchService::load(&store, &clock);
        service.start();
        clock.advance(5_000);
        service.record_lap();
        service.reset();

        assert_eq!(service.phase(), Phase::Idle);
        assert_eq!(service.elapsed_ms(), 0);
        assert!(service.laps().is_empty());
        assert_eq!(store.get(keys::RUNNING).unwrap(), None);
        assert_eq!(store.get(keys::LAPS).unwrap(), None);
        assert_eq!(store.get(keys::THEME).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_running_state_survives_reload() {
        let store = MemoryStore::new();
        let clock = FakeClock::at(100_000);

        {
            let mut service = StopwatchService::load(&store, &clock);
            service.start();
            clock.advance(1_500);
            service.record_lap();
        }

        // a later invocation against the same store
        clock.advance(8_500);
        let service = StopwatchService::load(&store, &clock);

        assert!(service.is_running());
        assert_eq!(service.elapsed_ms(), 10_000);
        assert_eq!(service.laps(), ["00:00:01.50"]);
    }

    #[test]
    fn test_paused_state_survives_reload() {
        let store = MemoryStore::new();
        let clock = FakeClock::at(0);

        {
            let mut service = StopwatchService::load(&store, &clock);
            service.start();
            clock.advance(42_000);
            service.pause();
        }

        clock.advance(1_000_000);
        let service = StopwatchService::load(&store, &clock);

        assert!(!service.is_running());
        assert_eq!(service.elapsed_ms(), 42_000);
    }

    #[test]
    fn test_malformed_store_values_default_to_fresh() {
        let store = MemoryStore::new();
        store.set(keys::RUNNING, "maybe").unwrap();
        store.set(keys::START_MS, "yesterday").unwrap();
        store.set(keys::ELAPSED_MS, "-5").unwrap();
        store.set(keys::LAPS, "{not json").unwrap();

        let clock = FakeClock::at(1_000);
        let service = StopwatchService::load(&store, &clock);

        assert_eq!(service.phase(), Phase::Idle);
        assert_eq!(service.elapsed_ms(), 0);
        assert!(service.laps().is_empty());
    }

    #[test]
    fn test_store_failures_never_corrupt_memory_state() {
        let store = ReadOnlyStore::default();
        let clock = FakeClock::at(0);
        let mut service = StopwatchService::load(&store, &clock);

        assert!(service.start());
        clock.advance(3_000);
        assert!(service.record_lap().is_some());
        service.persist_snapshot();

        assert!(service.is_running());
        assert_eq!(service.elapsed_ms(), 3_000);
        assert_eq!(service.laps().len(), 1);
    }

    #[test]
    fn test_persist_snapshot_rewrites_external_changes() {
        // a loaded service is the owner of the store: its snapshot wins
        // over keys written behind its back
        let store = MemoryStore::new();
        let clock = FakeClock::at(1_000);
        let mut service = StopwatchService::load(&store, &clock);
        service.start();

        store.set(keys::RUNNING, "false").unwrap();
        store.set(keys::ELAPSED_MS, "99").unwrap();

        service.persist_snapshot();
        assert_eq!(store.get(keys::RUNNING).unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(keys::START_MS).unwrap().as_deref(), Some("1000"));
    }

    #[test]
    fn test_persist_snapshot_is_idempotent() {
        let store = MemoryStore::new();
        let clock = FakeClock::at(500);
        let mut service = StopwatchService::load(&store, &clock);
        service.start();

        service.persist_snapshot();
        let first = store.get(keys::START_MS).unwrap();
        service.persist_snapshot();
        assert_eq!(store.get(keys::START_MS).unwrap(), first);
        assert_eq!(store.get(keys::RUNNING).unwrap().as_deref(), Some("true"));
    }
}
