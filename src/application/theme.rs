//! Theme controller: sticky stored preference with system-signal fallback.

use std::str::FromStr;

use crate::domain::store::keys;
use crate::domain::{KvStore, SystemThemeSignal, ThemePreference};

/// Where the effective theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// An explicit preference stored by the user.
    Stored,
    /// The host's dark/light signal.
    System,
}

/// Resolves and updates the dark/light theme.
pub struct ThemeController<'a> {
    store: &'a dyn KvStore,
    signal: &'a dyn SystemThemeSignal,
}

impl<'a> ThemeController<'a> {
    pub const fn new(store: &'a dyn KvStore, signal: &'a dyn SystemThemeSignal) -> Self {
        Self { store, signal }
    }

    /// Stored preference, if present and parseable.
    pub fn preference(&self) -> Option<ThemePreference> {
        let raw = match self.store.get(keys::THEME) {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read theme preference");
                return None;
            }
        };
        match ThemePreference::from_str(&raw) {
            Ok(pref) => Some(pref),
            Err(_) => {
                tracing::warn!(value = %raw, "Malformed theme preference, following system");
                None
            }
        }
    }

    /// Effective dark flag and where it came from: the stored preference
    /// when one exists, the system signal otherwise.
    pub fn effective(&self) -> (bool, ThemeSource) {
        self.preference().map_or_else(
            || (self.signal.prefers_dark(), ThemeSource::System),
            |pref| (pref.is_dark(), ThemeSource::Stored),
        )
    }

    /// Persist an explicit choice; sticky until cleared.
    pub fn set_preference(&self, pref: ThemePreference) {
        if let Err(e) = self.store.set(keys::THEME, &pref.to_string()) {
            tracing::warn!(error = %e, "Could not persist theme preference");
        }
        tracing::info!(theme = %pref, "Theme preference set");
    }

    /// Remove the stored choice, reverting to follow-system.
    pub fn clear_preference(&self) {
        if let Err(e) = self.store.remove(keys::THEME) {
            tracing::warn!(error = %e, "Could not clear theme preference");
        }
        tracing::info!("Theme preference cleared, following system");
    }

    /// True while no explicit preference is stored; the watch loop keeps
    /// re-sampling the system signal only in that case.
    pub fn follows_system(&self) -> bool {
        self.preference().is_none()
    }
}
