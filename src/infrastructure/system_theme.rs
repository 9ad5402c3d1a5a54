//! System theme signal from the terminal environment.
//!
//! Terminals advertising the `COLORFGBG` convention expose their palette as
//! `"<fg>;<bg>"` (sometimes `"<fg>;default;<bg>"`). Background index 7 or 15
//! means a light background; anything else, or no variable at all, is
//! treated as dark.

use crate::domain::SystemThemeSignal;

/// Dark/light detection via the `COLORFGBG` environment variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalThemeSignal;

impl SystemThemeSignal for TerminalThemeSignal {
    fn prefers_dark(&self) -> bool {
        prefers_dark_from(std::env::var("COLORFGBG").ok().as_deref())
    }
}

/// Interpret a `COLORFGBG` value. `None` (unset) defaults to dark.
#[must_use]
pub fn prefers_dark_from(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return true;
    };

    let bg = value.rsplit(';').next().and_then(|s| s.trim().parse::<u8>().ok());
    match bg {
        Some(7 | 15) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_defaults_to_dark() {
        assert!(prefers_dark_from(None));
    }

    #[test]
    fn test_light_backgrounds() {
        assert!(!prefers_dark_from(Some("0;15")));
        assert!(!prefers_dark_from(Some("0;default;7")));
    }

    #[test]
    fn test_dark_backgrounds() {
        assert!(prefers_dark_from(Some("15;0")));
        assert!(prefers_dark_from(Some("7;default;0")));
    }

    #[test]
    fn test_garbage_defaults_to_dark() {
        assert!(prefers_dark_from(Some("not-a-palette")));
        assert!(prefers_dark_from(Some("")));
    }
}
