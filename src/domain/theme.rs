//! Theme preference model.
//!
//! A stored preference is sticky until explicitly cleared; absence means
//! "follow the system signal".

/// Explicit dark/light choice persisted by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreference {
    Dark,
    Light,
}

impl ThemePreference {
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl std::str::FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(format!("Unknown theme: {s}. Use: dark, light")),
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

/// Host-provided indication of the OS/terminal-level dark preference.
pub trait SystemThemeSignal {
    fn prefers_dark(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let dark: ThemePreference = "dark".parse().unwrap();
        let light: ThemePreference = "LIGHT".parse().unwrap();
        assert_eq!(dark, ThemePreference::Dark);
        assert_eq!(light, ThemePreference::Light);
        assert_eq!(dark.to_string(), "dark");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("solarized".parse::<ThemePreference>().is_err());
    }
}
