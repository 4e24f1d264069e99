use std::{fmt, fs, path::PathBuf, str::FromStr};

use thiserror::Error;

/// Display theme preference. Stored in its own file, entirely separate from
/// the domain snapshot; it only shares the data directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown theme '{0}', expected 'light' or 'dark'")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to save theme preference to '{path}': {source}")]
pub struct SaveThemeError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Missing or unreadable preference degrades to the default theme.
    pub fn load(&self) -> Theme {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| content.parse().ok())
            .unwrap_or_default()
    }

    pub fn save(&self, theme: Theme) -> Result<(), SaveThemeError> {
        fs::write(&self.path, theme.to_string()).map_err(|e| SaveThemeError {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let path = PathBuf::from("/tmp/nyr_theme_round_trip");
        let store = ThemeStore::new(path);

        store.save(Theme::Dark).unwrap();
        assert_eq!(store.load(), Theme::Dark);

        store.save(Theme::Light).unwrap();
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn test_missing_file_defaults_to_light() {
        let store = ThemeStore::new(PathBuf::from("/tmp/nyr_theme_missing"));
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn test_invalid_content_defaults_to_light() {
        let path = PathBuf::from("/tmp/nyr_theme_invalid");
        fs::write(&path, "sepia").unwrap();

        let store = ThemeStore::new(path);
        assert_eq!(store.load(), Theme::Light);
    }
}
