//! Light/dark theme preference.

use crate::errors::Result;
use crate::storage::{KeyValueStore, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

/// Reads and flips the saved theme. The value is stored as a bare string,
/// not JSON.
#[derive(Clone)]
pub struct ThemeManager {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeManager").finish_non_exhaustive()
    }
}

impl ThemeManager {
    /// Creates a manager over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The saved theme, or the system preference if none is saved.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn current(&self, prefers_dark: bool) -> Result<Theme> {
        let saved = self
            .store
            .get(THEME_KEY)?
            .and_then(|raw| raw.parse::<Theme>().ok());
        Ok(saved.unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light }))
    }

    /// Saves `theme`.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn set(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Switches to the other theme, saves it and returns it.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn toggle(&self, prefers_dark: bool) -> Result<Theme> {
        let next = self.current(prefers_dark)?.toggled();
        self.set(next)?;
        debug!(theme = %next, "Theme toggled");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn manager() -> (ThemeManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ThemeManager::new(store.clone()), store)
    }

    #[test]
    fn test_falls_back_to_system_preference() {
        let (themes, _) = manager();
        assert_eq!(themes.current(false).unwrap(), Theme::Light);
        assert_eq!(themes.current(true).unwrap(), Theme::Dark);
    }

    #[test]
    fn test_saved_theme_wins() {
        let (themes, store) = manager();
        store.set(THEME_KEY, "dark").unwrap();
        assert_eq!(themes.current(false).unwrap(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists_bare_string() {
        let (themes, store) = manager();
        assert_eq!(themes.toggle(false).unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(themes.toggle(false).unwrap(), Theme::Light);
    }

    #[test]
    fn test_garbage_value_ignored() {
        let (themes, store) = manager();
        store.set(THEME_KEY, "\"sepia\"").unwrap();
        assert_eq!(themes.current(true).unwrap(), Theme::Dark);
    }
}
