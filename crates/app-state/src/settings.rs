//! App settings state
//!
//! Theme preference and notification toggle, persisted across sessions.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Always use light mode
    Light,
    /// Always use dark mode
    Dark,
    /// Follow the system color scheme
    #[default]
    System,
}

/// The serializable settings state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether the app currently renders in dark mode
    #[serde(default)]
    pub is_dark_mode: bool,

    /// The user's theme preference
    #[serde(default)]
    pub theme_preference: ThemePreference,

    /// Whether notifications are enabled
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            theme_preference: ThemePreference::System,
            notifications_enabled: true,
        }
    }
}

/// The settings store
pub struct SettingsStore {
    state: RwLock<Settings>,
}

impl SettingsStore {
    /// Create a settings store with defaults
    pub fn new() -> Self {
        Self { state: RwLock::new(Settings::default()) }
    }

    /// Flip dark mode and pin the preference to the resulting explicit mode
    pub fn toggle_dark_mode(&self) {
        let mut state = self.state.write();
        state.is_dark_mode = !state.is_dark_mode;
        state.theme_preference = if state.is_dark_mode {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        };
    }

    /// Set the theme preference and derive the dark-mode flag from it
    ///
    /// `System` resolves to light here; the platform layer overrides the
    /// flag when it knows the system scheme.
    pub fn set_theme_preference(&self, preference: ThemePreference) {
        let mut state = self.state.write();
        state.theme_preference = preference;
        state.is_dark_mode = preference == ThemePreference::Dark;
    }

    /// Enable or disable notifications
    pub fn set_notifications_enabled(&self, enabled: bool) {
        self.state.write().notifications_enabled = enabled;
    }

    /// Whether the app currently renders in dark mode
    pub fn is_dark_mode(&self) -> bool {
        self.state.read().is_dark_mode
    }

    /// Clone of the full settings state
    pub fn snapshot(&self) -> Settings {
        self.state.read().clone()
    }

    /// Replace the state with a restored snapshot
    pub fn restore(&self, snapshot: Settings) {
        *self.state.write() = snapshot;
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
