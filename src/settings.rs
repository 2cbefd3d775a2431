//! Player preferences
//!
//! Persisted separately from the best score in LocalStorage (web) or a JSON
//! file (native).

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Difficulty preselected in the menu
    pub difficulty: Difficulty,

    // === Audio ===
    /// Background music on/off
    pub music_enabled: bool,
    /// Sound effects on/off
    pub sfx_enabled: bool,

    // === Feedback ===
    /// Vibrate on hits and collects (touch devices)
    pub haptics: bool,
    /// Reduced motion (skip speed-up and milestone flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            music_enabled: true,
            sfx_enabled: true,
            haptics: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key / file name
    const STORAGE_KEY: &'static str = "bunnyRunnerSettings";

    /// Flip background music, returns the new state
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    /// Set a feedback/audio flag by its JSON name; false for unknown names
    pub fn set_flag(&mut self, name: &str, enabled: bool) -> bool {
        let flag = match name {
            "musicEnabled" => &mut self.music_enabled,
            "sfxEnabled" => &mut self.sfx_enabled,
            "haptics" => &mut self.haptics,
            "reducedMotion" => &mut self.reduced_motion,
            _ => return false,
        };
        *flag = enabled;
        true
    }

    /// Settings as JSON for the UI
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse settings JSON, falling back to defaults for anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from `<dir>/bunnyRunnerSettings.json` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(dir: &std::path::Path) -> Self {
        let path = dir.join(format!("{}.json", Self::STORAGE_KEY));
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json),
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to `<dir>/bunnyRunnerSettings.json` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, dir: &std::path::Path) -> Result<(), crate::persistence::StoreError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| crate::persistence::StoreError::WriteRejected(e.to_string()))?;
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(format!("{}.json", Self::STORAGE_KEY)), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
