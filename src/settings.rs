//! Game settings and preferences
//!
//! Persisted separately from the score record in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::ai::{Difficulty, Personality};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Preferred AI personality, restored on the next session
    pub personality: String,
    /// Difficulty level forwarded to the remote endpoint
    pub difficulty: String,

    // === Visual Effects ===
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Ball trail
    pub trails: bool,
    /// Particle bursts
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            personality: Personality::default().as_str().to_string(),
            difficulty: Difficulty::default().as_str().to_string(),
            screen_shake: true,
            trails: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neo_breakout_settings";

    pub fn personality(&self) -> Personality {
        Personality::from_str(&self.personality).unwrap_or_default()
    }

    pub fn set_personality(&mut self, personality: Personality) {
        self.personality = personality.as_str().to_string();
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_str(&self.difficulty).unwrap_or_default()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty.as_str().to_string();
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
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

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_accessors() {
        let settings = Settings::default();
        assert_eq!(settings.personality(), Personality::Balanced);
        assert_eq!(settings.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn setters_update_the_stored_keys() {
        let mut settings = Settings::default();
        settings.set_personality(Personality::Predictive);
        settings.set_difficulty(Difficulty::Expert);
        assert_eq!(settings.personality, "predictive");
        assert_eq!(settings.difficulty, "expert");
        assert_eq!(settings.personality(), Personality::Predictive);
        assert_eq!(settings.difficulty(), Difficulty::Expert);
    }

    #[test]
    fn unknown_stored_keys_fall_back_to_defaults() {
        let settings = Settings {
            personality: "mystery".to_string(),
            difficulty: "nightmare".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.personality(), Personality::Balanced);
        assert_eq!(settings.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn reduced_motion_overrides_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }
}
