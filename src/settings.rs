//! Game settings and preferences
//!
//! Persisted separately from the economy records in LocalStorage.

use serde::{Deserialize, Serialize};

/// Graphics presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GraphicsPreset {
    /// Flat primitives only
    Prototype,
    /// Library models, falling back to primitives
    #[default]
    Full,
}

impl GraphicsPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphicsPreset::Prototype => "Prototype",
            GraphicsPreset::Full => "Full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "prototype" | "low" => Some(GraphicsPreset::Prototype),
            "full" | "high" => Some(GraphicsPreset::Full),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            GraphicsPreset::Prototype => GraphicsPreset::Full,
            GraphicsPreset::Full => GraphicsPreset::Prototype,
        }
    }

    /// Whether model lookups go through the asset library
    pub fn uses_models(&self) -> bool {
        matches!(self, GraphicsPreset::Full)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics preset
    pub graphics: GraphicsPreset,
    /// 3-2-1 countdown when leaving the pause screen
    pub resume_countdown: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Reduced motion (no item bob, no spin)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graphics: GraphicsPreset::Full,
            resume_countdown: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_shark_settings";

    pub fn from_preset(preset: GraphicsPreset) -> Self {
        Self {
            graphics: preset,
            ..Self::default()
        }
    }

    /// Parse settings JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Invalid settings ({}), using defaults", e);
            Self::default()
        })
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
