//! Demo settings and preferences
//!
//! Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::tuning::WaveConfig;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Ring capacity for this preset
    pub fn wave_capacity(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 128,
            QualityPreset::High => 256,
        }
    }
}

/// Demo settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Draw ripples at all
    pub ripples: bool,
    /// Reduced motion (slower growth and spin)
    pub reduced_motion: bool,
    /// Wave tuning (capacity is overridden by the preset)
    pub wave: WaveConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            ripples: true,
            reduced_motion: false,
            wave: WaveConfig::default(),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Wave tuning with the preset and accessibility options applied
    pub fn effective_config(&self) -> WaveConfig {
        let mut config = self.wave.with_capacity(self.quality.wave_capacity());
        if self.reduced_motion {
            config.scale_drive *= 0.5;
            config.angle_drive *= 0.5;
            config.angle_base *= 0.5;
        }
        config
    }

    /// Apply `quality=..&ripples=on|off&reduced_motion=on|off` overrides.
    ///
    /// Unknown keys and unparseable values are ignored. Returns true when any
    /// field changed, so the caller knows to persist.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let before = (self.quality, self.ripples, self.reduced_motion);

        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "quality" => {
                    if let Some(preset) = QualityPreset::from_str(value) {
                        self.quality = preset;
                    }
                }
                "ripples" => {
                    if let Some(on) = parse_switch(value) {
                        self.ripples = on;
                    }
                }
                "reduced_motion" => {
                    if let Some(on) = parse_switch(value) {
                        self.reduced_motion = on;
                    }
                }
                _ => log::debug!("Ignoring query key {:?}", key),
            }
        }

        before != (self.quality, self.ripples, self.reduced_motion)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "ripple_field_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
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

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}
