//! Data-driven wave tuning
//!
//! The defaults are empirically tuned visual parameters. They are kept
//! configurable rather than derived.

use serde::{Deserialize, Serialize};

use crate::consts::{DEBOUNCE_MS, DEFAULT_CAPACITY};
use crate::error::ConfigError;

/// Parameters for the wave field simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Number of ring slots (and drawn instances)
    pub capacity: usize,
    /// Scale given to a freshly triggered wave
    pub scale_seed: f32,
    /// Alpha given to a freshly triggered wave
    pub alpha_seed: f32,
    /// Per-tick alpha multiplier, in (0, 1)
    pub decay: f32,
    /// Alpha never decays below this
    pub alpha_floor: f32,
    /// Relative scale growth per second
    pub scale_drive: f32,
    /// Spin contributed by alpha, radians per second at alpha = 1
    pub angle_drive: f32,
    /// Constant spin, radians per second
    pub angle_base: f32,
    /// A pointer move keeps the field active for this long (ms)
    pub debounce_ms: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            scale_seed: 0.1,
            alpha_seed: 0.192,
            decay: 0.96,
            alpha_floor: 0.002,
            scale_drive: 5.0,
            angle_drive: 2.0,
            angle_base: 0.5,
            debounce_ms: DEBOUNCE_MS,
        }
    }
}

impl WaveConfig {
    /// Same tuning with a different ring size
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Check every parameter, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        let scalars = [
            ("scale_seed", self.scale_seed),
            ("alpha_seed", self.alpha_seed),
            ("decay", self.decay),
            ("alpha_floor", self.alpha_floor),
            ("scale_drive", self.scale_drive),
            ("angle_drive", self.angle_drive),
            ("angle_base", self.angle_base),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }

        if !(self.debounce_ms.is_finite() && self.debounce_ms >= 0.0) {
            return Err(ConfigError::Debounce(self.debounce_ms));
        }

        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(ConfigError::Decay(self.decay));
        }

        let unit = [
            ("scale_seed", self.scale_seed),
            ("alpha_seed", self.alpha_seed),
            ("alpha_floor", self.alpha_floor),
        ];
        for (name, value) in unit {
            check_range(name, value, 0.0, 1.0)?;
        }

        let non_negative = [
            ("scale_drive", self.scale_drive),
            ("angle_drive", self.angle_drive),
            ("angle_base", self.angle_base),
        ];
        for (name, value) in non_negative {
            check_range(name, value, 0.0, f32::MAX)?;
        }

        Ok(())
    }
}

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(WaveConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = WaveConfig::default().with_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_rejects_bad_decay() {
        for decay in [0.0, 1.0, 1.5, -0.2] {
            let config = WaveConfig {
                decay,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::Decay(decay)));
        }
    }

    #[test]
    fn test_rejects_non_finite() {
        let config = WaveConfig {
            scale_drive: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite {
                name: "scale_drive",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_seed_above_one() {
        let config = WaveConfig {
            alpha_seed: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "alpha_seed",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_negative_spin() {
        let config = WaveConfig {
            angle_base: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "angle_base",
                ..
            })
        ));
    }

    #[test]
    fn test_debounce_checked_at_full_precision() {
        // Finite as f64 even though it would overflow an f32
        let long = WaveConfig {
            debounce_ms: 1e300,
            ..Default::default()
        };
        assert_eq!(long.validate(), Ok(()));

        for debounce_ms in [f64::INFINITY, f64::NAN, -1.0] {
            let config = WaveConfig {
                debounce_ms,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::Debounce(_))));
        }
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: WaveConfig = serde_json::from_str(r#"{"capacity": 32}"#).unwrap();
        assert_eq!(config.capacity, 32);
        assert_eq!(config.decay, 0.96);
    }
}
