//! Reel configuration and presets

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ReelResult};
use crate::event::Easing;

/// Named configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelProfile {
    /// Standard spin
    #[default]
    Normal,
    /// Fast spin
    Turbo,
    /// Short spin for testing renderers
    Studio,
    /// Anything adjusted from a preset
    Custom,
}

impl fmt::Display for ReelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Turbo => "turbo",
            Self::Studio => "studio",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for ReelProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "turbo" => Ok(Self::Turbo),
            "studio" => Ok(Self::Studio),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown reel profile: {}", other)),
        }
    }
}

/// Reel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Profile this config came from
    pub profile: ReelProfile,

    /// Linear spin phase duration (ms)
    pub spin_duration_ms: u64,

    /// Bounce-back phase duration (ms)
    pub bounce_duration_ms: u64,

    /// Distance the spin flies past the winner before bouncing back (px)
    pub overshoot_px: f64,

    /// Full roster lengths travelled per spin
    pub revolutions: u32,

    /// Repetition every spin starts from
    pub start_repetition: u32,

    /// Times the roster is tiled in the rendered strip
    pub strip_repetitions: u32,

    /// Recent winners kept
    pub history_capacity: usize,

    /// Row height used until the renderer reports one (px)
    pub default_item_height_px: f64,

    /// Viewport height used until the renderer reports one (px)
    pub default_viewport_height_px: f64,

    /// Number of highlight lights
    pub light_count: u8,

    /// Outbound event buffer
    pub event_capacity: usize,

    /// Easing of the linear spin phase
    pub spin_easing: Easing,

    /// Easing of the bounce-back phase
    pub bounce_easing: Easing,

    /// Easing before the first spin
    pub idle_easing: Easing,
}

impl ReelConfig {
    /// Standard spin: 3s linear, 500ms bounce, 5 revolutions
    pub fn normal() -> Self {
        Self {
            profile: ReelProfile::Normal,
            spin_duration_ms: 3000,
            bounce_duration_ms: 500,
            overshoot_px: 60.0,
            revolutions: 5,
            start_repetition: 10,
            strip_repetitions: 15,
            history_capacity: 5,
            default_item_height_px: 128.0,
            default_viewport_height_px: 128.0,
            light_count: 3,
            event_capacity: 256,
            spin_easing: Easing::Linear,
            bounce_easing: Easing::BOUNCE,
            idle_easing: Easing::EaseOut,
        }
    }

    /// Fast spin
    pub fn turbo() -> Self {
        Self {
            profile: ReelProfile::Turbo,
            spin_duration_ms: 1200,
            bounce_duration_ms: 300,
            ..Self::normal()
        }
    }

    /// Short spin with fewer revolutions
    pub fn studio() -> Self {
        Self {
            profile: ReelProfile::Studio,
            spin_duration_ms: 600,
            bounce_duration_ms: 150,
            revolutions: 2,
            ..Self::normal()
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: ReelProfile) -> Self {
        match profile {
            ReelProfile::Normal => Self::normal(),
            ReelProfile::Turbo => Self::turbo(),
            ReelProfile::Studio => Self::studio(),
            ReelProfile::Custom => Self::normal(),
        }
    }

    /// Scale both phase durations by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| ((ms as f64 * factor).round() as u64).max(1);
        Self {
            profile: ReelProfile::Custom,
            spin_duration_ms: scale(self.spin_duration_ms),
            bounce_duration_ms: scale(self.bounce_duration_ms),
            ..self.clone()
        }
    }

    /// Parse a JSON document; missing fields take `normal()` values
    pub fn from_json(json: &str) -> ReelResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the startup invariants
    pub fn validate(&self) -> ReelResult<()> {
        if self.revolutions == 0 {
            return Err(ConfigError::NoRevolutions);
        }
        if self.start_repetition < self.revolutions {
            return Err(ConfigError::StartRepetitionTooLow {
                start_repetition: self.start_repetition,
                revolutions: self.revolutions,
            });
        }
        if self.start_repetition >= self.strip_repetitions {
            return Err(ConfigError::StartRepetitionOutsideStrip {
                start_repetition: self.start_repetition,
                strip_repetitions: self.strip_repetitions,
            });
        }
        if self.spin_duration_ms == 0 {
            return Err(ConfigError::ZeroSpinDuration);
        }
        if self.light_count == 0 {
            return Err(ConfigError::NoLights);
        }
        if !self.overshoot_px.is_finite() || self.overshoot_px < 0.0 {
            return Err(ConfigError::InvalidOvershoot(self.overshoot_px));
        }
        for (name, value) in [
            ("item", self.default_item_height_px),
            ("viewport", self.default_viewport_height_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDefaultHeight { name, value });
            }
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    pub fn bounce_duration(&self) -> Duration {
        Duration::from_millis(self.bounce_duration_ms)
    }
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self::normal()
    }
}
