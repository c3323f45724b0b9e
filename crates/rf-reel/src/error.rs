//! Error types for rf-reel

use thiserror::Error;

/// Configuration rejected at controller construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Revolutions must be at least 1")]
    NoRevolutions,

    #[error("Start repetition {start_repetition} is below revolutions {revolutions}")]
    StartRepetitionTooLow { start_repetition: u32, revolutions: u32 },

    #[error("Start repetition {start_repetition} is outside a strip of {strip_repetitions} repetitions")]
    StartRepetitionOutsideStrip {
        start_repetition: u32,
        strip_repetitions: u32,
    },

    #[error("Spin duration must be positive")]
    ZeroSpinDuration,

    #[error("At least one highlight light is required")]
    NoLights,

    #[error("Invalid overshoot: {0}")]
    InvalidOvershoot(f64),

    #[error("Invalid default {name} height: {value}")]
    InvalidDefaultHeight { name: &'static str, value: f64 },

    #[error("Event channel capacity must be at least 1")]
    ZeroEventCapacity,

    #[error("JSON parse error: {0}")]
    Json(String),
}

/// Result type alias
pub type ReelResult<T> = Result<T, ConfigError>;
