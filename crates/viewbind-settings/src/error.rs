#![forbid(unsafe_code)]

//! Errors raised while registering settings.

/// Why a setting was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("multistate setting '{0}' has no states")]
    NoStates(String),

    #[error("slider '{variable}' has min {min} above max {max}")]
    InvertedRange { variable: String, min: f64, max: f64 },

    #[error("slider '{variable}' has step {step}; it must be positive")]
    InvalidStep { variable: String, step: f64 },

    /// Variable names are unique within a profile, across categories.
    #[error("'{variable}' is already registered in profile '{profile}'")]
    Duplicate { profile: String, variable: String },

    /// A manifest entry lacks a field its kind needs.
    #[cfg(feature = "manifest")]
    #[error("'{variable}' is missing `{field}`")]
    MissingField {
        variable: String,
        field: &'static str,
    },

    #[cfg(feature = "manifest")]
    #[error("invalid settings manifest: {0}")]
    Manifest(#[from] toml::de::Error),
}
