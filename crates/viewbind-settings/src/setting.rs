#![forbid(unsafe_code)]

//! Setting declarations.

use viewbind_core::ValueType;

use crate::error::SettingsError;

/// What kind of control a setting is edited with.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingKind {
    /// On/off switch.
    Toggle,
    /// Number in `min..=max`, moved in `step` increments.
    Slider { min: f64, max: f64, step: f64 },
    /// One of a fixed list of labelled states.
    Multistate { states: Vec<String> },
}

impl SettingKind {
    /// Type of the value a bound widget edits.
    ///
    /// A multistate setting is edited as the index of its state.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Toggle => ValueType::Bool,
            Self::Slider { .. } => ValueType::Float,
            Self::Multistate { .. } => ValueType::Int,
        }
    }
}

/// One user-facing setting of a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSetting {
    /// Name of the profile field the setting edits.
    pub variable: String,
    pub display_name: String,
    /// Whether a change only takes effect after a restart.
    pub require_restart: bool,
    pub kind: SettingKind,
}

impl ProfileSetting {
    fn new(variable: impl Into<String>, display_name: impl Into<String>, kind: SettingKind) -> Self {
        Self {
            variable: variable.into(),
            display_name: display_name.into(),
            require_restart: false,
            kind,
        }
    }

    #[must_use]
    pub fn toggle(variable: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(variable, display_name, SettingKind::Toggle)
    }

    #[must_use]
    pub fn slider(
        variable: impl Into<String>,
        display_name: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self::new(variable, display_name, SettingKind::Slider { min, max, step })
    }

    #[must_use]
    pub fn multistate<S: Into<String>>(
        variable: impl Into<String>,
        display_name: impl Into<String>,
        states: impl IntoIterator<Item = S>,
    ) -> Self {
        let states = states.into_iter().map(Into::into).collect();
        Self::new(variable, display_name, SettingKind::Multistate { states })
    }

    /// Mark the setting as requiring a restart.
    #[must_use]
    pub fn requires_restart(mut self) -> Self {
        self.require_restart = true;
        self
    }

    /// Check the setting's own parameters.
    pub fn validate(&self) -> Result<(), SettingsError> {
        match &self.kind {
            SettingKind::Toggle => Ok(()),
            SettingKind::Slider { min, max, step } => {
                if !(min <= max) {
                    return Err(SettingsError::InvertedRange {
                        variable: self.variable.clone(),
                        min: *min,
                        max: *max,
                    });
                }
                if !(step.is_finite() && *step > 0.0) {
                    return Err(SettingsError::InvalidStep {
                        variable: self.variable.clone(),
                        step: *step,
                    });
                }
                Ok(())
            }
            SettingKind::Multistate { states } if states.is_empty() => {
                Err(SettingsError::NoStates(self.variable.clone()))
            }
            SettingKind::Multistate { .. } => Ok(()),
        }
    }
}

/// A titled group of settings, shown together in a settings menu.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsCategory {
    pub header: String,
    /// Settings in registration order.
    pub settings: Vec<ProfileSetting>,
}

impl SettingsCategory {
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            settings: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, variable: &str) -> Option<&ProfileSetting> {
        self.settings.iter().find(|s| s.variable == variable)
    }
}
