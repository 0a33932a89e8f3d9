#![forbid(unsafe_code)]

//! Registered settings, grouped by profile and category.
//!
//! # Invariants
//!
//! 1. Within a profile, category headers are unique and categories keep
//!    the order in which their first setting was registered.
//! 2. Within a profile, variable names are unique across all categories.
//! 3. A rejected registration leaves the registry unchanged.

use ahash::AHashMap;

use crate::error::SettingsError;
use crate::setting::{ProfileSetting, SettingsCategory};

/// Settings categories of every known profile.
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
    profiles: AHashMap<String, Vec<SettingsCategory>>,
    order: Vec<String>,
}

impl SettingsRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `setting` to `category` of `profile`, creating either if needed.
    pub fn register(
        &mut self,
        profile: &str,
        category: &str,
        setting: ProfileSetting,
    ) -> Result<(), SettingsError> {
        setting.validate()?;
        if self.find(profile, &setting.variable).is_some() {
            return Err(SettingsError::Duplicate {
                profile: profile.to_owned(),
                variable: setting.variable,
            });
        }

        if !self.profiles.contains_key(profile) {
            self.order.push(profile.to_owned());
        }
        let categories = self.profiles.entry(profile.to_owned()).or_default();
        let index = match categories.iter().position(|c| c.header == category) {
            Some(index) => index,
            None => {
                tracing::debug!(profile, category, "settings category created");
                categories.push(SettingsCategory::new(category));
                categories.len() - 1
            }
        };
        tracing::trace!(profile, category, variable = %setting.variable, "setting registered");
        categories[index].settings.push(setting);
        Ok(())
    }

    /// Register an on/off setting.
    pub fn register_toggle(
        &mut self,
        profile: &str,
        category: &str,
        variable: &str,
        display_name: &str,
        require_restart: bool,
    ) -> Result<(), SettingsError> {
        let mut setting = ProfileSetting::toggle(variable, display_name);
        setting.require_restart = require_restart;
        self.register(profile, category, setting)
    }

    /// Register a setting picking one of `states`.
    pub fn register_multistate<S: Into<String>>(
        &mut self,
        profile: &str,
        category: &str,
        variable: &str,
        display_name: &str,
        states: impl IntoIterator<Item = S>,
        require_restart: bool,
    ) -> Result<(), SettingsError> {
        let mut setting = ProfileSetting::multistate(variable, display_name, states);
        setting.require_restart = require_restart;
        self.register(profile, category, setting)
    }

    /// Categories of `profile`, in registration order.
    #[must_use]
    pub fn categories(&self, profile: &str) -> &[SettingsCategory] {
        self.profiles.get(profile).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn category(&self, profile: &str, header: &str) -> Option<&SettingsCategory> {
        self.categories(profile).iter().find(|c| c.header == header)
    }

    /// The setting editing `variable` in `profile`, with its category.
    #[must_use]
    pub fn find(&self, profile: &str, variable: &str) -> Option<(&SettingsCategory, &ProfileSetting)> {
        self.categories(profile)
            .iter()
            .find_map(|c| c.get(variable).map(|s| (c, s)))
    }

    /// Profile names, in registration order.
    pub fn profiles(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Total number of settings across profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles
            .values()
            .flat_map(|cats| cats.iter())
            .map(|c| c.settings.len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
