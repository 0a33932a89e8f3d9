#![forbid(unsafe_code)]

//! TOML settings manifests.
//!
//! ```toml
//! [[profile]]
//! name = "client"
//!
//! [[profile.category]]
//! header = "Audio"
//!
//! [[profile.category.setting]]
//! variable = "volume"
//! display_name = "Master volume"
//! kind = "slider"
//! min = 0.0
//! max = 1.0
//! step = 0.05
//!
//! [[profile.category.setting]]
//! variable = "quality"
//! kind = "multistate"
//! states = ["Low", "High"]
//! require_restart = true
//! ```
//!
//! `display_name` defaults to the variable name. Entries are applied in
//! document order; the first rejected entry aborts the load, keeping the
//! entries applied before it.

use serde::Deserialize;

use crate::error::SettingsError;
use crate::registry::SettingsRegistry;
use crate::setting::ProfileSetting;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    profile: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileEntry {
    name: String,
    #[serde(default)]
    category: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryEntry {
    header: String,
    #[serde(default)]
    setting: Vec<SettingEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindName {
    Toggle,
    Slider,
    Multistate,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingEntry {
    variable: String,
    display_name: Option<String>,
    kind: KindName,
    #[serde(default)]
    require_restart: bool,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    #[serde(default)]
    states: Vec<String>,
}

impl SettingEntry {
    fn into_setting(self) -> Result<ProfileSetting, SettingsError> {
        let display_name = self.display_name.unwrap_or_else(|| self.variable.clone());
        let missing = |field| SettingsError::MissingField {
            variable: self.variable.clone(),
            field,
        };
        let setting = match self.kind {
            KindName::Toggle => ProfileSetting::toggle(&self.variable, display_name),
            KindName::Slider => {
                let min = self.min.ok_or_else(|| missing("min"))?;
                let max = self.max.ok_or_else(|| missing("max"))?;
                let step = self.step.ok_or_else(|| missing("step"))?;
                ProfileSetting::slider(&self.variable, display_name, min, max, step)
            }
            KindName::Multistate => {
                ProfileSetting::multistate(&self.variable, display_name, self.states.iter().cloned())
            }
        };
        Ok(ProfileSetting {
            require_restart: self.require_restart,
            ..setting
        })
    }
}

impl SettingsRegistry {
    /// Apply every registration of a TOML manifest.
    ///
    /// Returns how many settings were registered.
    pub fn load_toml(&mut self, source: &str) -> Result<usize, SettingsError> {
        let manifest: Manifest = toml::from_str(source)?;
        let mut count = 0;
        for profile in manifest.profile {
            for category in profile.category {
                for entry in category.setting {
                    self.register(&profile.name, &category.header, entry.into_setting()?)?;
                    count += 1;
                }
            }
        }
        tracing::debug!(settings = count, "settings manifest loaded");
        Ok(count)
    }

    /// Build a registry from a TOML manifest.
    pub fn from_toml(source: &str) -> Result<Self, SettingsError> {
        let mut registry = Self::new();
        registry.load_toml(source)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setting::SettingKind;

    const SAMPLE: &str = r#"
[[profile]]
name = "client"

[[profile.category]]
header = "Audio"

[[profile.category.setting]]
variable = "volume"
display_name = "Master volume"
kind = "slider"
min = 0.0
max = 1.0
step = 0.05

[[profile.category.setting]]
variable = "quality"
kind = "multistate"
states = ["Low", "High"]
require_restart = true

[[profile.category]]
header = "Video"

[[profile.category.setting]]
variable = "vsync"
kind = "toggle"
"#;

    #[test]
    fn sample_manifest_loads() {
        let reg = SettingsRegistry::from_toml(SAMPLE).unwrap();
        assert_eq!(reg.len(), 3);
        let (cat, volume) = reg.find("client", "volume").unwrap();
        assert_eq!(cat.header, "Audio");
        assert_eq!(volume.display_name, "Master volume");
        assert_eq!(
            volume.kind,
            SettingKind::Slider {
                min: 0.0,
                max: 1.0,
                step: 0.05
            }
        );
        let (_, quality) = reg.find("client", "quality").unwrap();
        assert_eq!(quality.display_name, "quality");
        assert!(quality.require_restart);
    }

    #[test]
    fn manifest_extends_existing_categories() {
        let mut reg = SettingsRegistry::new();
        reg.register_toggle("client", "Video", "hdr", "HDR", false)
            .unwrap();
        reg.load_toml(SAMPLE).unwrap();
        let video = reg.category("client", "Video").unwrap();
        assert_eq!(video.settings.len(), 2);
        assert_eq!(reg.categories("client").len(), 2);
    }

    #[test]
    fn slider_without_bounds_is_rejected() {
        let src = r#"
[[profile]]
name = "p"
[[profile.category]]
header = "H"
[[profile.category.setting]]
variable = "v"
kind = "slider"
min = 0.0
"#;
        let err = SettingsRegistry::from_toml(src).unwrap_err();
        assert!(matches!(err, SettingsError::MissingField { field: "max", .. }));
    }

    #[test]
    fn syntax_and_schema_errors_are_reported() {
        assert!(matches!(
            SettingsRegistry::from_toml("[[profile]"),
            Err(SettingsError::Manifest(_))
        ));
        assert!(matches!(
            SettingsRegistry::from_toml("[[profile]]\nname = \"p\"\ncolour = 1\n"),
            Err(SettingsError::Manifest(_))
        ));
        let bad_kind = "[[profile]]\nname = \"p\"\n[[profile.category]]\nheader = \"H\"\n\
                        [[profile.category.setting]]\nvariable = \"v\"\nkind = \"knob\"\n";
        assert!(matches!(
            SettingsRegistry::from_toml(bad_kind),
            Err(SettingsError::Manifest(_))
        ));
    }

    #[test]
    fn empty_manifest_registers_nothing() {
        let reg = SettingsRegistry::from_toml("").unwrap();
        assert!(reg.is_empty());
    }
}
