#![forbid(unsafe_code)]

//! Profile setting registration for settings menus.
//!
//! A [`SettingsRegistry`] groups [`ProfileSetting`]s into titled
//! [`SettingsCategory`]s per profile. A settings menu walks the categories
//! of a profile and binds one widget per setting, using
//! [`SettingKind::value_type`] to pick the widget.
//!
//! With the `manifest` feature (on by default), registrations can also be
//! loaded from TOML with [`SettingsRegistry::load_toml`].
//!
//! Storing the values themselves is left to the application.

pub mod error;
#[cfg(feature = "manifest")]
pub mod manifest;
pub mod registry;
pub mod setting;

pub use error::SettingsError;
pub use registry::SettingsRegistry;
pub use setting::{ProfileSetting, SettingKind, SettingsCategory};
