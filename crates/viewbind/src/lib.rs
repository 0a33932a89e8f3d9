#![forbid(unsafe_code)]

//! viewbind public facade.
//!
//! Re-exports the host primitives from `viewbind-core`, the binding engine
//! from `viewbind-runtime` and, with the `settings` feature, the settings
//! registry from `viewbind-settings`.
//!
//! Most code only needs the [`prelude`].

pub use viewbind_core as core;
pub use viewbind_runtime as runtime;
#[cfg(feature = "settings")]
pub use viewbind_settings as settings;

pub use viewbind_core::{
    Attachment, Bindable, BindingSpec, CollectionAction, CollectionChanged, CollectionId,
    ControllerId, EventKind, MouseButton, ObservableCollection, UiEvent, Value, ValueError,
    ValueType, WidgetArena, WidgetId, WidgetKind, WidgetTree,
};
pub use viewbind_runtime::{
    BindError, BindingDescriptor, BindingTable, CommandArgs, CommandHandle, CommandSlot,
    CommandTypes, Controller, PropertyDescriptor, PropertyRegistry, PropertyType, RelayCommand,
    ViewController,
};
#[cfg(feature = "settings")]
pub use viewbind_settings::{ProfileSetting, SettingKind, SettingsCategory, SettingsError, SettingsRegistry};

/// Everything needed to declare a controller and drive a view.
pub mod prelude {
    pub use crate::{
        BindError, BindingSpec, CollectionChanged, CommandArgs, CommandSlot, CommandTypes,
        Controller, MouseButton, ObservableCollection, PropertyRegistry, RelayCommand, Value,
        ViewController, WidgetArena, WidgetId, WidgetKind, WidgetTree,
    };
}
