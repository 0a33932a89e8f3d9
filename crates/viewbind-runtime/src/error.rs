#![forbid(unsafe_code)]

//! Errors raised by the binding engine.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `BindingNotFound` | Event from a widget with no binding | Router defers to host |
//! | `SourceFieldNotFound` | Collection event from an undeclared collection | Logged, notification dropped, `Err` returned |
//! | `PropertyNotFound` | Write to an undeclared property | `Err` from `set_property` |
//! | `ReadOnly` | Widget input into a read-only property | Logged, write skipped |
//! | `Value` | Widget value cannot be converted | Logged, write skipped |
//!
//! An unresolved command name is not an error: it means the command is a
//! method on the controller (see `Controller::invoke_method`).

use viewbind_core::{CollectionId, ControllerId, ValueError, WidgetId};

/// Convenient result type for the runtime crate.
pub type Result<T> = std::result::Result<T, BindError>;

/// Unified error type for the binding engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    /// No binding descriptor is registered for the widget.
    #[error("no binding registered for widget {0}")]
    BindingNotFound(WidgetId),

    /// A collection change came from a collection the controller does not declare.
    #[error("{collection} is not a declared collection of {controller}")]
    SourceFieldNotFound {
        collection: CollectionId,
        controller: ControllerId,
    },

    /// The property is not declared on the controller.
    #[error("property '{0}' is not declared on the controller")]
    PropertyNotFound(String),

    /// The property has no setter.
    #[error("property '{0}' is read-only")]
    ReadOnly(String),

    /// The value could not be converted to the property type.
    #[error(transparent)]
    Value(#[from] ValueError),
}
