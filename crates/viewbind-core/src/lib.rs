#![forbid(unsafe_code)]

//! Host-facing primitives for viewbind.
//!
//! This crate defines what the binding engine and a UI host agree on:
//!
//! - [`WidgetId`], [`WidgetKind`], [`UiEvent`]: non-owning widget handles and
//!   the raw input the host delivers.
//! - [`Attachment`], [`BindingSpec`], [`ControllerId`]: script objects a host
//!   attaches to widgets.
//! - [`WidgetTree`]: the host contract, with [`WidgetArena`] as the in-memory
//!   reference host.
//! - [`Value`], [`ValueType`], [`Bindable`]: the dynamic value model and its
//!   type converter.
//! - [`ObservableCollection`], [`CollectionChanged`]: collections that report
//!   their own structural changes.

pub mod arena;
pub mod attach;
pub mod collection;
pub mod tree;
pub mod value;
pub mod widget;

pub use arena::WidgetArena;
pub use attach::{Attachment, BindingSpec, ControllerId};
pub use collection::{CollectionAction, CollectionChanged, CollectionId, ObservableCollection};
pub use tree::WidgetTree;
pub use value::{Bindable, Value, ValueError, ValueType};
pub use widget::{EventKind, MouseButton, UiEvent, WidgetId, WidgetKind};
