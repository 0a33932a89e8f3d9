#![forbid(unsafe_code)]

//! The viewbind binding engine.
//!
//! A [`ViewController`] binds the widgets of one subtree to the properties
//! of one model:
//!
//! ```text
//! host: widget initialized ──► walker ──► BindingTable + PropertyRegistry
//! host: click / change / key ──► router ──► model setter ──► command
//! model author: notify_* ──► dispatch ──► WidgetTree pushes
//! ```
//!
//! # Example
//!
//! ```
//! use viewbind_core::{BindingSpec, Value, WidgetArena, WidgetKind};
//! use viewbind_runtime::{Controller, PropertyRegistry, ViewController};
//!
//! #[derive(Default)]
//! struct Greeter {
//!     name: String,
//! }
//!
//! impl Controller for Greeter {
//!     fn properties() -> PropertyRegistry<Self> {
//!         PropertyRegistry::<Self>::builder()
//!             .property("Name", |m| m.name.clone(), |m, v| m.name = v)
//!             .build()
//!     }
//! }
//!
//! let mut arena = WidgetArena::new();
//! let root = arena.add_root("root", WidgetKind::Frame);
//! let label = arena.add_child(root, "name", WidgetKind::Text);
//! arena.bind(label, BindingSpec::new("Name"));
//!
//! let mut vc = ViewController::new(Greeter::default());
//! vc.on_widget_initialized(&mut arena, root);
//! vc.model_mut().name = "Ada".into();
//! vc.notify_property_changed(&mut arena, "Name", true);
//! assert_eq!(arena.value(label), Some(&Value::from("Ada")));
//! ```

pub mod command;
pub mod controller;
mod dispatch;
pub mod error;
pub mod property;
mod router;
pub mod table;
mod walker;

#[cfg(test)]
pub(crate) mod test_support;

pub use command::{CommandArgs, CommandHandle, CommandSlot, CommandTypes, RelayCommand, Resolution};
pub use controller::{Controller, ViewController};
pub use error::{BindError, Result};
pub use property::{PropertyDescriptor, PropertyRegistry, PropertyRegistryBuilder, PropertyType};
pub use table::{BindingDescriptor, BindingTable};
