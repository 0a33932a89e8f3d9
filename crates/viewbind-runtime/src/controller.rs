#![forbid(unsafe_code)]

//! View controllers.
//!
//! A [`ViewController`] owns a model implementing [`Controller`], the
//! model's [`PropertyRegistry`] and a [`BindingTable`]. The host hands it
//! widget lifecycle and input events; the model author calls the
//! `notify_*` methods after mutating the model.
//!
//! The pieces of the controller live in separate modules:
//!
//! | Module | Entry points |
//! |--------|--------------|
//! | `walker` | `on_widget_initialized` |
//! | `dispatch` | `notify_property_changed`, `notify_properties_changed`, `notify_collection_changed` |
//! | `router` | `on_click`, `on_value_changed`, `on_key_press` |
//! | here | construction, `resolve_command`, `set_property`, `on_widget_destroyed` |

use viewbind_core::{CollectionChanged, ControllerId, Value, WidgetId, WidgetTree};

use crate::command::{self, CommandArgs, CommandHandle, CommandTypes, Resolution};
use crate::error::{BindError, Result};
use crate::property::{PropertyRegistry, PropertyType};
use crate::table::{BindingDescriptor, BindingTable};

/// A model that can drive a view.
pub trait Controller: Sized + 'static {
    /// Declare the bindable members. Called once per view controller.
    fn properties() -> PropertyRegistry<Self>;

    /// Hook run after a property change has been pushed to the view.
    fn property_changed(&mut self, _name: &str) {}

    /// Hook run after a collection change has been pushed to the view.
    fn collection_changed(&mut self, _name: &str, _change: &CollectionChanged) {}

    /// Fallback for command names that resolve to no command object.
    ///
    /// Returns whether the event was fully handled. Changed properties can
    /// be announced through [`CommandArgs::notify`].
    fn invoke_method(&mut self, _name: &str, _args: &mut CommandArgs) -> bool {
        false
    }
}

/// Binds one widget subtree to one model.
pub struct ViewController<M: Controller> {
    id: ControllerId,
    pub(crate) model: M,
    pub(crate) properties: PropertyRegistry<M>,
    pub(crate) bindings: BindingTable<M>,
    pub(crate) command_types: CommandTypes<M>,
    pub(crate) root: Option<WidgetId>,
    pub(crate) nested: Vec<ControllerId>,
}

impl<M: Controller> std::fmt::Debug for ViewController<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("properties", &self.properties.len())
            .field("bindings", &self.bindings.len())
            .field("nested", &self.nested)
            .finish()
    }
}

impl<M: Controller> ViewController<M> {
    /// Wrap `model`, declaring its properties.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            id: ControllerId::next(),
            model,
            properties: M::properties(),
            bindings: BindingTable::new(),
            command_types: CommandTypes::new(),
            root: None,
            nested: Vec::new(),
        }
    }

    /// Use `types` to resolve standalone command names.
    #[must_use]
    pub fn with_command_types(mut self, types: CommandTypes<M>) -> Self {
        self.command_types = types;
        self
    }

    pub fn command_types_mut(&mut self) -> &mut CommandTypes<M> {
        &mut self.command_types
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model.
    ///
    /// Changes made here reach the view only once the matching
    /// `notify_*` method is called.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    #[must_use]
    pub fn properties(&self) -> &PropertyRegistry<M> {
        &self.properties
    }

    #[must_use]
    pub fn bindings(&self) -> &BindingTable<M> {
        &self.bindings
    }

    #[must_use]
    pub fn binding(&self, widget: WidgetId) -> Option<&BindingDescriptor<M>> {
        self.bindings.get(widget)
    }

    /// Declared type of `name`, resolving dotted names through scopes.
    pub fn property_type(&mut self, name: &str) -> Option<PropertyType> {
        self.properties.resolve(name).map(|d| d.property_type())
    }

    /// Root widget of the last walk.
    #[must_use]
    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    /// Controllers met (and not descended into) during the last walk.
    #[must_use]
    pub fn nested_controllers(&self) -> &[ControllerId] {
        &self.nested
    }

    /// Parent controller recorded by an enclosing controller's walk.
    #[must_use]
    pub fn parent(&self, tree: &dyn WidgetTree) -> Option<ControllerId> {
        tree.controller_parent(self.id)
    }

    /// Mutate the model and notify the view about `name`.
    pub fn update<R>(
        &mut self,
        tree: &mut dyn WidgetTree,
        name: &str,
        f: impl FnOnce(&mut M) -> R,
    ) -> R {
        let out = f(&mut self.model);
        self.notify_property_changed(tree, name, true);
        out
    }

    /// Write `value` into `name` through its setter and notify the view.
    pub fn set_property(
        &mut self,
        tree: &mut dyn WidgetTree,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let descriptor = self
            .properties
            .resolve(name)
            .ok_or_else(|| BindError::PropertyNotFound(name.to_owned()))?
            .clone();
        descriptor.write(&mut self.model, &value.into())?;
        self.notify_property_changed(tree, name, true);
        Ok(())
    }

    /// Resolve a command name for this controller.
    ///
    /// Commands found on the model are adopted by this controller.
    pub fn resolve_command(&mut self, name: &str) -> Option<CommandHandle<M>> {
        let resolution = command::resolve(
            &mut self.properties,
            &self.command_types,
            &mut self.model,
            name,
        );
        match &resolution {
            Resolution::Field(_) => tracing::debug!(command = name, "command field"),
            Resolution::Initialized(_) => {
                tracing::debug!(command = name, "command field initialized");
            }
            Resolution::Standalone(_) => tracing::debug!(command = name, "standalone command"),
            Resolution::Unresolved => {
                tracing::debug!(command = name, "treated as a controller method");
            }
        }
        if resolution.is_owned()
            && let Some(handle) = resolution.handle()
            && let Ok(mut command) = handle.try_borrow_mut()
        {
            command.set_owner(self.id);
        }
        resolution.into_handle()
    }

    /// Forget the binding of a destroyed widget.
    ///
    /// Returns false if the widget had none.
    pub fn on_widget_destroyed(&mut self, widget: WidgetId) -> bool {
        let removed = self.bindings.remove(widget).is_some();
        if removed {
            tracing::trace!(%widget, "binding dropped");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RelayCommand;
    use crate::test_support::{Counter, Reset};
    use viewbind_core::{BindingSpec, WidgetArena, WidgetKind};

    #[test]
    fn controllers_get_distinct_ids() {
        let a = ViewController::new(Counter::default());
        let b = ViewController::new(Counter::default());
        assert_ne!(a.id(), b.id());
        assert!(a.root().is_none());
    }

    #[test]
    fn owned_commands_learn_their_owner() {
        let mut vc = ViewController::new(Counter::default());
        let handle = vc.resolve_command("ResetCmd").unwrap();
        assert_eq!(handle.borrow().owner(), Some(vc.id()));
        let stored = vc.model().reset.clone().unwrap();
        assert_eq!(stored.borrow().owner(), Some(vc.id()));
    }

    #[test]
    fn unknown_command_resolves_to_none() {
        let mut vc = ViewController::new(Counter::default());
        assert!(vc.resolve_command("Count").is_none());
        assert!(vc.resolve_command("Missing").is_none());
    }

    #[test]
    fn set_property_converts_and_pushes() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let label = arena.add_child(root, "label", WidgetKind::Text);
        arena.bind(label, BindingSpec::new("Count"));

        let mut vc = ViewController::new(Counter::default());
        vc.on_widget_initialized(&mut arena, root);
        vc.set_property(&mut arena, "Count", "7").unwrap();
        assert_eq!(vc.model().count, 7);
        assert_eq!(arena.value(label), Some(&Value::Int(7)));
        assert_eq!(vc.model().changed, ["Count"]);
    }

    #[test]
    fn set_property_errors() {
        let mut arena = WidgetArena::new();
        let mut vc = ViewController::new(Counter::default());
        assert_eq!(
            vc.set_property(&mut arena, "Nope", 1),
            Err(BindError::PropertyNotFound("Nope".into()))
        );
        assert_eq!(
            vc.set_property(&mut arena, "Status", "x"),
            Err(BindError::ReadOnly("Status".into()))
        );
        assert!(vc.model().changed.is_empty());
    }

    #[test]
    fn update_runs_closure_then_notifies() {
        let mut arena = WidgetArena::new();
        let mut vc = ViewController::new(Counter::default());
        let previous = vc.update(&mut arena, "Count", |m| std::mem::replace(&mut m.count, 3));
        assert_eq!(previous, 0);
        assert_eq!(vc.model().changed, ["Count"]);
    }

    #[test]
    fn destroyed_widget_loses_its_binding() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let label = arena.add_child(root, "label", WidgetKind::Text);
        arena.bind(label, BindingSpec::new("Count"));
        let mut vc = ViewController::new(Counter::default());
        vc.on_widget_initialized(&mut arena, root);

        assert!(vc.on_widget_destroyed(label));
        assert!(!vc.on_widget_destroyed(label));
        assert!(vc.binding(label).is_none());
    }

    #[test]
    fn property_type_resolves_names() {
        let mut vc = ViewController::new(Counter::default());
        assert_eq!(vc.property_type("Items"), Some(PropertyType::Collection));
        assert_eq!(vc.property_type("ResetCmd"), Some(PropertyType::Command));
        assert_eq!(vc.property_type("Nope"), None);
    }

    #[test]
    fn reset_default_has_no_owner() {
        assert_eq!(Reset::default().owner(), None);
    }
}
