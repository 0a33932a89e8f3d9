#![forbid(unsafe_code)]

//! Change notification: model to view.
//!
//! # Invariants
//!
//! 1. A change to `name` reaches every live widget bound to `name`, in
//!    registration order, before the controller hook runs.
//! 2. The hook runs once per notified name, whether or not anything is
//!    bound to it.
//! 3. A full refresh (empty name) visits each declared property exactly
//!    once, in declaration order. Command fields hold no value and are
//!    skipped.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Bound widget no longer in the tree | Skipped |
//! | Name not declared | Nothing pushed, hook still runs |
//! | Collection event from an undeclared collection | `error!` logged, `Err(SourceFieldNotFound)` |

use viewbind_core::{CollectionChanged, Value, WidgetId, WidgetTree};

use crate::controller::{Controller, ViewController};
use crate::error::{BindError, Result};
use crate::property::PropertyType;

impl<M: Controller> ViewController<M> {
    /// Push the current value of `name` to every widget bound to it.
    ///
    /// An empty `name` refreshes every declared property. When
    /// `notify_controller` is set, [`Controller::property_changed`] runs
    /// after the push.
    pub fn notify_property_changed(
        &mut self,
        tree: &mut dyn WidgetTree,
        name: &str,
        notify_controller: bool,
    ) {
        if name.is_empty() {
            self.refresh_all(tree, notify_controller);
            return;
        }
        let pushed = self.push_property(tree, name, None);
        tracing::trace!(property = name, widgets = pushed, "property changed");
        if notify_controller {
            self.model.property_changed(name);
        }
    }

    /// [`notify_property_changed`](Self::notify_property_changed) for each
    /// name, in order.
    pub fn notify_properties_changed(
        &mut self,
        tree: &mut dyn WidgetTree,
        names: &[&str],
        notify_controller: bool,
    ) {
        for name in names {
            self.notify_property_changed(tree, name, notify_controller);
        }
    }

    /// Forward a structural change of one of the model's collections to the
    /// widgets bound to it.
    ///
    /// The collection is identified by comparing `change.source` with each
    /// declared collection, in declaration order.
    pub fn notify_collection_changed(
        &mut self,
        tree: &mut dyn WidgetTree,
        change: &CollectionChanged,
    ) -> Result<()> {
        let Some(name) = self
            .properties
            .collection_name(&self.model, change.source)
            .map(str::to_owned)
        else {
            tracing::error!(
                collection = %change.source,
                controller = %self.id(),
                "collection change from an undeclared collection"
            );
            return Err(BindError::SourceFieldNotFound {
                collection: change.source,
                controller: self.id(),
            });
        };

        let mut pushed = 0usize;
        for descriptor in self.bindings.bound_to(&name) {
            let widget = descriptor.widget();
            if tree.contains(widget) {
                tree.push_collection_change(widget, change);
                pushed += 1;
            }
        }
        tracing::trace!(property = %name, widgets = pushed, action = ?change.action, "collection changed");
        self.model.collection_changed(&name, change);
        Ok(())
    }

    fn refresh_all(&mut self, tree: &mut dyn WidgetTree, notify_controller: bool) {
        tracing::debug!(
            properties = self.properties.len(),
            "refreshing every property (expensive)"
        );
        let names: Vec<String> = self
            .properties
            .iter()
            .filter(|d| d.property_type() != PropertyType::Command)
            .map(|d| d.name().to_owned())
            .collect();
        for name in &names {
            self.push_property(tree, name, None);
            if notify_controller {
                self.model.property_changed(name);
            }
        }
    }

    /// Push `name` to its widgets (minus `skip`) and re-push the selection
    /// of widgets selecting into it. Returns how many widgets got a value.
    pub(crate) fn push_property(
        &mut self,
        tree: &mut dyn WidgetTree,
        name: &str,
        skip: Option<WidgetId>,
    ) -> usize {
        let Some(value) = self.read_property(name) else {
            return 0;
        };
        let mut pushed = 0;
        for descriptor in self.bindings.bound_to(name) {
            let widget = descriptor.widget();
            if Some(widget) == skip || !tree.contains(widget) {
                continue;
            }
            tree.push_value(widget, &value);
            pushed += 1;
        }
        for descriptor in self.bindings.selecting(name) {
            let widget = descriptor.widget();
            if Some(widget) != skip && tree.contains(widget) {
                tree.push_selected(widget, &value);
            }
        }
        pushed
    }

    pub(crate) fn read_property(&mut self, name: &str) -> Option<Value> {
        let descriptor = self.properties.resolve(name)?;
        descriptor.read(&self.model)
    }
}
