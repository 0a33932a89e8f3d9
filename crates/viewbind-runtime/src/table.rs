#![forbid(unsafe_code)]

//! The binding table: which widget shows which property.
//!
//! Two indices over the same descriptors:
//!
//! - by widget, for routing input from a widget to its binding;
//! - by property name, for fanning a change out to every bound widget.
//!
//! # Invariants
//!
//! 1. A widget has at most one descriptor. Inserting for a widget that
//!    already has one replaces it in both indices.
//! 2. A property name lists its widgets in registration order.
//! 3. A descriptor with an empty property name is reachable by widget only.
//! 4. Every widget listed under a name has a descriptor bound to that name.

use std::fmt;

use ahash::AHashMap;
use viewbind_core::{BindingSpec, EventKind, WidgetId};

use crate::command::CommandHandle;
use crate::error::{BindError, Result};
use crate::property::PropertyType;

/// One widget's binding, resolved against its controller.
pub struct BindingDescriptor<M> {
    widget: WidgetId,
    binding_name: String,
    selected_item: Option<String>,
    command_name: Option<String>,
    property_type: Option<PropertyType>,
    selected_type: Option<PropertyType>,
    command: Option<CommandHandle<M>>,
    trigger: Option<EventKind>,
}

impl<M> Clone for BindingDescriptor<M> {
    fn clone(&self) -> Self {
        Self {
            widget: self.widget,
            binding_name: self.binding_name.clone(),
            selected_item: self.selected_item.clone(),
            command_name: self.command_name.clone(),
            property_type: self.property_type,
            selected_type: self.selected_type,
            command: self.command.clone(),
            trigger: self.trigger,
        }
    }
}

impl<M> fmt::Debug for BindingDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingDescriptor")
            .field("widget", &self.widget)
            .field("binding_name", &self.binding_name)
            .field("selected_item", &self.selected_item)
            .field("command_name", &self.command_name)
            .field("property_type", &self.property_type)
            .field("selected_type", &self.selected_type)
            .field("command", &self.command.is_some())
            .field("trigger", &self.trigger)
            .finish()
    }
}

impl<M> BindingDescriptor<M> {
    /// Unresolved descriptor for `widget`, taken from its binding spec.
    #[must_use]
    pub fn new(widget: WidgetId, spec: &BindingSpec) -> Self {
        Self {
            widget,
            binding_name: spec.binding_name.clone(),
            selected_item: spec.selected_item.clone().filter(|s| !s.is_empty()),
            command_name: spec.command_name().map(str::to_owned),
            property_type: None,
            selected_type: None,
            command: None,
            trigger: spec.trigger,
        }
    }

    #[must_use]
    pub(crate) fn with_types(
        mut self,
        property_type: Option<PropertyType>,
        selected_type: Option<PropertyType>,
    ) -> Self {
        self.property_type = property_type;
        self.selected_type = selected_type;
        self
    }

    #[must_use]
    pub(crate) fn with_command(
        mut self,
        command: Option<CommandHandle<M>>,
        trigger: Option<EventKind>,
    ) -> Self {
        self.command = command;
        self.trigger = trigger;
        self
    }

    #[inline]
    #[must_use]
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// Bound property name; empty for command-only widgets.
    #[must_use]
    pub fn binding_name(&self) -> &str {
        &self.binding_name
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&str> {
        self.selected_item.as_deref()
    }

    #[must_use]
    pub fn command_name(&self) -> Option<&str> {
        self.command_name.as_deref()
    }

    /// Declared type of the bound property, if the controller declares it.
    #[must_use]
    pub fn property_type(&self) -> Option<PropertyType> {
        self.property_type
    }

    #[must_use]
    pub fn selected_type(&self) -> Option<PropertyType> {
        self.selected_type
    }

    /// Resolved command, if any.
    #[must_use]
    pub fn command(&self) -> Option<&CommandHandle<M>> {
        self.command.as_ref()
    }

    /// Event kind that fires the command.
    #[must_use]
    pub fn trigger(&self) -> Option<EventKind> {
        self.trigger
    }
}

/// Widget and property-name indices over binding descriptors.
pub struct BindingTable<M> {
    by_widget: AHashMap<WidgetId, BindingDescriptor<M>>,
    by_property: AHashMap<String, Vec<WidgetId>>,
    order: Vec<WidgetId>,
}

impl<M> Default for BindingTable<M> {
    fn default() -> Self {
        Self {
            by_widget: AHashMap::new(),
            by_property: AHashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<M> fmt::Debug for BindingTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<M> BindingTable<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `descriptor`, returning the one it replaces for the same widget.
    pub fn insert(&mut self, descriptor: BindingDescriptor<M>) -> Option<BindingDescriptor<M>> {
        let widget = descriptor.widget;
        let previous = self.remove(widget);
        if !descriptor.binding_name.is_empty() {
            self.by_property
                .entry(descriptor.binding_name.clone())
                .or_default()
                .push(widget);
        }
        self.order.push(widget);
        self.by_widget.insert(widget, descriptor);
        previous
    }

    /// Drop the descriptor of `widget` from both indices.
    pub fn remove(&mut self, widget: WidgetId) -> Option<BindingDescriptor<M>> {
        let descriptor = self.by_widget.remove(&widget)?;
        self.order.retain(|w| *w != widget);
        if let Some(widgets) = self.by_property.get_mut(&descriptor.binding_name) {
            widgets.retain(|w| *w != widget);
            if widgets.is_empty() {
                self.by_property.remove(&descriptor.binding_name);
            }
        }
        Some(descriptor)
    }

    /// Keep only the descriptors whose widget satisfies `keep`.
    ///
    /// Returns how many descriptors were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(WidgetId) -> bool) -> usize {
        let stale: Vec<WidgetId> = self.order.iter().copied().filter(|&w| !keep(w)).collect();
        for &widget in &stale {
            self.remove(widget);
        }
        stale.len()
    }

    #[must_use]
    pub fn get(&self, widget: WidgetId) -> Option<&BindingDescriptor<M>> {
        self.by_widget.get(&widget)
    }

    /// Like [`get`](Self::get), but a miss is a [`BindError::BindingNotFound`].
    pub fn require(&self, widget: WidgetId) -> Result<&BindingDescriptor<M>> {
        self.get(widget).ok_or(BindError::BindingNotFound(widget))
    }

    /// Widgets bound to `name`, in registration order.
    #[must_use]
    pub fn widgets_for(&self, name: &str) -> &[WidgetId] {
        self.by_property.get(name).map_or(&[], Vec::as_slice)
    }

    /// Descriptors bound to `name`, in registration order.
    pub fn bound_to<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a BindingDescriptor<M>> + use<'a, M> {
        self.widgets_for(name)
            .iter()
            .filter_map(|w| self.by_widget.get(w))
    }

    /// Descriptors whose selected item is `name`, in registration order.
    pub fn selecting<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a BindingDescriptor<M>> {
        self.iter().filter(move |d| d.selected_item() == Some(name))
    }

    /// All descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &BindingDescriptor<M>> {
        self.order.iter().filter_map(|w| self.by_widget.get(w))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_widget.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_widget.is_empty()
    }

    /// Check that both indices describe the same set of bindings.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let listed: usize = self.by_property.values().map(Vec::len).sum();
        let named = self
            .by_widget
            .values()
            .filter(|d| !d.binding_name.is_empty())
            .count();
        listed == named
            && self.order.len() == self.by_widget.len()
            && self.by_property.iter().all(|(name, widgets)| {
                !widgets.is_empty()
                    && widgets
                        .iter()
                        .all(|w| self.by_widget.get(w).is_some_and(|d| &d.binding_name == name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Counter;

    fn descriptor(widget: u32, name: &str) -> BindingDescriptor<Counter> {
        BindingDescriptor::new(WidgetId::new(widget), &BindingSpec::new(name))
    }

    #[test]
    fn fan_out_keeps_registration_order() {
        let mut table = BindingTable::new();
        table.insert(descriptor(3, "Status"));
        table.insert(descriptor(1, "Status"));
        table.insert(descriptor(2, "Count"));
        assert_eq!(
            table.widgets_for("Status"),
            [WidgetId::new(3), WidgetId::new(1)]
        );
        assert_eq!(table.bound_to("Count").count(), 1);
        assert_eq!(table.bound_to("Missing").count(), 0);
    }

    #[test]
    fn retain_drops_from_both_indices() {
        let mut table = BindingTable::new();
        table.insert(descriptor(1, "Status"));
        table.insert(descriptor(2, "Status"));
        table.insert(descriptor(3, "Count"));
        let dropped = table.retain(|w| w == WidgetId::new(2));
        assert_eq!(dropped, 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.widgets_for("Status"), [WidgetId::new(2)]);
        assert!(table.widgets_for("Count").is_empty());
        assert!(table.is_consistent());
    }

    #[test]
    fn rebinding_a_widget_replaces_it_everywhere() {
        let mut table = BindingTable::new();
        table.insert(descriptor(1, "Count"));
        let old = table.insert(descriptor(1, "Status")).unwrap();
        assert_eq!(old.binding_name(), "Count");
        assert_eq!(table.len(), 1);
        assert!(table.widgets_for("Count").is_empty());
        assert_eq!(table.widgets_for("Status"), [WidgetId::new(1)]);
        assert!(table.is_consistent());
    }

    #[test]
    fn command_only_descriptor_is_reachable_by_widget_only() {
        let mut table = BindingTable::<Counter>::new();
        let spec = BindingSpec::command_only("SubmitCmd");
        table.insert(BindingDescriptor::new(WidgetId::new(5), &spec));
        assert!(table.widgets_for("").is_empty());
        let d = table.require(WidgetId::new(5)).unwrap();
        assert_eq!(d.command_name(), Some("SubmitCmd"));
        assert!(table.is_consistent());
    }

    #[test]
    fn require_reports_missing_widget() {
        let table = BindingTable::<Counter>::new();
        assert_eq!(
            table.require(WidgetId::new(9)).unwrap_err(),
            BindError::BindingNotFound(WidgetId::new(9))
        );
    }

    #[test]
    fn selecting_finds_selected_item_bindings() {
        let mut table = BindingTable::<Counter>::new();
        let spec = BindingSpec::new("Items").with_selected_item("Selected");
        table.insert(BindingDescriptor::new(WidgetId::new(1), &spec));
        table.insert(descriptor(2, "Selected"));
        let hits: Vec<_> = table.selecting("Selected").map(|d| d.widget()).collect();
        assert_eq!(hits, [WidgetId::new(1)]);
    }

    #[test]
    fn empty_selected_item_is_ignored() {
        let spec = BindingSpec::new("Items").with_selected_item("");
        let d = BindingDescriptor::<Counter>::new(WidgetId::new(1), &spec);
        assert_eq!(d.selected_item(), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(u32, usize),
            Remove(u32),
        }

        const NAMES: [&str; 4] = ["", "Count", "Status", "Items"];

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => (0u32..12, 0usize..NAMES.len()).prop_map(|(w, n)| Op::Insert(w, n)),
                1 => (0u32..12).prop_map(Op::Remove),
            ]
        }

        proptest! {
            #[test]
            fn indices_stay_consistent(ops in prop::collection::vec(op(), 0..64)) {
                let mut table = BindingTable::<Counter>::new();
                let mut expected: std::collections::BTreeMap<u32, &str> = Default::default();
                for op in ops {
                    match op {
                        Op::Insert(w, n) => {
                            table.insert(descriptor(w, NAMES[n]));
                            expected.insert(w, NAMES[n]);
                        }
                        Op::Remove(w) => {
                            let removed = table.remove(WidgetId::new(w)).is_some();
                            prop_assert_eq!(removed, expected.remove(&w).is_some());
                        }
                    }
                    prop_assert!(table.is_consistent());
                }
                prop_assert_eq!(table.len(), expected.len());
                for (w, name) in &expected {
                    let d = table.get(WidgetId::new(*w)).unwrap();
                    prop_assert_eq!(d.binding_name(), *name);
                }
                for name in NAMES.iter().filter(|n| !n.is_empty()) {
                    let bound = table.bound_to(name).count();
                    let want = expected.values().filter(|n| *n == name).count();
                    prop_assert_eq!(bound, want);
                }
            }
        }
    }
}
