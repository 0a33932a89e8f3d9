#![forbid(unsafe_code)]

//! Building the binding table from a widget subtree.
//!
//! # Traversal
//!
//! Depth-first, document order, every node of the subtree exactly once.
//! Siblings are walked with a loop, so a wide row of widgets costs no stack.
//! The root's own siblings are never visited.
//!
//! | Attachment | Action | Descend |
//! |------------|--------|---------|
//! | binding spec | register a descriptor, push the initial value | yes |
//! | another controller | record the parent link | no |
//! | this controller, or none | nothing | yes |
//!
//! A nested controller owns its subtree: it walks it itself when the host
//! initializes it, so bindings inside it never land in this table.
//!
//! After a walk the table holds exactly the bindings the walk reached.
//! Descriptors of widgets that were removed, rebound elsewhere or mounted
//! under a nested controller since the previous walk are dropped.

use ahash::AHashSet;
use viewbind_core::{Attachment, BindingSpec, WidgetId, WidgetTree};

use crate::controller::{Controller, ViewController};
use crate::table::BindingDescriptor;

impl<M: Controller> ViewController<M> {
    /// Walk the subtree under `root`, registering every binding in it.
    ///
    /// Returns the number of descriptors held afterwards. Walking again
    /// re-registers every reached widget and forgets the ones not reached.
    pub fn on_widget_initialized(&mut self, tree: &mut dyn WidgetTree, root: WidgetId) -> usize {
        let _span = tracing::debug_span!(
            "bind_subtree",
            controller = %self.id(),
            root = %root,
            widget = tree.name(root)
        )
        .entered();

        self.root = Some(root);
        self.nested.clear();
        let mut reached = AHashSet::new();
        self.visit(tree, root, &mut reached);

        let dropped = self.bindings.retain(|widget| reached.contains(&widget));
        if dropped > 0 {
            tracing::debug!(dropped, "stale bindings dropped");
        }
        let count = self.bindings.len();
        tracing::debug!(
            bindings = count,
            properties = self.properties.len(),
            nested = self.nested.len(),
            "subtree bound"
        );
        count
    }

    fn visit(&mut self, tree: &mut dyn WidgetTree, node: WidgetId, reached: &mut AHashSet<WidgetId>) {
        match tree.attachment(node).cloned() {
            Some(Attachment::Binding(spec)) => {
                reached.insert(node);
                self.register_binding(tree, node, &spec);
            }
            Some(Attachment::Controller(child)) if child != self.id() => {
                tree.set_controller_parent(child, self.id());
                self.nested.push(child);
                tracing::trace!(widget = %node, nested = %child, "nested controller");
                return;
            }
            _ => {}
        }

        let mut cursor = tree.first_child(node);
        while let Some(child) = cursor {
            self.visit(tree, child, reached);
            cursor = tree.next_sibling(child);
        }
    }

    fn register_binding(&mut self, tree: &mut dyn WidgetTree, widget: WidgetId, spec: &BindingSpec) {
        let property_type = self.property_type(&spec.binding_name);
        let selected_type = match spec.selected_item.as_deref() {
            Some(name) if !name.is_empty() => self.property_type(name),
            _ => None,
        };
        if property_type.is_none() && !spec.binding_name.is_empty() {
            tracing::debug!(
                %widget,
                property = %spec.binding_name,
                "binding to undeclared property"
            );
        }

        let command = spec.command_name().and_then(|name| self.resolve_command(name));
        let trigger = command
            .as_ref()
            .and_then(|c| c.borrow().trigger())
            .or(spec.trigger)
            .or_else(|| tree.kind(widget).default_trigger());

        let descriptor = BindingDescriptor::new(widget, spec)
            .with_types(property_type, selected_type)
            .with_command(command, trigger);
        if self.bindings.insert(descriptor).is_some() {
            tracing::trace!(%widget, "binding replaced");
        }
        tracing::trace!(
            %widget,
            property = %spec.binding_name,
            command = spec.command_name().unwrap_or_default(),
            "binding registered"
        );

        if let Some(value) = self.read_property(&spec.binding_name) {
            tree.push_value(widget, &value);
        }
        if let Some(name) = spec.selected_item.as_deref()
            && let Some(value) = self.read_property(name)
        {
            tree.push_selected(widget, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Counter, Settings};
    use viewbind_core::{ControllerId, EventKind, Value, WidgetArena, WidgetKind};

    #[test]
    fn registers_bindings_and_pushes_initial_values() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let label = arena.add_child(root, "label", WidgetKind::Text);
        let status_a = arena.add_child(root, "status_a", WidgetKind::Text);
        let status_b = arena.add_child(label, "status_b", WidgetKind::Text);
        arena.bind(label, BindingSpec::new("Count"));
        arena.bind(status_a, BindingSpec::new("Status"));
        arena.bind(status_b, BindingSpec::new("Status"));

        let model = Counter {
            count: 5,
            status: "ready".into(),
            ..Counter::default()
        };
        let mut vc = ViewController::new(model);
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 3);

        assert_eq!(arena.value(label), Some(&Value::Int(5)));
        assert_eq!(arena.value(status_a), Some(&Value::from("ready")));
        assert_eq!(arena.value(status_b), Some(&Value::from("ready")));
        // Document order: label, then its child, then the sibling.
        assert_eq!(vc.bindings().widgets_for("Status"), [status_b, status_a]);
        // Registration does not run controller hooks.
        assert!(vc.model().changed.is_empty());
    }

    #[test]
    fn nested_controller_subtree_is_skipped() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let host = arena.add_child(root, "child_host", WidgetKind::Frame);
        let inner = arena.add_child(host, "inner", WidgetKind::Text);
        let after = arena.add_child(root, "after", WidgetKind::Text);
        arena.bind(inner, BindingSpec::new("Count"));
        arena.bind(after, BindingSpec::new("Count"));

        let child_id = ControllerId::next();
        arena.host_controller(host, child_id);

        let mut vc = ViewController::new(Counter::default());
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 1);
        assert!(vc.binding(inner).is_none());
        assert!(vc.binding(after).is_some());
        assert_eq!(vc.nested_controllers(), [child_id]);
        assert_eq!(arena.controller_parent(child_id), Some(vc.id()));
        assert_eq!(arena.revision(inner), 0);
    }

    #[test]
    fn own_controller_attachment_is_descended() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let label = arena.add_child(root, "label", WidgetKind::Text);
        arena.bind(label, BindingSpec::new("Count"));

        let mut vc = ViewController::new(Counter::default());
        arena.host_controller(root, vc.id());
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 1);
        assert!(vc.nested_controllers().is_empty());
        assert_eq!(arena.controller_parent(vc.id()), None);
    }

    #[test]
    fn root_siblings_are_not_visited() {
        let mut arena = WidgetArena::new();
        let top = arena.add_root("top", WidgetKind::Frame);
        let panel = arena.add_child(top, "panel", WidgetKind::Frame);
        let sibling = arena.add_child(top, "sibling", WidgetKind::Text);
        arena.bind(sibling, BindingSpec::new("Count"));

        let mut vc = ViewController::new(Counter::default());
        assert_eq!(vc.on_widget_initialized(&mut arena, panel), 0);
        assert_eq!(arena.revision(sibling), 0);
    }

    #[test]
    fn bound_root_is_registered() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Text);
        arena.bind(root, BindingSpec::new("Count"));
        let mut vc = ViewController::new(Counter::default());
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 1);
    }

    #[test]
    fn rewalking_is_idempotent() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        for i in 0..4 {
            let w = arena.add_child(root, format!("w{i}"), WidgetKind::Text);
            arena.bind(w, BindingSpec::new("Status"));
        }
        let mut vc = ViewController::new(Counter::default());
        let first = vc.on_widget_initialized(&mut arena, root);
        let order: Vec<_> = vc.bindings().widgets_for("Status").to_vec();
        let second = vc.on_widget_initialized(&mut arena, root);
        assert_eq!(first, second);
        assert_eq!(vc.bindings().widgets_for("Status"), order.as_slice());
        assert!(vc.bindings().is_consistent());
    }

    #[test]
    fn rewalk_forgets_subtree_of_newly_mounted_controller() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let host = arena.add_child(root, "host", WidgetKind::Frame);
        let inner = arena.add_child(host, "inner", WidgetKind::Text);
        arena.bind(inner, BindingSpec::new("Count"));

        let mut vc = ViewController::new(Counter::default());
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 1);

        arena.host_controller(host, ControllerId::next());
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 0);
        assert!(vc.binding(inner).is_none());
        assert!(vc.bindings().is_consistent());

        let before = arena.revision(inner);
        vc.model_mut().count = 9;
        vc.notify_property_changed(&mut arena, "Count", false);
        assert_eq!(arena.revision(inner), before);
        assert_eq!(arena.value(inner), Some(&Value::Int(0)));
    }

    #[test]
    fn rewalk_forgets_removed_widgets() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let label = arena.add_child(root, "label", WidgetKind::Text);
        arena.bind(label, BindingSpec::new("Count"));

        let mut vc = ViewController::new(Counter::default());
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 1);
        assert!(arena.remove(label));
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 0);
        assert!(vc.bindings().widgets_for("Count").is_empty());
    }

    #[test]
    fn triggers_follow_command_then_spec_then_widget_kind() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let button = arena.add_child(root, "button", WidgetKind::Button);
        let check = arena.add_child(root, "check", WidgetKind::CheckBox);
        let edit = arena.add_child(root, "edit", WidgetKind::EditBox);
        let keyed = arena.add_child(root, "keyed", WidgetKind::Button);
        arena.bind(button, BindingSpec::command_only("ResetCmd"));
        arena.bind(check, BindingSpec::command_only("OnToggle"));
        arena.bind(edit, BindingSpec::new("Status"));
        arena.bind(
            keyed,
            BindingSpec::command_only("OnKey").with_trigger(EventKind::KeyPress),
        );

        let mut vc = ViewController::new(Counter::default());
        vc.on_widget_initialized(&mut arena, root);
        assert_eq!(vc.binding(button).unwrap().trigger(), Some(EventKind::Click));
        assert_eq!(vc.binding(check).unwrap().trigger(), Some(EventKind::Change));
        assert_eq!(vc.binding(edit).unwrap().trigger(), None);
        assert_eq!(vc.binding(keyed).unwrap().trigger(), Some(EventKind::KeyPress));
        assert!(vc.binding(button).unwrap().command().is_some());
        assert!(vc.binding(check).unwrap().command().is_none());
    }

    #[test]
    fn selected_item_is_pushed_and_typed() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let list = arena.add_child(root, "list", WidgetKind::List);
        arena.bind(list, BindingSpec::new("Items").with_selected_item("Selected"));

        let mut model = Counter {
            selected: "b".into(),
            ..Counter::default()
        };
        let _ = model.items.push("a".to_string());
        let _ = model.items.push("b".to_string());
        let mut vc = ViewController::new(model);
        vc.on_widget_initialized(&mut arena, root);

        assert_eq!(arena.items(list), [Value::from("a"), Value::from("b")]);
        assert_eq!(arena.selected(list), Some(&Value::from("b")));
        let d = vc.binding(list).unwrap();
        assert_eq!(d.property_type(), Some(crate::PropertyType::Collection));
        assert_eq!(
            d.selected_type(),
            Some(crate::PropertyType::Value(viewbind_core::ValueType::Text))
        );
    }

    #[test]
    fn dotted_bindings_extend_the_registry() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let slider = arena.add_child(root, "volume", WidgetKind::Slider);
        arena.bind(slider, BindingSpec::new("audio.volume"));

        let mut vc = ViewController::new(Settings::default());
        let before = vc.properties().len();
        vc.on_widget_initialized(&mut arena, root);
        assert_eq!(vc.properties().len(), before + 1);
        assert_eq!(arena.value(slider), Some(&Value::Float(0.8)));
    }

    #[test]
    fn undeclared_property_binding_is_kept_without_type() {
        let mut arena = WidgetArena::new();
        let root = arena.add_root("root", WidgetKind::Frame);
        let label = arena.add_child(root, "label", WidgetKind::Text);
        arena.bind(label, BindingSpec::new("Nope"));
        let mut vc = ViewController::new(Counter::default());
        assert_eq!(vc.on_widget_initialized(&mut arena, root), 1);
        assert_eq!(vc.binding(label).unwrap().property_type(), None);
        assert_eq!(arena.revision(label), 0);
    }
}
