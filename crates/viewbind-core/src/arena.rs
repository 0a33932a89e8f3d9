#![forbid(unsafe_code)]

//! In-memory widget registry implementing [`WidgetTree`].
//!
//! `WidgetArena` is the reference host: headless tools and tests build a
//! widget hierarchy in it, attach bindings and controllers, and let view
//! controllers drive it exactly as they would drive a real toolkit.
//!
//! # Invariants
//!
//! - Widget IDs are slot indices and are never reused.
//! - Children are kept in insertion (document) order.
//! - Removed widgets (and their descendants) stay in the slot table but
//!   report `contains() == false`; navigation skips them and pushes to them
//!   are ignored.
//!
//! # Failure Modes
//!
//! - `add_child()` with an unknown or removed parent panics.
//! - Every other method tolerates unknown IDs.
//!
//! # Example
//!
//! ```
//! use viewbind_core::{BindingSpec, WidgetArena, WidgetKind};
//!
//! let mut arena = WidgetArena::new();
//! let root = arena.add_root("root", WidgetKind::Frame);
//! let label = arena.add_child(root, "count_label", WidgetKind::Text);
//! arena.bind(label, BindingSpec::new("Count"));
//! assert_eq!(arena.children(root), vec![label]);
//! ```

use ahash::AHashMap;

use crate::attach::{Attachment, BindingSpec, ControllerId};
use crate::collection::{CollectionChanged, apply_action};
use crate::tree::WidgetTree;
use crate::value::Value;
use crate::widget::{WidgetId, WidgetKind};

#[derive(Debug, Clone)]
struct WidgetNode {
    name: String,
    kind: WidgetKind,
    parent: Option<WidgetId>,
    first_child: Option<WidgetId>,
    last_child: Option<WidgetId>,
    next_sibling: Option<WidgetId>,
    attachment: Option<Attachment>,
    value: Value,
    selected: Value,
    items: Vec<Value>,
    /// Number of pushes received from controllers.
    revision: u64,
    alive: bool,
}

impl WidgetNode {
    fn new(name: String, kind: WidgetKind, parent: Option<WidgetId>) -> Self {
        Self {
            name,
            kind,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            attachment: None,
            value: Value::None,
            selected: Value::None,
            items: Vec::new(),
            revision: 0,
            alive: true,
        }
    }
}

/// Slot-table widget hierarchy.
#[derive(Debug, Clone, Default)]
pub struct WidgetArena {
    nodes: Vec<WidgetNode>,
    controller_parents: AHashMap<ControllerId, ControllerId>,
}

impl WidgetArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id.index()).filter(|n| n.alive)
    }

    fn node_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id.index()).filter(|n| n.alive)
    }

    fn alloc(&mut self, node: WidgetNode) -> WidgetId {
        let raw = u32::try_from(self.nodes.len()).expect("widget arena exhausted");
        self.nodes.push(node);
        WidgetId::new(raw)
    }

    /// Add a parentless widget.
    ///
    /// # Panics
    ///
    /// Panics once `u32::MAX` widget slots have been allocated.
    pub fn add_root(&mut self, name: impl Into<String>, kind: WidgetKind) -> WidgetId {
        self.alloc(WidgetNode::new(name.into(), kind, None))
    }

    /// Append a widget as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live widget of this arena.
    pub fn add_child(
        &mut self,
        parent: WidgetId,
        name: impl Into<String>,
        kind: WidgetKind,
    ) -> WidgetId {
        assert!(
            self.node(parent).is_some(),
            "add_child requires a live parent widget"
        );
        let id = self.alloc(WidgetNode::new(name.into(), kind, Some(parent)));
        let previous_last = self.nodes[parent.index()].last_child.replace(id);
        match previous_last {
            Some(last) => self.nodes[last.index()].next_sibling = Some(id),
            None => self.nodes[parent.index()].first_child = Some(id),
        }
        id
    }

    /// Attach a script object, returning the one it replaces.
    pub fn attach(&mut self, id: WidgetId, attachment: impl Into<Attachment>) -> Option<Attachment> {
        self.node_mut(id)?.attachment.replace(attachment.into())
    }

    /// Attach a binding spec.
    pub fn bind(&mut self, id: WidgetId, spec: BindingSpec) -> Option<Attachment> {
        self.attach(id, spec)
    }

    /// Mark `id` as the root of the given controller's view.
    pub fn host_controller(&mut self, id: WidgetId, controller: ControllerId) -> Option<Attachment> {
        self.attach(id, controller)
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Returns false if `id` was not live.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let parent = node.parent;
        let next = node.next_sibling;

        if let Some(parent) = parent {
            let mut prev = None;
            let mut cursor = self.nodes[parent.index()].first_child;
            while let Some(current) = cursor {
                if current == id {
                    break;
                }
                prev = Some(current);
                cursor = self.nodes[current.index()].next_sibling;
            }
            match prev {
                Some(prev) => self.nodes[prev.index()].next_sibling = next,
                None => self.nodes[parent.index()].first_child = next,
            }
            if self.nodes[parent.index()].last_child == Some(id) {
                self.nodes[parent.index()].last_child = prev;
            }
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.index()];
            node.alive = false;
            let mut child = node.first_child;
            while let Some(c) = child {
                stack.push(c);
                child = self.nodes[c.index()].next_sibling;
            }
        }
        true
    }

    /// Live children of `id`, in document order.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut cursor = self.first_child(id);
        while let Some(child) = cursor {
            out.push(child);
            cursor = self.next_sibling(child);
        }
        out
    }

    /// Parent widget of `id`.
    #[must_use]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.node(id)?.parent
    }

    /// Current widget value.
    #[must_use]
    pub fn value(&self, id: WidgetId) -> Option<&Value> {
        self.node(id).map(|n| &n.value)
    }

    /// Simulate user input: change the widget value without counting a push.
    pub fn set_value(&mut self, id: WidgetId, value: impl Into<Value>) {
        if let Some(node) = self.node_mut(id) {
            node.value = value.into();
        }
    }

    /// Current selection.
    #[must_use]
    pub fn selected(&self, id: WidgetId) -> Option<&Value> {
        self.node(id).map(|n| &n.selected)
    }

    /// Simulate user selection.
    pub fn set_selected(&mut self, id: WidgetId, value: impl Into<Value>) {
        if let Some(node) = self.node_mut(id) {
            node.selected = value.into();
        }
    }

    /// Row values of a list-like widget.
    #[must_use]
    pub fn items(&self, id: WidgetId) -> &[Value] {
        self.node(id).map_or(&[], |n| n.items.as_slice())
    }

    /// How many pushes the widget received from controllers.
    #[must_use]
    pub fn revision(&self, id: WidgetId) -> u64 {
        self.node(id).map_or(0, |n| n.revision)
    }

    /// Number of widget slots ever allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl WidgetTree for WidgetArena {
    fn first_child(&self, id: WidgetId) -> Option<WidgetId> {
        self.node(id)?.first_child
    }

    fn next_sibling(&self, id: WidgetId) -> Option<WidgetId> {
        self.node(id)?.next_sibling
    }

    fn attachment(&self, id: WidgetId) -> Option<&Attachment> {
        self.node(id)?.attachment.as_ref()
    }

    fn kind(&self, id: WidgetId) -> WidgetKind {
        self.node(id).map(|n| n.kind).unwrap_or_default()
    }

    fn name(&self, id: WidgetId) -> &str {
        self.nodes.get(id.index()).map_or("<unknown>", |n| n.name.as_str())
    }

    fn contains(&self, id: WidgetId) -> bool {
        self.node(id).is_some()
    }

    fn push_value(&mut self, id: WidgetId, value: &Value) {
        if let Some(node) = self.node_mut(id) {
            match value {
                Value::List(items) => node.items.clone_from(items),
                _ => node.items.clear(),
            }
            node.value = value.clone();
            node.revision += 1;
        }
    }

    fn push_selected(&mut self, id: WidgetId, value: &Value) {
        if let Some(node) = self.node_mut(id) {
            node.selected = value.clone();
            node.revision += 1;
        }
    }

    fn push_collection_change(&mut self, id: WidgetId, change: &CollectionChanged) {
        if let Some(node) = self.node_mut(id) {
            apply_action(&mut node.items, &change.action);
            node.revision += 1;
        }
    }

    fn read_value(&self, id: WidgetId) -> Option<Value> {
        self.node(id).map(|n| n.value.clone())
    }

    fn read_selected(&self, id: WidgetId) -> Option<Value> {
        self.node(id).map(|n| n.selected.clone())
    }

    fn set_controller_parent(&mut self, child: ControllerId, parent: ControllerId) {
        self.controller_parents.insert(child, parent);
    }

    fn controller_parent(&self, child: ControllerId) -> Option<ControllerId> {
        self.controller_parents.get(&child).copied()
    }
}
