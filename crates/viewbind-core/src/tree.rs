#![forbid(unsafe_code)]

//! The host widget-tree contract.
//!
//! The binding engine never owns widgets. Everything it needs from the host
//! (tree navigation, attached script objects, reading and writing widget
//! state, linking nested controllers) goes through [`WidgetTree`].
//!
//! # Contract
//!
//! - The structure reachable through `first_child`/`next_sibling` is a tree;
//!   cycles are not detected.
//! - Methods taking a [`WidgetId`] the host no longer knows must not panic:
//!   navigation returns `None`, pushes are ignored.

use crate::attach::{Attachment, ControllerId};
use crate::collection::CollectionChanged;
use crate::value::Value;
use crate::widget::{WidgetId, WidgetKind};

/// Host-side widget registry consumed by view controllers.
pub trait WidgetTree {
    /// First child of `id`, in document order.
    fn first_child(&self, id: WidgetId) -> Option<WidgetId>;

    /// Next sibling of `id`, in document order.
    fn next_sibling(&self, id: WidgetId) -> Option<WidgetId>;

    /// Script object attached to `id`, if any.
    fn attachment(&self, id: WidgetId) -> Option<&Attachment>;

    /// Host subtype of `id`.
    fn kind(&self, id: WidgetId) -> WidgetKind;

    /// Human-readable widget name, used in logs.
    fn name(&self, id: WidgetId) -> &str;

    /// Whether `id` still refers to a live widget.
    fn contains(&self, id: WidgetId) -> bool;

    /// Show `value` in the widget.
    fn push_value(&mut self, id: WidgetId, value: &Value);

    /// Select `value` in a list-like widget.
    fn push_selected(&mut self, id: WidgetId, value: &Value);

    /// Apply a structural collection change to a list-like widget.
    fn push_collection_change(&mut self, id: WidgetId, change: &CollectionChanged);

    /// Current user-facing value of the widget.
    fn read_value(&self, id: WidgetId) -> Option<Value>;

    /// Current selection of a list-like widget.
    fn read_selected(&self, id: WidgetId) -> Option<Value>;

    /// Record `parent` as the parent controller of `child`.
    fn set_controller_parent(&mut self, child: ControllerId, parent: ControllerId);

    /// Parent controller previously recorded for `child`.
    fn controller_parent(&self, child: ControllerId) -> Option<ControllerId>;
}
