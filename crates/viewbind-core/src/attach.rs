#![forbid(unsafe_code)]

//! Script objects a host can attach to widgets.
//!
//! A widget carries at most one [`Attachment`]: either a [`BindingSpec`]
//! (declaring which controller property the widget shows) or the
//! [`ControllerId`] of a view controller rooted at that widget.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::widget::EventKind;

/// Global counter for unique controller IDs.
static CONTROLLER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a view controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(u64);

impl ControllerId {
    /// Allocate a new unique controller ID.
    #[must_use]
    pub fn next() -> Self {
        Self(CONTROLLER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller-{}", self.0)
    }
}

/// Declares how a widget binds to its controller.
///
/// Property names may use dotted scope (`"audio.volume"`) to reach into a
/// nested model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindingSpec {
    /// Property shown by the widget. Empty for command-only widgets.
    pub binding_name: String,
    /// Property receiving the selected item of list-like widgets.
    pub selected_item: Option<String>,
    /// Name of the command the widget triggers.
    pub relay_command: Option<String>,
    /// Event kind that triggers the command, overriding the widget default.
    pub trigger: Option<EventKind>,
}

impl BindingSpec {
    /// Bind a widget to `binding_name`.
    pub fn new(binding_name: impl Into<String>) -> Self {
        Self {
            binding_name: binding_name.into(),
            ..Self::default()
        }
    }

    /// A widget that only triggers `command` and shows no property.
    pub fn command_only(command: impl Into<String>) -> Self {
        Self::default().with_command(command)
    }

    /// Set the selected-item property.
    #[must_use]
    pub fn with_selected_item(mut self, name: impl Into<String>) -> Self {
        self.selected_item = Some(name.into());
        self
    }

    /// Set the command name.
    #[must_use]
    pub fn with_command(mut self, name: impl Into<String>) -> Self {
        self.relay_command = Some(name.into());
        self
    }

    /// Set the event kind that fires the command.
    #[must_use]
    pub fn with_trigger(mut self, kind: EventKind) -> Self {
        self.trigger = Some(kind);
        self
    }

    /// Command name, treating an empty string as absent.
    #[must_use]
    pub fn command_name(&self) -> Option<&str> {
        self.relay_command.as_deref().filter(|name| !name.is_empty())
    }
}

/// Script object attached to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Binding(BindingSpec),
    Controller(ControllerId),
}

impl From<BindingSpec> for Attachment {
    fn from(spec: BindingSpec) -> Self {
        Self::Binding(spec)
    }
}

impl From<ControllerId> for Attachment {
    fn from(id: ControllerId) -> Self {
        Self::Controller(id)
    }
}
