#![forbid(unsafe_code)]

//! Widget handles, widget kinds and raw UI events.
//!
//! A [`WidgetId`] is a non-owning handle into the host's widget registry.
//! The host controls widget lifetime; holders of a handle must be prepared
//! for the widget to disappear (see [`WidgetTree::contains`]).
//!
//! [`WidgetTree::contains`]: crate::tree::WidgetTree::contains

use core::fmt;

/// Handle to a widget owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u32);

impl WidgetId {
    /// Wrap a raw host index.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw ID value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The raw value as a slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host widget subtype, as far as the binding engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidgetKind {
    /// Layout-only container.
    #[default]
    Frame,
    Text,
    Button,
    CheckBox,
    Slider,
    EditBox,
    List,
    Image,
}

impl WidgetKind {
    /// The event kind that fires commands on this widget when the binding
    /// does not say otherwise.
    ///
    /// Buttons fire on click, checkboxes on change. Other widgets only push
    /// their value into the controller.
    #[must_use]
    pub const fn default_trigger(self) -> Option<EventKind> {
        match self {
            Self::Button => Some(EventKind::Click),
            Self::CheckBox => Some(EventKind::Change),
            _ => None,
        }
    }
}

/// Coarse classification of [`UiEvent`]s, used to match commands to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    KeyPress,
}

/// Mouse button reported with click events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

impl From<u8> for MouseButton {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Left,
            1 => Self::Right,
            2 => Self::Middle,
            other => Self::Other(other),
        }
    }
}

/// A raw UI event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Click { x: i32, y: i32, button: MouseButton },
    /// The widget's value changed; `finished` is false while dragging/typing.
    Change { x: i32, y: i32, finished: bool },
    KeyPress { x: i32, y: i32, key: u32 },
}

impl UiEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Click { .. } => EventKind::Click,
            Self::Change { .. } => EventKind::Change,
            Self::KeyPress { .. } => EventKind::KeyPress,
        }
    }

    /// Pointer position at the time of the event.
    #[must_use]
    pub const fn position(&self) -> (i32, i32) {
        match *self {
            Self::Click { x, y, .. } | Self::Change { x, y, .. } | Self::KeyPress { x, y, .. } => {
                (x, y)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_triggers_follow_widget_kind() {
        assert_eq!(WidgetKind::Button.default_trigger(), Some(EventKind::Click));
        assert_eq!(
            WidgetKind::CheckBox.default_trigger(),
            Some(EventKind::Change)
        );
        assert_eq!(WidgetKind::Slider.default_trigger(), None);
        assert_eq!(WidgetKind::EditBox.default_trigger(), None);
    }

    #[test]
    fn event_kind_and_position() {
        let ev = UiEvent::Change {
            x: 3,
            y: 4,
            finished: true,
        };
        assert_eq!(ev.kind(), EventKind::Change);
        assert_eq!(ev.position(), (3, 4));
    }

    #[test]
    fn mouse_button_from_raw() {
        assert_eq!(MouseButton::from(0), MouseButton::Left);
        assert_eq!(MouseButton::from(7), MouseButton::Other(7));
    }

    #[test]
    fn widget_id_display() {
        assert_eq!(WidgetId::new(12).to_string(), "#12");
        assert_eq!(WidgetId::new(12).index(), 12);
    }
}
