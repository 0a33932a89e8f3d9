#![forbid(unsafe_code)]

//! Input routing: view to model.
//!
//! Every event from a bound widget first copies the widget's state into
//! the model:
//!
//! 1. the widget value goes into the bound property, converted to its
//!    declared type;
//! 2. the widget selection goes into the selected-item property.
//!
//! Each successful write is pushed to the other widgets bound to the same
//! property and announced to the controller hook. A write that fails is
//! logged and skipped; it never stops the event.
//!
//! Then, if the event kind is the binding's trigger, the command runs. A
//! command name that resolved to no command object falls back to
//! [`Controller::invoke_method`]. Properties announced by the command
//! through [`CommandArgs::notify`] are pushed afterwards.
//!
//! Every entry point returns whether the event was fully handled; `false`
//! lets the host apply its default handling.

use viewbind_core::{MouseButton, UiEvent, Value, WidgetId, WidgetTree};

use crate::command::{CommandArgs, CommandHandle};
use crate::controller::{Controller, ViewController};
use crate::error::BindError;

impl<M: Controller> ViewController<M> {
    /// A click on `widget`.
    pub fn on_click(
        &mut self,
        tree: &mut dyn WidgetTree,
        widget: WidgetId,
        x: i32,
        y: i32,
        button: MouseButton,
    ) -> bool {
        self.route(tree, widget, UiEvent::Click { x, y, button })
    }

    /// The value of `widget` changed. `finished` is false while the user is
    /// still dragging or typing.
    pub fn on_value_changed(
        &mut self,
        tree: &mut dyn WidgetTree,
        widget: WidgetId,
        x: i32,
        y: i32,
        finished: bool,
    ) -> bool {
        self.route(tree, widget, UiEvent::Change { x, y, finished })
    }

    /// A key press while `widget` has focus.
    pub fn on_key_press(
        &mut self,
        tree: &mut dyn WidgetTree,
        widget: WidgetId,
        x: i32,
        y: i32,
        key: u32,
    ) -> bool {
        self.route(tree, widget, UiEvent::KeyPress { x, y, key })
    }

    /// Route any event from `widget`.
    pub fn route(&mut self, tree: &mut dyn WidgetTree, widget: WidgetId, event: UiEvent) -> bool {
        let descriptor = match self.bindings.require(widget) {
            Ok(descriptor) => descriptor.clone(),
            Err(err) => {
                tracing::trace!(error = %err, "event left to the host");
                return false;
            }
        };

        let value = tree.read_value(widget);
        if !descriptor.binding_name().is_empty()
            && let Some(value) = &value
        {
            self.write_input(tree, widget, descriptor.binding_name(), value);
        }
        if let Some(name) = descriptor.selected_item()
            && let Some(selected) = tree.read_selected(widget)
        {
            self.write_input(tree, widget, name, &selected);
        }

        if descriptor.trigger() != Some(event.kind()) {
            return false;
        }

        let mut args = CommandArgs::new(widget, tree.kind(widget), event, value);
        let handled = match (descriptor.command(), descriptor.command_name()) {
            (Some(command), name) => self.run_command(command, name.unwrap_or_default(), &mut args),
            (None, Some(name)) => {
                tracing::trace!(command = name, %widget, "invoking controller method");
                self.model.invoke_method(name, &mut args)
            }
            (None, None) => false,
        };
        for name in args.take_notified() {
            self.notify_property_changed(tree, &name, true);
        }
        handled
    }

    fn write_input(&mut self, tree: &mut dyn WidgetTree, origin: WidgetId, name: &str, value: &Value) {
        if value.is_none() {
            return;
        }
        let Some(descriptor) = self.properties.resolve(name) else {
            tracing::trace!(property = name, widget = %origin, "input for undeclared property");
            return;
        };
        match descriptor.write(&mut self.model, value) {
            Ok(()) => {
                self.push_property(tree, name, Some(origin));
                self.model.property_changed(name);
            }
            Err(BindError::ReadOnly(_)) => {
                tracing::debug!(property = name, widget = %origin, "input for read-only property ignored");
            }
            Err(err) => {
                tracing::warn!(
                    property = name,
                    widget = %origin,
                    error = %err,
                    "widget value not written"
                );
            }
        }
    }

    fn run_command(&mut self, command: &CommandHandle<M>, name: &str, args: &mut CommandArgs) -> bool {
        let Ok(mut command) = command.try_borrow_mut() else {
            tracing::warn!(command = name, "command is already running");
            return false;
        };
        if !command.can_execute(&self.model) {
            tracing::debug!(command = name, "command cannot execute");
            return false;
        }
        tracing::trace!(command = name, widget = %args.widget, "executing command");
        command.execute(&mut self.model, args)
    }
}
