#![forbid(unsafe_code)]

//! Relay commands and their resolution by name.
//!
//! A binding may name a command. The name is resolved once, when the
//! binding is registered:
//!
//! 1. A command field declared on the controller that already holds an
//!    instance is used as is.
//! 2. A declared command field that is still empty gets a default instance,
//!    which is stored back into the field. Resolving the same name again
//!    therefore yields the same instance.
//! 3. A name with no declared property is looked up in [`CommandTypes`];
//!    a hit yields a fresh instance that is not stored on the controller.
//! 4. Anything else is [`Resolution::Unresolved`]: the command is taken to
//!    be a plain method on the controller (`Controller::invoke_method`).
//!
//! Commands from paths 1 and 2 belong to the controller and receive
//! [`RelayCommand::set_owner`] before they are attached.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use viewbind_core::{ControllerId, EventKind, UiEvent, Value, WidgetId, WidgetKind};

use crate::property::PropertyRegistry;

/// An invokable unit triggered by a widget interaction.
///
/// `M` is the controller model the command operates on.
pub trait RelayCommand<M> {
    /// Run the command. Returning `true` marks the event as fully handled
    /// so the host stops propagating it.
    ///
    /// Properties the command changes are announced through
    /// [`CommandArgs::notify`] and pushed to the view when it returns.
    fn execute(&mut self, model: &mut M, args: &mut CommandArgs) -> bool;

    /// Whether the command may run right now.
    fn can_execute(&self, _model: &M) -> bool {
        true
    }

    /// Event kind this command reacts to, overriding the binding's trigger.
    fn trigger(&self) -> Option<EventKind> {
        None
    }

    /// Called when a controller adopts this command.
    fn set_owner(&mut self, _owner: ControllerId) {}

    /// Controller that owns this command, if it keeps track.
    fn owner(&self) -> Option<ControllerId> {
        None
    }
}

/// Shared handle to a resolved command.
pub type CommandHandle<M> = Rc<RefCell<dyn RelayCommand<M>>>;

/// Field type for commands declared on a controller model.
///
/// An empty slot is filled with `C::default()` the first time a binding
/// resolves it.
pub type CommandSlot<C> = Option<Rc<RefCell<C>>>;

/// Arguments passed to [`RelayCommand::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct CommandArgs {
    /// Widget that produced the event.
    pub widget: WidgetId,
    pub widget_kind: WidgetKind,
    pub event: UiEvent,
    /// Widget value at the time of the event.
    pub value: Option<Value>,
    notified: Vec<String>,
}

impl CommandArgs {
    #[must_use]
    pub fn new(widget: WidgetId, widget_kind: WidgetKind, event: UiEvent, value: Option<Value>) -> Self {
        Self {
            widget,
            widget_kind,
            event,
            value,
            notified: Vec::new(),
        }
    }

    /// Ask the controller to push `name` to the view after the command.
    pub fn notify(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.notified.contains(&name) {
            self.notified.push(name);
        }
    }

    /// Properties announced so far, in first-announced order.
    #[must_use]
    pub fn notified(&self) -> &[String] {
        &self.notified
    }

    pub(crate) fn take_notified(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notified)
    }
}

pub(crate) fn erase<M: 'static, C: RelayCommand<M> + 'static>(
    command: Rc<RefCell<C>>,
) -> CommandHandle<M> {
    command
}

type Factory<M> = Rc<dyn Fn() -> CommandHandle<M>>;

/// Registry of standalone command types, addressed by name.
pub struct CommandTypes<M> {
    factories: AHashMap<String, Factory<M>>,
}

impl<M> Default for CommandTypes<M> {
    fn default() -> Self {
        Self {
            factories: AHashMap::new(),
        }
    }
}

impl<M> fmt::Debug for CommandTypes<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CommandTypes").field("names", &names).finish()
    }
}

impl<M: 'static> CommandTypes<M> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` under `name`, constructing it with `Default`.
    pub fn register<C>(&mut self, name: impl Into<String>) -> &mut Self
    where
        C: RelayCommand<M> + Default + 'static,
    {
        self.register_with(name, || erase::<M, C>(Rc::new(RefCell::new(C::default()))))
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<C>(mut self, name: impl Into<String>) -> Self
    where
        C: RelayCommand<M> + Default + 'static,
    {
        self.register::<C>(name);
        self
    }

    /// Register a custom factory under `name`.
    pub fn register_with(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> CommandHandle<M> + 'static,
    ) -> &mut Self {
        self.factories.insert(name.into(), Rc::new(factory));
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Construct a fresh instance of the command registered as `name`.
    #[must_use]
    pub fn spawn(&self, name: &str) -> Option<CommandHandle<M>> {
        self.factories.get(name).map(|factory| factory())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Outcome of resolving a command name.
pub enum Resolution<M> {
    /// Declared field, already populated.
    Field(CommandHandle<M>),
    /// Declared field, populated just now.
    Initialized(CommandHandle<M>),
    /// Standalone type; not stored on the controller.
    Standalone(CommandHandle<M>),
    /// No command: treat the name as a controller method.
    Unresolved,
}

impl<M> Resolution<M> {
    /// Whether the command belongs to the resolving controller.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Field(_) | Self::Initialized(_))
    }

    #[must_use]
    pub fn handle(&self) -> Option<&CommandHandle<M>> {
        match self {
            Self::Field(h) | Self::Initialized(h) | Self::Standalone(h) => Some(h),
            Self::Unresolved => None,
        }
    }

    #[must_use]
    pub fn into_handle(self) -> Option<CommandHandle<M>> {
        match self {
            Self::Field(h) | Self::Initialized(h) | Self::Standalone(h) => Some(h),
            Self::Unresolved => None,
        }
    }
}

impl<M> fmt::Debug for Resolution<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Field(_) => "Field",
            Self::Initialized(_) => "Initialized",
            Self::Standalone(_) => "Standalone",
            Self::Unresolved => "Unresolved",
        })
    }
}

/// Resolve `name` against the controller's declared properties, then
/// against standalone command types.
///
/// A declared property that is not a command resolves to
/// [`Resolution::Unresolved`] without consulting `types`.
pub fn resolve<M: 'static>(
    properties: &mut PropertyRegistry<M>,
    types: &CommandTypes<M>,
    model: &mut M,
    name: &str,
) -> Resolution<M> {
    match properties.resolve(name) {
        Some(descriptor) => {
            let Some(field) = descriptor.command_field() else {
                return Resolution::Unresolved;
            };
            match (field.load)(model) {
                Some(handle) => Resolution::Field(handle),
                None => Resolution::Initialized((field.init)(model)),
            }
        }
        None => types
            .spawn(name)
            .map_or(Resolution::Unresolved, Resolution::Standalone),
    }
}
