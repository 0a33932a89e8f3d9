#![forbid(unsafe_code)]

//! Models shared by the unit tests of this crate.

use viewbind_core::{
    Attachment, CollectionChanged, ControllerId, ObservableCollection, Value, WidgetArena, WidgetId,
    WidgetKind, WidgetTree,
};

use crate::command::{CommandArgs, CommandSlot, RelayCommand};
use crate::controller::Controller;
use crate::property::PropertyRegistry;

/// A counter with a status line, a list and a reset command.
#[derive(Debug, Default)]
pub struct Counter {
    pub count: i64,
    pub status: String,
    pub items: ObservableCollection<String>,
    /// Not declared as a property.
    pub other: ObservableCollection<String>,
    pub selected: String,
    pub locked: bool,
    pub reset: CommandSlot<Reset>,
    pub changed: Vec<String>,
    pub collections: Vec<String>,
    pub invoked: Vec<String>,
}

impl Controller for Counter {
    fn properties() -> PropertyRegistry<Self> {
        PropertyRegistry::<Self>::builder()
            .property("Count", |m| m.count, |m, v| m.count = v)
            .read_only("Status", |m| m.status.clone())
            .collection("Items", |m| &m.items)
            .property("Selected", |m| m.selected.clone(), |m, v| m.selected = v)
            .command("ResetCmd", |m| &m.reset, |m| &mut m.reset)
            .build()
    }

    fn property_changed(&mut self, name: &str) {
        self.changed.push(name.to_owned());
    }

    fn collection_changed(&mut self, name: &str, _change: &CollectionChanged) {
        self.collections.push(name.to_owned());
    }

    fn invoke_method(&mut self, name: &str, _args: &mut CommandArgs) -> bool {
        self.invoked.push(name.to_owned());
        name == "OnHandled"
    }
}

/// Field command: zeroes the counter.
#[derive(Debug, Default)]
pub struct Reset {
    pub owner: Option<ControllerId>,
    pub runs: usize,
}

impl RelayCommand<Counter> for Reset {
    fn execute(&mut self, model: &mut Counter, args: &mut CommandArgs) -> bool {
        model.count = 0;
        self.runs += 1;
        args.notify("Count");
        true
    }

    fn set_owner(&mut self, owner: ControllerId) {
        self.owner = Some(owner);
    }

    fn owner(&self) -> Option<ControllerId> {
        self.owner
    }
}

/// Standalone command, blocked while the counter is locked.
#[derive(Debug, Default)]
pub struct Submit;

impl RelayCommand<Counter> for Submit {
    fn execute(&mut self, model: &mut Counter, args: &mut CommandArgs) -> bool {
        model.status = "submitted".into();
        args.notify("Status");
        true
    }

    fn can_execute(&self, model: &Counter) -> bool {
        !model.locked
    }
}

/// A model with nested scopes.
#[derive(Debug)]
pub struct Settings {
    pub title: String,
    pub audio: Audio,
    pub changed: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Options".into(),
            audio: Audio {
                volume: 0.8,
                mixer: Mixer::default(),
            },
            changed: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Audio {
    pub volume: f64,
    pub mixer: Mixer,
}

#[derive(Debug, Default)]
pub struct Mixer {
    pub muted: bool,
}

fn audio_properties() -> PropertyRegistry<Audio> {
    let mixer = PropertyRegistry::<Mixer>::builder()
        .property("muted", |m| m.muted, |m, v| m.muted = v)
        .build();
    PropertyRegistry::<Audio>::builder()
        .property("volume", |m| m.volume, |m, v| m.volume = v)
        .scope("mixer", |m| &m.mixer, |m| &mut m.mixer, mixer)
        .build()
}

impl Controller for Settings {
    fn properties() -> PropertyRegistry<Self> {
        PropertyRegistry::<Self>::builder()
            .property("Title", |m| m.title.clone(), |m, v| m.title = v)
            .scope("audio", |m| &m.audio, |m| &mut m.audio, audio_properties())
            .build()
    }

    fn property_changed(&mut self, name: &str) {
        self.changed.push(name.to_owned());
    }
}

/// Wraps a [`Counter`] behind a scope.
#[derive(Debug, Default)]
pub struct Panel {
    pub counter: Counter,
}

impl Controller for Panel {
    fn properties() -> PropertyRegistry<Self> {
        PropertyRegistry::<Self>::builder()
            .scope("inner", |m| &m.counter, |m| &mut m.counter, Counter::properties())
            .build()
    }
}

/// A [`WidgetArena`] that records every value push, in call order.
#[derive(Debug, Default)]
pub struct Recording {
    pub arena: WidgetArena,
    pub pushes: Vec<(WidgetId, Value)>,
}

impl WidgetTree for Recording {
    fn first_child(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.first_child(id)
    }

    fn next_sibling(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.next_sibling(id)
    }

    fn attachment(&self, id: WidgetId) -> Option<&Attachment> {
        self.arena.attachment(id)
    }

    fn kind(&self, id: WidgetId) -> WidgetKind {
        self.arena.kind(id)
    }

    fn name(&self, id: WidgetId) -> &str {
        self.arena.name(id)
    }

    fn contains(&self, id: WidgetId) -> bool {
        self.arena.contains(id)
    }

    fn push_value(&mut self, id: WidgetId, value: &Value) {
        self.pushes.push((id, value.clone()));
        self.arena.push_value(id, value);
    }

    fn push_selected(&mut self, id: WidgetId, value: &Value) {
        self.arena.push_selected(id, value);
    }

    fn push_collection_change(&mut self, id: WidgetId, change: &CollectionChanged) {
        self.arena.push_collection_change(id, change);
    }

    fn read_value(&self, id: WidgetId) -> Option<Value> {
        self.arena.read_value(id)
    }

    fn read_selected(&self, id: WidgetId) -> Option<Value> {
        self.arena.read_selected(id)
    }

    fn set_controller_parent(&mut self, child: ControllerId, parent: ControllerId) {
        self.arena.set_controller_parent(child, parent);
    }

    fn controller_parent(&self, child: ControllerId) -> Option<ControllerId> {
        self.arena.controller_parent(child)
    }
}
