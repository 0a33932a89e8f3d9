#![forbid(unsafe_code)]

//! Controller property declarations.
//!
//! A controller model declares every bindable member once, through a
//! [`PropertyRegistry`] built with [`PropertyRegistry::builder`]. Each entry
//! carries the member's name, its [`PropertyType`] and typed accessor closures
//! that read and write the model through [`Value`]s.
//!
//! # Kinds of entries
//!
//! | Entry | Declared with | Reads as | Writable |
//! |-------|---------------|----------|----------|
//! | Value | `property`, `read_only` | the member as a [`Value`] | `property` only |
//! | Collection | `collection` | [`Value::List`] snapshot | no |
//! | Command | `command` | nothing | no |
//! | Scope | `scope` | entries of a nested model, as `scope.name` | as declared |
//!
//! # Invariants
//!
//! 1. Names are unique; declaring a name twice keeps the first position and
//!    the last accessors.
//! 2. Entries are kept in declaration order. Resolving a dotted name through
//!    a scope appends the projected entry once; later lookups hit the table.
//! 3. The registry never shrinks.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use viewbind_core::{Bindable, CollectionId, ObservableCollection, Value, ValueError, ValueType};

use crate::command::{CommandHandle, CommandSlot, RelayCommand, erase};
use crate::error::BindError;

/// Declared type of a controller property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Value(ValueType),
    /// An [`ObservableCollection`].
    Collection,
    /// A [`CommandSlot`].
    Command,
}

impl PropertyType {
    /// Value type the property reads as, if it reads at all.
    #[must_use]
    pub fn value_type(self) -> Option<ValueType> {
        match self {
            Self::Value(ty) => Some(ty),
            Self::Collection => Some(ValueType::List),
            Self::Command => None,
        }
    }
}

type Getter<M> = Rc<dyn Fn(&M) -> Value>;
type Setter<M> = Rc<dyn Fn(&mut M, &Value) -> Result<(), ValueError>>;
type Identity<M> = Rc<dyn Fn(&M) -> CollectionId>;
type CommandLoad<M> = Rc<dyn Fn(&M) -> Option<CommandHandle<M>>>;
type CommandInit<M> = Rc<dyn Fn(&mut M) -> CommandHandle<M>>;

/// Accessors of a command field.
pub(crate) struct CommandField<M> {
    pub(crate) load: CommandLoad<M>,
    pub(crate) init: CommandInit<M>,
}

impl<M> Clone for CommandField<M> {
    fn clone(&self) -> Self {
        Self {
            load: Rc::clone(&self.load),
            init: Rc::clone(&self.init),
        }
    }
}

enum Access<M> {
    Value {
        get: Getter<M>,
        set: Option<Setter<M>>,
    },
    Collection {
        get: Getter<M>,
        identity: Identity<M>,
    },
    Command(CommandField<M>),
}

impl<M> Clone for Access<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Value { get, set } => Self::Value {
                get: Rc::clone(get),
                set: set.clone(),
            },
            Self::Collection { get, identity } => Self::Collection {
                get: Rc::clone(get),
                identity: Rc::clone(identity),
            },
            Self::Command(field) => Self::Command(field.clone()),
        }
    }
}

/// One declared member of a controller model.
pub struct PropertyDescriptor<M> {
    name: String,
    property_type: PropertyType,
    access: Access<M>,
}

impl<M> Clone for PropertyDescriptor<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            property_type: self.property_type,
            access: self.access.clone(),
        }
    }
}

impl<M> fmt::Debug for PropertyDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("property_type", &self.property_type)
            .field("writable", &self.is_writable())
            .finish()
    }
}

impl<M> PropertyDescriptor<M> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Whether widget input can be written into this property.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        matches!(&self.access, Access::Value { set: Some(_), .. })
    }

    /// Current value of the property. Commands have none.
    #[must_use]
    pub fn read(&self, model: &M) -> Option<Value> {
        match &self.access {
            Access::Value { get, .. } | Access::Collection { get, .. } => Some(get(model)),
            Access::Command(_) => None,
        }
    }

    /// Convert `value` to the declared type and store it.
    pub fn write(&self, model: &mut M, value: &Value) -> Result<(), BindError> {
        match &self.access {
            Access::Value { set: Some(set), .. } => set(model, value).map_err(BindError::from),
            _ => Err(BindError::ReadOnly(self.name.clone())),
        }
    }

    /// Identity of the collection behind a collection entry.
    #[must_use]
    pub fn collection_id(&self, model: &M) -> Option<CollectionId> {
        match &self.access {
            Access::Collection { identity, .. } => Some(identity(model)),
            _ => None,
        }
    }

    pub(crate) fn command_field(&self) -> Option<&CommandField<M>> {
        match &self.access {
            Access::Command(field) => Some(field),
            _ => None,
        }
    }
}

struct ScopeAccess<P, S> {
    get: Rc<dyn Fn(&P) -> &S>,
    get_mut: Rc<dyn Fn(&mut P) -> &mut S>,
}

impl<M: 'static> PropertyDescriptor<M> {
    /// Re-root this entry onto a parent model `P` that owns an `M`.
    ///
    /// Command entries do not project: a command inside a nested scope
    /// would operate on the nested model, not on the controller.
    fn project<P: 'static>(
        &self,
        name: String,
        scope: &ScopeAccess<P, M>,
    ) -> Option<PropertyDescriptor<P>> {
        let access = match &self.access {
            Access::Value { get, set } => {
                let get = Rc::clone(get);
                let outer = Rc::clone(&scope.get);
                let set = set.as_ref().map(|set| {
                    let set = Rc::clone(set);
                    let outer_mut = Rc::clone(&scope.get_mut);
                    Rc::new(move |p: &mut P, v: &Value| set(outer_mut(p), v)) as Setter<P>
                });
                Access::Value {
                    get: Rc::new(move |p: &P| get(outer(p))),
                    set,
                }
            }
            Access::Collection { get, identity } => {
                let get = Rc::clone(get);
                let identity = Rc::clone(identity);
                let outer = Rc::clone(&scope.get);
                let outer_id = Rc::clone(&scope.get);
                Access::Collection {
                    get: Rc::new(move |p: &P| get(outer(p))),
                    identity: Rc::new(move |p: &P| identity(outer_id(p))),
                }
            }
            Access::Command(_) => return None,
        };
        Some(PropertyDescriptor {
            name,
            property_type: self.property_type,
            access,
        })
    }
}

type ScopeResolver<M> = Rc<dyn Fn(&str) -> Option<PropertyDescriptor<M>>>;

struct Scope<M> {
    name: String,
    resolve: ScopeResolver<M>,
}

/// Declaration-ordered table of a controller's bindable members.
pub struct PropertyRegistry<M> {
    entries: Vec<PropertyDescriptor<M>>,
    index: AHashMap<String, usize>,
    scopes: Vec<Scope<M>>,
}

impl<M> fmt::Debug for PropertyRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("entries", &self.entries)
            .field(
                "scopes",
                &self.scopes.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<M> PropertyRegistry<M> {
    /// Entry declared (or already resolved) under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor<M>> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look `name` up, following `scope.member` paths, without recording
    /// the result.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<PropertyDescriptor<M>> {
        if let Some(descriptor) = self.get(name) {
            return Some(descriptor.clone());
        }
        let (head, rest) = name.split_once('.')?;
        let scope = self.scopes.iter().find(|s| s.name == head)?;
        (scope.resolve)(rest)
    }

    /// Look `name` up, appending dotted entries the first time they resolve.
    pub fn resolve(&mut self, name: &str) -> Option<&PropertyDescriptor<M>> {
        if let Some(&i) = self.index.get(name) {
            return Some(&self.entries[i]);
        }
        let descriptor = self.find(name)?;
        let i = self.insert(descriptor);
        Some(&self.entries[i])
    }

    /// Entry names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor<M>> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the first collection entry, in declaration order, whose
    /// collection is `id`.
    #[must_use]
    pub fn collection_name(&self, model: &M, id: CollectionId) -> Option<&str> {
        self.entries
            .iter()
            .find(|d| d.collection_id(model) == Some(id))
            .map(PropertyDescriptor::name)
    }

    fn insert(&mut self, descriptor: PropertyDescriptor<M>) -> usize {
        if let Some(&i) = self.index.get(descriptor.name()) {
            self.entries[i] = descriptor;
            return i;
        }
        let i = self.entries.len();
        self.index.insert(descriptor.name.clone(), i);
        self.entries.push(descriptor);
        i
    }
}

impl<M: 'static> PropertyRegistry<M> {
    /// Start declaring properties.
    #[must_use]
    pub fn builder() -> PropertyRegistryBuilder<M> {
        PropertyRegistryBuilder {
            registry: Self {
                entries: Vec::new(),
                index: AHashMap::new(),
                scopes: Vec::new(),
            },
        }
    }
}

/// Builder returned by [`PropertyRegistry::builder`].
pub struct PropertyRegistryBuilder<M> {
    registry: PropertyRegistry<M>,
}

impl<M: 'static> PropertyRegistryBuilder<M> {
    fn entry(mut self, name: String, property_type: PropertyType, access: Access<M>) -> Self {
        self.registry.insert(PropertyDescriptor {
            name,
            property_type,
            access,
        });
        self
    }

    /// Declare a read-write property.
    #[must_use]
    pub fn property<T: Bindable + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn(&M) -> T + 'static,
        set: impl Fn(&mut M, T) + 'static,
    ) -> Self {
        let setter: Setter<M> = Rc::new(move |m: &mut M, v: &Value| {
            set(m, T::from_value(v)?);
            Ok(())
        });
        self.entry(
            name.into(),
            PropertyType::Value(T::TYPE),
            Access::Value {
                get: Rc::new(move |m: &M| get(m).into_value()),
                set: Some(setter),
            },
        )
    }

    /// Declare a property that widgets display but never write.
    #[must_use]
    pub fn read_only<T: Bindable + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn(&M) -> T + 'static,
    ) -> Self {
        self.entry(
            name.into(),
            PropertyType::Value(T::TYPE),
            Access::Value {
                get: Rc::new(move |m: &M| get(m).into_value()),
                set: None,
            },
        )
    }

    /// Declare an observable collection.
    #[must_use]
    pub fn collection<T: Clone + Into<Value> + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn(&M) -> &ObservableCollection<T> + 'static,
    ) -> Self {
        let get = Rc::new(get);
        let for_identity = Rc::clone(&get);
        self.entry(
            name.into(),
            PropertyType::Collection,
            Access::Collection {
                get: Rc::new(move |m: &M| get(m).snapshot()),
                identity: Rc::new(move |m: &M| for_identity(m).id()),
            },
        )
    }

    /// Declare a command field.
    ///
    /// An empty slot is filled with `C::default()` when a binding first
    /// resolves the command.
    #[must_use]
    pub fn command<C: RelayCommand<M> + Default + 'static>(
        self,
        name: impl Into<String>,
        get: impl Fn(&M) -> &CommandSlot<C> + 'static,
        get_mut: impl Fn(&mut M) -> &mut CommandSlot<C> + 'static,
    ) -> Self {
        let field = CommandField {
            load: Rc::new(move |m: &M| get(m).as_ref().map(|c| erase::<M, C>(Rc::clone(c)))),
            init: Rc::new(move |m: &mut M| {
                let command = Rc::new(RefCell::new(C::default()));
                *get_mut(m) = Some(Rc::clone(&command));
                erase::<M, C>(command)
            }),
        };
        self.entry(name.into(), PropertyType::Command, Access::Command(field))
    }

    /// Expose the members of a nested model `S` as `name.member`.
    ///
    /// Scoped members are resolved on first use, not up front.
    #[must_use]
    pub fn scope<S: 'static>(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&M) -> &S + 'static,
        get_mut: impl Fn(&mut M) -> &mut S + 'static,
        registry: PropertyRegistry<S>,
    ) -> Self {
        let name = name.into();
        let access = ScopeAccess {
            get: Rc::new(get),
            get_mut: Rc::new(get_mut),
        };
        let prefix = name.clone();
        let resolve: ScopeResolver<M> = Rc::new(move |path: &str| {
            registry
                .find(path)?
                .project(format!("{prefix}.{path}"), &access)
        });
        self.registry.scopes.retain(|s| s.name != name);
        self.registry.scopes.push(Scope { name, resolve });
        self
    }

    #[must_use]
    pub fn build(self) -> PropertyRegistry<M> {
        self.registry
    }
}
