#![forbid(unsafe_code)]

//! Observable collections and their change events.
//!
//! # Design
//!
//! [`ObservableCollection<T>`] is a vector with an identity. Every structural
//! mutation bumps its version and returns the [`CollectionChanged`] event
//! describing it; the owner forwards that event to its view controller,
//! which resolves which declared field the event came from by comparing
//! [`CollectionId`]s.
//!
//! # Invariants
//!
//! 1. Every collection gets a process-unique [`CollectionId`], including
//!    clones (a clone is a different collection).
//! 2. `version` increments by exactly 1 on each successful mutation.
//! 3. Out-of-range mutations return `None` and leave the collection and its
//!    version untouched.

use core::fmt;
use core::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::Value;

/// Global counter for unique collection IDs.
static COLLECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of an [`ObservableCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionId(u64);

impl CollectionId {
    fn next() -> Self {
        Self(COLLECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collection-{}", self.0)
    }
}

/// What happened to a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionAction {
    Insert { index: usize, value: Value },
    Remove { index: usize },
    Replace { index: usize, value: Value },
    Move { from: usize, to: usize },
    Clear,
}

/// A structural change to an observable collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionChanged {
    /// Identity of the collection that changed.
    pub source: CollectionId,
    pub action: CollectionAction,
}

/// A vector that reports its own structural changes.
#[derive(Debug)]
pub struct ObservableCollection<T> {
    id: CollectionId,
    items: Vec<T>,
    version: u64,
}

impl<T: Clone> Clone for ObservableCollection<T> {
    fn clone(&self) -> Self {
        Self {
            id: CollectionId::next(),
            items: self.items.clone(),
            version: 0,
        }
    }
}

impl<T> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for ObservableCollection<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> ObservableCollection<T> {
    /// Create an empty collection with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a collection holding `items`.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            id: CollectionId::next(),
            items,
            version: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Number of successful mutations so far.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    fn changed(&mut self, action: CollectionAction) -> CollectionChanged {
        self.version += 1;
        CollectionChanged {
            source: self.id,
            action,
        }
    }

    /// Remove the item at `index`.
    #[must_use = "forward the event to the view controller"]
    pub fn remove(&mut self, index: usize) -> Option<CollectionChanged> {
        if index >= self.items.len() {
            return None;
        }
        self.items.remove(index);
        Some(self.changed(CollectionAction::Remove { index }))
    }

    /// Move the item at `from` so that it ends up at `to`.
    #[must_use = "forward the event to the view controller"]
    pub fn move_item(&mut self, from: usize, to: usize) -> Option<CollectionChanged> {
        let len = self.items.len();
        if from >= len || to >= len {
            return None;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Some(self.changed(CollectionAction::Move { from, to }))
    }

    /// Remove every item.
    #[must_use = "forward the event to the view controller"]
    pub fn clear(&mut self) -> CollectionChanged {
        self.items.clear();
        self.changed(CollectionAction::Clear)
    }
}

impl<T: Clone + Into<Value>> ObservableCollection<T> {
    /// Append an item.
    #[must_use = "forward the event to the view controller"]
    pub fn push(&mut self, item: T) -> CollectionChanged {
        let index = self.items.len();
        let value = item.clone().into();
        self.items.push(item);
        self.changed(CollectionAction::Insert { index, value })
    }

    /// Insert an item at `index` (`index == len` appends).
    #[must_use = "forward the event to the view controller"]
    pub fn insert(&mut self, index: usize, item: T) -> Option<CollectionChanged> {
        if index > self.items.len() {
            return None;
        }
        let value = item.clone().into();
        self.items.insert(index, item);
        Some(self.changed(CollectionAction::Insert { index, value }))
    }

    /// Replace the item at `index`.
    #[must_use = "forward the event to the view controller"]
    pub fn set(&mut self, index: usize, item: T) -> Option<CollectionChanged> {
        let slot = self.items.get_mut(index)?;
        let value = item.clone().into();
        *slot = item;
        Some(self.changed(CollectionAction::Replace { index, value }))
    }

    /// Current contents as a [`Value::List`].
    #[must_use]
    pub fn snapshot(&self) -> Value {
        Value::List(self.items.iter().cloned().map(Into::into).collect())
    }
}

/// Apply `action` to a plain vector, mirroring the collection it came from.
///
/// Indices outside the vector are ignored, so a mirror that has drifted
/// never panics.
pub fn apply_action(items: &mut Vec<Value>, action: &CollectionAction) {
    match action {
        CollectionAction::Insert { index, value } => {
            let index = (*index).min(items.len());
            items.insert(index, value.clone());
        }
        CollectionAction::Remove { index } => {
            if *index < items.len() {
                items.remove(*index);
            }
        }
        CollectionAction::Replace { index, value } => {
            if let Some(slot) = items.get_mut(*index) {
                *slot = value.clone();
            }
        }
        CollectionAction::Move { from, to } => {
            if *from < items.len() && *to < items.len() {
                let item = items.remove(*from);
                items.insert(*to, item);
            }
        }
        CollectionAction::Clear => items.clear(),
    }
}
