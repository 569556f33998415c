//! Type-erased, heterogeneous per-agent state.
//!
//! # Design
//!
//! Each value type `T` is stored once, as a `TypedSlot<T>` behind a
//! `Box<dyn Slot>` in a `HashMap<TypeId, …>`.  Applications model agent
//! state as small newtypes (`Stamina(f32)`, `HomePost(Position)`, …) so the
//! type itself is the key.
//!
//! # Usage
//!
//! ```rust
//! use ua_blackboard::Blackboard;
//!
//! #[derive(Debug, PartialEq)]
//! struct Stamina(f32);
//!
//! let mut board = Blackboard::new().with(Stamina(10.0));
//! board.get_mut::<Stamina>().unwrap().0 -= 1.5;
//! assert_eq!(board.get::<Stamina>(), Some(&Stamina(8.5)));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

// ── Trait object ──────────────────────────────────────────────────────────────

/// Type-erased interface for one stored value.
///
/// The trait is sealed (only implementable inside this crate) via the private
/// `Sealed` supertrait, so every slot is guaranteed to be a `TypedSlot<T>`
/// keyed by `TypeId::of::<T>()`.
pub trait Slot: Send + Sync + 'static + sealed::Sealed {
    /// `std::any::type_name` of the stored value, for diagnostics.
    fn type_name(&self) -> &'static str;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;

    #[doc(hidden)]
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

mod sealed {
    pub trait Sealed {}
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// A value wrapped so it can be stored as `Box<dyn Slot>`.
pub struct TypedSlot<T: Send + Sync + 'static>(pub T);

impl<T: Send + Sync + 'static> sealed::Sealed for TypedSlot<T> {}

impl<T: Send + Sync + 'static> Slot for TypedSlot<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ── Blackboard ────────────────────────────────────────────────────────────────

/// One agent's state, at most one value per type.
///
/// # Thread safety
///
/// `Blackboard` is `Send + Sync` because `Slot: Send + Sync`, so agents that
/// own one can be stepped on a worker thread.
#[derive(Default)]
pub struct Blackboard {
    map: HashMap<TypeId, Box<dyn Slot>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Builder-style [`insert`][Self::insert].
    pub fn with<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Store `value`, returning the previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(TypedSlot(value)))
            .and_then(|old| downcast_box::<T>(old))
    }

    /// Remove and return the value of type `T`.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|old| downcast_box::<T>(old))
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// Shared reference to the value of type `T`, or `None` if absent.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<TypedSlot<T>>())
            .map(|s| &s.0)
    }

    /// Mutable reference to the value of type `T`, or `None` if absent.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<TypedSlot<T>>())
            .map(|s| &mut s.0)
    }

    // ── Metadata ──────────────────────────────────────────────────────────

    /// `true` if a value of type `T` is stored.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Number of distinct value types currently stored.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&'static str> = self.map.values().map(|s| s.type_name()).collect();
        names.sort_unstable();
        f.debug_struct("Blackboard").field("types", &names).finish()
    }
}

fn downcast_box<T: Send + Sync + 'static>(slot: Box<dyn Slot>) -> Option<T> {
    slot.into_any().downcast::<TypedSlot<T>>().ok().map(|s| s.0)
}
