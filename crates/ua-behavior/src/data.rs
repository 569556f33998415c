//! Typed payloads attached to decisions.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ua_core::DataId;

/// An opaque payload with a stable identity.
///
/// Two decisions carry "the same data" iff their `DataId`s match; the value
/// itself is only reachable by asking for the expected type.  Cloning is a
/// reference-count bump.
#[derive(Clone)]
pub struct DecisionData {
    id:    DataId,
    value: Arc<dyn Any + Send + Sync>,
}

impl DecisionData {
    pub fn new<T: Any + Send + Sync>(id: DataId, value: T) -> Self {
        Self { id, value: Arc::new(value) }
    }

    /// Wrap an already shared value.
    pub fn from_arc(id: DataId, value: Arc<dyn Any + Send + Sync>) -> Self {
        Self { id, value }
    }

    #[inline]
    pub fn id(&self) -> DataId {
        self.id
    }

    /// The payload as `T`, or `None` if it holds another type.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }
}

impl fmt::Debug for DecisionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DecisionData").field(&self.id).finish()
    }
}
