use std::marker::PhantomData;

use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a node stored in the Core arena.
    pub struct NodeId;
}

/// A node identifier that remembers the widget type it was created with.
///
/// Returned by [`Sprig::create`](crate::Sprig::create) so callers can keep a
/// handle to a specific widget kind without re-stating the type at every
/// access.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TypedId<W> {
    /// Untyped node identifier.
    id: NodeId,
    /// Marker for the widget type.
    _marker: PhantomData<fn() -> W>,
}

impl<W> TypedId<W> {
    /// Wrap an untyped node identifier.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// The untyped identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<W> Clone for TypedId<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for TypedId<W> {}

impl<W> From<TypedId<W>> for NodeId {
    fn from(value: TypedId<W>) -> Self {
        value.id
    }
}
