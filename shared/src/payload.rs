use std::sync::Arc;

use baubles_serde::Serde;

use crate::pool::StringPool;

/// The value occupying a slot.
///
/// Payloads are never mutated in place by a store; replacing a slot's content
/// replaces the whole value. `Clone` is the deep copy.
pub trait Payload: Serde + Send + Sync + 'static {
    /// Identity of the item type a payload belongs to. The type cache keys its
    /// entries on this, holding only weak references.
    type Kind: ?Sized + Send + Sync + 'static;

    /// The "nothing here" value
    fn empty() -> Self;

    fn is_empty(&self) -> bool;

    /// Item type of a non-empty payload
    fn kind(&self) -> Option<&Arc<Self::Kind>>;

    fn value_equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Swaps any identifier strings held by the payload for the pool's
    /// canonical instances. Called on freshly decoded payloads.
    fn canonicalize(&mut self, _strings: &StringPool) {}
}
