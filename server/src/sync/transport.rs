use std::collections::HashSet;

use baubles_shared::{EntityId, FullState, Payload, SlotUpdate};

use crate::error::TransportError;

/// Hands messages to observers.
///
/// Delivery itself is fire-and-forget. An `Err` only means the hand-over was
/// interrupted, so the message must be considered unsent.
pub trait Transport<P: Payload>: Send + Sync {
    fn deliver(&self, observer: EntityId, message: &SlotUpdate<P>) -> Result<(), TransportError>;

    fn deliver_full_state(
        &self,
        observer: EntityId,
        state: &FullState<P>,
    ) -> Result<(), TransportError>;
}

/// Knows which observers are currently tracking an owner
pub trait ObserverResolver: Send + Sync {
    /// Observers other than the owner itself. The owner is always added by
    /// the caller.
    fn tracking_observers_of(&self, owner: EntityId) -> HashSet<EntityId>;
}
