use std::sync::Arc;

use log::{debug, trace};

use baubles_shared::{
    BaubleStorage, EntityId, FullState, ItemCapabilities, MessageAllocator, Payload, PoolStats,
    SlotUpdate,
};

use crate::{
    error::{SyncError, TransportError},
    sync::{
        sync_tracker::SyncTracker,
        transport::{ObserverResolver, Transport},
    },
};

/// Pushes the changed slots of one owner's store to every observer.
///
/// Holds no per-owner state: the store and its `SyncTracker` are borrowed
/// for the length of a pass, so one `Synchronizer` can serve many owners on
/// many threads at once.
pub struct Synchronizer<P: Payload> {
    messages: Arc<dyn MessageAllocator<P>>,
}

impl<P: Payload> Synchronizer<P> {
    pub fn new(messages: Arc<dyn MessageAllocator<P>>) -> Self {
        Self { messages }
    }

    pub fn message_stats(&self) -> PoolStats {
        self.messages.stats()
    }

    /// Runs one pass for `owner` and returns how many slots were broadcast.
    ///
    /// A slot is broadcast when it is dirty, or when it differs from the
    /// snapshot and its item asks to be synced automatically. Slots are
    /// visited in ascending order and each slot reaches every observer before
    /// its dirty flag is cleared and its snapshot entry updated. If the
    /// transport is interrupted the pass stops there, leaving that slot dirty.
    ///
    /// Observers grow their copy of the store from slot updates but cannot
    /// shrink it, so when the store has fewer slots than at the last pass the
    /// whole store goes out as a `FullState` instead.
    pub fn sync<C>(
        &self,
        owner: EntityId,
        storage: &mut BaubleStorage<P>,
        tracker: &mut SyncTracker<P>,
        capabilities: &C,
        observers: &dyn ObserverResolver,
        transport: &dyn Transport<P>,
    ) -> Result<usize, SyncError>
    where
        C: ItemCapabilities<P> + ?Sized,
    {
        let shrunk = tracker
            .tracked_capacity()
            .map_or(false, |capacity| capacity > storage.capacity());
        if shrunk {
            let targets = resolve_targets(owner, observers);
            return self.resend(owner, storage, tracker, &targets, transport);
        }

        let snapshot = tracker.snapshot_for(storage.capacity());

        let needs_sync = storage.any_dirty()
            || storage
                .iter()
                .any(|(slot, payload)| {
                    changed_auto_sync(payload, &snapshot[slot], owner, capabilities)
                });
        if !needs_sync {
            return Ok(0);
        }

        let targets = resolve_targets(owner, observers);

        let mut sent = 0;
        for slot in 0..storage.capacity() {
            let payload = storage.get(slot)?;
            if !storage.is_dirty(slot)
                && !changed_auto_sync(payload, &snapshot[slot], owner, capabilities)
            {
                continue;
            }

            let message = self.messages.acquire(owner, slot, payload);
            if let Err(TransportError::Interrupted { observer }) =
                deliver_all(transport, &targets, &message)
            {
                self.messages.release(message);
                debug!(
                    "Synchronizer: pass for {:?} interrupted at slot {}, {} slots sent",
                    owner, slot, sent
                );
                return Err(SyncError::Interrupted { slot, observer });
            }

            storage.clear_dirty(slot)?;
            snapshot[slot].clone_from(message.payload());
            self.messages.release(message);

            trace!("Synchronizer: slot {} of {:?} sent", slot, owner);
            sent += 1;
        }

        debug!(
            "Synchronizer: {} slots of {:?} sent to {} observers",
            sent,
            owner,
            targets.len()
        );
        Ok(sent)
    }

    /// Sends every target the whole store, then records it all as broadcast.
    /// An interruption leaves the snapshot alone, so the next pass resends.
    fn resend(
        &self,
        owner: EntityId,
        storage: &mut BaubleStorage<P>,
        tracker: &mut SyncTracker<P>,
        targets: &[EntityId],
        transport: &dyn Transport<P>,
    ) -> Result<usize, SyncError> {
        let state = FullState::from_storage(owner, storage);
        for observer in targets {
            if let Err(TransportError::Interrupted { observer }) =
                transport.deliver_full_state(*observer, &state)
            {
                debug!(
                    "Synchronizer: full state of {:?} interrupted at {:?}",
                    owner, observer
                );
                return Err(SyncError::ResendInterrupted { observer });
            }
        }

        for slot in 0..storage.capacity() {
            storage.clear_dirty(slot)?;
        }
        tracker.record_all(storage);

        debug!(
            "Synchronizer: store of {:?} shrank, full state of {} slots sent to {} observers",
            owner,
            storage.capacity(),
            targets.len()
        );
        Ok(storage.capacity())
    }
}

/// The resolver's observers plus the owner, in ascending order
fn resolve_targets(owner: EntityId, observers: &dyn ObserverResolver) -> Vec<EntityId> {
    let mut targets: Vec<EntityId> = observers.tracking_observers_of(owner).into_iter().collect();
    if !targets.contains(&owner) {
        targets.push(owner);
    }
    targets.sort();
    targets
}

fn deliver_all<P: Payload>(
    transport: &dyn Transport<P>,
    targets: &[EntityId],
    message: &SlotUpdate<P>,
) -> Result<(), TransportError> {
    for observer in targets {
        transport.deliver(*observer, message)?;
    }
    Ok(())
}

fn changed_auto_sync<P, C>(payload: &P, last: &P, owner: EntityId, capabilities: &C) -> bool
where
    P: Payload,
    C: ItemCapabilities<P> + ?Sized,
{
    !payload.value_equals(last) && capabilities.will_auto_sync(payload, owner)
}
