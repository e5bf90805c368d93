use std::collections::HashSet;

use parking_lot::Mutex;

use baubles_server::{Transport, TransportError};
use baubles_shared::{
    encode_full_state, encode_slot_update, BaublesMessage, EntityId, FullState, SlotIndex,
    SlotUpdate,
};

use crate::TestItem;

/// One delivered message
#[derive(Clone, Debug, PartialEq)]
pub struct Sent {
    pub observer: EntityId,
    pub message: BaublesMessage<TestItem>,
    pub bytes: Vec<u8>,
}

/// Transport that records every delivery and can be told to interrupt the
/// next delivery to a given observer
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    interrupt_next: Mutex<HashSet<EntityId>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next delivery of any kind to `observer` fails, once
    pub fn interrupt_next(&self, observer: EntityId) {
        self.interrupt_next.lock().insert(observer);
    }

    /// Everything delivered so far, emptying the record
    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(observer, slot)` of every slot update delivered so far, emptying the record
    pub fn take_slot_updates(&self) -> Vec<(EntityId, SlotIndex)> {
        self.take()
            .into_iter()
            .filter_map(|sent| match sent.message {
                BaublesMessage::SlotUpdate(update) => Some((sent.observer, update.slot())),
                BaublesMessage::FullState(_) => None,
            })
            .collect()
    }

    /// `(observer, slot count)` of every full state delivered so far, emptying the record
    pub fn take_full_states(&self) -> Vec<(EntityId, usize)> {
        self.take()
            .into_iter()
            .filter_map(|sent| match sent.message {
                BaublesMessage::FullState(state) => Some((sent.observer, state.slots().len())),
                BaublesMessage::SlotUpdate(_) => None,
            })
            .collect()
    }
}

impl Transport<TestItem> for RecordingTransport {
    fn deliver(
        &self,
        observer: EntityId,
        message: &SlotUpdate<TestItem>,
    ) -> Result<(), TransportError> {
        if self.interrupt_next.lock().remove(&observer) {
            return Err(TransportError::Interrupted { observer });
        }
        self.sent.lock().push(Sent {
            observer,
            message: BaublesMessage::SlotUpdate(message.clone()),
            bytes: encode_slot_update(message),
        });
        Ok(())
    }

    fn deliver_full_state(
        &self,
        observer: EntityId,
        state: &FullState<TestItem>,
    ) -> Result<(), TransportError> {
        if self.interrupt_next.lock().remove(&observer) {
            return Err(TransportError::Interrupted { observer });
        }
        self.sent.lock().push(Sent {
            observer,
            message: BaublesMessage::FullState(state.clone()),
            bytes: encode_full_state(state),
        });
        Ok(())
    }
}
