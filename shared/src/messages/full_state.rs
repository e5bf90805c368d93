use baubles_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{constants::MAX_SLOT_INDEX, BaubleStorage, EntityId, Payload, SlotIndex};

use super::slot_update::{read_slot_index, write_slot_index};

/// Every slot of an owner's store, sent once when an observer starts
/// tracking the owner instead of diffing
#[derive(Clone, Debug, PartialEq)]
pub struct FullState<P: Payload> {
    owner: EntityId,
    slots: Vec<(SlotIndex, P)>,
}

impl<P: Payload> FullState<P> {
    pub fn new(owner: EntityId, slots: Vec<(SlotIndex, P)>) -> Self {
        Self { owner, slots }
    }

    pub fn from_storage(owner: EntityId, storage: &BaubleStorage<P>) -> Self {
        let slots = storage
            .iter()
            .map(|(slot, payload)| (slot, payload.clone()))
            .collect();
        Self { owner, slots }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn slots(&self) -> &[(SlotIndex, P)] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [(SlotIndex, P)] {
        &mut self.slots
    }

    /// Builds the store this state describes. Slots the state does not list
    /// are empty.
    pub fn to_storage(&self) -> BaubleStorage<P> {
        let len = self
            .slots
            .iter()
            .map(|(slot, _)| slot + 1)
            .max()
            .unwrap_or(0);
        let mut slots = Vec::with_capacity(len + 1);
        slots.resize_with(len, P::empty);
        for (slot, payload) in &self.slots {
            slots[*slot].clone_from(payload);
        }
        BaubleStorage::from_slots(slots)
    }

    // Serialization

    pub fn write(&self, writer: &mut dyn BitWrite) {
        self.owner.ser(writer);
        UnsignedVariableInteger::<5>::new(self.slots.len() as u64).ser(writer);
        for (slot, payload) in &self.slots {
            write_slot_index(*slot, writer);
            payload.ser(writer);
        }
    }

    pub fn read(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let owner = EntityId::de(reader)?;
        let count: usize = UnsignedVariableInteger::<5>::de(reader)?.try_to()?;
        let limit = reader.bits_remaining().min(MAX_SLOT_INDEX + 1);
        if count > limit {
            return Err(SerdeErr::LengthLimit { len: count, limit });
        }

        let mut slots = Vec::with_capacity(count);
        for _ in 0..count {
            let slot = read_slot_index(reader)?;
            if slot >= count {
                return Err(SerdeErr::InvalidValue {
                    type_name: "FullState",
                    reason: format!("slot {} listed in a state of {} slots", slot, count),
                });
            }
            let payload = P::de(reader)?;
            slots.push((slot, payload));
        }
        Ok(Self { owner, slots })
    }
}
