use baubles_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{constants::MAX_SLOT_INDEX, EntityId, Payload, SlotIndex};

/// Notification that one slot of an owner's store now holds `payload`.
///
/// Instances are reusable: `reset` refills one in place and `clear` wipes it
/// before it goes back to a pool.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotUpdate<P: Payload> {
    owner: EntityId,
    slot: SlotIndex,
    payload: P,
}

impl<P: Payload> SlotUpdate<P> {
    pub fn new(owner: EntityId, slot: SlotIndex, payload: &P) -> Self {
        Self {
            owner,
            slot,
            payload: payload.clone(),
        }
    }

    /// A cleared message, ready to be filled
    pub fn blank() -> Self {
        Self {
            owner: EntityId::new(0),
            slot: 0,
            payload: P::empty(),
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub fn into_parts(self) -> (EntityId, SlotIndex, P) {
        (self.owner, self.slot, self.payload)
    }

    /// Refills this message, reusing the payload's existing allocation where
    /// the payload type allows it
    pub fn reset(&mut self, owner: EntityId, slot: SlotIndex, payload: &P) -> &mut Self {
        self.owner = owner;
        self.slot = slot;
        self.payload.clone_from(payload);
        self
    }

    pub fn clear(&mut self) {
        self.owner = EntityId::new(0);
        self.slot = 0;
        self.payload = P::empty();
    }

    pub fn is_clear(&self) -> bool {
        self.owner.to_u32() == 0 && self.slot == 0 && self.payload.is_empty()
    }

    // Serialization

    /// Writes the body (without the message kind header)
    pub fn write(&self, writer: &mut dyn BitWrite) {
        self.owner.ser(writer);
        write_slot_index(self.slot, writer);
        self.payload.ser(writer);
    }

    /// Reads a body into this message. On error the message is left cleared.
    pub fn read_into(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr> {
        let result = Self::read_fields(reader);
        match result {
            Ok((owner, slot, payload)) => {
                self.owner = owner;
                self.slot = slot;
                self.payload = payload;
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    pub fn read(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let (owner, slot, payload) = Self::read_fields(reader)?;
        Ok(Self {
            owner,
            slot,
            payload,
        })
    }

    fn read_fields(reader: &mut BitReader) -> Result<(EntityId, SlotIndex, P), SerdeErr> {
        let owner = EntityId::de(reader)?;
        let slot = read_slot_index(reader)?;
        let payload = P::de(reader)?;
        Ok((owner, slot, payload))
    }
}

pub(crate) fn write_slot_index(slot: SlotIndex, writer: &mut dyn BitWrite) {
    UnsignedVariableInteger::<4>::new(slot as u64).ser(writer);
}

/// Reads a slot index, refusing anything past `MAX_SLOT_INDEX` so a hostile
/// message cannot make the receiver grow a store without bound
pub(crate) fn read_slot_index(reader: &mut BitReader) -> Result<SlotIndex, SerdeErr> {
    let slot: SlotIndex = UnsignedVariableInteger::<4>::de(reader)?.try_to()?;
    if slot > MAX_SLOT_INDEX {
        return Err(SerdeErr::InvalidValue {
            type_name: "SlotIndex",
            reason: format!("slot {} is past the highest slot {}", slot, MAX_SLOT_INDEX),
        });
    }
    Ok(slot)
}
