use baubles_serde::{BitReader, BitWrite, BitWriter, Serde, UnsignedInteger};

use crate::{EntityId, Payload, StringPool};

use super::{error::DecodeError, full_state::FullState, slot_update::SlotUpdate};

/// Header tag that precedes every message body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    SlotUpdate,
    FullState,
}

impl MessageKind {
    fn to_u8(self) -> u8 {
        match self {
            MessageKind::SlotUpdate => 0,
            MessageKind::FullState => 1,
        }
    }

    fn from_u8(kind: u8) -> Result<Self, DecodeError> {
        match kind {
            0 => Ok(MessageKind::SlotUpdate),
            1 => Ok(MessageKind::FullState),
            kind => Err(DecodeError::UnknownMessageKind { kind }),
        }
    }

    pub fn write(self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<2>::new(self.to_u8()).ser(writer);
    }

    pub fn read(reader: &mut BitReader) -> Result<Self, DecodeError> {
        let kind: u8 = UnsignedInteger::<2>::de(reader)?.try_to()?;
        Self::from_u8(kind)
    }
}

/// Any message the server sends to an observer
#[derive(Clone, Debug, PartialEq)]
pub enum BaublesMessage<P: Payload> {
    SlotUpdate(SlotUpdate<P>),
    FullState(FullState<P>),
}

impl<P: Payload> BaublesMessage<P> {
    pub fn kind(&self) -> MessageKind {
        match self {
            BaublesMessage::SlotUpdate(_) => MessageKind::SlotUpdate,
            BaublesMessage::FullState(_) => MessageKind::FullState,
        }
    }

    pub fn owner(&self) -> EntityId {
        match self {
            BaublesMessage::SlotUpdate(update) => update.owner(),
            BaublesMessage::FullState(state) => state.owner(),
        }
    }

    pub fn write(&self, writer: &mut dyn BitWrite) {
        self.kind().write(writer);
        match self {
            BaublesMessage::SlotUpdate(update) => update.write(writer),
            BaublesMessage::FullState(state) => state.write(writer),
        }
    }

    pub fn read(reader: &mut BitReader) -> Result<Self, DecodeError> {
        match MessageKind::read(reader)? {
            MessageKind::SlotUpdate => Ok(BaublesMessage::SlotUpdate(SlotUpdate::read(reader)?)),
            MessageKind::FullState => Ok(BaublesMessage::FullState(FullState::read(reader)?)),
        }
    }

    /// Swaps payload strings for the pool's canonical instances
    pub fn canonicalize(&mut self, strings: &StringPool) {
        match self {
            BaublesMessage::SlotUpdate(update) => update.payload_mut().canonicalize(strings),
            BaublesMessage::FullState(state) => {
                for (_, payload) in state.slots_mut() {
                    payload.canonicalize(strings);
                }
            }
        }
    }
}

/// Encodes a slot update, header included
pub fn encode_slot_update<P: Payload>(update: &SlotUpdate<P>) -> Vec<u8> {
    let mut writer = BitWriter::new();
    MessageKind::SlotUpdate.write(&mut writer);
    update.write(&mut writer);
    writer.to_bytes()
}

/// Encodes a full state, header included
pub fn encode_full_state<P: Payload>(state: &FullState<P>) -> Vec<u8> {
    let mut writer = BitWriter::new();
    MessageKind::FullState.write(&mut writer);
    state.write(&mut writer);
    writer.to_bytes()
}
