use baubles_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

/// Position of a slot inside a `BaubleStorage`
pub type SlotIndex = usize;

/// Stable handle of an entity that owns or observes a bauble store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn to_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Serde for EntityId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u32::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for EntityId {
    fn const_bit_length() -> u32 {
        <u32 as ConstBitLength>::const_bit_length()
    }
}
