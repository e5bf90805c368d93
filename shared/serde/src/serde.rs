use crate::{bit_reader::BitReader, bit_writer::BitCounter, bit_writer::BitWrite, error::SerdeErr};

/// A type that can be written to and read from a bit stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes the value into the outgoing bit stream
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Reads a value out of the incoming bit stream
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;

    /// Number of bits `ser` will write for this value
    fn bit_length(&self) -> u32 {
        let mut counter = BitCounter::new();
        self.ser(&mut counter);
        counter.bits_written()
    }
}

/// A Serde type whose encoded length never depends on its value
pub trait ConstBitLength {
    fn const_bit_length() -> u32;
}
