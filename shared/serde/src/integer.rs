use crate::{
    bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde, ConstBitLength,
};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

/// An integer written with a chosen number of bits.
///
/// Fixed integers always take `BITS` bits (plus a sign bit when `SIGNED`).
/// Variable integers are written in `BITS`-sized chunks, each preceded by a
/// continuation bit, so small values stay small on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    value: i128,
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    /// Creates the integer, or reports why it cannot be encoded
    pub fn try_new<T: Into<i128>>(value: T) -> Result<Self, SerdeErr> {
        let value = value.into();
        check_layout(BITS);

        if !SIGNED && value < 0 {
            return Err(SerdeErr::IntegerOverflow { value, bits: BITS });
        }
        if !VARIABLE {
            let limit: u128 = 1u128 << BITS;
            if value.unsigned_abs() >= limit {
                return Err(SerdeErr::IntegerOverflow { value, bits: BITS });
            }
        }

        Ok(Self { value })
    }

    /// Creates the integer
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be encoded with this layout.
    /// Consider using `try_new` for non-panicking error handling.
    pub fn new<T: Into<i128>>(value: T) -> Self {
        match Self::try_new(value) {
            Ok(integer) => integer,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn get(&self) -> i128 {
        self.value
    }

    /// Converts into a narrower integer type
    pub fn try_to<T: TryFrom<i128>>(&self) -> Result<T, SerdeErr> {
        T::try_from(self.value).map_err(|_| SerdeErr::InvalidValue {
            type_name: std::any::type_name::<T>(),
            reason: format!("{} is out of range", self.value),
        })
    }
}

fn check_layout(bits: u8) {
    assert!(bits > 0, "can't create an integer with 0 bits");
    assert!(bits < 128, "can't create an integer with 128 or more bits");
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn ser(&self, writer: &mut dyn BitWrite) {
        if SIGNED {
            writer.write_bit(self.value < 0);
        }

        let mut magnitude = self.value.unsigned_abs();

        if VARIABLE {
            loop {
                let proceed = magnitude >> BITS != 0;
                writer.write_bit(proceed);
                for _ in 0..BITS {
                    writer.write_bit(magnitude & 1 != 0);
                    magnitude >>= 1;
                }
                if !proceed {
                    return;
                }
            }
        }

        for _ in 0..BITS {
            writer.write_bit(magnitude & 1 != 0);
            magnitude >>= 1;
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let negative = SIGNED && reader.read_bit()?;

        let mut magnitude: u128 = 0;
        let mut shift: u32 = 0;

        loop {
            let proceed = if VARIABLE { reader.read_bit()? } else { false };

            for _ in 0..BITS {
                if reader.read_bit()? {
                    if shift >= 127 {
                        return Err(SerdeErr::InvalidValue {
                            type_name: "SerdeInteger",
                            reason: "encoded value exceeds 127 bits".to_string(),
                        });
                    }
                    magnitude |= 1u128 << shift;
                }
                shift += 1;
            }

            if !proceed {
                break;
            }
        }

        let value = magnitude as i128;
        Ok(Self {
            value: if negative { -value } else { value },
        })
    }
}

impl<const SIGNED: bool, const BITS: u8> ConstBitLength for SerdeInteger<SIGNED, false, BITS> {
    fn const_bit_length() -> u32 {
        BITS as u32 + if SIGNED { 1 } else { 0 }
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8, T: Into<i128>> From<T>
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
