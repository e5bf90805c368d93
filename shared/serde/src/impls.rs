use std::sync::Arc;

use crate::{
    bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, integer::UnsignedVariableInteger,
    serde::Serde, ConstBitLength,
};

/// Strings and sequences longer than this are rejected on read
pub const MAX_SEQUENCE_LEN: usize = 1 << 16;

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }

    fn bit_length(&self) -> u32 {
        1
    }
}

impl ConstBitLength for bool {
    fn const_bit_length() -> u32 {
        1
    }
}

macro_rules! impl_serde_for_le_bytes {
    ($($ty:ty),*) => {
        $(
            impl Serde for $ty {
                fn ser(&self, writer: &mut dyn BitWrite) {
                    writer.write_bytes(&self.to_le_bytes());
                }

                fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                    let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                    for byte in bytes.iter_mut() {
                        *byte = reader.read_byte()?;
                    }
                    Ok(<$ty>::from_le_bytes(bytes))
                }

                fn bit_length(&self) -> u32 {
                    <$ty as ConstBitLength>::const_bit_length()
                }
            }

            impl ConstBitLength for $ty {
                fn const_bit_length() -> u32 {
                    (std::mem::size_of::<$ty>() * 8) as u32
                }
            }
        )*
    };
}

impl_serde_for_le_bytes!(u8, u16, u32, u64, i32);

fn write_len(len: usize, writer: &mut dyn BitWrite) {
    UnsignedVariableInteger::<7>::new(len as u64).ser(writer);
}

fn read_len(reader: &mut BitReader) -> Result<usize, SerdeErr> {
    let len: usize = UnsignedVariableInteger::<7>::de(reader)?.try_to()?;
    if len > MAX_SEQUENCE_LEN {
        return Err(SerdeErr::LengthLimit {
            len,
            limit: MAX_SEQUENCE_LEN,
        });
    }
    Ok(len)
}

fn read_utf8(reader: &mut BitReader) -> Result<String, SerdeErr> {
    let len = read_len(reader)?;
    let mut bytes = Vec::with_capacity(len);
    for _ in 0..len {
        bytes.push(reader.read_byte()?);
    }
    String::from_utf8(bytes).map_err(|err| SerdeErr::InvalidValue {
        type_name: "String",
        reason: err.to_string(),
    })
}

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_len(self.len(), writer);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        read_utf8(reader)
    }
}

impl Serde for Arc<str> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_len(self.len(), writer);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        read_utf8(reader).map(Arc::from)
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Some(value) => {
                writer.write_bit(true);
                value.ser(writer);
            }
            None => writer.write_bit(false),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_len(self.len(), writer);
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let len = read_len(reader)?;
        let mut output = Vec::with_capacity(len.min(256));
        for _ in 0..len {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}
