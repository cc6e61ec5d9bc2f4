use std::fmt;

use crate::error::{Error, Result};

/// Mask for the wire type nibble of a type byte.
pub const TYPE_MASK: u8 = 0xf0;
/// Mask for the flags nibble of a type byte.
pub const FLAGS_MASK: u8 = 0x0f;

/// Boolean flag values.
pub const FLAG_TRUE: u8 = 0x01;
pub const FLAG_FALSE: u8 = 0x00;

/// String encoding flags for `Binary` payloads.
pub const ENCODING_ISO_8859_1: u8 = 0x00;
pub const ENCODING_UTF_8: u8 = 0x04;

/// Integer magnitude width classes.
pub const FIXED_8: u8 = 0x00;
pub const FIXED_16: u8 = 0x01;
pub const FIXED_32: u8 = 0x02;
pub const FIXED_64: u8 = 0x03;

/// Low two bits holding either the integer width class, or the length/count prefix width.
pub const WIDTH_MASK: u8 = 0x03;

/// The wire types. Each occupies the top nibble of a type byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Boolean, or the value zero of any integer or enum.
    Boolean,
    /// Signed integer, 1, 2, 4, or 8 bytes.
    Integer,
    /// 64-bit IEEE-754 float.
    Double,
    /// Length-prefixed bytes, either a string or a binary blob.
    Binary,
    /// A nested message, terminated by field id 0.
    Message,
    /// Count-prefixed key/value entries.
    Map,
    /// Count-prefixed items, used for both lists and sets.
    Collection,
}

impl WireType {
    /// Find the wire type from a type byte. Only the top nibble is looked at.
    pub fn from_u8(n: u8) -> Result<WireType> {
        match n & TYPE_MASK {
            0x10 => Ok(WireType::Boolean),
            0x20 => Ok(WireType::Integer),
            0x30 => Ok(WireType::Double),
            0x40 => Ok(WireType::Binary),
            0x50 => Ok(WireType::Message),
            0x60 => Ok(WireType::Map),
            0x70 => Ok(WireType::Collection),
            _ => Err(Error::BadWireType(n)),
        }
    }

    /// The tag, already shifted into the top nibble.
    pub fn into_u8(self) -> u8 {
        match self {
            WireType::Boolean => 0x10,
            WireType::Integer => 0x20,
            WireType::Double => 0x30,
            WireType::Binary => 0x40,
            WireType::Message => 0x50,
            WireType::Map => 0x60,
            WireType::Collection => 0x70,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WireType::Boolean => "boolean",
            WireType::Integer => "integer",
            WireType::Double => "double",
            WireType::Binary => "binary",
            WireType::Message => "message",
            WireType::Map => "map",
            WireType::Collection => "collection",
        }
    }
}

impl From<WireType> for u8 {
    fn from(val: WireType) -> u8 {
        val.into_u8()
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte count of an integer magnitude for a width class flag.
pub fn numeric_bytes(flags: u8) -> usize {
    match flags & WIDTH_MASK {
        FIXED_8 => 1,
        FIXED_16 => 2,
        FIXED_32 => 4,
        _ => 8,
    }
}

/// Width class flag for a magnitude byte count. Counts other than 1, 2, and 4 map to 8 bytes.
pub fn numeric_flag(bytes: usize) -> u8 {
    match bytes {
        1 => FIXED_8,
        2 => FIXED_16,
        4 => FIXED_32,
        _ => FIXED_64,
    }
}

/// Byte count of a length or count prefix.
pub fn length_bytes(flags: u8) -> usize {
    (flags & WIDTH_MASK) as usize + 1
}
