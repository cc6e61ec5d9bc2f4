//! Field and entry headers.
//!
//! A field header is the field id as a 2-byte little-endian integer, followed by one type byte
//! holding the wire type in the top nibble and its flags in the bottom nibble. Field id 0 with
//! no type byte after it ends a message. Entries of lists, sets, and maps only get the type
//! byte.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::wire::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldHeader {
    /// Field id. For entry headers, this is the id of the field holding the container.
    pub id: u16,
    pub wire: WireType,
    pub flags: u8,
}

impl FieldHeader {
    pub fn new(id: u16, wire: WireType, flags: u8) -> Self {
        Self {
            id,
            wire,
            flags: flags & FLAGS_MASK,
        }
    }

    /// Header for a container entry, or any value written without a field id.
    pub fn entry(wire: WireType, flags: u8) -> Self {
        Self::new(0, wire, flags)
    }

    /// Split a type byte into wire type and flags.
    pub fn from_type_byte(id: u16, byte: u8) -> Result<Self> {
        Ok(Self::new(id, WireType::from_u8(byte)?, byte))
    }

    pub fn type_byte(&self) -> u8 {
        self.wire.into_u8() | self.flags
    }

    pub fn bool_value(&self) -> bool {
        self.flags & FLAG_TRUE != 0
    }

    /// Magnitude width of an `Integer` payload.
    pub fn numeric_bytes(&self) -> usize {
        numeric_bytes(self.flags)
    }

    /// Prefix width of a `Binary` length, or a `Map`/`Collection` count.
    pub fn length_bytes(&self) -> usize {
        length_bytes(self.flags)
    }

    pub fn is_utf8(&self) -> bool {
        self.flags & ENCODING_UTF_8 != 0
    }
}

/// Write the full header: field id, then type byte.
pub fn write_field_header<W: Write>(out: &mut W, header: &FieldHeader) -> Result<usize> {
    debug_assert!(header.id != 0, "field id 0 is reserved for the terminator");
    out.write_u16::<LittleEndian>(header.id)?;
    out.write_u8(header.type_byte())?;
    Ok(3)
}

/// Write only the type byte.
pub fn write_entry_header<W: Write>(out: &mut W, header: &FieldHeader) -> Result<usize> {
    out.write_u8(header.type_byte())?;
    Ok(1)
}

/// Write the field id 0 that ends a message.
pub fn write_terminator<W: Write>(out: &mut W) -> Result<usize> {
    out.write_u16::<LittleEndian>(0)?;
    Ok(2)
}

/// Read a full field header. Returns `None` when field id 0 is read, in which case nothing
/// after the id is consumed.
pub fn read_field_header<R: Read>(input: &mut R) -> Result<Option<FieldHeader>> {
    let id = input
        .read_u16::<LittleEndian>()
        .map_err(|e| Error::from_io("read field id", e))?;
    if id == 0 {
        return Ok(None);
    }
    let byte = input
        .read_u8()
        .map_err(|e| Error::from_io("read field type", e))?;
    FieldHeader::from_type_byte(id, byte).map(Some)
}

/// Read an entry's type byte. Returns `None` on a zero byte, which never starts a valid entry.
pub fn read_entry_header<R: Read>(input: &mut R, id: u16) -> Result<Option<FieldHeader>> {
    let byte = input
        .read_u8()
        .map_err(|e| Error::from_io("read entry type", e))?;
    if byte == 0 {
        return Ok(None);
    }
    FieldHeader::from_type_byte(id, byte).map(Some)
}
