//! Integer payloads: signed magnitudes with the sign in the top bit of the last byte, and the
//! unsigned little-endian prefixes used for lengths and entry counts.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Smallest magnitude width, in bytes, that holds `value` within the standard signed ranges.
pub fn numeric_byte_length(value: i64) -> usize {
    if value > i32::MAX as i64 || value < i32::MIN as i64 {
        8
    } else if value > i16::MAX as i64 || value < i16::MIN as i64 {
        4
    } else if value > i8::MAX as i64 || value < i8::MIN as i64 {
        2
    } else {
        1
    }
}

/// Width in bytes of the length or count prefix for `len`.
pub fn length_prefix_bytes(len: usize) -> usize {
    if len > (1 << 24) - 1 {
        4
    } else if len > (1 << 16) - 1 {
        3
    } else if len > (1 << 8) - 1 {
        2
    } else {
        1
    }
}

/// The minimum signed value of a given byte width.
fn width_min(bytes: usize) -> i64 {
    if bytes >= 8 {
        i64::MIN
    } else {
        -(1i64 << (8 * bytes - 1))
    }
}

/// Write `value` as a `bytes`-wide magnitude, least significant byte first, with the sign in
/// bit 0x80 of the last byte.
///
/// The minimum value of the width has no positive counterpart, and is written as a zero
/// magnitude with the sign bit set.
pub fn write_signed<W: Write>(out: &mut W, value: i64, bytes: usize) -> Result<usize> {
    debug_assert!((1..=8).contains(&bytes));
    let negative = value < 0;
    let mut magnitude = if value == width_min(bytes) {
        0
    } else {
        value.unsigned_abs()
    };

    let mut raw = 0u64;
    for i in 0..bytes {
        let shift = 8 * i;
        if i == bytes - 1 {
            let mut top = magnitude & 0x7f;
            if negative {
                top |= 0x80;
            }
            raw |= top << shift;
            magnitude >>= 7;
        } else {
            raw |= (magnitude & 0xff) << shift;
            magnitude >>= 8;
        }
    }
    if magnitude > 0 {
        return Err(Error::ValueTooLarge { value, bytes });
    }

    out.write_uint::<LittleEndian>(raw, bytes)?;
    Ok(bytes)
}

/// Read a `bytes`-wide signed magnitude written by [`write_signed`].
pub fn read_signed<R: Read>(input: &mut R, bytes: usize) -> Result<i64> {
    debug_assert!((1..=8).contains(&bytes));
    let raw = input
        .read_uint::<LittleEndian>(bytes)
        .map_err(|e| Error::from_io("read integer", e))?;
    let sign_bit = 1u64 << (8 * bytes - 1);
    let negative = raw & sign_bit != 0;
    let magnitude = raw & !sign_bit;
    Ok(match (negative, magnitude) {
        (true, 0) => width_min(bytes),
        (true, m) => -(m as i64),
        (false, m) => m as i64,
    })
}

/// Write an unsigned little-endian prefix.
pub fn write_unsigned<W: Write>(out: &mut W, value: u64, bytes: usize) -> Result<usize> {
    debug_assert!((1..=8).contains(&bytes));
    if bytes < 8 && (value >> (8 * bytes)) != 0 {
        return Err(Error::ValueTooLarge {
            value: value as i64,
            bytes,
        });
    }
    out.write_uint::<LittleEndian>(value, bytes)?;
    Ok(bytes)
}

/// Read an unsigned little-endian prefix.
pub fn read_unsigned<R: Read>(input: &mut R, bytes: usize, step: &'static str) -> Result<u64> {
    debug_assert!((1..=8).contains(&bytes));
    input
        .read_uint::<LittleEndian>(bytes)
        .map_err(|e| Error::from_io(step, e))
}
