use std::fmt;
use std::io;

use crate::wire::WireType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    /// The stream ended in the middle of a field, entry, or message.
    UnexpectedEof { step: &'static str },
    /// The top nibble of a type byte matched none of the wire types.
    BadWireType(u8),
    /// A zero tag/flags byte was found where a collection or map entry was expected.
    BadEntry { index: usize, expected: usize },
    /// The wire type read from the stream can't be turned into the expected descriptor type.
    TypeMismatch {
        wire: WireType,
        expected: String,
    },
    /// A value was encountered on encode that doesn't agree with its descriptor.
    ValueMismatch {
        value: &'static str,
        expected: String,
    },
    /// An integer magnitude didn't fit the byte width chosen for it.
    ValueTooLarge { value: i64, bytes: usize },
    /// Strict mode: a field id wasn't found in the message descriptor.
    UnknownField { id: u16, type_name: String },
    /// Strict mode: an enum ordinal isn't part of the enum's domain.
    InvalidEnumValue { ordinal: i32, type_name: String },
    /// Strict mode: a list, set, or map held a null item, key, or value.
    NullInContainer(&'static str),
    /// Strict mode: the message is missing required fields, or a union doesn't have exactly
    /// one field set.
    InvalidMessage(String),
    /// A UTF-8 flagged string payload wasn't valid UTF-8.
    InvalidString(std::string::FromUtf8Error),
    /// Nesting of messages and containers went past the configured limit.
    DepthLimit(usize),
    /// Failure in the underlying stream.
    Io(io::Error),
}

impl Error {
    /// Convert an I/O error raised during a specific step, turning a short read into
    /// `UnexpectedEof`.
    pub(crate) fn from_io(step: &'static str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof { step }
        } else {
            Error::Io(err)
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::UnexpectedEof { step } => write!(f, "Unexpected end of stream on step [{}]", step),
            Error::BadWireType(byte) => write!(f, "No such wire type: 0x{:02x}", byte),
            Error::BadEntry { index, expected } => write!(
                f,
                "Unexpected end of entries: got {} of {} entries",
                index, expected
            ),
            Error::TypeMismatch {
                wire,
                ref expected,
            } => write!(f, "Invalid type for {} encoding: {}", wire, expected),
            Error::ValueMismatch {
                value,
                ref expected,
            } => write!(f, "Can't write {} value as {}", value, expected),
            Error::ValueTooLarge { value, bytes } => write!(
                f,
                "Number {} is too large to write to {} bytes",
                value, bytes
            ),
            Error::UnknownField { id, ref type_name } => {
                write!(f, "Unknown field {} for type {}", id, type_name)
            }
            Error::InvalidEnumValue {
                ordinal,
                ref type_name,
            } => write!(f, "{} is not a valid {} enum value", ordinal, type_name),
            Error::NullInContainer(what) => write!(f, "Null {}", what),
            Error::InvalidMessage(ref msg) => write!(f, "Message not valid: {}", msg),
            Error::InvalidString(ref err) => write!(f, "Invalid UTF-8 string: {}", err),
            Error::DepthLimit(max) => write!(f, "Hit nesting limit of {}", max),
            Error::Io(ref err) => write!(f, "Stream failure: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::InvalidString(ref err) => Some(err),
            _ => None,
        }
    }
}

impl std::convert::From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::from_io("stream", e)
    }
}
