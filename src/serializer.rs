//! The serializer facade and its configuration.
//!
//! Messages at the root are written as bare field sequences ending in the terminator. Any other
//! root value is written as a single entry: one type byte, then the payload.

use std::io::{Read, Write};

use educe::Educe;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decode::Decoder;
use crate::descriptor::{Descriptor, Kind};
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::header::read_entry_header;
use crate::value::{Message, Value};
use crate::wire::WireType;
use crate::DEFAULT_MAX_DEPTH;

/// Settings shared by encoding and decoding.
///
/// In strict mode, messages are validated before they're written, and decoding fails on
/// unknown fields, invalid enum ordinals, and null container entries. In lenient mode those
/// are dropped and decoding carries on.
#[derive(Educe, Clone, Debug, Serialize, Deserialize)]
#[educe(Default, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SerializerConfig {
    pub strict: bool,
    /// How deeply messages and containers may nest. The root message counts as depth 1.
    #[educe(Default = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl SerializerConfig {
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Encodes and decodes values of some schema.
pub trait Serializer {
    /// Write a message as a root, returning the number of bytes written.
    fn serialize_message<D: Descriptor, W: Write>(
        &self,
        out: &mut W,
        descriptor: &D,
        message: &Message,
    ) -> Result<usize>;

    /// Write any value as a root, returning the number of bytes written.
    fn serialize<D: Descriptor, W: Write>(
        &self,
        out: &mut W,
        descriptor: &D,
        value: &Value,
    ) -> Result<usize>;

    /// Read one root value of the given type.
    fn deserialize<D: Descriptor, R: Read>(&self, input: &mut R, descriptor: &D) -> Result<Value>;
}

/// The binary tagged serializer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BinarySerializer {
    config: SerializerConfig,
}

impl BinarySerializer {
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    pub fn strict() -> Self {
        Self::new(SerializerConfig::default().strict(true))
    }

    pub fn lenient() -> Self {
        Self::new(SerializerConfig::default())
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    pub fn is_strict(&self) -> bool {
        self.config.strict
    }

    /// Encode a message into a new byte vector.
    pub fn encode_message<D: Descriptor>(&self, descriptor: &D, message: &Message) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.serialize_message(&mut out, descriptor, message)?;
        Ok(out)
    }

    /// Decode a message from a byte slice. Bytes after the terminator are left alone.
    pub fn decode_message<D: Descriptor>(&self, descriptor: &D, mut data: &[u8]) -> Result<Message> {
        match self.deserialize(&mut data, descriptor)? {
            Value::Message(m) => Ok(m),
            _ => Err(Error::TypeMismatch {
                wire: WireType::Message,
                expected: descriptor.qualified_name(),
            }),
        }
    }
}

impl Serializer for BinarySerializer {
    fn serialize_message<D: Descriptor, W: Write>(
        &self,
        out: &mut W,
        descriptor: &D,
        message: &Message,
    ) -> Result<usize> {
        let encoder = Encoder::new(&self.config);
        let depth = encoder.enter(0)?;
        let len = encoder.write_message(out, descriptor, message, depth)?;
        trace!(type_name = %descriptor.qualified_name(), len, "serialized message");
        Ok(len)
    }

    fn serialize<D: Descriptor, W: Write>(
        &self,
        out: &mut W,
        descriptor: &D,
        value: &Value,
    ) -> Result<usize> {
        match value {
            Value::Message(m) => self.serialize_message(out, descriptor, m),
            _ => Encoder::new(&self.config).write_value(out, None, descriptor, value, 0),
        }
    }

    fn deserialize<D: Descriptor, R: Read>(&self, input: &mut R, descriptor: &D) -> Result<Value> {
        let decoder = Decoder::new(&self.config);
        if descriptor.kind() == Kind::Message {
            let depth = decoder.enter(0)?;
            return decoder
                .read_message(input, descriptor, depth)
                .map(Value::Message);
        }
        let header = read_entry_header(input, 0)?.ok_or(Error::BadEntry {
            index: 0,
            expected: 1,
        })?;
        decoder
            .read_value(input, &header, Some(descriptor), 0)?
            .ok_or(Error::NullInContainer("root value"))
    }
}
