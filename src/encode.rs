//! Value encoding.
//!
//! What gets written is decided by the value itself. The descriptor is only there to check
//! that the value agrees with the schema, to give message fields their order, and to hand
//! item, key, and value descriptors down into containers.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, trace};

use crate::descriptor::{Descriptor, FieldDescriptor, Kind, StructVariant};
use crate::error::{Error, Result};
use crate::header::*;
use crate::integer::*;
use crate::serializer::SerializerConfig;
use crate::value::{Message, Value};
use crate::wire::*;

#[derive(Clone, Copy, Debug)]
pub struct Encoder<'a> {
    config: &'a SerializerConfig,
}

impl<'a> Encoder<'a> {
    pub fn new(config: &'a SerializerConfig) -> Self {
        Self { config }
    }

    pub(crate) fn enter(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.config.max_depth {
            return Err(Error::DepthLimit(self.config.max_depth));
        }
        Ok(depth)
    }

    /// Write the present fields of a message followed by the terminator. `depth` is the
    /// nesting depth of the message itself.
    pub fn write_message<D: Descriptor, W: Write>(
        &self,
        out: &mut W,
        descriptor: &D,
        message: &Message,
        depth: usize,
    ) -> Result<usize> {
        if descriptor.kind() != Kind::Message {
            return Err(Error::ValueMismatch {
                value: "Message",
                expected: descriptor.qualified_name(),
            });
        }
        if self.config.strict {
            message.validate(descriptor)?;
        }
        trace!(type_name = %descriptor.qualified_name(), fields = message.len(), "writing message");

        let mut len = 0;
        let mut written = 0;
        for field in descriptor.fields() {
            if let Some(value) = message.get(field.id()) {
                len += self.write_value(out, Some(field.id()), field.descriptor(), value, depth)?;
                written += 1;
                if descriptor.variant() == StructVariant::Union {
                    break;
                }
            }
        }
        if written < message.len() {
            debug!(
                type_name = %descriptor.qualified_name(),
                skipped = message.len() - written,
                "fields not written"
            );
        }
        len += write_terminator(out)?;
        Ok(len)
    }

    /// Write a value with its header. With an `id` the full field header is written, without
    /// it only the type byte, as for container entries.
    pub fn write_value<D: Descriptor, W: Write>(
        &self,
        out: &mut W,
        id: Option<u16>,
        descriptor: &D,
        value: &Value,
        depth: usize,
    ) -> Result<usize> {
        if id == Some(0) {
            return Err(Error::InvalidMessage(
                "field id 0 is reserved for the terminator".into(),
            ));
        }
        let kind = descriptor.kind();
        let matches = match value {
            Value::Bool(_) => kind == Kind::Bool,
            Value::Byte(_) => kind == Kind::Byte,
            Value::I16(_) => kind == Kind::I16,
            Value::I32(_) => kind == Kind::I32,
            Value::I64(_) => kind == Kind::I64,
            Value::Enum(_) => kind == Kind::Enum,
            Value::Double(_) => kind == Kind::Double,
            Value::String(_) => kind == Kind::String,
            Value::Binary(_) => kind == Kind::Binary,
            Value::Message(_) => kind == Kind::Message,
            Value::List(_) => kind == Kind::List,
            Value::Set(_) => kind == Kind::Set,
            Value::Map(_) => kind == Kind::Map,
        };
        if !matches {
            return Err(Error::ValueMismatch {
                value: value.name(),
                expected: descriptor.qualified_name(),
            });
        }

        let header = |wire, flags| match id {
            Some(id) => FieldHeader::new(id, wire, flags),
            None => FieldHeader::entry(wire, flags),
        };

        match value {
            Value::Bool(v) => {
                let flags = if *v { FLAG_TRUE } else { FLAG_FALSE };
                self.write_header(out, &header(WireType::Boolean, flags))
            }
            Value::Byte(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) | Value::Enum(_) => {
                // Only the numeric variants reach this arm.
                let number = value.as_i64().unwrap_or_default();
                if number == 0 {
                    return self.write_header(out, &header(WireType::Boolean, FLAG_FALSE));
                }
                let bytes = numeric_byte_length(number);
                let mut scratch = Vec::with_capacity(8);
                write_signed(&mut scratch, number, bytes)?;
                let len = self.write_header(out, &header(WireType::Integer, numeric_flag(bytes)))?;
                out.write_all(&scratch)?;
                Ok(len + bytes)
            }
            Value::Double(v) => {
                let len = self.write_header(out, &header(WireType::Double, 0))?;
                out.write_u64::<LittleEndian>(v.to_bits())?;
                Ok(len + 8)
            }
            Value::String(v) => {
                self.write_binary(out, header(WireType::Binary, ENCODING_UTF_8), v.as_bytes())
            }
            Value::Binary(v) => self.write_binary(
                out,
                header(WireType::Binary, ENCODING_ISO_8859_1),
                v.as_slice(),
            ),
            Value::Message(m) => {
                let depth = self.enter(depth)?;
                let len = self.write_header(out, &header(WireType::Message, 0))?;
                Ok(len + self.write_message(out, descriptor, m, depth)?)
            }
            Value::List(items) => {
                let depth = self.enter(depth)?;
                let item_type = self.item_type(descriptor, value)?;
                let mut len =
                    self.write_count(out, header(WireType::Collection, 0), items.len())?;
                for item in items {
                    len += self.write_value(out, None, item_type, item, depth)?;
                }
                Ok(len)
            }
            Value::Set(items) => {
                let depth = self.enter(depth)?;
                let item_type = self.item_type(descriptor, value)?;
                // Items are compared by their encoding
                let mut scratch = Vec::new();
                let mut bounds = Vec::with_capacity(items.len());
                for item in items {
                    let start = scratch.len();
                    self.write_value(&mut scratch, None, item_type, item, depth)?;
                    bounds.push(start..scratch.len());
                }
                let mut seen = HashSet::with_capacity(bounds.len());
                let mut distinct = Vec::with_capacity(bounds.len());
                for range in bounds {
                    let bytes = &scratch[range];
                    if seen.insert(bytes) {
                        distinct.push(bytes);
                    } else if self.config.strict {
                        return Err(Error::InvalidMessage(format!(
                            "duplicate item in {}",
                            descriptor.qualified_name()
                        )));
                    } else {
                        debug!(type_name = %descriptor.qualified_name(), "dropping duplicate set item");
                    }
                }
                let mut len =
                    self.write_count(out, header(WireType::Collection, 0), distinct.len())?;
                for bytes in distinct {
                    out.write_all(bytes)?;
                    len += bytes.len();
                }
                Ok(len)
            }
            Value::Map(entries) => {
                let depth = self.enter(depth)?;
                let (key_type, value_type) = descriptor
                    .key_descriptor()
                    .zip(descriptor.item_descriptor())
                    .ok_or_else(|| Error::ValueMismatch {
                        value: value.name(),
                        expected: descriptor.qualified_name(),
                    })?;
                let mut scratch = Vec::new();
                let mut bounds = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let start = scratch.len();
                    self.write_value(&mut scratch, None, key_type, k, depth)?;
                    let mid = scratch.len();
                    self.write_value(&mut scratch, None, value_type, v, depth)?;
                    bounds.push((start..mid, mid..scratch.len()));
                }
                // A repeated key keeps its first position and takes the last value
                let mut index: HashMap<&[u8], usize> = HashMap::with_capacity(bounds.len());
                let mut distinct: Vec<(&[u8], &[u8])> = Vec::with_capacity(bounds.len());
                for (key, val) in bounds {
                    let (key, val) = (&scratch[key], &scratch[val]);
                    match index.entry(key) {
                        Entry::Vacant(slot) => {
                            slot.insert(distinct.len());
                            distinct.push((key, val));
                        }
                        Entry::Occupied(slot) => {
                            if self.config.strict {
                                return Err(Error::InvalidMessage(format!(
                                    "duplicate key in {}",
                                    descriptor.qualified_name()
                                )));
                            }
                            debug!(type_name = %descriptor.qualified_name(), "replacing duplicate map key");
                            distinct[*slot.get()].1 = val;
                        }
                    }
                }
                let mut len = self.write_count(out, header(WireType::Map, 0), distinct.len())?;
                for (key, val) in distinct {
                    out.write_all(key)?;
                    out.write_all(val)?;
                    len += key.len() + val.len();
                }
                Ok(len)
            }
        }
    }

    /// Encode a container entry by itself: type byte, then payload. Two entries hold equal
    /// values exactly when these bytes are equal.
    pub(crate) fn entry_bytes<D: Descriptor>(
        &self,
        descriptor: &D,
        value: &Value,
        depth: usize,
    ) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_value(&mut bytes, None, descriptor, value, depth)?;
        Ok(bytes)
    }

    fn item_type<'d, D: Descriptor>(&self, descriptor: &'d D, value: &Value) -> Result<&'d D> {
        descriptor.item_descriptor().ok_or_else(|| Error::ValueMismatch {
            value: value.name(),
            expected: descriptor.qualified_name(),
        })
    }

    fn write_header<W: Write>(&self, out: &mut W, header: &FieldHeader) -> Result<usize> {
        if header.id == 0 {
            write_entry_header(out, header)
        } else {
            write_field_header(out, header)
        }
    }

    /// Write a header whose low flag bits get the length prefix width, then the length.
    fn write_prefixed<W: Write>(
        &self,
        out: &mut W,
        mut header: FieldHeader,
        len: usize,
    ) -> Result<usize> {
        if len > u32::MAX as usize {
            return Err(Error::ValueTooLarge {
                value: len as i64,
                bytes: 4,
            });
        }
        let bytes = length_prefix_bytes(len);
        header.flags |= (bytes as u8 - 1) & WIDTH_MASK;
        let written = self.write_header(out, &header)?;
        Ok(written + write_unsigned(out, len as u64, bytes)?)
    }

    fn write_binary<W: Write>(
        &self,
        out: &mut W,
        header: FieldHeader,
        bytes: &[u8],
    ) -> Result<usize> {
        let len = self.write_prefixed(out, header, bytes.len())?;
        out.write_all(bytes)?;
        Ok(len + bytes.len())
    }

    fn write_count<W: Write>(
        &self,
        out: &mut W,
        header: FieldHeader,
        count: usize,
    ) -> Result<usize> {
        self.write_prefixed(out, header, count)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::Decoder;
    use crate::Binary;
    use crate::schema::*;

    fn item() -> Type {
        StructType::new("test.Item")
            .field(Field::new(1, "name", Type::String))
            .field(Field::new(5, "count", Type::I32))
            .field(Field::new(7, "level", Type::I64))
            .field(Field::new(9, "inner", StructType::new("test.Inner").into()))
            .into()
    }

    fn encode(message: Message) -> Vec<u8> {
        let config = SerializerConfig::default();
        let mut out = Vec::new();
        let len = Encoder::new(&config)
            .write_message(&mut out, &item(), &message, 1)
            .unwrap();
        assert_eq!(len, out.len());
        out
    }

    fn encode_entry(ty: &Type, value: Value) -> Vec<u8> {
        let config = SerializerConfig::default();
        let mut out = Vec::new();
        let len = Encoder::new(&config)
            .write_value(&mut out, None, ty, &value, 0)
            .unwrap();
        assert_eq!(len, out.len());
        out
    }

    #[test]
    fn known_fields() {
        assert_eq!(
            encode(Message::new().with(7, 0i64)),
            vec![0x07, 0x00, 0x10, 0x00, 0x00]
        );
        assert_eq!(
            encode(Message::new().with(5, 300)),
            vec![0x05, 0x00, 0x21, 0x2C, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            encode(Message::new().with(1, "hi")),
            vec![0x01, 0x00, 0x44, 0x02, 0x68, 0x69, 0x00, 0x00]
        );
        assert_eq!(
            encode(Message::new().with(9, Message::new())),
            vec![0x09, 0x00, 0x50, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(encode(Message::new()), vec![0x00, 0x00]);
    }

    #[test]
    fn integer_widths() {
        let test_cases: Vec<(Type, Value, Vec<u8>)> = vec![
            (Type::Byte, Value::Byte(-1), vec![0x20, 0x81]),
            (Type::Byte, Value::Byte(i8::MIN), vec![0x20, 0x80]),
            (Type::I16, Value::I16(127), vec![0x20, 0x7F]),
            (Type::I16, Value::I16(128), vec![0x21, 0x80, 0x00]),
            (Type::I32, Value::I32(-32768), vec![0x21, 0x00, 0x80]),
            (Type::I32, Value::I32(32768), vec![0x22, 0x00, 0x80, 0x00, 0x00]),
            (
                Type::I64,
                Value::I64(1 << 40),
                vec![0x23, 0, 0, 0, 0, 0, 0x01, 0, 0],
            ),
            (
                Type::I64,
                Value::I64(i64::MIN),
                vec![0x23, 0, 0, 0, 0, 0, 0, 0, 0x80],
            ),
        ];
        for (index, (ty, value, bytes)) in test_cases.into_iter().enumerate() {
            assert_eq!(encode_entry(&ty, value), bytes, "Test #{}", index);
        }
    }

    #[test]
    fn doubles() {
        let mut expected = vec![0x30];
        expected.extend_from_slice(&1.5f64.to_bits().to_le_bytes());
        assert_eq!(encode_entry(&Type::Double, Value::Double(1.5)), expected);
    }

    #[test]
    fn length_prefixes() {
        let enc = encode_entry(&Type::Binary, Binary::new(vec![7; 300]).into());
        assert_eq!(&enc[..3], &[0x41, 0x2C, 0x01]);
        assert_eq!(enc.len(), 303);

        let enc = encode_entry(&Type::Binary, Binary::new(vec![0; 70_000]).into());
        assert_eq!(&enc[..4], &[0x42, 0x70, 0x11, 0x01]);

        let enc = encode_entry(&Type::Binary, Binary::new(Vec::new()).into());
        assert_eq!(enc, vec![0x40, 0x00]);
    }

    #[test]
    fn containers() {
        let enc = encode_entry(
            &Type::set(Type::Bool),
            Value::Set(vec![true.into(), false.into()]),
        );
        assert_eq!(enc, vec![0x70, 0x02, 0x11, 0x10]);

        let enc = encode_entry(
            &Type::map(Type::String, Type::I32),
            Value::Map(vec![("a".into(), 1.into())]),
        );
        assert_eq!(enc, vec![0x60, 0x01, 0x44, 0x01, 0x61, 0x20, 0x01]);

        let enc = encode_entry(&Type::list(Type::I32), Value::List(Vec::new()));
        assert_eq!(enc, vec![0x70, 0x00]);
    }

    #[test]
    fn zero_enum() {
        let t: Type = StructType::new("test.Switch")
            .field(Field::new(
                7,
                "state",
                EnumType::new("test.State").value("OFF", 0).value("ON", 1).into(),
            ))
            .into();
        let config = SerializerConfig::default().strict(true);
        let message = Message::new().with(7, Value::Enum(0));
        let mut out = Vec::new();
        Encoder::new(&config)
            .write_message(&mut out, &t, &message, 1)
            .unwrap();
        assert_eq!(out, vec![0x07, 0x00, 0x10, 0x00, 0x00]);

        let dec = Decoder::new(&config)
            .read_message(&mut &out[..], &t, 1)
            .unwrap();
        assert_eq!(dec.get(7), Some(&Value::Enum(0)));
    }

    #[test]
    fn duplicate_set_items() {
        let ty = Type::set(Type::I32);
        let value = Value::Set(vec![1.into(), 2.into(), 1.into()]);

        let config = SerializerConfig::default().strict(true);
        let mut out = Vec::new();
        assert!(matches!(
            Encoder::new(&config).write_value(&mut out, Some(1), &ty, &value, 1),
            Err(Error::InvalidMessage(_))
        ));

        // Lenient mode writes each distinct item once, with the count to match
        assert_eq!(
            encode_entry(&ty, value),
            vec![0x70, 0x02, 0x20, 0x01, 0x20, 0x02]
        );
    }

    #[test]
    fn duplicate_map_keys() {
        let ty = Type::map(Type::String, Type::I32);
        let value = Value::Map(vec![
            ("a".into(), 1.into()),
            ("b".into(), 2.into()),
            ("a".into(), 3.into()),
        ]);

        let config = SerializerConfig::default().strict(true);
        let mut out = Vec::new();
        assert!(matches!(
            Encoder::new(&config).write_value(&mut out, Some(1), &ty, &value, 1),
            Err(Error::InvalidMessage(_))
        ));

        // The first position is kept, with the last value
        assert_eq!(
            encode_entry(&ty, value),
            vec![0x60, 0x02, 0x44, 0x01, 0x61, 0x20, 0x03, 0x44, 0x01, 0x62, 0x20, 0x02]
        );
    }

    #[test]
    fn mismatches() {
        let config = SerializerConfig::default();
        let encoder = Encoder::new(&config);
        let mut out = Vec::new();
        assert!(matches!(
            encoder.write_value(&mut out, Some(1), &Type::I32, &Value::I64(1), 1),
            Err(Error::ValueMismatch { value: "I64", .. })
        ));
        assert!(matches!(
            encoder.write_value(&mut out, Some(0), &Type::I32, &Value::I32(1), 1),
            Err(Error::InvalidMessage(_))
        ));
        // Container items are checked too
        assert!(matches!(
            encoder.write_value(
                &mut out,
                Some(1),
                &Type::list(Type::I32),
                &Value::List(vec!["x".into()]),
                1
            ),
            Err(Error::ValueMismatch { value: "String", .. })
        ));
    }

    #[test]
    fn depth_limit() {
        let config = SerializerConfig::default().max_depth(2);
        let encoder = Encoder::new(&config);
        let message = Message::new().with(9, Message::new());
        assert!(encoder
            .write_message(&mut Vec::new(), &item(), &message, 1)
            .is_ok());
        assert!(matches!(
            encoder.write_message(&mut Vec::new(), &item(), &message, 2),
            Err(Error::DepthLimit(2))
        ));
    }
}
