//! Value decoding.
//!
//! The header read from the stream says how to parse a value, and the expected descriptor says
//! what to turn it into. With no expected descriptor the value is still parsed in full, so the
//! stream ends up right after it, but nothing is kept.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, trace};

use crate::descriptor::{Descriptor, FieldDescriptor, Kind};
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::header::*;
use crate::integer::*;
use crate::serializer::SerializerConfig;
use crate::value::{Binary, Message, Value};
use crate::wire::WireType;

/// Upper bound on up-front allocation for containers, whatever the count on the wire says.
const MAX_PREALLOC: usize = 4096;

#[derive(Clone, Copy, Debug)]
pub struct Decoder<'a> {
    config: &'a SerializerConfig,
}

impl<'a> Decoder<'a> {
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

    fn mismatch<D: Descriptor>(wire: WireType, descriptor: &D) -> Error {
        Error::TypeMismatch {
            wire,
            expected: descriptor.qualified_name(),
        }
    }

    /// Read message fields up to and including the terminator. `depth` is the nesting depth of
    /// the message itself.
    pub fn read_message<D: Descriptor, R: Read>(
        &self,
        input: &mut R,
        descriptor: &D,
        depth: usize,
    ) -> Result<Message> {
        if descriptor.kind() != Kind::Message {
            return Err(Self::mismatch(WireType::Message, descriptor));
        }
        let mut message = Message::new();
        while let Some(header) = read_field_header(input)? {
            match descriptor.field_by_id(header.id) {
                Some(field) => {
                    if let Some(value) =
                        self.read_value(input, &header, Some(field.descriptor()), depth)?
                    {
                        message.set(header.id, value);
                    }
                }
                None => {
                    if self.config.strict {
                        return Err(Error::UnknownField {
                            id: header.id,
                            type_name: descriptor.qualified_name(),
                        });
                    }
                    debug!(
                        field = header.id,
                        wire = %header.wire,
                        type_name = %descriptor.qualified_name(),
                        "skipping unknown field"
                    );
                    self.read_value::<D, R>(input, &header, None, depth)?;
                }
            }
        }
        trace!(type_name = %descriptor.qualified_name(), fields = message.len(), "read message");
        Ok(message)
    }

    /// Read and discard message fields up to and including the terminator.
    pub fn consume_message<D: Descriptor, R: Read>(&self, input: &mut R, depth: usize) -> Result<()> {
        while let Some(header) = read_field_header(input)? {
            self.read_value::<D, R>(input, &header, None, depth)?;
        }
        Ok(())
    }

    /// Read the payload belonging to `header`. `depth` is the nesting depth of the enclosing
    /// message or container.
    ///
    /// Returns `None` if nothing was expected, or if the value was dropped in lenient mode.
    pub fn read_value<D: Descriptor, R: Read>(
        &self,
        input: &mut R,
        header: &FieldHeader,
        expected: Option<&D>,
        depth: usize,
    ) -> Result<Option<Value>> {
        match header.wire {
            WireType::Boolean => {
                let flag = header.bool_value();
                match expected {
                    None => Ok(None),
                    Some(d) => match d.kind() {
                        Kind::Bool => Ok(Some(Value::Bool(flag))),
                        Kind::Byte => Ok(Some(Value::Byte(flag as i8))),
                        Kind::I16 => Ok(Some(Value::I16(flag as i16))),
                        Kind::I32 => Ok(Some(Value::I32(flag as i32))),
                        Kind::I64 => Ok(Some(Value::I64(flag as i64))),
                        Kind::Double => Ok(Some(Value::Double(flag as u8 as f64))),
                        Kind::Enum => self.read_enum(d, flag as i32),
                        _ => Err(Self::mismatch(header.wire, d)),
                    },
                }
            }
            WireType::Integer => {
                if let Some(d) = expected {
                    if !d.kind().is_numeric() && d.kind() != Kind::Bool {
                        return Err(Self::mismatch(header.wire, d));
                    }
                }
                let number = read_signed(input, header.numeric_bytes())?;
                match expected {
                    None => Ok(None),
                    Some(d) => match d.kind() {
                        Kind::Bool => Ok(Some(Value::Bool(number != 0))),
                        // Narrowing truncates, like an `as` cast.
                        Kind::Byte => Ok(Some(Value::Byte(number as i8))),
                        Kind::I16 => Ok(Some(Value::I16(number as i16))),
                        Kind::I32 => Ok(Some(Value::I32(number as i32))),
                        Kind::I64 => Ok(Some(Value::I64(number))),
                        _ => self.read_enum(d, number as i32),
                    },
                }
            }
            WireType::Double => {
                if let Some(d) = expected {
                    if d.kind() != Kind::Double {
                        return Err(Self::mismatch(header.wire, d));
                    }
                }
                let bits = input
                    .read_u64::<LittleEndian>()
                    .map_err(|e| Error::from_io("read double", e))?;
                Ok(expected.map(|_| Value::Double(f64::from_bits(bits))))
            }
            WireType::Binary => {
                let kind = expected.map(|d| d.kind());
                if let Some(d) = expected {
                    if !matches!(d.kind(), Kind::String | Kind::Binary) {
                        return Err(Self::mismatch(header.wire, d));
                    }
                }
                let len = read_unsigned(input, header.length_bytes(), "read binary length")?;
                match kind {
                    None => {
                        skip_bytes(input, len)?;
                        Ok(None)
                    }
                    Some(Kind::String) => {
                        let bytes = read_bytes(input, len)?;
                        let string = if header.is_utf8() {
                            String::from_utf8(bytes).map_err(Error::InvalidString)?
                        } else {
                            // ISO-8859-1 maps each byte to the code point of the same value.
                            bytes.iter().map(|&b| b as char).collect()
                        };
                        Ok(Some(Value::String(string)))
                    }
                    Some(_) => Ok(Some(Value::Binary(Binary::new(read_bytes(input, len)?)))),
                }
            }
            WireType::Message => {
                let depth = self.enter(depth)?;
                match expected {
                    None => {
                        self.consume_message::<D, R>(input, depth)?;
                        Ok(None)
                    }
                    Some(d) => {
                        if d.kind() != Kind::Message {
                            return Err(Self::mismatch(header.wire, d));
                        }
                        Ok(Some(Value::Message(self.read_message(input, d, depth)?)))
                    }
                }
            }
            WireType::Map => {
                let depth = self.enter(depth)?;
                let types = match expected {
                    None => None,
                    Some(d) => match (d.kind(), d.key_descriptor(), d.item_descriptor()) {
                        (Kind::Map, Some(k), Some(v)) => Some((k, v)),
                        _ => return Err(Self::mismatch(header.wire, d)),
                    },
                };
                let size = read_unsigned(input, header.length_bytes(), "read map size")? as usize;

                // Nothing is kept in consume mode
                let mut entries: Option<Vec<(Value, Value)>> =
                    types.map(|_| Vec::with_capacity(size.min(MAX_PREALLOC)));
                let mut keys: HashMap<Vec<u8>, usize> = HashMap::new();
                let canonical = self.canonical_config();
                for index in 0..size {
                    let key_header = self.entry_header(input, header.id, index, size)?;
                    let key = self.read_value(input, &key_header, types.map(|t| t.0), depth)?;
                    let value_header = self.entry_header(input, header.id, index, size)?;
                    let value = self.read_value(input, &value_header, types.map(|t| t.1), depth)?;
                    let (entries, key_type) = match (entries.as_mut(), types) {
                        (Some(entries), Some((key_type, _))) => (entries, key_type),
                        _ => continue,
                    };
                    match (key, value) {
                        (Some(key), Some(value)) => {
                            let bytes = Encoder::new(&canonical).entry_bytes(key_type, &key, depth)?;
                            match keys.entry(bytes) {
                                Entry::Occupied(slot) => {
                                    debug!(field = header.id, index, "replacing duplicate map key");
                                    entries[*slot.get()].1 = value;
                                }
                                Entry::Vacant(slot) => {
                                    slot.insert(entries.len());
                                    entries.push((key, value));
                                }
                            }
                        }
                        _ => {
                            // Not reachable in strict mode, which already failed on the invalid
                            // enum that produced the null.
                            if self.config.strict {
                                return Err(Error::NullInContainer("key or value in map"));
                            }
                            debug!(field = header.id, index, "dropping null map entry");
                        }
                    }
                }
                Ok(entries.map(Value::Map))
            }
            WireType::Collection => {
                let depth = self.enter(depth)?;
                let item_type = match expected {
                    None => None,
                    Some(d) => match (d.kind(), d.item_descriptor()) {
                        (Kind::List, Some(item)) | (Kind::Set, Some(item)) => Some(item),
                        _ => return Err(Self::mismatch(header.wire, d)),
                    },
                };
                let size =
                    read_unsigned(input, header.length_bytes(), "read collection size")? as usize;

                let is_set = expected.map(|d| d.kind()) == Some(Kind::Set);
                let mut items: Option<Vec<Value>> =
                    item_type.map(|_| Vec::with_capacity(size.min(MAX_PREALLOC)));
                let mut seen: HashSet<Vec<u8>> = HashSet::new();
                let canonical = self.canonical_config();
                for index in 0..size {
                    let item_header = self.entry_header(input, header.id, index, size)?;
                    let item = self.read_value(input, &item_header, item_type, depth)?;
                    let (items, item_type) = match (items.as_mut(), item_type) {
                        (Some(items), Some(item_type)) => (items, item_type),
                        _ => continue,
                    };
                    match item {
                        Some(item) => {
                            if is_set {
                                let bytes =
                                    Encoder::new(&canonical).entry_bytes(item_type, &item, depth)?;
                                if !seen.insert(bytes) {
                                    debug!(field = header.id, index, "dropping duplicate set item");
                                    continue;
                                }
                            }
                            items.push(item);
                        }
                        None => {
                            // Not reachable in strict mode, which already failed on the invalid
                            // enum that produced the null.
                            if self.config.strict {
                                return Err(Error::NullInContainer("value in collection"));
                            }
                            debug!(field = header.id, index, "dropping null collection item");
                        }
                    }
                }
                Ok(items.map(|items| {
                    if is_set {
                        Value::Set(items)
                    } else {
                        Value::List(items)
                    }
                }))
            }
        }
    }

    /// Settings for re-encoding decoded entries into comparable bytes. Validation is left off
    /// so nested messages encode exactly as read.
    fn canonical_config(&self) -> SerializerConfig {
        SerializerConfig::default().max_depth(self.config.max_depth)
    }

    fn entry_header<R: Read>(
        &self,
        input: &mut R,
        id: u16,
        index: usize,
        expected: usize,
    ) -> Result<FieldHeader> {
        read_entry_header(input, id)?.ok_or(Error::BadEntry { index, expected })
    }

    fn read_enum<D: Descriptor>(&self, descriptor: &D, ordinal: i32) -> Result<Option<Value>> {
        if descriptor.is_valid_ordinal(ordinal) {
            return Ok(Some(Value::Enum(ordinal)));
        }
        if self.config.strict {
            return Err(Error::InvalidEnumValue {
                ordinal,
                type_name: descriptor.qualified_name(),
            });
        }
        debug!(ordinal, type_name = %descriptor.qualified_name(), "dropping invalid enum value");
        Ok(None)
    }
}

/// Read exactly `len` bytes. Allocation grows with what the stream actually holds, not with
/// the length claimed by the prefix.
fn read_bytes<R: Read>(input: &mut R, len: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity((len as usize).min(MAX_PREALLOC));
    input
        .by_ref()
        .take(len)
        .read_to_end(&mut bytes)
        .map_err(|e| Error::from_io("read binary", e))?;
    if (bytes.len() as u64) < len {
        return Err(Error::UnexpectedEof {
            step: "read binary",
        });
    }
    Ok(bytes)
}

fn skip_bytes<R: Read>(input: &mut R, len: u64) -> Result<()> {
    let skipped = io::copy(&mut input.by_ref().take(len), &mut io::sink())
        .map_err(|e| Error::from_io("skip binary", e))?;
    if skipped < len {
        return Err(Error::UnexpectedEof {
            step: "skip binary",
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::*;

    fn strict() -> SerializerConfig {
        SerializerConfig::default().strict(true)
    }

    fn lenient() -> SerializerConfig {
        SerializerConfig::default()
    }

    fn color() -> Type {
        EnumType::new("test.Color")
            .value("RED", 1)
            .value("GREEN", 2)
            .into()
    }

    fn item() -> Type {
        StructType::new("test.Item")
            .field(Field::new(1, "name", Type::String))
            .field(Field::new(5, "count", Type::I32))
            .field(Field::new(7, "flag", Type::Bool))
            .field(Field::new(8, "color", color()))
            .field(Field::new(9, "inner", StructType::new("test.Inner").into()))
            .field(Field::new(10, "tags", Type::list(Type::String)))
            .field(Field::new(11, "ids", Type::set(Type::I64)))
            .field(Field::new(12, "scores", Type::map(Type::String, Type::Double)))
            .field(Field::new(13, "blob", Type::Binary))
            .into()
    }

    fn decode(config: &SerializerConfig, data: &[u8]) -> Result<Message> {
        let mut input = data;
        let message = Decoder::new(config).read_message(&mut input, &item(), 1)?;
        assert!(input.is_empty(), "{} trailing bytes", input.len());
        Ok(message)
    }

    #[test]
    fn known_fields() {
        let config = strict();
        let m = decode(&config, &[0x07, 0x00, 0x10, 0x00, 0x00]).unwrap();
        assert_eq!(m.get(7), Some(&Value::Bool(false)));

        let m = decode(&config, &[0x05, 0x00, 0x21, 0x2C, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!(m.get(5), Some(&Value::I32(300)));

        let m = decode(&config, &[0x01, 0x00, 0x44, 0x02, 0x68, 0x69, 0x00, 0x00]).unwrap();
        assert_eq!(m.get(1), Some(&Value::String("hi".into())));

        let m = decode(&config, &[0x09, 0x00, 0x50, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(m.get(9), Some(&Value::Message(Message::new())));
    }

    #[test]
    fn zero_as_boolean() {
        // BOOLEAN|false reads back as zero for any integer-like field
        let m = decode(&strict(), &[0x05, 0x00, 0x10, 0x00, 0x00]).unwrap();
        assert_eq!(m.get(5), Some(&Value::I32(0)));
        // And integers read into booleans by comparing to zero
        let m = decode(&strict(), &[0x07, 0x00, 0x20, 0x05, 0x00, 0x00]).unwrap();
        assert_eq!(m.get(7), Some(&Value::Bool(true)));
    }

    #[test]
    fn narrowing() {
        let t: Type = StructType::new("test.Narrow")
            .field(Field::new(1, "b", Type::Byte))
            .into();
        let config = strict();
        // 300 in a byte field truncates
        let data = [0x01, 0x00, 0x21, 0x2C, 0x01, 0x00, 0x00];
        let m = Decoder::new(&config)
            .read_message(&mut &data[..], &t, 1)
            .unwrap();
        assert_eq!(m.get(1), Some(&Value::Byte(300i32 as i8)));
    }

    #[test]
    fn unknown_field() {
        // Field 42 holding the integer 1, then field 5 holding 1
        let data = [0x2A, 0x00, 0x20, 0x01, 0x05, 0x00, 0x20, 0x01, 0x00, 0x00];
        match decode(&strict(), &data) {
            Err(Error::UnknownField { id, type_name }) => {
                assert_eq!(id, 42);
                assert_eq!(type_name, "test.Item");
            }
            other => panic!("expected unknown field error, got {:?}", other),
        }
        let m = decode(&lenient(), &data).unwrap();
        assert!(!m.has(42));
        assert_eq!(m.get(5), Some(&Value::I32(1)));
    }

    #[test]
    fn unknown_nested_is_skipped() {
        // Field 42 holding a message with a list of one string, then field 7 true
        let data = [
            0x2A, 0x00, 0x50, 0x01, 0x00, 0x70, 0x01, 0x44, 0x01, 0x61, 0x00, 0x00, 0x07, 0x00,
            0x11, 0x00, 0x00,
        ];
        let m = decode(&lenient(), &data).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(7), Some(&Value::Bool(true)));
    }

    #[test]
    fn enum_values() {
        let valid = [0x08, 0x00, 0x20, 0x02, 0x00, 0x00];
        let m = decode(&strict(), &valid).unwrap();
        assert_eq!(m.get(8), Some(&Value::Enum(2)));

        let invalid = [0x08, 0x00, 0x20, 0x09, 0x00, 0x00];
        assert!(matches!(
            decode(&strict(), &invalid),
            Err(Error::InvalidEnumValue { ordinal: 9, .. })
        ));
        let m = decode(&lenient(), &invalid).unwrap();
        assert!(!m.has(8));

        // Zero is not a declared ordinal either
        let zero = [0x08, 0x00, 0x10, 0x00, 0x00];
        assert!(matches!(
            decode(&strict(), &zero),
            Err(Error::InvalidEnumValue { ordinal: 0, .. })
        ));
    }

    #[test]
    fn containers() {
        let data = [
            0x0A, 0x00, 0x70, 0x02, 0x44, 0x01, 0x61, 0x44, 0x01, 0x62, // tags: ["a", "b"]
            0x0B, 0x00, 0x70, 0x03, 0x20, 0x01, 0x20, 0x02, 0x20, 0x01, // ids: {1, 2, 1}
            0x0C, 0x00, 0x60, 0x01, 0x44, 0x01, 0x78, 0x10, // scores: {"x": 0.0}
            0x00, 0x00,
        ];
        let m = decode(&strict(), &data).unwrap();
        assert_eq!(
            m.get(10),
            Some(&Value::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(m.get(11), Some(&Value::Set(vec![1i64.into(), 2i64.into()])));
        assert_eq!(
            m.get(12),
            Some(&Value::Map(vec![("x".into(), Value::Double(0.0))]))
        );
    }

    #[test]
    fn large_set() {
        // 20,000 distinct 4-byte integers, then a repeat of the first
        let count = 20_000u32;
        let mut data = vec![0x0B, 0x00, 0x72];
        data.extend_from_slice(&(count + 1).to_le_bytes()[..3]);
        for i in (1..=count).chain(std::iter::once(1)) {
            data.push(0x22);
            data.extend_from_slice(&i.to_le_bytes());
        }
        data.extend_from_slice(&[0x00, 0x00]);

        let m = decode(&lenient(), &data).unwrap();
        let items = m.get(11).and_then(|v| v.as_items()).unwrap();
        assert_eq!(items.len(), count as usize);
        assert_eq!(items[0], Value::I64(1));
        assert_eq!(items[items.len() - 1], Value::I64(count as i64));
    }

    #[test]
    fn duplicate_map_keys() {
        // {"x": 0.0, "y": 0.0, "x": 1.5}, the second "x" in ISO-8859-1
        let mut data = vec![
            0x0C, 0x00, 0x60, 0x03, 0x44, 0x01, 0x78, 0x10, 0x44, 0x01, 0x79, 0x10, 0x40, 0x01,
            0x78, 0x30,
        ];
        data.extend_from_slice(&1.5f64.to_bits().to_le_bytes());
        data.extend_from_slice(&[0x00, 0x00]);
        let m = decode(&strict(), &data).unwrap();
        assert_eq!(
            m.get(12),
            Some(&Value::Map(vec![
                ("x".into(), Value::Double(1.5)),
                ("y".into(), Value::Double(0.0))
            ]))
        );
    }

    #[test]
    fn empty_list() {
        let data = [0x0A, 0x00, 0x70, 0x00, 0x00, 0x00];
        let m = decode(&strict(), &data).unwrap();
        assert_eq!(m.get(10), Some(&Value::List(Vec::new())));
    }

    #[test]
    fn bad_entry() {
        // Declared two entries, second is a zero type byte
        let data = [0x0A, 0x00, 0x70, 0x02, 0x44, 0x01, 0x61, 0x00, 0x00, 0x00];
        assert!(matches!(
            decode(&lenient(), &data),
            Err(Error::BadEntry {
                index: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn null_in_container() {
        let t: Type = StructType::new("test.Colors")
            .field(Field::new(1, "colors", Type::list(color())))
            .into();
        // [GREEN, 9]
        let data = [0x01, 0x00, 0x70, 0x02, 0x20, 0x02, 0x20, 0x09, 0x00, 0x00];

        let config = strict();
        // The invalid enum is the first thing strict mode trips on
        assert!(matches!(
            Decoder::new(&config).read_message(&mut &data[..], &t, 1),
            Err(Error::InvalidEnumValue { .. })
        ));

        let config = lenient();
        let m = Decoder::new(&config)
            .read_message(&mut &data[..], &t, 1)
            .unwrap();
        assert_eq!(m.get(1), Some(&Value::List(vec![Value::Enum(2)])));
    }

    #[test]
    fn strings() {
        // Unflagged strings are ISO-8859-1
        let data = [0x01, 0x00, 0x40, 0x02, 0x63, 0xE9, 0x00, 0x00];
        let m = decode(&strict(), &data).unwrap();
        assert_eq!(m.get(1), Some(&Value::String("c\u{e9}".into())));

        // Flagged strings must be valid UTF-8
        let data = [0x01, 0x00, 0x44, 0x02, 0x63, 0xE9, 0x00, 0x00];
        assert!(matches!(
            decode(&strict(), &data),
            Err(Error::InvalidString(_))
        ));

        // A 2-byte length prefix
        let mut data = vec![0x0D, 0x00, 0x41, 0x2C, 0x01];
        data.extend_from_slice(&[0xAB; 300]);
        data.extend_from_slice(&[0x00, 0x00]);
        let m = decode(&strict(), &data).unwrap();
        assert_eq!(m.get(13), Some(&Value::Binary(Binary::new(vec![0xAB; 300]))));
    }

    #[test]
    fn type_mismatch() {
        // A double in the string field
        let data = [0x01, 0x00, 0x30, 0, 0, 0, 0, 0, 0, 0, 0, 0x00, 0x00];
        match decode(&lenient(), &data) {
            Err(Error::TypeMismatch { wire, expected }) => {
                assert_eq!(wire, WireType::Double);
                assert_eq!(expected, "string");
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn depth_limit() {
        let mut nested = StructType::new("test.Leaf");
        for i in 0..4 {
            nested = StructType::new(format!("test.Level{}", i))
                .field(Field::new(1, "next", nested.into()));
        }
        let t: Type = nested.into();
        // Four nested messages, each with field 1
        let mut data = Vec::new();
        for _ in 0..4 {
            data.extend_from_slice(&[0x01, 0x00, 0x50]);
        }
        for _ in 0..5 {
            data.extend_from_slice(&[0x00, 0x00]);
        }

        let config = SerializerConfig::default().max_depth(5);
        assert!(Decoder::new(&config)
            .read_message(&mut &data[..], &t, 1)
            .is_ok());
        let config = SerializerConfig::default().max_depth(4);
        assert!(matches!(
            Decoder::new(&config).read_message(&mut &data[..], &t, 1),
            Err(Error::DepthLimit(4))
        ));
        // Skipped values are still depth checked
        let config = SerializerConfig::default().max_depth(4);
        let mut input = &data[..];
        assert!(matches!(
            Decoder::new(&config).consume_message::<Type, _>(&mut input, 1),
            Err(Error::DepthLimit(4))
        ));
    }

    #[test]
    fn not_enough_bytes() {
        let test_cases: Vec<Vec<u8>> = vec![
            vec![],
            vec![0x05],
            vec![0x05, 0x00],
            vec![0x05, 0x00, 0x21, 0x2C],
            vec![0x05, 0x00, 0x21, 0x2C, 0x01],
            vec![0x01, 0x00, 0x44, 0x02, 0x68],
            vec![0x0A, 0x00, 0x70, 0x02, 0x44, 0x01, 0x61],
            vec![0x0C, 0x00, 0x60, 0x01, 0x44, 0x01, 0x78],
            vec![0x09, 0x00, 0x50, 0x00],
        ];
        for (index, case) in test_cases.iter().enumerate() {
            let result = decode(&lenient(), case);
            assert!(
                matches!(result, Err(Error::UnexpectedEof { .. })),
                "Test #{} should have failed with end of stream, got {:?}",
                index,
                result
            );
        }
    }

    #[test]
    fn huge_length_claim() {
        // A 4-byte length prefix claiming far more than is there
        let data = [0x0D, 0x00, 0x43, 0xFF, 0xFF, 0xFF, 0x7F, 0x01];
        assert!(matches!(
            decode(&lenient(), &data),
            Err(Error::UnexpectedEof { .. })
        ));
    }
}
