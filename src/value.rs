use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::descriptor::{Descriptor, FieldDescriptor, Requirement, StructVariant};
use crate::error::{Error, Result};

/// A typed value, as written to and read from the wire.
///
/// Lists, sets, and maps keep their entries in insertion order. A set never holds two equal
/// items, and a map never holds two equal keys, when built through [`Value::insert_item`] and
/// [`Value::insert_entry`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    String(String),
    Binary(Binary),
    /// Enum value, by ordinal.
    Enum(i32),
    Message(Message),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn name(&self) -> &'static str {
        use self::Value::*;
        match self {
            Bool(_) => "Bool",
            Byte(_) => "Byte",
            I16(_) => "I16",
            I32(_) => "I32",
            I64(_) => "I64",
            Double(_) => "Double",
            String(_) => "String",
            Binary(_) => "Binary",
            Enum(_) => "Enum",
            Message(_) => "Message",
            List(_) => "List",
            Set(_) => "Set",
            Map(_) => "Map",
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Value::Byte(_) | Value::I16(_) | Value::I32(_) | Value::I64(_)
        )
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Value::Enum(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Value::Message(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Value::Set(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(val) = *self {
            Some(val)
        } else {
            None
        }
    }

    /// The numeric value of any integer or enum value, widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(n) => Some(n as i64),
            Value::I16(n) => Some(n as i64),
            Value::I32(n) => Some(n as i64),
            Value::I64(n) => Some(n),
            Value::Enum(n) => Some(n as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Double(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(ref val) = *self {
            Some(val.as_str())
        } else {
            None
        }
    }

    pub fn as_binary(&self) -> Option<&Binary> {
        if let Value::Binary(ref val) = *self {
            Some(val)
        } else {
            None
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        if let Value::Message(ref val) = *self {
            Some(val)
        } else {
            None
        }
    }

    /// Items of a list or set.
    pub fn as_items(&self) -> Option<&[Value]> {
        match *self {
            Value::List(ref items) | Value::Set(ref items) => Some(items),
            _ => None,
        }
    }

    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        if let Value::Map(ref entries) = *self {
            Some(entries)
        } else {
            None
        }
    }

    /// Add an item to a list, or to a set if no equal item is in it yet. Returns false if the
    /// item wasn't added.
    pub fn insert_item(&mut self, item: Value) -> bool {
        match self {
            Value::List(items) => {
                items.push(item);
                true
            }
            Value::Set(items) => {
                if items.contains(&item) {
                    false
                } else {
                    items.push(item);
                    true
                }
            }
            _ => false,
        }
    }

    /// Put an entry into a map. An equal key keeps its position and gets the new value.
    /// Returns the replaced value, if any.
    pub fn insert_entry(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Value::Map(entries) = self {
            if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                return Some(std::mem::replace(&mut entry.1, value));
            }
            entries.push((key, value));
        }
        None
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<Binary> for Value {
    fn from(v: Binary) -> Self {
        Value::Binary(v)
    }
}

impl From<Message> for Value {
    fn from(v: Message) -> Self {
        Value::Message(v)
    }
}

/// A blob of bytes. Displays as base64.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Binary(#[serde(with = "serde_bytes")] Vec<u8>);

impl Binary {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn copy_from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(encoded).map(Self)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn from_hex_string(encoded: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(encoded).map(Self)
    }

    pub fn to_hex_string(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for Binary {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for Binary {
    fn from(v: &[u8]) -> Self {
        Self::copy_from(v)
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Binary({})", self.to_hex_string())
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// The present fields of a message, keyed by field id.
///
/// A message doesn't hold on to its descriptor. The descriptor decides the order fields are
/// written in, and which fields are required.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    fields: BTreeMap<u16, Value>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, consuming and returning the message.
    pub fn with(mut self, id: u16, value: impl Into<Value>) -> Self {
        self.set(id, value);
        self
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, id: u16, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(id, value.into())
    }

    pub fn get(&self, id: u16) -> Option<&Value> {
        self.fields.get(&id)
    }

    /// Get a field, falling back to the default declared for it by `descriptor`.
    pub fn get_or_default<'a, D: Descriptor>(
        &'a self,
        descriptor: &'a D,
        id: u16,
    ) -> Option<&'a Value> {
        self.fields.get(&id).or_else(|| {
            descriptor
                .field_by_id(id)
                .and_then(|field| field.default_value())
        })
    }

    pub fn has(&self, id: u16) -> bool {
        self.fields.contains_key(&id)
    }

    /// Remove a field, returning its value.
    pub fn clear(&mut self, id: u16) -> Option<Value> {
        self.fields.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the present fields in field id order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Value)> {
        self.fields.iter().map(|(id, v)| (*id, v))
    }

    /// Check the message against its descriptor: every required field is present, every field
    /// is declared, and a union has exactly one field set.
    pub fn validate<D: Descriptor>(&self, descriptor: &D) -> Result<()> {
        if let Some(id) = self
            .fields
            .keys()
            .find(|id| descriptor.field_by_id(**id).is_none())
        {
            return Err(Error::InvalidMessage(format!(
                "field {} isn't declared in {}",
                id,
                descriptor.qualified_name()
            )));
        }
        match descriptor.variant() {
            StructVariant::Union => {
                if self.fields.len() != 1 {
                    return Err(Error::InvalidMessage(format!(
                        "union {} has {} fields set",
                        descriptor.qualified_name(),
                        self.fields.len()
                    )));
                }
            }
            StructVariant::Struct => {
                let missing: Vec<&str> = descriptor
                    .fields()
                    .iter()
                    .filter(|f| f.requirement() == Requirement::Required && !self.has(f.id()))
                    .map(|f| f.name())
                    .collect();
                if !missing.is_empty() {
                    return Err(Error::InvalidMessage(format!(
                        "{} is missing required fields: {}",
                        descriptor.qualified_name(),
                        missing.join(", ")
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_valid<D: Descriptor>(&self, descriptor: &D) -> bool {
        self.validate(descriptor).is_ok()
    }
}
