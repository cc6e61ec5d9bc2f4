//! The read-only view of a schema that the codec works against.
//!
//! The codec never builds or mutates descriptors. It only asks a descriptor what kind of value
//! it stands for, which fields a message has, what the item, key, and value types of a
//! container are, and whether an enum ordinal is in range. [`schema`](crate::schema) holds a
//! simple implementation of these traits, but any schema model can be plugged in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The declared type of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    Enum,
    Message,
    List,
    Set,
    Map,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        use self::Kind::*;
        match self {
            Bool => "bool",
            Byte => "byte",
            I16 => "i16",
            I32 => "i32",
            I64 => "i64",
            Double => "double",
            String => "string",
            Binary => "binary",
            Enum => "enum",
            Message => "message",
            List => "list",
            Set => "set",
            Map => "map",
        }
    }

    /// True for the kinds carried by the integer wire encoding, enums included.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Kind::Byte | Kind::I16 | Kind::I32 | Kind::I64 | Kind::Enum
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How much a message cares about a field being present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    #[default]
    Default,
    Optional,
    Required,
}

/// Whether a message descriptor is a plain struct or a union.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructVariant {
    #[default]
    Struct,
    /// Exactly one field is set at a time.
    Union,
}

/// A field of a message descriptor.
pub trait FieldDescriptor {
    type Descriptor: Descriptor;

    /// The field id. Never 0.
    fn id(&self) -> u16;

    fn name(&self) -> &str;

    fn requirement(&self) -> Requirement;

    /// Descriptor of the field's value.
    fn descriptor(&self) -> &Self::Descriptor;

    /// Value to use when the field is absent, if one was declared.
    fn default_value(&self) -> Option<&Value> {
        None
    }
}

/// A type descriptor. Container descriptors refer to their item, key, and value descriptors by
/// the same type, so a whole schema tree is one `Descriptor` implementation.
pub trait Descriptor: Sized {
    type Field: FieldDescriptor<Descriptor = Self>;

    fn kind(&self) -> Kind;

    /// Name used in error and log messages.
    fn qualified_name(&self) -> String;

    /// Struct or union. Only meaningful for message descriptors.
    fn variant(&self) -> StructVariant {
        StructVariant::Struct
    }

    /// Fields of a message descriptor, in declaration order. Empty for any other kind.
    fn fields(&self) -> &[Self::Field];

    fn field_by_id(&self, id: u16) -> Option<&Self::Field> {
        self.fields().iter().find(|f| f.id() == id)
    }

    fn field_by_name(&self, name: &str) -> Option<&Self::Field> {
        self.fields().iter().find(|f| f.name() == name)
    }

    /// Item descriptor of a list or set, or the value descriptor of a map.
    fn item_descriptor(&self) -> Option<&Self>;

    /// Key descriptor of a map.
    fn key_descriptor(&self) -> Option<&Self>;

    /// Whether `ordinal` is one of the values of an enum descriptor.
    fn is_valid_ordinal(&self, ordinal: i32) -> bool;
}
