//! A plain, owned schema model implementing [`Descriptor`].
//!
//! Schema types derive the serde traits, so a schema can be kept in any format serde supports.
//! Message types are described by [`StructType`] and built up with its builder methods:
//!
//! ```
//! # use tagpack::schema::*;
//! let point = StructType::new("geo.Point")
//!     .field(Field::new(1, "x", Type::I32).required())
//!     .field(Field::new(2, "y", Type::I32).required())
//!     .field(Field::new(3, "label", Type::String));
//! assert_eq!(point.field_by_name("y").map(|f| f.id), Some(2));
//! ```

use educe::Educe;
use serde::{Deserialize, Serialize};

use crate::descriptor::{Descriptor, FieldDescriptor, Kind, Requirement, StructVariant};
use crate::value::Value;

#[inline]
fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

/// A type in the schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Type {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    Enum(EnumType),
    Message(StructType),
    List(Box<Type>),
    Set(Box<Type>),
    /// Key type, then value type.
    Map(Box<Type>, Box<Type>),
}

impl Type {
    pub fn list(item: Type) -> Self {
        Type::List(Box::new(item))
    }

    pub fn set(item: Type) -> Self {
        Type::Set(Box::new(item))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }
}

impl Descriptor for Type {
    type Field = Field;

    fn kind(&self) -> Kind {
        match self {
            Type::Bool => Kind::Bool,
            Type::Byte => Kind::Byte,
            Type::I16 => Kind::I16,
            Type::I32 => Kind::I32,
            Type::I64 => Kind::I64,
            Type::Double => Kind::Double,
            Type::String => Kind::String,
            Type::Binary => Kind::Binary,
            Type::Enum(_) => Kind::Enum,
            Type::Message(_) => Kind::Message,
            Type::List(_) => Kind::List,
            Type::Set(_) => Kind::Set,
            Type::Map(_, _) => Kind::Map,
        }
    }

    fn qualified_name(&self) -> String {
        match self {
            Type::Enum(e) => e.name.clone(),
            Type::Message(s) => s.name.clone(),
            Type::List(item) => format!("list<{}>", item.qualified_name()),
            Type::Set(item) => format!("set<{}>", item.qualified_name()),
            Type::Map(key, value) => format!(
                "map<{},{}>",
                key.qualified_name(),
                value.qualified_name()
            ),
            _ => self.kind().name().to_owned(),
        }
    }

    fn variant(&self) -> StructVariant {
        match self {
            Type::Message(s) => s.variant,
            _ => StructVariant::Struct,
        }
    }

    fn fields(&self) -> &[Field] {
        match self {
            Type::Message(s) => &s.fields,
            _ => &[],
        }
    }

    fn item_descriptor(&self) -> Option<&Type> {
        match self {
            Type::List(item) | Type::Set(item) | Type::Map(_, item) => Some(&**item),
            _ => None,
        }
    }

    fn key_descriptor(&self) -> Option<&Type> {
        match self {
            Type::Map(key, _) => Some(&**key),
            _ => None,
        }
    }

    fn is_valid_ordinal(&self, ordinal: i32) -> bool {
        match self {
            Type::Enum(e) => e.by_ordinal(ordinal).is_some(),
            _ => false,
        }
    }
}

/// A message type: a struct or a union.
#[derive(Educe, Clone, Debug, Default, Serialize, Deserialize)]
#[educe(PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StructType {
    /// Fully qualified type name, like `package.Name`.
    pub name: String,
    /// An optional comment explaining the type.
    #[educe(PartialEq(ignore))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub variant: StructVariant,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Make a new union type.
    pub fn union(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: StructVariant::Union,
            ..Self::default()
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Add a field. Fields are written in the order they're added.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_by_id(&self, id: u16) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl From<StructType> for Type {
    fn from(s: StructType) -> Self {
        Type::Message(s)
    }
}

/// A field of a message type.
#[derive(Educe, Clone, Debug, Serialize, Deserialize)]
#[educe(PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub id: u16,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default, skip_serializing_if = "is_default")]
    pub requirement: Requirement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// An optional comment explaining the field.
    #[educe(PartialEq(ignore))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl Field {
    /// Make a new field. Field ids start at 1; 0 marks the end of a message on the wire.
    pub fn new(id: u16, name: impl Into<String>, ty: Type) -> Self {
        debug_assert!(id != 0, "field id 0 is reserved");
        Self {
            id,
            name: name.into(),
            ty,
            requirement: Requirement::Default,
            default: None,
            comment: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.requirement = Requirement::Required;
        self
    }

    pub fn optional(mut self) -> Self {
        self.requirement = Requirement::Optional;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

impl FieldDescriptor for Field {
    type Descriptor = Type;

    fn id(&self) -> u16 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn requirement(&self) -> Requirement {
        self.requirement
    }

    fn descriptor(&self) -> &Type {
        &self.ty
    }

    fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// An enum type. Values are identified on the wire by ordinal.
#[derive(Educe, Clone, Debug, Default, Serialize, Deserialize)]
#[educe(PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnumType {
    pub name: String,
    /// An optional comment explaining the type.
    #[educe(PartialEq(ignore))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub ordinal: i32,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn value(mut self, name: impl Into<String>, ordinal: i32) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            ordinal,
        });
        self
    }

    pub fn by_ordinal(&self, ordinal: i32) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.ordinal == ordinal)
    }

    pub fn by_name(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

impl From<EnumType> for Type {
    fn from(e: EnumType) -> Self {
        Type::Enum(e)
    }
}
