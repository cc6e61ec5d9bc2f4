//! tagpack is a compact, self-describing binary format for schema-typed messages.
//!
//! Every value on the wire starts with a type byte: a wire type in the top nibble and a few
//! flag bits in the bottom nibble. Message fields put a 2-byte field id in front of that type
//! byte, and a message ends with field id 0. Because each value says what it is and how long
//! it is, a reader can skip fields it doesn't know about, which lets schemas evolve without
//! breaking older readers.
//!
//! - Integers are written in the smallest of 1, 2, 4, or 8 bytes that holds them, as a
//!     little-endian magnitude with the sign in the top bit. Zero takes no payload at all.
//! - Strings and binary blobs carry a 1 to 4 byte length prefix.
//! - Lists, sets, and maps carry an entry count, and their entries only get the type byte.
//! - Decoding is either strict, failing on anything the schema doesn't allow, or lenient,
//!     dropping what it can't use and carrying on.
//!
//! The codec works against anything implementing [`Descriptor`]. The [`schema`] module has a
//! ready-made owned schema model:
//!
//! ```
//! # use tagpack::*;
//! # use tagpack::schema::*;
//! let point: Type = StructType::new("geo.Point")
//!     .field(Field::new(1, "x", Type::I32).required())
//!     .field(Field::new(2, "y", Type::I32).required())
//!     .into();
//!
//! let serializer = BinarySerializer::strict();
//! let message = Message::new().with(1, 300).with(2, 0);
//! let bytes = serializer.encode_message(&point, &message)?;
//! assert_eq!(bytes, vec![0x01, 0x00, 0x21, 0x2C, 0x01, 0x02, 0x00, 0x10, 0x00, 0x00]);
//!
//! let decoded = serializer.decode_message(&point, &bytes)?;
//! assert_eq!(decoded, message);
//! # Ok::<(), tagpack::Error>(())
//! ```

mod descriptor;
mod error;
mod value;

pub mod decode;
pub mod encode;
pub mod header;
pub mod integer;
pub mod schema;
pub mod serializer;
pub mod wire;

pub use self::descriptor::{Descriptor, FieldDescriptor, Kind, Requirement, StructVariant};
pub use self::error::{Error, Result};
pub use self::serializer::{BinarySerializer, Serializer, SerializerConfig};
pub use self::value::{Binary, Message, Value};
pub use self::wire::WireType;

/// The default limit on how deeply messages and containers may nest.
pub const DEFAULT_MAX_DEPTH: usize = 64;
