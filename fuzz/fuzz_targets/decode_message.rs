#![no_main]
use libfuzzer_sys::fuzz_target;
use tagpack::schema::*;
use tagpack::{BinarySerializer, Serializer};

fn schema() -> Type {
    let inner = StructType::new("fuzz.Inner")
        .field(Field::new(1, "flag", Type::Bool))
        .field(Field::new(2, "ids", Type::set(Type::I64)));
    StructType::new("fuzz.Outer")
        .field(Field::new(1, "name", Type::String))
        .field(Field::new(2, "count", Type::I32))
        .field(Field::new(3, "ratio", Type::Double))
        .field(Field::new(4, "blob", Type::Binary))
        .field(Field::new(5, "kind", EnumType::new("fuzz.Kind").value("A", 1).value("B", 2).into()))
        .field(Field::new(6, "inner", inner.clone().into()))
        .field(Field::new(7, "list", Type::list(inner.into())))
        .field(Field::new(8, "map", Type::map(Type::String, Type::Byte)))
        .into()
}

fuzz_target!(|data: &[u8]| {
    let ty = schema();
    for serializer in [BinarySerializer::strict(), BinarySerializer::lenient()] {
        if let Ok(message) = serializer.decode_message(&ty, data) {
            // Anything that decodes must re-encode, and re-encode to the same bytes after
            // another pass. Bytes are compared since NaN doubles never equal themselves.
            let mut enc = Vec::new();
            serializer.serialize_message(&mut enc, &ty, &message).unwrap();
            let again = serializer.decode_message(&ty, &enc).unwrap();
            assert_eq!(serializer.encode_message(&ty, &again).unwrap(), enc);
        }
    }
});
