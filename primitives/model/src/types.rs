//! Message types, enum types, and their fields.

use serde::{Deserialize, Serialize};

use crate::{Doc, FieldName, OptionValue, TypeName};

/// Protobuf scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// 64-bit floating point.
    Double,
    /// 32-bit floating point.
    Float,
    /// Varint-encoded signed 32-bit integer.
    Int32,
    /// Varint-encoded signed 64-bit integer.
    Int64,
    /// Varint-encoded unsigned 32-bit integer.
    UInt32,
    /// Varint-encoded unsigned 64-bit integer.
    UInt64,
    /// ZigZag-encoded signed 32-bit integer.
    SInt32,
    /// ZigZag-encoded signed 64-bit integer.
    SInt64,
    /// Fixed-width unsigned 32-bit integer.
    Fixed32,
    /// Fixed-width unsigned 64-bit integer.
    Fixed64,
    /// Fixed-width signed 32-bit integer.
    SFixed32,
    /// Fixed-width signed 64-bit integer.
    SFixed64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// Arbitrary byte sequence.
    Bytes,
}

impl PrimitiveType {
    /// The scalar name as written in proto source.
    pub fn protoc_name(&self) -> &'static str {
        match self {
            PrimitiveType::Double => "double",
            PrimitiveType::Float => "float",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::UInt32 => "uint32",
            PrimitiveType::UInt64 => "uint64",
            PrimitiveType::SInt32 => "sint32",
            PrimitiveType::SInt64 => "sint64",
            PrimitiveType::Fixed32 => "fixed32",
            PrimitiveType::Fixed64 => "fixed64",
            PrimitiveType::SFixed32 => "sfixed32",
            PrimitiveType::SFixed64 => "sfixed64",
            PrimitiveType::Bool => "bool",
            PrimitiveType::String => "string",
            PrimitiveType::Bytes => "bytes",
        }
    }
}

/// The type of a field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    /// A protobuf scalar.
    Primitive(PrimitiveType),
    /// A message type, by name.
    Message(TypeName),
    /// An enum type, by name.
    Enum(TypeName),
    /// A `map<key, value>` field. Map keys are always scalars.
    Map {
        /// Key type of the map.
        key: PrimitiveType,
        /// Value type of the map.
        value: Box<FieldType>,
    },
    /// A repeated field; the element type is never itself `List` or `Map`.
    List(Box<FieldType>),
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// Exactly one value (singular proto3 field or required proto2 field).
    Single,
    /// Zero or one value with explicit presence.
    Optional,
    /// Zero or more values.
    Repeated,
}

/// A field declared in a message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as declared.
    pub name: FieldName,
    /// The message type declaring this field.
    pub declaring_type: TypeName,
    /// Field number.
    pub number: i32,
    /// Type of the field value.
    pub field_type: FieldType,
    /// Cardinality of the field.
    pub cardinality: Cardinality,
    /// Name of the oneof group the field belongs to, if any.
    pub oneof_name: Option<String>,
    /// Options declared on the field, in declaration order.
    pub options: Vec<OptionValue>,
    /// Documentation attached to the field.
    pub doc: Doc,
}

/// A oneof group declared in a message type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OneofGroup {
    /// Name of the group as declared.
    pub name: String,
    /// The message type declaring the group.
    pub declaring_type: TypeName,
}

/// A message type declared in a proto file.
///
/// Nested messages and enums are referenced by name only; their full records
/// travel in their own events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageType {
    /// Name of the type.
    pub name: TypeName,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Oneof groups in declaration order, synthetic groups excluded.
    pub oneofs: Vec<OneofGroup>,
    /// Names of directly nested message types, in declaration order.
    pub nested_messages: Vec<TypeName>,
    /// Names of directly nested enum types, in declaration order.
    pub nested_enums: Vec<TypeName>,
    /// Options declared on the type, in declaration order.
    pub options: Vec<OptionValue>,
    /// Documentation attached to the type.
    pub doc: Doc,
}

impl MessageType {
    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.value() == name)
    }
}

/// A constant declared in an enum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstant {
    /// Constant name as declared.
    pub name: String,
    /// Numeric value of the constant.
    pub number: i32,
    /// Options declared on the constant, in declaration order.
    pub options: Vec<OptionValue>,
    /// Documentation attached to the constant.
    pub doc: Doc,
}

/// An enum type declared in a proto file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    /// Name of the type.
    pub name: TypeName,
    /// Constants in declaration order.
    pub constants: Vec<EnumConstant>,
    /// Options declared on the type, in declaration order.
    pub options: Vec<OptionValue>,
    /// Documentation attached to the type.
    pub doc: Doc,
}

impl EnumType {
    /// Look up a declared constant by name.
    pub fn constant(&self, name: &str) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| c.name == name)
    }
}
