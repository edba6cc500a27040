//! Conversion from raw descriptors to model values.

use model::{
    Cardinality, Doc, EnumConstant, EnumType, Field, FieldName, FieldType, PrimitiveType,
    ProtoFile, Rpc, Service, ServiceName, Syntax, TypeName,
};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto, ServiceDescriptorProto,
};

use crate::docs::{tag, DocMap};
use crate::index::{MapEntryInfo, ResolvedType};
use crate::{options, ProducerError, Result, TypeIndex};

pub(crate) fn convert_file(file: &FileDescriptorProto) -> Result<ProtoFile> {
    let syntax: Syntax = file.syntax().parse().map_err(ProducerError::Message)?;
    Ok(ProtoFile::new(
        file.name(),
        file.package(),
        syntax,
        options::file_options(file.options.as_ref()),
    ))
}

pub(crate) fn convert_field(
    field: &FieldDescriptorProto,
    declaring_type: &TypeName,
    oneof_name: Option<String>,
    syntax: Syntax,
    index: &TypeIndex,
    doc: Doc,
) -> Result<Field> {
    let base = base_type(field, declaring_type, index)?;
    let (field_type, cardinality) = shape(field, syntax, base);
    Ok(Field {
        name: FieldName::new(field.name()),
        declaring_type: declaring_type.clone(),
        number: field.number(),
        field_type,
        cardinality,
        oneof_name,
        options: options::field_options(field.options.as_ref()),
        doc,
    })
}

pub(crate) fn convert_enum(
    enumeration: &EnumDescriptorProto,
    name: TypeName,
    docs: &DocMap,
    path: &[i32],
) -> EnumType {
    let constants = enumeration
        .value
        .iter()
        .enumerate()
        .map(|(index, value)| EnumConstant {
            name: value.name().to_string(),
            number: value.number(),
            options: options::enum_value_options(value.options.as_ref()),
            doc: docs.doc_for(&element_path(path, tag::ENUM_VALUE, index)),
        })
        .collect();
    EnumType {
        name,
        constants,
        options: options::enum_options(enumeration.options.as_ref()),
        doc: docs.doc_for(path),
    }
}

pub(crate) fn convert_service(
    service: &ServiceDescriptorProto,
    package: &str,
    index: &TypeIndex,
    docs: &DocMap,
    path: &[i32],
) -> Result<Service> {
    let name = ServiceName::new(package, service.name());
    let rpcs = service
        .method
        .iter()
        .enumerate()
        .map(|(method_index, method)| {
            let referrer = format!("{}.{}", name.qualified_name(), method.name());
            Ok(Rpc {
                name: method.name().to_string(),
                request_type: resolve_message(method.input_type(), &referrer, index)?,
                response_type: resolve_message(method.output_type(), &referrer, index)?,
                client_streaming: method.client_streaming(),
                server_streaming: method.server_streaming(),
                options: options::method_options(method.options.as_ref()),
                doc: docs.doc_for(&element_path(path, tag::SERVICE_METHOD, method_index)),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Service {
        name,
        rpcs,
        options: options::service_options(service.options.as_ref()),
        doc: docs.doc_for(path),
    })
}

/// Path of the `index`-th child under `parent` for the given field tag.
pub(crate) fn element_path(parent: &[i32], tag: i32, index: usize) -> Vec<i32> {
    let mut path = parent.to_vec();
    path.push(tag);
    path.push(index as i32);
    path
}

/// The field type before cardinality shaping: scalar, message, enum, or map.
fn base_type(
    field: &FieldDescriptorProto,
    declaring_type: &TypeName,
    index: &TypeIndex,
) -> Result<FieldType> {
    match field.r#type() {
        Type::Group => Err(ProducerError::UnsupportedFieldType {
            declaring_type: declaring_type.qualified_name(),
            field: field.name().to_string(),
            kind: "group",
        }),
        Type::Message => {
            let referrer = format!("{}.{}", declaring_type.qualified_name(), field.name());
            match resolve(field.type_name(), &referrer, index)? {
                ResolvedType::Message { map_entry: Some(entry), .. }
                    if field.label() == Label::Repeated =>
                {
                    map_type(entry, &referrer, index)
                }
                ResolvedType::Message { name, .. } => Ok(FieldType::Message(name.clone())),
                ResolvedType::Enum(name) => Ok(FieldType::Enum(name.clone())),
            }
        }
        Type::Enum => {
            let referrer = format!("{}.{}", declaring_type.qualified_name(), field.name());
            match resolve(field.type_name(), &referrer, index)? {
                ResolvedType::Enum(name) => Ok(FieldType::Enum(name.clone())),
                ResolvedType::Message { name, .. } => Ok(FieldType::Message(name.clone())),
            }
        }
        scalar => Ok(FieldType::Primitive(primitive(scalar, declaring_type, field.name())?)),
    }
}

/// Wrap the base type per the field label and compute the cardinality.
fn shape(field: &FieldDescriptorProto, syntax: Syntax, base: FieldType) -> (FieldType, Cardinality) {
    if matches!(base, FieldType::Map { .. }) {
        return (base, Cardinality::Repeated);
    }
    match field.label() {
        Label::Repeated => (FieldType::List(Box::new(base)), Cardinality::Repeated),
        Label::Required => (base, Cardinality::Single),
        Label::Optional => {
            let optional = match syntax {
                Syntax::Proto2 => true,
                Syntax::Proto3 => field.proto3_optional(),
            };
            let cardinality =
                if optional { Cardinality::Optional } else { Cardinality::Single };
            (base, cardinality)
        }
    }
}

fn map_type(entry: &MapEntryInfo, referrer: &str, index: &TypeIndex) -> Result<FieldType> {
    let key = primitive_key(entry.key_type, referrer)?;
    let value = match entry.value_type {
        Type::Message | Type::Enum => match resolve(&entry.value_type_name, referrer, index)? {
            ResolvedType::Message { name, .. } => FieldType::Message(name.clone()),
            ResolvedType::Enum(name) => FieldType::Enum(name.clone()),
        },
        scalar => FieldType::Primitive(primitive_key(scalar, referrer)?),
    };
    Ok(FieldType::Map { key, value: Box::new(value) })
}

fn resolve<'i>(
    reference: &str,
    referrer: &str,
    index: &'i TypeIndex,
) -> Result<&'i ResolvedType> {
    index.resolve(reference).ok_or_else(|| ProducerError::UnresolvedType {
        type_name: reference.to_string(),
        referrer: referrer.to_string(),
    })
}

fn resolve_message(reference: &str, referrer: &str, index: &TypeIndex) -> Result<TypeName> {
    match resolve(reference, referrer, index)? {
        ResolvedType::Message { name, .. } => Ok(name.clone()),
        ResolvedType::Enum(_) => Err(ProducerError::Message(format!(
            "`{}` references enum `{}` where a message is required",
            referrer, reference
        ))),
    }
}

fn primitive(kind: Type, declaring_type: &TypeName, field: &str) -> Result<PrimitiveType> {
    primitive_of(kind).ok_or_else(|| ProducerError::UnsupportedFieldType {
        declaring_type: declaring_type.qualified_name(),
        field: field.to_string(),
        kind: "non-scalar",
    })
}

fn primitive_key(kind: Type, referrer: &str) -> Result<PrimitiveType> {
    primitive_of(kind)
        .ok_or_else(|| ProducerError::Message(format!("non-scalar map key in `{}`", referrer)))
}

fn primitive_of(kind: Type) -> Option<PrimitiveType> {
    match kind {
        Type::Double => Some(PrimitiveType::Double),
        Type::Float => Some(PrimitiveType::Float),
        Type::Int32 => Some(PrimitiveType::Int32),
        Type::Int64 => Some(PrimitiveType::Int64),
        Type::Uint32 => Some(PrimitiveType::UInt32),
        Type::Uint64 => Some(PrimitiveType::UInt64),
        Type::Sint32 => Some(PrimitiveType::SInt32),
        Type::Sint64 => Some(PrimitiveType::SInt64),
        Type::Fixed32 => Some(PrimitiveType::Fixed32),
        Type::Fixed64 => Some(PrimitiveType::Fixed64),
        Type::Sfixed32 => Some(PrimitiveType::SFixed32),
        Type::Sfixed64 => Some(PrimitiveType::SFixed64),
        Type::Bool => Some(PrimitiveType::Bool),
        Type::String => Some(PrimitiveType::String),
        Type::Bytes => Some(PrimitiveType::Bytes),
        Type::Group | Type::Message | Type::Enum => None,
    }
}
