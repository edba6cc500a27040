//! Type lookup across the whole descriptor set.

use std::collections::HashMap;

use model::TypeName;
use prost_types::field_descriptor_proto::Type as DescriptorFieldType;
use prost_types::{DescriptorProto, FileDescriptorProto};

/// What a fully-qualified reference resolves to.
#[derive(Debug, Clone)]
pub(crate) enum ResolvedType {
    /// A message type; map-entry messages carry their synthetic descriptor.
    Message {
        /// Name of the message type.
        name: TypeName,
        /// Raw key/value data when the message is a synthetic map entry.
        map_entry: Option<MapEntryInfo>,
    },
    /// An enum type.
    Enum(TypeName),
}

/// Raw field data of a synthetic map-entry message.
#[derive(Debug, Clone)]
pub(crate) struct MapEntryInfo {
    /// Descriptor type of the key field.
    pub key_type: DescriptorFieldType,
    /// Descriptor type of the value field.
    pub value_type: DescriptorFieldType,
    /// Type reference of the value field, when it is a message or enum.
    pub value_type_name: String,
}

/// Index of every message and enum type in the request, including types
/// declared by imported files that are not themselves generated for.
///
/// Keys are fully-qualified names without the leading dot that descriptor
/// references carry.
#[derive(Debug, Default)]
pub struct TypeIndex {
    entries: HashMap<String, ResolvedType>,
}

impl TypeIndex {
    /// Build the index by walking every file in the request.
    ///
    /// This only records names; no field resolution happens here.
    pub fn build(files: &[FileDescriptorProto]) -> Self {
        let mut index = Self::default();
        for file in files {
            let package = file.package();
            for message in &file.message_type {
                index.add_message(&TypeName::new(package, message.name()), message);
            }
            for enumeration in &file.enum_type {
                let name = TypeName::new(package, enumeration.name());
                index.entries.insert(name.qualified_name(), ResolvedType::Enum(name));
            }
        }
        tracing::debug!(types = index.entries.len(), "indexed descriptor set");
        index
    }

    /// The number of indexed types.
    pub fn len(&self) -> usize { self.entries.len() }

    /// `true` when the request declared no types at all.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Resolve a descriptor reference such as `.acme.travel.Journey`.
    pub(crate) fn resolve(&self, reference: &str) -> Option<&ResolvedType> {
        self.entries.get(reference.trim_start_matches('.'))
    }

    fn add_message(&mut self, name: &TypeName, message: &DescriptorProto) {
        let map_entry = message
            .options
            .as_ref()
            .filter(|o| o.map_entry())
            .and_then(|_| map_entry_info(message));
        self.entries.insert(
            name.qualified_name(),
            ResolvedType::Message { name: name.clone(), map_entry },
        );
        for nested in &message.nested_type {
            self.add_message(&name.nested(nested.name()), nested);
        }
        for enumeration in &message.enum_type {
            let nested_name = name.nested(enumeration.name());
            self.entries.insert(nested_name.qualified_name(), ResolvedType::Enum(nested_name));
        }
    }
}

/// Extract key/value data from a map-entry descriptor. Map entries always
/// declare exactly the fields `key = 1` and `value = 2`.
fn map_entry_info(message: &DescriptorProto) -> Option<MapEntryInfo> {
    let key = message.field.iter().find(|f| f.number() == 1)?;
    let value = message.field.iter().find(|f| f.number() == 2)?;
    Some(MapEntryInfo {
        key_type: key.r#type(),
        value_type: value.r#type(),
        value_type_name: value.type_name().to_string(),
    })
}
