#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Compiler events.
//!
//! This crate defines the tagged variants describing a walk over a Protobuf
//! descriptor set. The stream for one file opens with [`Event::FileEntered`]
//! and closes with [`Event::FileExited`]; every entered scope (type, oneof
//! group, service) is balanced by a matching exit event.
//!
//! Every entity event carries a stable identity — a [`TypeName`], a file
//! path, or a `(declaring type, field name)` pair — sufficient to key a
//! projection.

use std::path::{Path, PathBuf};

use model::{
    EnumConstant, EnumType, Field, FieldName, MessageType, OneofGroup, OptionValue, ProtoFile,
    Rpc, Service, ServiceName, TypeName,
};
use serde::{Deserialize, Serialize};

/// One step of the descriptor traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A proto file is about to be walked.
    FileEntered(ProtoFile),
    /// An option declared on the current file.
    FileOptionDiscovered {
        /// Path of the file carrying the option.
        file: PathBuf,
        /// The discovered option.
        option: OptionValue,
    },
    /// A message type is about to be walked.
    TypeEntered(MessageType),
    /// An option declared on the current message type.
    TypeOptionDiscovered {
        /// Name of the type carrying the option.
        type_name: TypeName,
        /// The discovered option.
        option: OptionValue,
    },
    /// The first field of a oneof group is about to be walked.
    OneofGroupEntered(OneofGroup),
    /// All fields of a oneof group have been walked.
    OneofGroupExited(OneofGroup),
    /// A field of the current message type.
    FieldEntered(Field),
    /// An option declared on the current field.
    FieldOptionDiscovered {
        /// The type declaring the field.
        declaring_type: TypeName,
        /// Name of the field carrying the option.
        field: FieldName,
        /// The discovered option.
        option: OptionValue,
    },
    /// The current field is fully walked.
    FieldExited {
        /// The type declaring the field.
        declaring_type: TypeName,
        /// Name of the walked field.
        field: FieldName,
    },
    /// The current message type is fully walked, nested entries included.
    TypeExited(TypeName),
    /// An enum type is about to be walked.
    EnumEntered(EnumType),
    /// An option declared on the current enum type.
    EnumOptionDiscovered {
        /// Name of the enum carrying the option.
        type_name: TypeName,
        /// The discovered option.
        option: OptionValue,
    },
    /// A constant of the current enum type.
    EnumConstantDiscovered {
        /// Name of the enum declaring the constant.
        type_name: TypeName,
        /// The discovered constant.
        constant: EnumConstant,
    },
    /// The current enum type is fully walked.
    EnumExited(TypeName),
    /// A service is about to be walked.
    ServiceEntered(Service),
    /// An option declared on the current service.
    ServiceOptionDiscovered {
        /// Name of the service carrying the option.
        service: ServiceName,
        /// The discovered option.
        option: OptionValue,
    },
    /// An RPC method of the current service.
    RpcDiscovered {
        /// Name of the service declaring the method.
        service: ServiceName,
        /// The discovered method.
        rpc: Rpc,
    },
    /// The current service is fully walked.
    ServiceExited(ServiceName),
    /// The current file is fully walked.
    FileExited(PathBuf),
}

/// Fieldless discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// See [`Event::FileEntered`].
    FileEntered,
    /// See [`Event::FileOptionDiscovered`].
    FileOptionDiscovered,
    /// See [`Event::TypeEntered`].
    TypeEntered,
    /// See [`Event::TypeOptionDiscovered`].
    TypeOptionDiscovered,
    /// See [`Event::OneofGroupEntered`].
    OneofGroupEntered,
    /// See [`Event::OneofGroupExited`].
    OneofGroupExited,
    /// See [`Event::FieldEntered`].
    FieldEntered,
    /// See [`Event::FieldOptionDiscovered`].
    FieldOptionDiscovered,
    /// See [`Event::FieldExited`].
    FieldExited,
    /// See [`Event::TypeExited`].
    TypeExited,
    /// See [`Event::EnumEntered`].
    EnumEntered,
    /// See [`Event::EnumOptionDiscovered`].
    EnumOptionDiscovered,
    /// See [`Event::EnumConstantDiscovered`].
    EnumConstantDiscovered,
    /// See [`Event::EnumExited`].
    EnumExited,
    /// See [`Event::ServiceEntered`].
    ServiceEntered,
    /// See [`Event::ServiceOptionDiscovered`].
    ServiceOptionDiscovered,
    /// See [`Event::RpcDiscovered`].
    RpcDiscovered,
    /// See [`Event::ServiceExited`].
    ServiceExited,
    /// See [`Event::FileExited`].
    FileExited,
}

impl Event {
    /// The discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::FileEntered(_) => EventKind::FileEntered,
            Event::FileOptionDiscovered { .. } => EventKind::FileOptionDiscovered,
            Event::TypeEntered(_) => EventKind::TypeEntered,
            Event::TypeOptionDiscovered { .. } => EventKind::TypeOptionDiscovered,
            Event::OneofGroupEntered(_) => EventKind::OneofGroupEntered,
            Event::OneofGroupExited(_) => EventKind::OneofGroupExited,
            Event::FieldEntered(_) => EventKind::FieldEntered,
            Event::FieldOptionDiscovered { .. } => EventKind::FieldOptionDiscovered,
            Event::FieldExited { .. } => EventKind::FieldExited,
            Event::TypeExited(_) => EventKind::TypeExited,
            Event::EnumEntered(_) => EventKind::EnumEntered,
            Event::EnumOptionDiscovered { .. } => EventKind::EnumOptionDiscovered,
            Event::EnumConstantDiscovered { .. } => EventKind::EnumConstantDiscovered,
            Event::EnumExited(_) => EventKind::EnumExited,
            Event::ServiceEntered(_) => EventKind::ServiceEntered,
            Event::ServiceOptionDiscovered { .. } => EventKind::ServiceOptionDiscovered,
            Event::RpcDiscovered { .. } => EventKind::RpcDiscovered,
            Event::ServiceExited(_) => EventKind::ServiceExited,
            Event::FileExited(_) => EventKind::FileExited,
        }
    }

    /// The file path carried by file-scoped events.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Event::FileEntered(file) => Some(&file.path),
            Event::FileOptionDiscovered { file, .. } => Some(file),
            Event::FileExited(path) => Some(path),
            _ => None,
        }
    }

    /// The name of the message or enum type this event concerns, if any.
    ///
    /// For field and oneof events this is the declaring type.
    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            Event::TypeEntered(message) => Some(&message.name),
            Event::TypeOptionDiscovered { type_name, .. } => Some(type_name),
            Event::OneofGroupEntered(group) | Event::OneofGroupExited(group) => {
                Some(&group.declaring_type)
            }
            Event::FieldEntered(field) => Some(&field.declaring_type),
            Event::FieldOptionDiscovered { declaring_type, .. } => Some(declaring_type),
            Event::FieldExited { declaring_type, .. } => Some(declaring_type),
            Event::TypeExited(type_name) => Some(type_name),
            Event::EnumEntered(enumeration) => Some(&enumeration.name),
            Event::EnumOptionDiscovered { type_name, .. } => Some(type_name),
            Event::EnumConstantDiscovered { type_name, .. } => Some(type_name),
            Event::EnumExited(type_name) => Some(type_name),
            _ => None,
        }
    }

    /// The service name this event concerns, if any.
    pub fn service_name(&self) -> Option<&ServiceName> {
        match self {
            Event::ServiceEntered(service) => Some(&service.name),
            Event::ServiceOptionDiscovered { service, .. } => Some(service),
            Event::RpcDiscovered { service, .. } => Some(service),
            Event::ServiceExited(service) => Some(service),
            _ => None,
        }
    }
}
