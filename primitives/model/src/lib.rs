#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Stencil descriptor model.
//!
//! This crate defines the immutable value types produced from a Protobuf
//! descriptor set: files, message types, enums, services, fields, options,
//! and the type names that identify them.
//!
//! The types here carry no behavior beyond accessors and equality. Identity
//! types ([`TypeName`], [`ServiceName`], [`FieldName`]) implement stable
//! equality, hashing, and ordering so they can key projections.

mod doc;
mod file;
mod names;
mod options;
mod service;
mod types;

pub use doc::Doc;
pub use file::{ProtoFile, Syntax};
pub use names::{FieldName, ServiceName, TypeName};
pub use options::OptionValue;
pub use service::{Rpc, Service};
pub use types::{
    Cardinality, EnumConstant, EnumType, Field, FieldType, MessageType, OneofGroup, PrimitiveType,
};
