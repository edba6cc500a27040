#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Compiler-event producer.
//!
//! This crate turns a serialized `CodeGeneratorRequest` into the lazy,
//! finite stream of [`events::Event`] values consumed by the projection
//! substrate. Only files listed in `file_to_generate` yield events; all
//! files in the request, imports included, participate in type resolution.
//!
//! The stream is driven by an explicit work stack: each call to
//! [`EventStream::next`] pops one pending step and converts exactly the
//! descriptor material that step needs. Nothing past the requested event is
//! resolved ahead of time.

mod convert;
mod docs;
mod index;
mod options;
mod stream;

use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use thiserror::Error;

pub use crate::index::TypeIndex;
pub use crate::stream::EventStream;

/// Errors raised while parsing the request or producing events.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// The request bytes are not a valid `CodeGeneratorRequest`.
    #[error("Failed to decode code generator request: {0}")]
    RequestParse(#[from] prost::DecodeError),
    /// A descriptor references a type not present in the request.
    #[error("Unknown type `{type_name}` referenced from `{referrer}`")]
    UnresolvedType {
        /// The unresolvable reference, as written in the descriptor.
        type_name: String,
        /// The element holding the reference.
        referrer: String,
    },
    /// A field uses a descriptor type the pipeline does not support.
    #[error("Field `{field}` of `{declaring_type}` has unsupported descriptor type `{kind}`")]
    UnsupportedFieldType {
        /// The type declaring the field.
        declaring_type: String,
        /// Name of the offending field.
        field: String,
        /// Descriptor type name, e.g. `group`.
        kind: &'static str,
    },
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

/// Convenient result type for producer operations.
pub type Result<T> = std::result::Result<T, ProducerError>;

/// Decode a length-delimited `CodeGeneratorRequest` from raw bytes.
pub fn parse_request(bytes: &[u8]) -> Result<CodeGeneratorRequest> {
    let request = CodeGeneratorRequest::decode(bytes)?;
    tracing::debug!(
        files = request.proto_file.len(),
        to_generate = request.file_to_generate.len(),
        "decoded code generator request"
    );
    Ok(request)
}
