#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Pipeline orchestration.
//!
//! This crate binds the phases of one post-processing run in a strict
//! happens-before order: plugins register projections, the event stream
//! drains into them, the context freezes, renderers mutate the source set,
//! and the set flushes to disk exactly once. Any failure aborts the
//! remaining phases.
//!
//! ## Module Organization
//!
//! - `orchestration` - The [`Pipeline`] type, its builder, and `run`

use plugins::{InjectionError, RenderError};
use producer::ProducerError;
use projections::ProjectionError;
use sources::SourceError;
use thiserror::Error;

pub mod orchestration;

pub use orchestration::{Pipeline, PipelineBuilder};

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Error while parsing the request or producing events.
    #[error(transparent)]
    Producer(#[from] ProducerError),
    /// Error from a source-set operation.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Error from the projection substrate.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// A one-shot pipeline field was wired twice.
    #[error(transparent)]
    Injection(#[from] InjectionError),
    /// Error loading the run configuration.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// I/O error while reading the request file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A renderer failed.
    #[error("Renderer `{renderer}` failed: {source}")]
    Render {
        /// Name of the failing renderer.
        renderer: &'static str,
        /// The underlying render error.
        source: RenderError,
    },
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
