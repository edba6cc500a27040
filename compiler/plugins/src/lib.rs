#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Plugin and renderer contracts.
//!
//! This crate defines the two extension seams of the pipeline. A [`Plugin`]
//! registers projection repositories before any event flows; a [`Renderer`]
//! reads the frozen query context and mutates the source set. Both are
//! instantiated externally and handed to the pipeline as opaque trait
//! objects.

mod injected;
mod printer;

use projections::{ContextBuilder, ProjectionError, QueryContext};
use sources::{SourceError, SourceSet};
use thiserror::Error;

pub use crate::injected::{Injected, InjectionError};
pub use crate::printer::InsertionPointPrinter;

/// Errors raised by renderers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A source-set operation failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// A projection query failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// A one-shot value was wired incorrectly.
    #[error(transparent)]
    Injection(#[from] InjectionError),
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

impl From<String> for RenderError {
    fn from(message: String) -> Self { RenderError::Message(message) }
}

/// An extension that accumulates queryable state from compiler events.
///
/// Plugins are stateless between pipeline runs: all accumulated state lives
/// in the projection repositories they register.
pub trait Plugin {
    /// Plugin name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Plugin description.
    fn description(&self) -> &'static str { "" }

    /// Register projection repositories on the context under construction.
    fn fill_in(&self, builder: &mut ContextBuilder<'_>);
}

/// An extension that mutates the source set against the frozen context.
///
/// Renderers run in registration order and observe each other's mutations.
/// A renderer must tolerate being given an empty or unrelated source set.
pub trait Renderer {
    /// Renderer name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Read projections and mutate the source set.
    fn render(&mut self, context: &QueryContext, sources: &mut SourceSet)
        -> Result<(), RenderError>;
}
