//! The pipeline and its main entry point.
//!
//! A [`Pipeline`] holds the parsed request, the source root, and the
//! registered plugins and renderers. [`Pipeline::run`] executes the phases
//! in strict order; renderer ordering is significant, plugin ordering
//! across independent projections is not.

use std::fs;
use std::path::PathBuf;

use config::RunConfig;
use plugins::{Injected, Plugin, Renderer};
use producer::EventStream;
use projections::{ContextBuilder, QueryContext, Substrate};
use prost_types::compiler::CodeGeneratorRequest;
use sources::SourceSet;

use crate::{PipelineError, Result};

/// One post-processing run over a source tree.
pub struct Pipeline {
    request: CodeGeneratorRequest,
    source_root: PathBuf,
    plugins: Vec<Box<dyn Plugin>>,
    renderers: Vec<Box<dyn Renderer>>,
    context: Injected<QueryContext>,
}

impl Pipeline {
    /// Create a new builder for a pipeline.
    pub fn builder() -> PipelineBuilder { PipelineBuilder::default() }

    /// Build a pipeline from a run configuration, reading the request bytes
    /// from the configured path.
    pub fn from_config(
        config: &RunConfig,
        plugins: Vec<Box<dyn Plugin>>,
        renderers: Vec<Box<dyn Renderer>>,
    ) -> Result<Self> {
        let bytes = fs::read(&config.request.path)?;
        let request = producer::parse_request(&bytes)?;
        let mut builder =
            Self::builder().request(request).source_root(config.sources.root.clone());
        for plugin in plugins {
            builder = builder.add_boxed_plugin(plugin);
        }
        for renderer in renderers {
            builder = builder.add_boxed_renderer(renderer);
        }
        builder.build()
    }

    /// Execute the run.
    ///
    /// Phases, in order: build the projection context, drain the event
    /// stream into it, freeze it, read the source tree, run every renderer
    /// in registration order, flush the tree once. The first error aborts
    /// the remaining phases; partial writes are not rolled back.
    pub fn run(mut self) -> Result<()> {
        // Phase 1: let plugins register their projections.
        let mut substrate = Substrate::new();
        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), "filling in context");
            let mut builder = ContextBuilder::new(&mut substrate);
            plugin.fill_in(&mut builder);
        }

        // Phase 2: drain every event into the substrate. No renderer may
        // observe the context before the stream is exhausted.
        let mut drained = 0usize;
        for event in EventStream::new(&self.request) {
            let event = event?;
            substrate.dispatch(&event);
            drained += 1;
        }
        tracing::debug!(events = drained, "event stream drained");

        // Phase 3: freeze the context read-only.
        self.context.set(substrate.freeze())?;

        // Phase 4: read the source tree.
        let mut source_set = SourceSet::from_directory(&self.source_root)?;

        // Phase 5: render. Later renderers observe earlier mutations.
        let context = self.context.get()?;
        for renderer in &mut self.renderers {
            let name = renderer.name();
            tracing::debug!(renderer = name, "rendering");
            renderer
                .render(context, &mut source_set)
                .map_err(|source| PipelineError::Render { renderer: name, source })?;
        }

        // Phase 6: flush once.
        source_set.write()?;
        tracing::info!(root = %self.source_root.display(), "pipeline finished");
        Ok(())
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    request: Option<CodeGeneratorRequest>,
    source_root: Option<PathBuf>,
    plugins: Vec<Box<dyn Plugin>>,
    renderers: Vec<Box<dyn Renderer>>,
}

impl PipelineBuilder {
    /// Set the parsed code-generator request.
    pub fn request(mut self, request: CodeGeneratorRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Parse and set the request from its serialized bytes.
    pub fn request_bytes(mut self, bytes: &[u8]) -> Result<Self> {
        self.request = Some(producer::parse_request(bytes)?);
        Ok(self)
    }

    /// Set the root directory of the source tree to post-process.
    pub fn source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = Some(root.into());
        self
    }

    /// Register a plugin. Plugins run in registration order.
    pub fn add_plugin(self, plugin: impl Plugin + 'static) -> Self {
        self.add_boxed_plugin(Box::new(plugin))
    }

    /// Register an externally instantiated plugin.
    pub fn add_boxed_plugin(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Register a renderer. Renderer order is significant: later renderers
    /// observe the mutations of earlier ones.
    pub fn add_renderer(self, renderer: impl Renderer + 'static) -> Self {
        self.add_boxed_renderer(Box::new(renderer))
    }

    /// Register an externally instantiated renderer.
    pub fn add_boxed_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        Ok(Pipeline {
            request: self
                .request
                .ok_or_else(|| PipelineError::Message("request is required".to_string()))?,
            source_root: self
                .source_root
                .ok_or_else(|| PipelineError::Message("source_root is required".to_string()))?,
            plugins: self.plugins,
            renderers: self.renderers,
            context: Injected::new("query context"),
        })
    }
}
