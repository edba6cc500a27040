//! The insertion-point printer.

use std::collections::BTreeSet;
use std::path::Path;

use projections::QueryContext;
use sources::{CommentSyntax, InsertionPoint, SourceSet, FILE_END, FILE_START, LINE_SEPARATOR};

use crate::{RenderError, Renderer};

/// A renderer that prints insertion-point markers into source files.
///
/// The printer does not rewrite files eagerly. It registers a pre-read
/// action on the source set, so markers materialize the first time another
/// renderer reads a matching file; files nobody reads stay byte-identical
/// on disk.
///
/// Only the well-known [`InsertionPoint::file_start`] and
/// [`InsertionPoint::file_end`] anchors are printed. Points with other
/// labels need language knowledge to place and are ignored here; concrete
/// language printers emit them as part of generated code instead.
pub struct InsertionPointPrinter {
    syntax: CommentSyntax,
    extensions: BTreeSet<String>,
    points: Vec<InsertionPoint>,
}

impl InsertionPointPrinter {
    /// A printer using the given comment syntax, printing both well-known
    /// anchors into every file.
    pub fn new(syntax: CommentSyntax) -> Self {
        Self {
            syntax,
            extensions: BTreeSet::new(),
            points: vec![InsertionPoint::file_start(), InsertionPoint::file_end()],
        }
    }

    /// Restrict the printer to files with the given extension. May be
    /// called repeatedly; an unrestricted printer matches every file.
    pub fn for_extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.insert(extension.into());
        self
    }

    /// Replace the set of points to print.
    pub fn with_points(mut self, points: impl IntoIterator<Item = InsertionPoint>) -> Self {
        self.points = points.into_iter().collect();
        self
    }

    fn matches(extensions: &BTreeSet<String>, path: &Path) -> bool {
        if extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extensions.contains(extension))
            .unwrap_or(false)
    }
}

impl Renderer for InsertionPointPrinter {
    fn name(&self) -> &'static str { "InsertionPointPrinter" }

    fn render(
        &mut self,
        _context: &QueryContext,
        sources: &mut SourceSet,
    ) -> Result<(), RenderError> {
        let syntax = self.syntax.clone();
        let extensions = self.extensions.clone();
        let start = self.points.iter().any(|point| point.label() == FILE_START);
        let end = self.points.iter().any(|point| point.label() == FILE_END);
        sources.prepare_code(move |file| {
            if !Self::matches(&extensions, file.path()) {
                return;
            }
            let mut lines = Vec::with_capacity(3);
            if start {
                lines.push(syntax.fence(&InsertionPoint::file_start()));
            }
            lines.push(file.code().to_string());
            if end {
                lines.push(syntax.fence(&InsertionPoint::file_end()));
            }
            file.overwrite(lines.join(LINE_SEPARATOR));
        });
        Ok(())
    }
}
