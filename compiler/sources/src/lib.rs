#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Source tree model.
//!
//! A [`SourceSet`] holds the files of one directory in memory for the
//! duration of a pipeline run. Renderers look files up (exact path or
//! unique suffix), create and delete them, overwrite their contents, or
//! add code at [`InsertionPoint`] markers. The set tracks which files
//! changed; [`SourceSet::write`] flushes deletions and changed files back
//! to disk and leaves everything else untouched.
//!
//! Files are plain UTF-8 text. Insertion points are text markers of the
//! shape `INSERT:'<label>'` inside a comment line; the comment prefix is
//! chosen per target language via [`CommentSyntax`].

mod insertion_point;
mod source_file;
mod source_set;

use std::path::PathBuf;

use thiserror::Error;

pub use crate::insertion_point::{CommentSyntax, InsertionPoint, FILE_END, FILE_START};
pub use crate::source_file::{Insertion, SourceFile};
pub use crate::source_set::SourceSet;

/// Line separator used when splitting and joining file contents.
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Errors raised by source-set operations.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No stored file matches the given path.
    #[error("No source file matches `{0}`")]
    NotFound(PathBuf),
    /// More than one stored file path ends with the given path.
    #[error("Path `{path}` is ambiguous: {} stored files match", matches.len())]
    Ambiguous {
        /// The ambiguous lookup path.
        path: PathBuf,
        /// All stored paths that match it.
        matches: Vec<PathBuf>,
    },
    /// I/O failure while reading a source file.
    #[error("Failed to read `{path}`: {source}")]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// I/O failure while flushing the set to disk.
    #[error("Failed to write `{path}`: {source}")]
    Write {
        /// Path being written or removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Convenient result type for source-set operations.
pub type Result<T> = std::result::Result<T, SourceError>;
