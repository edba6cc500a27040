//! Proto file descriptors.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::OptionValue;

/// Syntax revision a proto file is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Syntax {
    /// The `proto2` syntax. Files that declare no syntax default to it.
    #[default]
    Proto2,
    /// The `proto3` syntax.
    Proto3,
}

impl FromStr for Syntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "proto2" => Ok(Syntax::Proto2),
            "proto3" => Ok(Syntax::Proto3),
            other => Err(format!("unknown proto syntax: `{}`", other)),
        }
    }
}

/// A proto file as seen by the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoFile {
    /// Path of the file relative to the proto source root, e.g.
    /// `acme/travel/journey.proto`.
    pub path: PathBuf,
    /// Package declared by the file; empty for the default package.
    pub package: String,
    /// Syntax revision of the file.
    pub syntax: Syntax,
    /// Options declared on the file, in declaration order.
    pub options: Vec<OptionValue>,
}

impl ProtoFile {
    /// Create a new file record.
    pub fn new(
        path: impl Into<PathBuf>,
        package: impl Into<String>,
        syntax: Syntax,
        options: Vec<OptionValue>,
    ) -> Self {
        Self { path: path.into(), package: package.into(), syntax, options }
    }
}
