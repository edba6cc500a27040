//! Documentation attached to descriptor elements.

use serde::{Deserialize, Serialize};

/// Resolved documentation comments for a descriptor element.
///
/// Derived from the file's source-code-info location list; both parts are
/// trimmed of surrounding whitespace and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doc {
    /// Comment block immediately preceding the element.
    pub leading: String,
    /// Comment on the same line as the element, after it.
    pub trailing: String,
}

impl Doc {
    /// Create a doc from leading and trailing comment text.
    pub fn new(leading: impl Into<String>, trailing: impl Into<String>) -> Self {
        Self { leading: leading.into(), trailing: trailing.into() }
    }

    /// A doc with no comment text at all.
    pub fn empty() -> Self { Self::default() }

    /// `true` if the element carried no comments.
    pub fn is_empty(&self) -> bool { self.leading.is_empty() && self.trailing.is_empty() }
}
