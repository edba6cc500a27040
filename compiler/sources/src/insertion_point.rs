//! Insertion-point markers and per-language comment shapes.

/// Well-known label marking the top of a file.
pub const FILE_START: &str = "file_start";

/// Well-known label marking the bottom of a file.
pub const FILE_END: &str = "file_end";

/// A named location in a source file where code may be added later.
///
/// The point renders as the substring `INSERT:'<label>'` inside a comment
/// line. Matching is purely textual: any line containing the marker
/// substring is an occurrence of the point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InsertionPoint {
    label: String,
}

impl InsertionPoint {
    /// Create a point with the given label.
    pub fn new(label: impl Into<String>) -> Self { Self { label: label.into() } }

    /// The point conventionally placed before the first line of a file.
    pub fn file_start() -> Self { Self::new(FILE_START) }

    /// The point conventionally placed after the last line of a file.
    pub fn file_end() -> Self { Self::new(FILE_END) }

    /// The label of this point.
    pub fn label(&self) -> &str { &self.label }

    /// The marker substring searched for in file lines.
    pub fn marker(&self) -> String { format!("INSERT:'{}'", self.label) }
}

/// Single-line comment shape of a target language.
///
/// The core only ever matches the marker substring; the comment prefix
/// exists so printed markers do not break the surrounding source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSyntax {
    prefix: String,
}

impl CommentSyntax {
    /// A comment syntax with the given line prefix.
    pub fn new(prefix: impl Into<String>) -> Self { Self { prefix: prefix.into() } }

    /// `//` comments, as in Java, Kotlin, or JavaScript.
    pub fn slashes() -> Self { Self::new("//") }

    /// `#` comments, as in shell or Python.
    pub fn pound() -> Self { Self::new("#") }

    /// Render the full marker line for a point, e.g. `// INSERT:'file_start'`.
    pub fn fence(&self, point: &InsertionPoint) -> String {
        format!("{} {}", self.prefix, point.marker())
    }
}
