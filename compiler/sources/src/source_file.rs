//! A single file of the source set.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::{InsertionPoint, LINE_SEPARATOR};

/// Deferred callback executed the first time a file's code is read.
pub(crate) type PreReadAction = Rc<dyn Fn(&mut SourceFile)>;

/// One source file held in memory by a [`crate::SourceSet`].
///
/// Created either from disk (`changed` starts `false`) or from code
/// (`changed` starts `true`). Mutations — [`SourceFile::overwrite`] and
/// insertions through [`SourceFile::at`] — mark the file changed; only
/// changed files are rewritten on flush.
pub struct SourceFile {
    path: PathBuf,
    code: String,
    changed: bool,
    already_read: bool,
    pre_read_actions: Vec<PreReadAction>,
    /// Lines already inserted after each marker occurrence, keyed by
    /// `(label, occurrence index)`. Lets repeated insertions at the same
    /// marker land after one another instead of directly after the marker.
    inserted: BTreeMap<(String, usize), usize>,
}

impl SourceFile {
    /// A file read from disk.
    pub(crate) fn from_disk(path: PathBuf, code: String) -> Self {
        Self {
            path,
            code,
            changed: false,
            already_read: false,
            pre_read_actions: Vec::new(),
            inserted: BTreeMap::new(),
        }
    }

    /// A file created from code during the run.
    pub(crate) fn from_code(path: PathBuf, code: String) -> Self {
        Self {
            path,
            code,
            changed: true,
            already_read: false,
            pre_read_actions: Vec::new(),
            inserted: BTreeMap::new(),
        }
    }

    /// Path of the file, relative to the owning set's root directory.
    pub fn path(&self) -> &Path { &self.path }

    /// `true` when the file must be rewritten on flush.
    pub fn is_changed(&self) -> bool { self.changed }

    /// Current contents of the file.
    ///
    /// The first read executes the pre-read actions registered through
    /// [`crate::SourceSet::prepare_code`]; files nobody reads are never
    /// touched by those actions.
    pub fn code(&mut self) -> &str {
        if !self.already_read {
            self.already_read = true;
            let actions = std::mem::take(&mut self.pre_read_actions);
            for action in &actions {
                action(self);
            }
        }
        &self.code
    }

    /// Current contents split on the platform line separator.
    pub fn lines(&mut self) -> Vec<String> {
        self.code().split(LINE_SEPARATOR).map(str::to_string).collect()
    }

    /// Replace the whole contents of the file.
    ///
    /// Any insertion-point markers present in the previous contents are
    /// lost together with the text around them; prefer
    /// [`SourceFile::at`] when adding to a file that carries markers.
    pub fn overwrite(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.changed = true;
        self.inserted.clear();
    }

    /// Start an insertion at the given point.
    pub fn at(&mut self, point: &InsertionPoint) -> Insertion<'_> {
        Insertion { file: self, point: point.clone() }
    }

    pub(crate) fn attach(&mut self, action: PreReadAction) {
        if self.already_read {
            // The file was read before the action was registered; fire
            // immediately to keep parity with files read later.
            action(self);
        } else {
            self.pre_read_actions.push(action);
        }
    }

    pub(crate) fn raw_code(&self) -> &str { &self.code }

    fn insert_blocks(&mut self, marker: &str, label: &str, block: &[String]) {
        let code = self.code().to_string();
        let file_lines: Vec<&str> = code.split(LINE_SEPARATOR).collect();
        let mut out: Vec<String> = Vec::with_capacity(file_lines.len() + block.len());
        let mut occurrence = 0;
        let mut hit = false;
        let mut i = 0;
        while i < file_lines.len() {
            let line = file_lines[i];
            out.push(line.to_string());
            i += 1;
            if line.contains(marker) {
                let key = (label.to_string(), occurrence);
                let already = self.inserted.get(&key).copied().unwrap_or(0);
                // Skip past lines inserted here by earlier calls so this
                // block lands after them.
                for _ in 0..already {
                    if i < file_lines.len() {
                        out.push(file_lines[i].to_string());
                        i += 1;
                    }
                }
                out.extend(block.iter().cloned());
                self.inserted.insert(key, already + block.len());
                occurrence += 1;
                hit = true;
            }
        }
        if hit {
            self.code = out.join(LINE_SEPARATOR);
            self.changed = true;
        }
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("changed", &self.changed)
            .field("already_read", &self.already_read)
            .field("pre_read_actions", &self.pre_read_actions.len())
            .finish()
    }
}

/// A pending insertion at one point of one file.
pub struct Insertion<'a> {
    file: &'a mut SourceFile,
    point: InsertionPoint,
}

impl Insertion<'_> {
    /// Add the lines after every occurrence of the point's marker.
    ///
    /// Lines already added at the same marker stay above the new block, so
    /// repeated calls compose in call order. When the file contains no
    /// marker for the point, the call is a no-op.
    pub fn add<S: AsRef<str>>(&mut self, lines: &[S]) { self.add_indented(lines, 0) }

    /// Like [`Insertion::add`], prefixing every line with `4 * extra_indent`
    /// spaces.
    pub fn add_indented<S: AsRef<str>>(&mut self, lines: &[S], extra_indent: usize) {
        if lines.is_empty() {
            return;
        }
        let indent = " ".repeat(4 * extra_indent);
        let block: Vec<String> =
            lines.iter().map(|line| format!("{indent}{}", line.as_ref())).collect();
        let marker = self.point.marker();
        self.file.insert_blocks(&marker, self.point.label(), &block);
    }
}
