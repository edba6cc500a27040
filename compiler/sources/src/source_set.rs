//! The in-memory source tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use walkdir::WalkDir;

use crate::source_file::{PreReadAction, SourceFile};
use crate::{Result, SourceError};

/// All files of one directory, held in memory for a pipeline run.
///
/// Paths are stored relative to the root directory and kept unique: a path
/// lives in the live file map or in the deleted set, never both.
pub struct SourceSet {
    root_dir: PathBuf,
    files: BTreeMap<PathBuf, SourceFile>,
    deleted: BTreeSet<PathBuf>,
    pre_read_actions: Vec<PreReadAction>,
}

impl SourceSet {
    /// An empty set over the given root directory.
    pub fn empty(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            files: BTreeMap::new(),
            deleted: BTreeSet::new(),
            pre_read_actions: Vec::new(),
        }
    }

    /// Read every regular file under `root_dir` into a new set.
    ///
    /// The walk is recursive and follows symlinks; non-regular entries are
    /// ignored. Files are read as UTF-8 text. A missing root yields an
    /// empty set — the directory is created on flush.
    pub fn from_directory(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let root_dir = root_dir.into();
        let mut set = Self::empty(root_dir.clone());
        if !root_dir.exists() {
            return Ok(set);
        }
        for entry in WalkDir::new(&root_dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|error| {
                let path = error.path().map(Path::to_path_buf).unwrap_or_else(|| root_dir.clone());
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("file system loop"));
                SourceError::Read { path, source }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&root_dir)
                .map(Path::to_path_buf)
                .expect("walked path is under the walk root");
            let code = fs::read_to_string(entry.path())
                .map_err(|source| SourceError::Read { path: entry.path().to_path_buf(), source })?;
            set.files.insert(relative.clone(), SourceFile::from_disk(relative, code));
        }
        tracing::debug!(root = %set.root_dir.display(), files = set.files.len(), "read source set");
        Ok(set)
    }

    /// The root directory this set was read from and flushes to.
    pub fn root_dir(&self) -> &Path { &self.root_dir }

    /// Number of live files in the set.
    pub fn len(&self) -> usize { self.files.len() }

    /// `true` when the set holds no live files.
    pub fn is_empty(&self) -> bool { self.files.is_empty() }

    /// Relative paths of all live files, in path order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Look up a file by exact relative path or unique path suffix.
    pub fn file(&self, path: impl AsRef<Path>) -> Result<&SourceFile> {
        let resolved = self.resolve(path.as_ref())?;
        self.files.get(&resolved).ok_or(SourceError::NotFound(resolved))
    }

    /// Mutable variant of [`SourceSet::file`].
    pub fn file_mut(&mut self, path: impl AsRef<Path>) -> Result<&mut SourceFile> {
        let resolved = self.resolve(path.as_ref())?;
        self.files.get_mut(&resolved).ok_or(SourceError::NotFound(resolved))
    }

    /// Create a new file with the given code, marked changed.
    ///
    /// The file inherits every pre-read action registered on the set. A
    /// pending deletion of the same path is superseded.
    pub fn create_file(
        &mut self,
        path: impl Into<PathBuf>,
        code: impl Into<String>,
    ) -> &mut SourceFile {
        let relative = self.relativize(path.into());
        self.deleted.remove(&relative);
        let mut file = SourceFile::from_code(relative.clone(), code.into());
        for action in &self.pre_read_actions {
            file.attach(Rc::clone(action));
        }
        self.files.insert(relative.clone(), file);
        self.files.get_mut(&relative).expect("file was just inserted")
    }

    /// Remove a file from the set and schedule its on-disk path for
    /// recursive removal on flush.
    ///
    /// The removal is recursive: passing a directory path removes the whole
    /// subtree under it. A file created earlier in the same run is simply
    /// dropped — it never reaches the disk — while its path is still
    /// scheduled, which is a no-op when nothing exists there.
    pub fn delete(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let resolved = match self.resolve(path) {
            Ok(resolved) => resolved,
            // Allow deleting paths that only exist on disk, e.g. a directory.
            Err(SourceError::NotFound(_)) if self.root_dir.join(path).exists() => {
                self.relativize(path.to_path_buf())
            }
            Err(error) => return Err(error),
        };
        self.files.remove(&resolved);
        self.deleted.insert(resolved);
        Ok(())
    }

    /// Register an action to run the first time any file's code is read.
    ///
    /// The action is attached to every file currently in the set and to
    /// every file created afterwards. Files whose code is never read are
    /// never touched by it.
    pub fn prepare_code(&mut self, action: impl Fn(&mut SourceFile) + 'static) {
        let action: PreReadAction = Rc::new(action);
        for file in self.files.values_mut() {
            file.attach(Rc::clone(&action));
        }
        self.pre_read_actions.push(action);
    }

    /// Flush the set back to its root directory.
    ///
    /// Creates the root if missing, removes every deleted path recursively,
    /// and rewrites changed files (creating parent directories as needed).
    /// Unchanged files are left alone, mtimes included.
    pub fn write(&self) -> Result<()> {
        fs::create_dir_all(&self.root_dir)
            .map_err(|source| SourceError::Write { path: self.root_dir.clone(), source })?;
        for deleted in &self.deleted {
            let target = self.root_dir.join(deleted);
            remove_recursively(&target)?;
            tracing::debug!(path = %target.display(), "removed");
        }
        for (path, file) in &self.files {
            if !file.is_changed() {
                continue;
            }
            let target = self.root_dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|source| SourceError::Write { path: parent.to_path_buf(), source })?;
            }
            fs::write(&target, file.raw_code())
                .map_err(|source| SourceError::Write { path: target.clone(), source })?;
            tracing::debug!(path = %target.display(), "wrote");
        }
        Ok(())
    }

    /// Resolve a lookup path to the stored relative path.
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let path = self.relativize(path.to_path_buf());
        if self.files.contains_key(&path) {
            return Ok(path);
        }
        let mut matches =
            self.files.keys().filter(|stored| stored.ends_with(&path)).cloned().collect::<Vec<_>>();
        match matches.len() {
            0 => Err(SourceError::NotFound(path)),
            1 => Ok(matches.remove(0)),
            _ => Err(SourceError::Ambiguous { path, matches }),
        }
    }

    /// Strip the root prefix from absolute paths under the root.
    fn relativize(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path.strip_prefix(&self.root_dir).map(Path::to_path_buf).unwrap_or(path)
        } else {
            path
        }
    }
}

impl std::fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSet")
            .field("root_dir", &self.root_dir)
            .field("files", &self.files.len())
            .field("deleted", &self.deleted)
            .finish()
    }
}

/// Remove a path of any kind, recursively for directories. Missing paths
/// are a no-op.
fn remove_recursively(target: &Path) -> Result<()> {
    let Ok(metadata) = fs::symlink_metadata(target) else {
        return Ok(());
    };
    let removal = if metadata.is_dir() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    };
    removal.map_err(|source| SourceError::Write { path: target.to_path_buf(), source })
}
