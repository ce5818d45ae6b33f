//! Immutable file-tree snapshot.
//!
//! A [`Snapshot`] records every file under a root directory together with
//! its folder chain, so containment questions ("is this file inside that
//! source directory?") are answered without touching the filesystem again.
//! File contents are read lazily, or supplied up front when the snapshot is
//! assembled in memory with [`SnapshotBuilder`].

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;

use pomscope_util::errors::PomscopeError;
use pomscope_util::fs::normalize_path;

use crate::config::ScanConfig;
use crate::xml::XmlDocument;

/// Symlink loops are cut off at this depth when following links.
const MAX_SCAN_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FolderId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

#[derive(Debug, Clone)]
struct FolderEntry {
    path: PathBuf,
    name: String,
    parent: Option<FolderId>,
}

#[derive(Debug, Clone)]
struct FileEntry {
    path: PathBuf,
    name: String,
    parent: FolderId,
}

/// A read-only view of a directory tree.
#[derive(Debug, Clone)]
pub struct Snapshot {
    folders: Vec<FolderEntry>,
    files: Vec<FileEntry>,
    folder_index: HashMap<PathBuf, FolderId>,
    contents: HashMap<FileId, String>,
}

impl Snapshot {
    fn empty(root: PathBuf) -> Self {
        let root = normalize_path(&root);
        let name = base_name(&root);
        let mut folder_index = HashMap::new();
        folder_index.insert(root.clone(), FolderId(0));
        Self {
            folders: vec![FolderEntry {
                path: root,
                name,
                parent: None,
            }],
            files: Vec::new(),
            folder_index,
            contents: HashMap::new(),
        }
    }

    /// Start assembling a snapshot in memory.
    pub fn builder(root: impl Into<PathBuf>) -> SnapshotBuilder {
        SnapshotBuilder {
            snapshot: Self::empty(root.into()),
        }
    }

    /// Scan `root` recursively, skipping paths matched by the exclude globs.
    pub fn scan(root: &Path, config: &ScanConfig) -> miette::Result<Self> {
        if !root.is_dir() {
            return Err(PomscopeError::NotFound {
                message: format!("Snapshot root {} is not a directory", root.display()),
            }
            .into());
        }
        let exclude = config.exclude_set()?;
        let root = std::path::absolute(root).map_err(PomscopeError::Io)?;
        let mut snapshot = Self::empty(root);
        let root = snapshot.root_path().to_path_buf();
        let mut walker = Walker {
            root: &root,
            exclude: &exclude,
            follow_symlinks: config.follow_symlinks,
            visited: HashSet::new(),
        };
        walker.enter(&root);
        let entries = fs::read_dir(&root).map_err(PomscopeError::Io)?;
        walker.walk_entries(&mut snapshot, entries, 0);
        tracing::debug!(
            "Scanned {}: {} files in {} folders",
            root.display(),
            snapshot.files.len(),
            snapshot.folders.len()
        );
        Ok(snapshot)
    }

    fn ensure_folder(&mut self, path: &Path) -> FolderId {
        if let Some(&id) = self.folder_index.get(path) {
            return id;
        }
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Some(self.ensure_folder(parent)),
            _ => None,
        };
        let id = FolderId(self.folders.len() as u32);
        self.folders.push(FolderEntry {
            path: path.to_path_buf(),
            name: base_name(path),
            parent,
        });
        self.folder_index.insert(path.to_path_buf(), id);
        id
    }

    fn add_file(&mut self, path: PathBuf) -> FileId {
        let path = normalize_path(&path);
        let parent = match path.parent() {
            Some(parent) => self.ensure_folder(parent),
            None => self.root(),
        };
        let id = FileId(self.files.len() as u32);
        self.files.push(FileEntry {
            name: base_name(&path),
            path,
            parent,
        });
        id
    }

    /// The root folder.
    pub fn root(&self) -> FolderId {
        FolderId(0)
    }

    pub fn root_path(&self) -> &Path {
        &self.folders[0].path
    }

    pub fn files(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.files.len() as u32).map(FileId)
    }

    pub fn folders(&self) -> impl Iterator<Item = FolderId> + '_ {
        (0..self.folders.len() as u32).map(FolderId)
    }

    /// Absolute path of a file.
    pub fn file_path(&self, file: FileId) -> &Path {
        &self.files[file.0 as usize].path
    }

    /// Base name of a file, including its extension.
    pub fn file_name(&self, file: FileId) -> &str {
        &self.files[file.0 as usize].name
    }

    /// Base name of a file without its extension.
    pub fn file_stem(&self, file: FileId) -> &str {
        let name = self.file_name(file);
        match name.rfind('.') {
            Some(0) | None => name,
            Some(dot) => &name[..dot],
        }
    }

    pub fn file_extension(&self, file: FileId) -> Option<&str> {
        let name = self.file_name(file);
        match name.rfind('.') {
            Some(0) | None => None,
            Some(dot) => Some(&name[dot + 1..]),
        }
    }

    /// Folder directly containing a file.
    pub fn file_parent(&self, file: FileId) -> FolderId {
        self.files[file.0 as usize].parent
    }

    pub fn folder_path(&self, folder: FolderId) -> &Path {
        &self.folders[folder.0 as usize].path
    }

    pub fn folder_name(&self, folder: FolderId) -> &str {
        &self.folders[folder.0 as usize].name
    }

    pub fn folder_parent(&self, folder: FolderId) -> Option<FolderId> {
        self.folders[folder.0 as usize].parent
    }

    /// Strict ancestors of a folder, nearest first.
    pub fn folder_ancestors(&self, folder: FolderId) -> impl Iterator<Item = FolderId> + '_ {
        std::iter::successors(self.folder_parent(folder), move |&f| self.folder_parent(f))
    }

    /// Look up a folder by absolute path. The path is normalized first.
    pub fn folder_by_path(&self, path: &Path) -> Option<FolderId> {
        self.folder_index.get(&normalize_path(path)).copied()
    }

    /// Whether `file` lies inside `folder`, at any depth.
    pub fn folder_contains(&self, folder: FolderId, file: FileId) -> bool {
        self.folder_contains_folder(folder, self.file_parent(file))
    }

    /// Whether `inner` is `outer` or lies inside it.
    pub fn folder_contains_folder(&self, outer: FolderId, inner: FolderId) -> bool {
        inner == outer || self.folder_ancestors(inner).any(|f| f == outer)
    }

    /// All files inside `folder`, at any depth.
    pub fn files_under(&self, folder: FolderId) -> Vec<FileId> {
        self.files()
            .filter(|&f| self.folder_contains(folder, f))
            .collect()
    }

    /// Files with an `.xml` extension, in snapshot order.
    pub fn xml_files(&self) -> Vec<FileId> {
        self.files()
            .filter(|&f| {
                self.file_extension(f)
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
            })
            .collect()
    }

    /// Contents of a file: the in-memory copy if one was supplied, else read from disk.
    pub fn read_to_string(&self, file: FileId) -> miette::Result<String> {
        if let Some(content) = self.contents.get(&file) {
            return Ok(content.clone());
        }
        fs::read_to_string(self.file_path(file)).map_err(|e| PomscopeError::Io(e).into())
    }

    /// Read and parse a file as XML.
    pub fn parse_xml(&self, file: FileId) -> miette::Result<XmlDocument> {
        let content = self.read_to_string(file)?;
        XmlDocument::parse(&content, self.file_path(file))
    }
}

/// In-memory snapshot assembly, mostly for tests and embedding.
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Add a file, relative to the root, whose contents are read from disk on demand.
    pub fn file(mut self, relative: impl AsRef<Path>) -> Self {
        let path = self.snapshot.root_path().join(relative);
        self.snapshot.add_file(path);
        self
    }

    /// Add a file, relative to the root, with the given contents.
    pub fn file_with_contents(mut self, relative: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        let path = self.snapshot.root_path().join(relative);
        let id = self.snapshot.add_file(path);
        self.snapshot.contents.insert(id, contents.into());
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

struct Walker<'a> {
    root: &'a Path,
    exclude: &'a GlobSet,
    follow_symlinks: bool,
    /// Canonical paths of the directories walked so far.
    visited: HashSet<PathBuf>,
}

impl Walker<'_> {
    /// Records `dir`; false if it was already walked under another path.
    fn enter(&mut self, dir: &Path) -> bool {
        let canonical = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        self.visited.insert(canonical)
    }

    fn walk_entries(&mut self, snapshot: &mut Snapshot, entries: fs::ReadDir, depth: usize) {
        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            let rel = path.strip_prefix(self.root).unwrap_or(&path);
            if self.exclude.is_match(rel) {
                tracing::debug!("Skipping excluded path {}", path.display());
                continue;
            }

            let Ok(link_meta) = fs::symlink_metadata(&path) else {
                continue;
            };
            let meta = if link_meta.file_type().is_symlink() {
                if !self.follow_symlinks {
                    tracing::debug!("Skipping symlink {}", path.display());
                    continue;
                }
                match fs::metadata(&path) {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::debug!("Skipping dangling symlink {}: {e}", path.display());
                        continue;
                    }
                }
            } else {
                link_meta
            };

            if meta.is_dir() {
                if depth >= MAX_SCAN_DEPTH {
                    tracing::warn!("Maximum scan depth reached at {}", path.display());
                    continue;
                }
                if !self.enter(&path) {
                    tracing::debug!("Skipping already scanned directory {}", path.display());
                    continue;
                }
                match fs::read_dir(&path) {
                    Ok(children) => {
                        snapshot.ensure_folder(&path);
                        self.walk_entries(snapshot, children, depth + 1);
                    }
                    Err(e) => tracing::warn!("Cannot read directory {}: {e}", path.display()),
                }
            } else if meta.is_file() {
                snapshot.add_file(path);
            }
        }
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
