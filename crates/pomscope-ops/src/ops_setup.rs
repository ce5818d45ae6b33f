//! Operation: open a project tree for querying.
//!
//! Scans the root, indexes its POMs and gathers the local repositories
//! artifact lookups run against.

use std::path::{Path, PathBuf};

use pomscope_core::config::{GlobalConfig, SnapshotConfig};
use pomscope_core::snapshot::Snapshot;
use pomscope_maven::{LocalRepository, PomIndex};
use pomscope_util::errors::PomscopeError;
use pomscope_util::fs::{find_ancestor_with, normalize_path};

/// A scanned tree with its POM index and local repositories.
#[derive(Debug)]
pub struct Session {
    pub snapshot: Snapshot,
    pub index: PomIndex,
    pub repositories: Vec<LocalRepository>,
}

impl Session {
    /// Scan `root` and index it.
    ///
    /// Repositories are taken, in order, from `extra_repos`, the
    /// `[repository]` paths of `pomscope.toml`, and every `.m2/repository`
    /// folder inside the tree. Only when all of these are empty is the user's
    /// own local repository (global config, else `~/.m2/repository`) used.
    pub fn open(root: &Path, extra_repos: &[PathBuf]) -> miette::Result<Self> {
        let config = SnapshotConfig::load(root)?;
        let snapshot = Snapshot::scan(root, &config.scan)?;
        let index = PomIndex::build(&snapshot);

        let mut repositories = Vec::new();
        for path in extra_repos
            .iter()
            .cloned()
            .chain(config.repository_paths(snapshot.root_path()))
        {
            let path = repository_path(&path)?;
            push_unique(&mut repositories, LocalRepository::scan(&path)?);
        }
        for detected in LocalRepository::detect(&snapshot) {
            push_unique(&mut repositories, detected);
        }
        if repositories.is_empty() {
            if let Some(path) = user_repository()? {
                push_unique(&mut repositories, LocalRepository::scan(&path)?);
            }
        }

        tracing::info!(
            "Indexed {} POMs under {} with {} local repositories",
            index.len(),
            snapshot.root_path().display(),
            repositories.len()
        );
        Ok(Self::from_parts(snapshot, index, repositories))
    }

    pub fn from_parts(snapshot: Snapshot, index: PomIndex, repositories: Vec<LocalRepository>) -> Self {
        Self {
            snapshot,
            index,
            repositories,
        }
    }

    pub fn root(&self) -> &Path {
        self.snapshot.root_path()
    }
}

/// The tree to scan when none is given: the nearest folder at or above `cwd`
/// holding a `pomscope.toml`, else `cwd` itself.
pub fn default_root(cwd: &Path) -> PathBuf {
    find_ancestor_with(cwd, SnapshotConfig::FILE_NAME).unwrap_or_else(|| cwd.to_path_buf())
}

fn user_repository() -> miette::Result<Option<PathBuf>> {
    let config = GlobalConfig::load()?;
    Ok(config
        .local_repository_path()
        .filter(|path| path.is_dir()))
}

fn push_unique(repositories: &mut Vec<LocalRepository>, repository: LocalRepository) {
    let root = normalize_path(repository.root());
    if repositories
        .iter()
        .any(|r| normalize_path(r.root()) == root)
    {
        tracing::debug!("Repository {} already registered", root.display());
        return;
    }
    repositories.push(repository);
}

/// Resolve a user-supplied repository path against the working directory.
fn repository_path(path: &Path) -> miette::Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(PomscopeError::Io)?;
    Ok(normalize_path(&absolute))
}
