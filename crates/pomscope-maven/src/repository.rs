//! Local Maven repositories and jar matching.
//!
//! Layout: `<repo>/<group path>/<artifact>/<version>/<file>.jar`. A jar's
//! coordinate comes from its position in the tree, never from its file name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use pomscope_core::snapshot::{FolderId, Snapshot};
use pomscope_util::errors::PomscopeError;

use crate::pom::ProtoPom;
use crate::version::VersionSpec;

pub const REPOSITORY_DIR: &str = "repository";
pub const M2_DIR: &str = ".m2";

/// A `(group, artifact, version)` triple with the version kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(group: &str, artifact: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version: version.to_string(),
        }
    }

    /// The resolved coordinate of a POM, dependency or parent reference.
    pub fn of<'a>(proto: &impl ProtoPom<'a>) -> Self {
        Self {
            group: proto.group().unwrap_or_default(),
            artifact: proto.artifact().unwrap_or_default(),
            version: proto.version_string(),
        }
    }

    /// Parse `group:artifact` or `group:artifact:version`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split(':');
        let group = parts.next().filter(|s| !s.is_empty())?;
        let artifact = parts.next().filter(|s| !s.is_empty())?;
        let version = parts.next().unwrap_or("");
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(group, artifact, version))
    }

    pub fn version_spec(&self) -> VersionSpec {
        VersionSpec::parse(&self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// A jar inside a local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoJar {
    pub path: PathBuf,
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl RepoJar {
    /// Derive the coordinate from the directories above `path`.
    ///
    /// `<root>/org/slf4j/slf4j-api/2.0.9/slf4j-api-2.0.9.jar` becomes
    /// `("org.slf4j", "slf4j-api", "2.0.9")`. Returns `None` when the jar
    /// sits fewer than three folders below the root.
    pub fn from_path(root: &Path, path: PathBuf) -> Option<Self> {
        let rel = path.strip_prefix(root).ok()?;
        let components: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if components.len() < 4 {
            return None;
        }
        let n = components.len();
        let version = components[n - 2].clone();
        let artifact = components[n - 3].clone();
        let group = components[..n - 3].join(".");
        Some(Self {
            path,
            group,
            artifact,
            version,
        })
    }

    /// Same group and artifact; version ignored.
    pub fn artifact_matches(&self, coordinate: &Coordinate) -> bool {
        self.group == coordinate.group && self.artifact == coordinate.artifact
    }

    /// Same group and artifact, and a version the coordinate's version string accepts.
    pub fn precisely_matches(&self, coordinate: &Coordinate) -> bool {
        self.artifact_matches(coordinate) && coordinate.version_spec().matches(&self.version)
    }
}

/// Jars of one local repository.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
    jars: Vec<RepoJar>,
}

impl LocalRepository {
    /// Build from an explicit list of jar paths under `root`.
    pub fn from_jar_paths(root: impl Into<PathBuf>, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let root = root.into();
        let mut jars: Vec<RepoJar> = paths
            .into_iter()
            .filter_map(|p| RepoJar::from_path(&root, p))
            .collect();
        jars.sort_by(|a, b| a.path.cmp(&b.path));
        Self { root, jars }
    }

    /// A folder named `repository` whose parent is named `.m2`.
    pub fn is_repository_folder(snapshot: &Snapshot, folder: FolderId) -> bool {
        snapshot.folder_name(folder) == REPOSITORY_DIR
            && snapshot
                .folder_parent(folder)
                .is_some_and(|p| snapshot.folder_name(p) == M2_DIR)
    }

    /// Every `.m2/repository` folder in the snapshot.
    pub fn detect(snapshot: &Snapshot) -> Vec<Self> {
        snapshot
            .folders()
            .filter(|&f| Self::is_repository_folder(snapshot, f))
            .map(|f| Self::from_snapshot(snapshot, f))
            .collect()
    }

    /// The jars the snapshot holds under `folder`.
    pub fn from_snapshot(snapshot: &Snapshot, folder: FolderId) -> Self {
        let jars = snapshot
            .files_under(folder)
            .into_iter()
            .filter(|&f| snapshot.file_extension(f) == Some("jar"))
            .map(|f| snapshot.file_path(f).to_path_buf());
        Self::from_jar_paths(snapshot.folder_path(folder), jars)
    }

    /// Walk a repository directory on disk.
    pub fn scan(root: &Path) -> miette::Result<Self> {
        if !root.is_dir() {
            return Err(PomscopeError::NotFound {
                message: format!("Local repository {} is not a directory", root.display()),
            }
            .into());
        }
        let mut paths = Vec::new();
        collect_jars(root, &mut paths);
        tracing::debug!("Found {} jars in {}", paths.len(), root.display());
        Ok(Self::from_jar_paths(root, paths))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn jars(&self) -> &[RepoJar] {
        &self.jars
    }

    /// Jars for `coordinate`.
    ///
    /// If the version is a hard qualifier, or any jar matches precisely, only
    /// precise matches are returned. Otherwise every jar of the same
    /// group and artifact is returned, whatever its version: with no
    /// authoritative match, recall wins over precision.
    pub fn find_artifacts(&self, coordinate: &Coordinate) -> Vec<&RepoJar> {
        let precise: Vec<&RepoJar> = self
            .jars
            .iter()
            .filter(|j| j.precisely_matches(coordinate))
            .collect();
        if coordinate.version_spec().is_hard() || !precise.is_empty() {
            return precise;
        }
        self.jars
            .iter()
            .filter(|j| j.artifact_matches(coordinate))
            .collect()
    }
}

fn collect_jars(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!("Cannot read {}", dir.display());
        return;
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();
    for path in paths {
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        if meta.file_type().is_symlink() {
            tracing::debug!("Skipping symlink {}", path.display());
        } else if meta.is_dir() {
            collect_jars(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "jar") {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(paths: &[&str]) -> LocalRepository {
        let root = PathBuf::from("/home/u/.m2/repository");
        LocalRepository::from_jar_paths(&root, paths.iter().map(|p| root.join(p)))
    }

    fn versions(jars: Vec<&RepoJar>) -> Vec<&str> {
        jars.into_iter().map(|j| j.version.as_str()).collect()
    }

    #[test]
    fn coordinate_from_layout() {
        let jar = RepoJar::from_path(
            Path::new("/r"),
            PathBuf::from("/r/org/slf4j/slf4j-api/2.0.9/slf4j-api-2.0.9.jar"),
        )
        .unwrap();
        assert_eq!(jar.group, "org.slf4j");
        assert_eq!(jar.artifact, "slf4j-api");
        assert_eq!(jar.version, "2.0.9");
    }

    #[test]
    fn coordinate_ignores_file_name() {
        let jar = RepoJar::from_path(Path::new("/r"), PathBuf::from("/r/junit/junit/4.13/renamed.jar"))
            .unwrap();
        assert_eq!((jar.group.as_str(), jar.version.as_str()), ("junit", "4.13"));
    }

    #[test]
    fn shallow_jar_is_ignored() {
        assert!(RepoJar::from_path(Path::new("/r"), PathBuf::from("/r/lib/1.0/lib.jar")).is_none());
    }

    #[test]
    fn hard_qualifier_returns_exact_only() {
        let repo = repo(&["com/x/lib/1.0/lib-1.0.jar", "com/x/lib/1.0.1/lib-1.0.1.jar"]);
        let found = repo.find_artifacts(&Coordinate::new("com.x", "lib", "[1.0]"));
        assert_eq!(versions(found), vec!["1.0"]);
    }

    #[test]
    fn hard_qualifier_without_match_returns_nothing() {
        let repo = repo(&["com/x/lib/1.5/lib-1.5.jar"]);
        assert!(repo
            .find_artifacts(&Coordinate::new("com.x", "lib", "[1.0]"))
            .is_empty());
    }

    #[test]
    fn soft_version_prefers_precise_matches() {
        let repo = repo(&[
            "com/x/lib/1.0/lib-1.0.jar",
            "com/x/lib/1.0.1/lib-1.0.1.jar",
            "com/x/lib/2.0/lib-2.0.jar",
        ]);
        let found = repo.find_artifacts(&Coordinate::new("com.x", "lib", "1.0"));
        assert_eq!(versions(found), vec!["1.0", "1.0.1"]);
    }

    #[test]
    fn soft_version_without_precise_match_returns_all_versions() {
        let repo = repo(&[
            "com/x/lib/1.5/lib-1.5.jar",
            "com/x/lib/3.0/lib-3.0.jar",
            "com/x/other/2.0/other-2.0.jar",
        ]);
        let found = repo.find_artifacts(&Coordinate::new("com.x", "lib", "2.0"));
        assert_eq!(versions(found), vec!["1.5", "3.0"]);
    }

    #[test]
    fn coordinate_parse() {
        assert_eq!(
            Coordinate::parse("org.ex:lib:1.0"),
            Some(Coordinate::new("org.ex", "lib", "1.0"))
        );
        assert_eq!(
            Coordinate::parse("org.ex:lib"),
            Some(Coordinate::new("org.ex", "lib", ""))
        );
        assert_eq!(Coordinate::parse("lib"), None);
        assert_eq!(Coordinate::parse("a:b:c:d"), None);
    }

    #[cfg(unix)]
    #[test]
    fn scan_does_not_descend_into_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("repository");
        let version = root.join("com/x/lib/1.0");
        fs::create_dir_all(&version).unwrap();
        fs::write(version.join("lib-1.0.jar"), "").unwrap();
        std::os::unix::fs::symlink(&root, root.join("com/loop")).unwrap();
        std::os::unix::fs::symlink(&root, root.join("com/loop2")).unwrap();

        let repo = LocalRepository::scan(&root).unwrap();
        assert_eq!(repo.jars().len(), 1);
        assert_eq!(repo.jars()[0].artifact, "lib");
    }
}
