//! POM entities: projects, dependencies, parent references, properties and
//! repository declarations.
//!
//! Every entity is a cheap `Copy` view onto an element of a document held by
//! the [`PomIndex`]. Cross references (parent → POM, dependency → POM) are
//! coordinate lookups in the index, never stored pointers.

use std::path::{Path, PathBuf};

use pomscope_core::snapshot::{FileId, Snapshot};
use pomscope_util::fs::normalize_path;

use crate::element::{tags, ElementKind, PomElement};
use crate::index::{PomId, PomIndex};

/// Maven's default Java source root, relative to the POM's folder.
pub const DEFAULT_SOURCE_DIRECTORY: &str = "src/main/java";

/// Anything carrying `groupId`/`artifactId`/`version` children.
pub trait ProtoPom<'a> {
    /// The element whose children hold the coordinate.
    fn element(&self) -> PomElement<'a>;

    fn group(&self) -> Option<String> {
        self.element().group_id()?.value()
    }

    fn artifact(&self) -> Option<String> {
        self.element().artifact_id()?.value()
    }

    /// Resolved version, or `""` when there is no `<version>`.
    fn version_string(&self) -> String {
        version_text(self.element().version())
    }

    /// `group:artifact`
    fn short_coordinate(&self) -> String {
        format!(
            "{}:{}",
            self.group().unwrap_or_default(),
            self.artifact().unwrap_or_default()
        )
    }

    /// `group:artifact:version`
    fn coordinate(&self) -> String {
        format!("{}:{}", self.short_coordinate(), self.version_string())
    }
}

/// Resolved value of an optional version element. An unresolvable
/// placeholder is kept verbatim so it stays visible to callers.
pub(crate) fn version_text(element: Option<PomElement<'_>>) -> String {
    match element {
        Some(v) => v.value().unwrap_or_else(|| v.raw_text().to_string()),
        None => String::new(),
    }
}

/// A `<project>` document in the index.
#[derive(Clone, Copy)]
pub struct Pom<'a> {
    index: &'a PomIndex,
    id: PomId,
}

impl<'a> Pom<'a> {
    pub(crate) fn new(index: &'a PomIndex, id: PomId) -> Self {
        Self { index, id }
    }

    pub fn id(&self) -> PomId {
        self.id
    }

    pub fn index(&self) -> &'a PomIndex {
        self.index
    }

    pub fn file(&self) -> FileId {
        self.index.file(self.id)
    }

    /// Path of the POM file.
    pub fn path(&self) -> &'a Path {
        self.index.path(self.id)
    }

    /// Folder containing the POM file (the project base directory).
    pub fn folder(&self) -> &'a Path {
        self.index.folder(self.id)
    }

    /// The `<parent>` reference, if declared.
    pub fn parent(&self) -> Option<Parent<'a>> {
        self.element().parent().map(|element| Parent { element })
    }

    /// POMs in the snapshot whose coordinate equals the `<parent>` coordinate.
    pub fn parent_poms(&self) -> Vec<Pom<'a>> {
        self.index
            .parent_poms(self.id)
            .iter()
            .map(|&p| self.index.pom(p))
            .collect()
    }

    /// Resolved `<name>`.
    pub fn name(&self) -> Option<String> {
        self.element().name()?.value()
    }

    /// Properties declared in this POM's own `<properties>` section.
    pub fn local_properties(&self) -> Vec<PomProperty<'a>> {
        self.element()
            .properties()
            .map(|props| props.children().map(|element| PomProperty { element }).collect())
            .unwrap_or_default()
    }

    /// Every property visible here: local ones plus unshadowed inherited ones.
    pub fn properties(&self) -> Vec<PomProperty<'a>> {
        self.index.properties(self.id)
    }

    pub fn property(&self, name: &str) -> Option<PomProperty<'a>> {
        self.index.property(self.id, name)
    }

    /// Leaf element reached by a `project.*` path, looking up the parent chain.
    pub fn project_property(&self, path: &str) -> Option<PomElement<'a>> {
        self.index.project_property(self.id, path)
    }

    /// Entries of `<dependencies>`.
    pub fn dependencies(&self) -> Vec<Dependency<'a>> {
        self.element()
            .dependencies()
            .map(|deps| collect_dependencies(deps, DependencyOwner::Dependencies))
            .unwrap_or_default()
    }

    /// Entries of `<dependencyManagement><dependencies>`.
    pub fn managed_dependencies(&self) -> Vec<Dependency<'a>> {
        self.element()
            .dependency_management()
            .and_then(|dm| dm.dependencies())
            .map(|deps| collect_dependencies(deps, DependencyOwner::DependencyManagement))
            .unwrap_or_default()
    }

    /// Managed version for `dep`, searched here and then up the parent chain.
    pub fn version_for_dependency(&self, dep: &Dependency<'_>) -> String {
        self.index.version_for_dependency(self.id, &dep.short_coordinate())
    }

    /// `repository`, `snapshotRepository` and `pluginRepository` elements
    /// anywhere in the document.
    pub fn declared_repositories(&self) -> Vec<DeclaredRepository<'a>> {
        self.element()
            .descendants()
            .into_iter()
            .filter(|e| e.kind().is_repository_declaration())
            .map(|element| DeclaredRepository { element })
            .collect()
    }

    /// Resolved `<modules><module>` entries.
    pub fn modules(&self) -> Vec<String> {
        self.element()
            .child(tags::MODULES)
            .map(|modules| {
                modules
                    .children()
                    .filter(|m| m.kind() == ElementKind::Module)
                    .filter_map(|m| m.value())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Absolute source directory: `<build><sourceDirectory>` (inherited if
    /// absent locally) or `src/main/java`, relative to this POM's folder.
    pub fn source_directory(&self) -> PathBuf {
        let relative = self
            .project_property("build.sourceDirectory")
            .and_then(|e| e.value())
            .unwrap_or_else(|| DEFAULT_SOURCE_DIRECTORY.to_string());
        normalize_path(&self.folder().join(relative))
    }

    /// Whether `file` lies inside this POM's source directory.
    pub fn contains_source_file(&self, snapshot: &Snapshot, file: FileId) -> bool {
        snapshot
            .folder_by_path(&self.source_directory())
            .is_some_and(|folder| snapshot.folder_contains(folder, file))
    }
}

impl<'a> ProtoPom<'a> for Pom<'a> {
    fn element(&self) -> PomElement<'a> {
        let root = self.index.document(self.id).root();
        PomElement::new(self.index, self.id, root)
    }

    /// The local `<groupId>`, else the one in `<parent>`.
    fn group(&self) -> Option<String> {
        match self.element().group_id() {
            Some(group) => group.value(),
            None => self.parent()?.group(),
        }
    }

    /// The local `<version>`, else the one in `<parent>`.
    fn version_string(&self) -> String {
        match self.element().version() {
            Some(version) => version_text(Some(version)),
            None => self
                .parent()
                .map(|p| p.version_string())
                .unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for Pom<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pom")
            .field("id", &self.id)
            .field("path", &self.path())
            .finish()
    }
}

fn collect_dependencies(
    collection: PomElement<'_>,
    owner: DependencyOwner,
) -> Vec<Dependency<'_>> {
    collection
        .children()
        .filter(|e| e.kind() == ElementKind::Dependency)
        .map(|element| Dependency { element, owner })
        .collect()
}

/// Which collection a `<dependency>` sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyOwner {
    /// `<dependencies>`: contributes to the project's dependency set.
    Dependencies,
    /// `<dependencyManagement>`: only supplies default versions.
    DependencyManagement,
}

/// A `<dependency>` element.
#[derive(Debug, Clone, Copy)]
pub struct Dependency<'a> {
    element: PomElement<'a>,
    owner: DependencyOwner,
}

impl<'a> Dependency<'a> {
    /// The POM declaring this dependency.
    pub fn pom(&self) -> Pom<'a> {
        self.element.pom()
    }

    pub fn owner(&self) -> DependencyOwner {
        self.owner
    }

    pub fn is_managed(&self) -> bool {
        self.owner == DependencyOwner::DependencyManagement
    }

    /// The `<version>` child as written, if any.
    pub fn explicit_version(&self) -> Option<PomElement<'a>> {
        self.element.version()
    }

    /// Resolved `<type>`, defaulting to `jar`.
    pub fn packaging_type(&self) -> String {
        self.element
            .child(tags::TYPE)
            .and_then(|t| t.value())
            .unwrap_or_else(|| "jar".to_string())
    }

    /// A `dependencyManagement` entry importing another POM's managed versions.
    pub fn is_bom_import(&self) -> bool {
        self.is_managed() && self.scope_string() == "import" && self.packaging_type() == "pom"
    }
}

impl<'a> ProtoPom<'a> for Dependency<'a> {
    fn element(&self) -> PomElement<'a> {
        self.element
    }

    /// Explicit version, else the managed version from the declaring POM's
    /// `dependencyManagement` chain.
    fn version_string(&self) -> String {
        match self.explicit_version() {
            Some(version) => version_text(Some(version)),
            None if self.owner == DependencyOwner::Dependencies => {
                self.pom().version_for_dependency(self)
            }
            None => String::new(),
        }
    }
}

/// A `<parent>` reference. Identifies another POM by coordinate only.
#[derive(Debug, Clone, Copy)]
pub struct Parent<'a> {
    element: PomElement<'a>,
}

impl Parent<'_> {
    pub fn relative_path(&self) -> Option<String> {
        self.element.child(tags::RELATIVE_PATH)?.value()
    }
}

impl<'a> ProtoPom<'a> for Parent<'a> {
    fn element(&self) -> PomElement<'a> {
        self.element
    }
}

/// A property declared inside `<properties>`, keyed by its tag name.
#[derive(Debug, Clone, Copy)]
pub struct PomProperty<'a> {
    element: PomElement<'a>,
}

impl<'a> PomProperty<'a> {
    pub(crate) fn from_element(element: PomElement<'a>) -> Self {
        Self { element }
    }

    pub fn name(&self) -> &'a str {
        self.element.tag()
    }

    pub fn value(&self) -> Option<String> {
        self.element.value()
    }

    pub fn raw_text(&self) -> &'a str {
        self.element.raw_text()
    }

    pub fn element(&self) -> PomElement<'a> {
        self.element
    }

    /// The POM declaring this property (not necessarily the one it was looked up from).
    pub fn declaring_pom(&self) -> Pom<'a> {
        self.element.pom()
    }
}

/// A remote repository declared in a POM.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredRepository<'a> {
    element: PomElement<'a>,
}

impl<'a> DeclaredRepository<'a> {
    pub fn kind(&self) -> ElementKind {
        self.element.kind()
    }

    pub fn id(&self) -> Option<String> {
        self.element.child(tags::ID)?.value()
    }

    pub fn name(&self) -> Option<String> {
        self.element.name()?.value()
    }

    pub fn url(&self) -> Option<String> {
        self.element.child(tags::URL)?.value()
    }

    pub fn element(&self) -> PomElement<'a> {
        self.element
    }
}
