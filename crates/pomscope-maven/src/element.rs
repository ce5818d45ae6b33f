//! Typed views over the generic XML elements of a POM.

use pomscope_core::xml::{ElementId, XmlDocument};

use crate::index::{PomId, PomIndex};
use crate::pom::Pom;

/// Tag names with meaning in a POM.
pub mod tags {
    pub const PROJECT: &str = "project";
    pub const GROUP_ID: &str = "groupId";
    pub const ARTIFACT_ID: &str = "artifactId";
    pub const VERSION: &str = "version";
    pub const NAME: &str = "name";
    pub const SCOPE: &str = "scope";
    pub const TYPE: &str = "type";
    pub const PARENT: &str = "parent";
    pub const RELATIVE_PATH: &str = "relativePath";
    pub const DEPENDENCY: &str = "dependency";
    pub const DEPENDENCIES: &str = "dependencies";
    pub const DEPENDENCY_MANAGEMENT: &str = "dependencyManagement";
    pub const PROPERTIES: &str = "properties";
    pub const REPOSITORY: &str = "repository";
    pub const SNAPSHOT_REPOSITORY: &str = "snapshotRepository";
    pub const PLUGIN_REPOSITORY: &str = "pluginRepository";
    pub const ID: &str = "id";
    pub const URL: &str = "url";
    pub const BUILD: &str = "build";
    pub const SOURCE_DIRECTORY: &str = "sourceDirectory";
    pub const MODULES: &str = "modules";
    pub const MODULE: &str = "module";
}

/// Classification of an element by its tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Project,
    GroupId,
    ArtifactId,
    Version,
    Name,
    Scope,
    Parent,
    Dependency,
    Dependencies,
    DependencyManagement,
    Properties,
    /// Any direct child of `<properties>`, whatever its tag.
    Property,
    Repository,
    SnapshotRepository,
    PluginRepository,
    Build,
    SourceDirectory,
    Modules,
    Module,
    Other,
}

impl ElementKind {
    pub fn classify(tag: &str, enclosing_tag: Option<&str>) -> Self {
        if enclosing_tag == Some(tags::PROPERTIES) {
            return Self::Property;
        }
        match tag {
            tags::PROJECT => Self::Project,
            tags::GROUP_ID => Self::GroupId,
            tags::ARTIFACT_ID => Self::ArtifactId,
            tags::VERSION => Self::Version,
            tags::NAME => Self::Name,
            tags::SCOPE => Self::Scope,
            tags::PARENT => Self::Parent,
            tags::DEPENDENCY => Self::Dependency,
            tags::DEPENDENCIES => Self::Dependencies,
            tags::DEPENDENCY_MANAGEMENT => Self::DependencyManagement,
            tags::PROPERTIES => Self::Properties,
            tags::REPOSITORY => Self::Repository,
            tags::SNAPSHOT_REPOSITORY => Self::SnapshotRepository,
            tags::PLUGIN_REPOSITORY => Self::PluginRepository,
            tags::BUILD => Self::Build,
            tags::SOURCE_DIRECTORY => Self::SourceDirectory,
            tags::MODULES => Self::Modules,
            tags::MODULE => Self::Module,
            _ => Self::Other,
        }
    }

    /// Whether this kind declares a remote repository.
    pub fn is_repository_declaration(self) -> bool {
        matches!(
            self,
            Self::Repository | Self::SnapshotRepository | Self::PluginRepository
        )
    }
}

/// An element of a POM document, located in the index.
///
/// The owning POM is part of the view so that values can be resolved in the
/// right context (properties, parent chain).
#[derive(Clone, Copy)]
pub struct PomElement<'a> {
    index: &'a PomIndex,
    pom: PomId,
    id: ElementId,
}

impl<'a> PomElement<'a> {
    pub(crate) fn new(index: &'a PomIndex, pom: PomId, id: ElementId) -> Self {
        Self { index, pom, id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn pom_id(&self) -> PomId {
        self.pom
    }

    /// The POM this element belongs to.
    pub fn pom(&self) -> Pom<'a> {
        self.index.pom(self.pom)
    }

    pub(crate) fn index(&self) -> &'a PomIndex {
        self.index
    }

    fn doc(&self) -> &'a XmlDocument {
        self.index.document(self.pom)
    }

    /// Local tag name.
    pub fn tag(&self) -> &'a str {
        self.doc().name(self.id)
    }

    pub fn kind(&self) -> ElementKind {
        let doc = self.doc();
        let enclosing = doc.parent(self.id).map(|p| doc.name(p));
        ElementKind::classify(self.tag(), enclosing)
    }

    /// Character content as written, before placeholder resolution.
    pub fn raw_text(&self) -> &'a str {
        self.doc().text(self.id)
    }

    /// Enclosing element in the XML tree.
    pub fn xml_parent(&self) -> Option<PomElement<'a>> {
        self.doc()
            .parent(self.id)
            .map(|p| Self::new(self.index, self.pom, p))
    }

    pub fn children(&self) -> impl Iterator<Item = PomElement<'a>> + 'a {
        let (index, pom) = (self.index, self.pom);
        self.doc()
            .children(self.id)
            .iter()
            .map(move |&c| PomElement::new(index, pom, c))
    }

    pub fn has_children(&self) -> bool {
        self.doc().has_children(self.id)
    }

    /// The child with the given tag. Tags are assumed unique per element;
    /// the first one wins otherwise.
    pub fn child(&self, tag: &str) -> Option<PomElement<'a>> {
        self.doc()
            .child(self.id, tag)
            .map(|c| Self::new(self.index, self.pom, c))
    }

    pub fn descendants(&self) -> Vec<PomElement<'a>> {
        self.doc()
            .descendants(self.id)
            .into_iter()
            .map(|d| Self::new(self.index, self.pom, d))
            .collect()
    }

    pub fn group_id(&self) -> Option<PomElement<'a>> {
        self.child(tags::GROUP_ID)
    }

    pub fn artifact_id(&self) -> Option<PomElement<'a>> {
        self.child(tags::ARTIFACT_ID)
    }

    pub fn version(&self) -> Option<PomElement<'a>> {
        self.child(tags::VERSION)
    }

    pub fn name(&self) -> Option<PomElement<'a>> {
        self.child(tags::NAME)
    }

    pub fn scope(&self) -> Option<PomElement<'a>> {
        self.child(tags::SCOPE)
    }

    pub fn parent(&self) -> Option<PomElement<'a>> {
        self.child(tags::PARENT)
    }

    pub fn dependencies(&self) -> Option<PomElement<'a>> {
        self.child(tags::DEPENDENCIES)
    }

    pub fn dependency_management(&self) -> Option<PomElement<'a>> {
        self.child(tags::DEPENDENCY_MANAGEMENT)
    }

    pub fn properties(&self) -> Option<PomElement<'a>> {
        self.child(tags::PROPERTIES)
    }

    pub fn build(&self) -> Option<PomElement<'a>> {
        self.child(tags::BUILD)
    }
}

impl std::fmt::Debug for PomElement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PomElement")
            .field("pom", &self.pom)
            .field("tag", &self.tag())
            .field("text", &self.raw_text())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::ProtoPom;

    #[test]
    fn classify_known_tags() {
        assert_eq!(ElementKind::classify("project", None), ElementKind::Project);
        assert_eq!(
            ElementKind::classify("dependencyManagement", Some("project")),
            ElementKind::DependencyManagement
        );
        assert_eq!(
            ElementKind::classify("snapshotRepository", Some("distributionManagement")),
            ElementKind::SnapshotRepository
        );
        assert_eq!(ElementKind::classify("packaging", Some("project")), ElementKind::Other);
    }

    #[test]
    fn children_of_properties_are_properties() {
        assert_eq!(
            ElementKind::classify("version", Some("properties")),
            ElementKind::Property
        );
        assert_eq!(
            ElementKind::classify("kotlin.version", Some("properties")),
            ElementKind::Property
        );
    }

    #[test]
    fn repository_declarations() {
        assert!(ElementKind::PluginRepository.is_repository_declaration());
        assert!(ElementKind::Repository.is_repository_declaration());
        assert!(!ElementKind::Dependency.is_repository_declaration());
    }

    #[test]
    fn typed_accessors_walk_the_document() {
        use pomscope_core::snapshot::Snapshot;

        let snapshot = Snapshot::builder("/w")
            .file_with_contents(
                "pom.xml",
                r#"<project>
    <artifactId>app</artifactId>
    <build><sourceDirectory>src</sourceDirectory></build>
    <properties><version.x>1</version.x></properties>
</project>"#,
            )
            .build();
        let index = PomIndex::build(&snapshot);
        let root = index.pom(index.ids().next().unwrap()).element();

        assert_eq!(root.kind(), ElementKind::Project);
        assert_eq!(root.artifact_id().unwrap().raw_text(), "app");
        assert!(root.group_id().is_none());

        let source = root.build().unwrap().child(tags::SOURCE_DIRECTORY).unwrap();
        assert_eq!(source.kind(), ElementKind::SourceDirectory);
        assert_eq!(source.xml_parent().unwrap().tag(), tags::BUILD);

        let property = root.properties().unwrap().children().next().unwrap();
        assert_eq!(property.kind(), ElementKind::Property);
        assert!(!property.has_children());
        assert_eq!(root.descendants().len(), 5);
    }
}
