//! The POM index: an arena of every POM in a snapshot, indexed by coordinate.
//!
//! Parent links depend on coordinates, and coordinates may depend on inherited
//! properties, which depend on parent links. The index settles this by
//! iterating: compute coordinates with the current links, re-link parents by
//! coordinate, repeat until the links stop changing.
//!
//! Parent cycles are found with Tarjan's SCC algorithm and every edge inside
//! a cycle is removed, so the link table the rest of the crate walks is
//! always acyclic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use pomscope_core::snapshot::{FileId, Snapshot};
use pomscope_core::xml::XmlDocument;
use pomscope_util::errors::PomscopeError;

use crate::element::tags;
use crate::inherit::PropertyMap;
use crate::pom::{Parent, Pom, ProtoPom};

/// Maven Shade Plugin output; a duplicate of the real POM next to it.
pub const DEPENDENCY_REDUCED_POM: &str = "dependency-reduced-pom";

/// Upper bound on coordinate/link refinement passes.
const MAX_LINK_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PomId(u32);

impl PomId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct PomEntry {
    file: FileId,
    path: PathBuf,
    folder: PathBuf,
    document: XmlDocument,
}

/// Every POM of a snapshot plus the derived coordinate and parent tables.
#[derive(Debug)]
pub struct PomIndex {
    entries: Vec<PomEntry>,
    parents: Vec<Vec<PomId>>,
    coordinates: Vec<String>,
    by_coordinate: HashMap<String, Vec<PomId>>,
    by_short_coordinate: HashMap<String, Vec<PomId>>,
    cycles: Vec<Vec<PomId>>,
    cycle_of: Vec<Option<usize>>,
    pub(crate) property_cache: Vec<OnceLock<PropertyMap>>,
}

impl PomIndex {
    /// Parse every XML file of the snapshot and index those that are POMs.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut entries = Vec::new();
        for file in snapshot.xml_files() {
            let path = snapshot.file_path(file);
            if snapshot.file_stem(file) == DEPENDENCY_REDUCED_POM {
                tracing::debug!("Ignoring shaded duplicate {}", path.display());
                continue;
            }
            let document = match snapshot.parse_xml(file) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };
            if document.name(document.root()) != tags::PROJECT {
                continue;
            }
            entries.push(PomEntry {
                file,
                path: path.to_path_buf(),
                folder: snapshot.folder_path(snapshot.file_parent(file)).to_path_buf(),
                document,
            });
        }
        Self::from_entries(entries)
    }

    fn from_entries(mut entries: Vec<PomEntry>) -> Self {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        let n = entries.len();
        let mut index = Self {
            entries,
            parents: vec![Vec::new(); n],
            coordinates: Vec::new(),
            by_coordinate: HashMap::new(),
            by_short_coordinate: HashMap::new(),
            cycles: Vec::new(),
            cycle_of: vec![None; n],
            property_cache: Vec::new(),
        };

        for pass in 0..MAX_LINK_PASSES {
            index.refresh();
            let (links, cycles) = index.link_parents();
            index.set_cycles(cycles);
            if links == index.parents {
                break;
            }
            tracing::debug!("Parent links changed in pass {pass}, recomputing coordinates");
            index.parents = links;
        }
        index.refresh();

        for error in index.cycle_errors() {
            tracing::warn!("{error}");
        }
        tracing::debug!("Indexed {} POMs", index.len());
        index
    }

    /// Drop memoized properties and recompute coordinates with the current links.
    fn refresh(&mut self) {
        self.property_cache = (0..self.len()).map(|_| OnceLock::new()).collect();
        let coordinates: Vec<(String, String)> = self
            .ids()
            .map(|id| {
                let pom = self.pom(id);
                (pom.short_coordinate(), pom.coordinate())
            })
            .collect();

        self.by_coordinate.clear();
        self.by_short_coordinate.clear();
        self.coordinates.clear();
        for (i, (short, full)) in coordinates.into_iter().enumerate() {
            let id = PomId(i as u32);
            self.by_short_coordinate.entry(short).or_default().push(id);
            self.by_coordinate.entry(full.clone()).or_default().push(id);
            self.coordinates.push(full);
        }
    }

    /// Match every `<parent>` against the coordinate table and cut cycles.
    fn link_parents(&self) -> (Vec<Vec<PomId>>, Vec<Vec<PomId>>) {
        let mut links: Vec<Vec<PomId>> = self
            .ids()
            .map(|id| {
                self.pom(id)
                    .parent()
                    .map(|parent: Parent<'_>| self.find(&parent.coordinate()).to_vec())
                    .unwrap_or_default()
            })
            .collect();

        let mut graph: DiGraph<PomId, ()> = DiGraph::with_capacity(self.len(), self.len());
        let nodes: Vec<NodeIndex> = self.ids().map(|id| graph.add_node(id)).collect();
        for (child, parents) in links.iter().enumerate() {
            for parent in parents {
                graph.add_edge(nodes[child], nodes[parent.index()], ());
            }
        }

        let mut cycles = Vec::new();
        for component in tarjan_scc(&graph) {
            let is_cycle = component.len() > 1
                || (component.len() == 1 && graph.contains_edge(component[0], component[0]));
            if !is_cycle {
                continue;
            }
            let members: Vec<PomId> = component.iter().map(|&n| graph[n]).collect();
            cycles.push(cycle_order(&members, &links));
            for &member in &members {
                links[member.index()].retain(|p| !members.contains(p));
            }
        }
        cycles.sort();
        (links, cycles)
    }

    fn set_cycles(&mut self, cycles: Vec<Vec<PomId>>) {
        self.cycle_of = vec![None; self.len()];
        for (i, cycle) in cycles.iter().enumerate() {
            for member in cycle {
                self.cycle_of[member.index()] = Some(i);
            }
        }
        self.cycles = cycles;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// POM ids in file-path order.
    pub fn ids(&self) -> impl Iterator<Item = PomId> {
        (0..self.entries.len() as u32).map(PomId)
    }

    pub fn pom(&self, id: PomId) -> Pom<'_> {
        Pom::new(self, id)
    }

    pub fn poms(&self) -> impl Iterator<Item = Pom<'_>> {
        self.ids().map(move |id| self.pom(id))
    }

    pub fn document(&self, id: PomId) -> &XmlDocument {
        &self.entries[id.index()].document
    }

    pub fn file(&self, id: PomId) -> FileId {
        self.entries[id.index()].file
    }

    pub fn path(&self, id: PomId) -> &Path {
        &self.entries[id.index()].path
    }

    pub fn folder(&self, id: PomId) -> &Path {
        &self.entries[id.index()].folder
    }

    /// The POM stored at `path`, if any.
    pub fn pom_by_path(&self, path: &Path) -> Option<PomId> {
        self.ids().find(|&id| self.path(id) == path)
    }

    /// Effective `group:artifact:version` of a POM as of the last refresh.
    pub fn coordinate(&self, id: PomId) -> &str {
        &self.coordinates[id.index()]
    }

    /// POMs with exactly this `group:artifact:version`.
    pub fn find(&self, coordinate: &str) -> &[PomId] {
        self.by_coordinate
            .get(coordinate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// POMs with this `group:artifact`, any version.
    pub fn find_short(&self, short_coordinate: &str) -> &[PomId] {
        self.by_short_coordinate
            .get(short_coordinate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// POMs matching this POM's `<parent>` coordinate. Zero, one or several.
    pub fn parent_poms(&self, id: PomId) -> &[PomId] {
        &self.parents[id.index()]
    }

    /// Detected parent cycles, each listed in link order.
    pub fn cycles(&self) -> &[Vec<PomId>] {
        &self.cycles
    }

    pub fn in_cycle(&self, id: PomId) -> bool {
        self.cycle_of[id.index()].is_some()
    }

    pub(crate) fn cycle_containing(&self, id: PomId) -> Option<&[PomId]> {
        self.cycle_of[id.index()].map(|i| self.cycles[i].as_slice())
    }

    /// One `CyclicParent` error per detected cycle.
    pub fn cycle_errors(&self) -> Vec<PomscopeError> {
        self.cycles.iter().map(|c| self.cycle_error(c)).collect()
    }

    pub(crate) fn cycle_error(&self, cycle: &[PomId]) -> PomscopeError {
        let mut chain: Vec<&str> = cycle.iter().map(|&id| self.coordinate(id)).collect();
        if let Some(&first) = chain.first() {
            chain.push(first);
        }
        PomscopeError::CyclicParent {
            chain: chain.join(" -> "),
        }
    }
}

/// Order cycle members by following parent links from the smallest id.
fn cycle_order(members: &[PomId], links: &[Vec<PomId>]) -> Vec<PomId> {
    let Some(&start) = members.iter().min() else {
        return Vec::new();
    };
    let mut ordered = vec![start];
    let mut current = start;
    while let Some(&next) = links[current.index()]
        .iter()
        .find(|p| members.contains(p) && !ordered.contains(p))
    {
        ordered.push(next);
        current = next;
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pom(group: &str, artifact: &str, version: &str, parent: Option<(&str, &str, &str)>) -> String {
        let parent = parent
            .map(|(g, a, v)| {
                format!("<parent><groupId>{g}</groupId><artifactId>{a}</artifactId><version>{v}</version></parent>")
            })
            .unwrap_or_default();
        format!(
            "<project>{parent}<groupId>{group}</groupId><artifactId>{artifact}</artifactId><version>{version}</version></project>"
        )
    }

    #[test]
    fn indexes_projects_by_coordinate() {
        let snap = Snapshot::builder("/w")
            .file_with_contents("a/pom.xml", pom("org.ex", "a", "1.0", None))
            .file_with_contents("b/pom.xml", pom("org.ex", "b", "2.0", None))
            .build();
        let index = PomIndex::build(&snap);
        assert_eq!(index.len(), 2);
        let a = index.find("org.ex:a:1.0");
        assert_eq!(a.len(), 1);
        assert_eq!(index.path(a[0]), Path::new("/w/a/pom.xml"));
        assert_eq!(index.find_short("org.ex:b").len(), 1);
        assert!(index.find("org.ex:b:1.0").is_empty());
    }

    #[test]
    fn skips_non_project_and_reduced_poms() {
        let snap = Snapshot::builder("/w")
            .file_with_contents("pom.xml", pom("org.ex", "a", "1.0", None))
            .file_with_contents("dependency-reduced-pom.xml", pom("org.ex", "a", "1.0", None))
            .file_with_contents("settings.xml", "<settings/>")
            .file_with_contents("broken.xml", "<project><groupId>")
            .build();
        let index = PomIndex::build(&snap);
        assert_eq!(index.len(), 1);
        assert_eq!(index.path(PomId(0)), Path::new("/w/pom.xml"));
    }

    #[test]
    fn links_parent_by_coordinate() {
        let snap = Snapshot::builder("/w")
            .file_with_contents("pom.xml", pom("org.ex", "parent", "1.0", None))
            .file_with_contents(
                "child/pom.xml",
                pom("org.ex", "child", "1.0", Some(("org.ex", "parent", "1.0"))),
            )
            .build();
        let index = PomIndex::build(&snap);
        let child = index.find("org.ex:child:1.0")[0];
        let parent = index.find("org.ex:parent:1.0")[0];
        assert_eq!(index.parent_poms(child), &[parent]);
        assert!(index.parent_poms(parent).is_empty());
        assert!(index.cycles().is_empty());
    }

    #[test]
    fn ambiguous_parent_keeps_every_match() {
        let snap = Snapshot::builder("/w")
            .file_with_contents("p1/pom.xml", pom("org.ex", "parent", "1.0", None))
            .file_with_contents("p2/pom.xml", pom("org.ex", "parent", "1.0", None))
            .file_with_contents(
                "c/pom.xml",
                pom("org.ex", "child", "1.0", Some(("org.ex", "parent", "1.0"))),
            )
            .build();
        let index = PomIndex::build(&snap);
        let child = index.find("org.ex:child:1.0")[0];
        assert_eq!(index.parent_poms(child).len(), 2);
    }

    #[test]
    fn parent_cycle_is_detected_and_cut() {
        let snap = Snapshot::builder("/w")
            .file_with_contents("a/pom.xml", pom("org.ex", "a", "1", Some(("org.ex", "b", "1"))))
            .file_with_contents("b/pom.xml", pom("org.ex", "b", "1", Some(("org.ex", "a", "1"))))
            .file_with_contents("c/pom.xml", pom("org.ex", "c", "1", Some(("org.ex", "a", "1"))))
            .build();
        let index = PomIndex::build(&snap);
        assert_eq!(index.cycles().len(), 1);

        let a = index.find("org.ex:a:1")[0];
        let b = index.find("org.ex:b:1")[0];
        let c = index.find("org.ex:c:1")[0];
        assert!(index.parent_poms(a).is_empty());
        assert!(index.parent_poms(b).is_empty());
        assert_eq!(index.parent_poms(c), &[a]);
        assert!(index.in_cycle(a) && index.in_cycle(b));
        assert!(!index.in_cycle(c));

        let message = index.cycle_errors()[0].to_string();
        assert_eq!(
            message,
            "Cyclic parent POM reference: org.ex:a:1 -> org.ex:b:1 -> org.ex:a:1"
        );
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let snap = Snapshot::builder("/w")
            .file_with_contents("pom.xml", pom("org.ex", "a", "1", Some(("org.ex", "a", "1"))))
            .build();
        let index = PomIndex::build(&snap);
        assert_eq!(index.cycles(), &[vec![PomId(0)]]);
        assert!(index.parent_poms(PomId(0)).is_empty());
    }

    #[test]
    fn inherited_property_in_own_version_is_linked_in_a_later_pass() {
        // The child's version comes from a property declared in the parent,
        // so the grandchild can only link once the child is linked.
        let parent = r#"<project>
            <groupId>org.ex</groupId><artifactId>parent</artifactId><version>1</version>
            <properties><revision>7.0</revision></properties>
        </project>"#;
        let child = r#"<project>
            <parent><groupId>org.ex</groupId><artifactId>parent</artifactId><version>1</version></parent>
            <artifactId>child</artifactId><version>${revision}</version>
        </project>"#;
        let grandchild = r#"<project>
            <parent><groupId>org.ex</groupId><artifactId>child</artifactId><version>7.0</version></parent>
            <artifactId>leaf</artifactId>
        </project>"#;
        let snap = Snapshot::builder("/w")
            .file_with_contents("pom.xml", parent)
            .file_with_contents("child/pom.xml", child)
            .file_with_contents("child/leaf/pom.xml", grandchild)
            .build();
        let index = PomIndex::build(&snap);

        let child = index.find("org.ex:child:7.0");
        assert_eq!(child.len(), 1);
        let leaf = index.find("org.ex:leaf:7.0");
        assert_eq!(leaf.len(), 1);
        assert_eq!(index.parent_poms(leaf[0]), child);
    }
}
