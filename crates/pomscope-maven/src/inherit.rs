//! Inheritance along the parent chain: property visibility, managed
//! dependency versions, `project.*` lookups.
//!
//! Local definitions always shadow inherited ones by name; nothing is merged.
//! Every walk here runs over the index's acyclic parent links and also keeps a
//! visited list, so it terminates whatever the snapshot contains.

use std::collections::BTreeMap;

use pomscope_core::xml::ElementId;

use crate::element::PomElement;
use crate::index::{PomId, PomIndex};
use crate::pom::{version_text, PomProperty, ProtoPom};

/// Where a visible property is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PropertyRef {
    pom: PomId,
    element: ElementId,
}

/// Visible properties of one POM, by name.
pub(crate) type PropertyMap = BTreeMap<String, PropertyRef>;

impl PomIndex {
    fn property_map(&self, id: PomId) -> &PropertyMap {
        self.property_cache[id.index()].get_or_init(|| self.collect_properties(id))
    }

    fn collect_properties(&self, id: PomId) -> PropertyMap {
        let mut map = PropertyMap::new();
        for property in self.pom(id).local_properties() {
            map.entry(property.name().to_string()).or_insert(PropertyRef {
                pom: id,
                element: property.element().id(),
            });
        }
        // First parent wins when several match the same coordinate.
        for &parent in self.parent_poms(id) {
            for (name, declared) in self.property_map(parent) {
                map.entry(name.clone()).or_insert(*declared);
            }
        }
        map
    }

    fn property_ref(&self, declared: PropertyRef) -> PomProperty<'_> {
        PomProperty::from_element(PomElement::new(self, declared.pom, declared.element))
    }

    /// Local properties plus every ancestor property not shadowed by name.
    pub fn properties(&self, id: PomId) -> Vec<PomProperty<'_>> {
        self.property_map(id)
            .values()
            .map(|&declared| self.property_ref(declared))
            .collect()
    }

    /// The visible property called `name`.
    pub fn property(&self, id: PomId, name: &str) -> Option<PomProperty<'_>> {
        self.property_map(id)
            .get(name)
            .map(|&declared| self.property_ref(declared))
    }

    /// Managed version of `group:artifact` for dependencies of POM `id`.
    ///
    /// Looks at this POM's `dependencyManagement`, then the parents'. If the
    /// whole chain has no explicit entry, BOM imports (`scope=import`,
    /// `type=pom`) found along the chain are searched the same way. Returns
    /// `""` when nothing manages the coordinate.
    pub fn version_for_dependency(&self, id: PomId, short_coordinate: &str) -> String {
        let mut visited = Vec::new();
        self.managed_version(id, short_coordinate, &mut visited)
    }

    fn managed_version(&self, id: PomId, short: &str, visited: &mut Vec<PomId>) -> String {
        let explicit = self.explicit_managed_version(id, short, &mut Vec::new());
        if !explicit.is_empty() {
            return explicit;
        }
        self.imported_managed_version(id, short, visited)
    }

    fn explicit_managed_version(&self, id: PomId, short: &str, visited: &mut Vec<PomId>) -> String {
        if visited.contains(&id) {
            return String::new();
        }
        visited.push(id);

        let managed = self
            .pom(id)
            .managed_dependencies()
            .into_iter()
            .filter(|d| !d.is_bom_import())
            .find(|d| d.explicit_version().is_some() && d.short_coordinate() == short);
        if let Some(dep) = managed {
            return version_text(dep.explicit_version());
        }

        for &parent in self.parent_poms(id) {
            let version = self.explicit_managed_version(parent, short, visited);
            if !version.is_empty() {
                return version;
            }
        }
        String::new()
    }

    fn imported_managed_version(&self, id: PomId, short: &str, visited: &mut Vec<PomId>) -> String {
        if visited.contains(&id) {
            return String::new();
        }
        visited.push(id);

        let imports: Vec<String> = self
            .pom(id)
            .managed_dependencies()
            .into_iter()
            .filter(|d| d.is_bom_import())
            .map(|d| d.coordinate())
            .collect();
        for coordinate in imports {
            for &bom in self.find(&coordinate) {
                if visited.contains(&bom) {
                    continue;
                }
                let version = self.managed_version(bom, short, visited);
                if !version.is_empty() {
                    return version;
                }
            }
        }

        for &parent in self.parent_poms(id) {
            let version = self.imported_managed_version(parent, short, visited);
            if !version.is_empty() {
                return version;
            }
        }
        String::new()
    }

    /// Leaf element reached from `<project>` by a dotted `path`
    /// (`version`, `parent.version`, `build.sourceDirectory`).
    ///
    /// An element with children is not a value and yields `None`, but it still
    /// shadows the parents. Only when the path is absent locally is the
    /// parent chain consulted.
    pub fn project_property(&self, id: PomId, path: &str) -> Option<PomElement<'_>> {
        let mut visited = Vec::new();
        self.find_project_property(id, path, &mut visited)
    }

    fn find_project_property(
        &self,
        id: PomId,
        path: &str,
        visited: &mut Vec<PomId>,
    ) -> Option<PomElement<'_>> {
        if visited.contains(&id) {
            return None;
        }
        visited.push(id);

        let doc = self.document(id);
        let mut current = Some(doc.root());
        for segment in path.split('.') {
            current = current.and_then(|element| doc.child(element, segment));
        }
        match current {
            Some(element) if !doc.has_children(element) => Some(PomElement::new(self, id, element)),
            Some(_) => None,
            None => self
                .parent_poms(id)
                .iter()
                .find_map(|&parent| self.find_project_property(parent, path, visited)),
        }
    }

    /// Strict ancestors along first parents, nearest first.
    ///
    /// Fails with `CyclicParent` if `id` or one of its ancestors sits on a
    /// parent cycle.
    pub fn ancestor_chain(&self, id: PomId) -> miette::Result<Vec<PomId>> {
        let mut chain = Vec::new();
        let mut current = id;
        loop {
            if let Some(cycle) = self.cycle_containing(current) {
                return Err(self.cycle_error(cycle).into());
            }
            match self.parent_poms(current).first() {
                Some(&parent) if parent != id && !chain.contains(&parent) => {
                    chain.push(parent);
                    current = parent;
                }
                _ => return Ok(chain),
            }
        }
    }
}
