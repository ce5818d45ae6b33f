//! Dependency scopes and the compile-time/exported dependency classification.

use std::fmt;

use crate::pom::{Dependency, DependencyOwner, Pom, ProtoPom};
use crate::version::VersionSpec;

/// Scope assumed when a dependency declares none.
pub const DEFAULT_SCOPE: &str = "compile";

/// A dependency's usage classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
    Other(String),
}

impl Scope {
    pub fn parse(s: &str) -> Self {
        match s {
            "compile" => Self::Compile,
            "provided" => Self::Provided,
            "runtime" => Self::Runtime,
            "test" => Self::Test,
            "system" => Self::System,
            "import" => Self::Import,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
            Self::Other(s) => s,
        }
    }

    /// Needed to compile the project's main sources. `test` is left out: its
    /// sources live elsewhere and it is ambiguous which ones it applies to.
    pub fn is_compile_relevant(&self) -> bool {
        matches!(self, Self::Compile | Self::Provided)
    }

    /// Visible to projects depending on this one.
    pub fn is_exported(&self) -> bool {
        matches!(self, Self::Compile)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Dependency<'_> {
    /// `<scope>` text, or `compile` when absent.
    pub fn scope_string(&self) -> String {
        match self.element().scope() {
            Some(scope) => scope
                .value()
                .unwrap_or_else(|| scope.raw_text().to_string()),
            None => DEFAULT_SCOPE.to_string(),
        }
    }

    pub fn scope(&self) -> Scope {
        Scope::parse(&self.scope_string())
    }

    /// Declared in `<dependencies>` with scope `compile` or `provided`.
    pub fn is_project_dependency(&self) -> bool {
        self.owner() == DependencyOwner::Dependencies && self.scope().is_compile_relevant()
    }

    /// Declared in `<dependencies>` with scope `compile`.
    pub fn is_exported(&self) -> bool {
        self.owner() == DependencyOwner::Dependencies && self.scope().is_exported()
    }
}

impl<'a> Pom<'a> {
    /// Dependencies that matter for compiling this project.
    pub fn project_dependencies(&self) -> Vec<Dependency<'a>> {
        self.dependencies()
            .into_iter()
            .filter(|d| d.is_project_dependency())
            .collect()
    }

    /// Dependencies passed on transitively to dependents.
    pub fn exported_dependencies(&self) -> Vec<Dependency<'a>> {
        self.dependencies()
            .into_iter()
            .filter(|d| d.is_exported())
            .collect()
    }

    /// POMs in the snapshot that `dep` refers to: same `group:artifact`, and a
    /// version the dependency's version string accepts.
    pub fn poms_for_dependency(&self, dep: &Dependency<'_>) -> Vec<Pom<'a>> {
        let index = self.index();
        let spec = VersionSpec::parse(&dep.version_string());
        index
            .find_short(&dep.short_coordinate())
            .iter()
            .map(|&id| index.pom(id))
            .filter(|pom| spec.matches(&pom.version_string()))
            .collect()
    }

    /// Snapshot POMs this project depends on for compilation.
    pub fn dependency_poms(&self) -> Vec<Pom<'a>> {
        let mut found: Vec<Pom<'a>> = Vec::new();
        for dep in self.project_dependencies() {
            for pom in self.poms_for_dependency(&dep) {
                if !found.iter().any(|p| p.id() == pom.id()) {
                    found.push(pom);
                }
            }
        }
        found
    }

    /// Snapshot POMs reachable through compile-scoped dependencies, transitively.
    pub fn exported_poms(&self) -> Vec<Pom<'a>> {
        let mut seen = vec![self.id()];
        let mut found: Vec<Pom<'a>> = Vec::new();
        let mut pending = vec![*self];
        while let Some(current) = pending.pop() {
            for dep in current.exported_dependencies() {
                for pom in current.poms_for_dependency(&dep) {
                    if seen.contains(&pom.id()) {
                        continue;
                    }
                    seen.push(pom.id());
                    found.push(pom);
                    pending.push(pom);
                }
            }
        }
        found.sort_by_key(|p| p.id());
        found
    }
}
