//! Maven POM semantics over a file-tree snapshot.
//!
//! Reconstructs effective coordinates, properties, dependency scopes and
//! version strings by resolving parent-POM chains, `${...}` placeholders and
//! dependency management, then matches dependencies against jars in a local
//! Maven repository. Everything is read-only: a [`index::PomIndex`] is built
//! once per snapshot and all queries are pure lookups on it.

pub mod element;
pub mod index;
pub mod inherit;
pub mod pom;
pub mod repository;
pub mod resolve;
pub mod scope;
pub mod version;

pub use element::{ElementKind, PomElement};
pub use index::{PomId, PomIndex};
pub use pom::{DeclaredRepository, Dependency, DependencyOwner, Parent, Pom, PomProperty, ProtoPom};
pub use repository::{Coordinate, LocalRepository, RepoJar};
pub use scope::Scope;
pub use version::VersionSpec;
