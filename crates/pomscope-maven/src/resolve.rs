//! Value resolution for POM leaf elements.
//!
//! Only text that is exactly one `${name}` placeholder is resolved. Anything
//! else, including text with a placeholder embedded in it, is returned as
//! written. No nested expansion is done beyond following a placeholder to the
//! element it names and resolving that element's own value.

use pomscope_core::xml::ElementId;
use pomscope_util::errors::PomscopeError;

use crate::element::PomElement;
use crate::index::PomId;

/// Synthetic names for the folder containing the POM.
const BASEDIR_NAMES: [&str; 2] = ["basedir", "project.basedir"];

/// The placeholder name if `text` is exactly `${name}`.
pub fn placeholder(text: &str) -> Option<&str> {
    let name = text.strip_prefix("${")?.strip_suffix('}')?;
    if name.is_empty() || name.contains(['{', '}']) {
        return None;
    }
    Some(name)
}

impl<'a> PomElement<'a> {
    /// Resolved textual value. `None` when the text is a placeholder that
    /// names nothing, or that leads back to itself.
    pub fn value(&self) -> Option<String> {
        match self.try_value() {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("{e} in {}", self.pom().path().display());
                None
            }
        }
    }

    /// Like [`value`](Self::value), but reports cyclic placeholders as errors.
    pub fn try_value(&self) -> Result<Option<String>, PomscopeError> {
        let mut visiting = Vec::new();
        resolve(*self, &mut visiting)
    }

    /// Whether the raw text is a single `${...}` placeholder.
    pub fn is_placeholder(&self) -> bool {
        placeholder(self.raw_text()).is_some()
    }
}

fn resolve(
    element: PomElement<'_>,
    visiting: &mut Vec<(PomId, ElementId)>,
) -> Result<Option<String>, PomscopeError> {
    let raw = element.raw_text();
    let Some(name) = placeholder(raw) else {
        return Ok(Some(raw.to_string()));
    };

    let index = element.index();
    let pom = element.pom_id();
    if BASEDIR_NAMES.contains(&name) {
        return Ok(Some(index.folder(pom).display().to_string()));
    }

    let key = (pom, element.id());
    if visiting.contains(&key) {
        return Err(PomscopeError::CyclicProperty {
            name: name.to_string(),
        });
    }
    visiting.push(key);

    let project_path = name
        .strip_prefix("project.")
        .or_else(|| name.strip_prefix("pom."));
    let target = match project_path {
        // `project.build.sourceEncoding` and friends are usually declared
        // properties rather than real elements.
        Some(path) => index
            .project_property(pom, path)
            .or_else(|| index.property(pom, name).map(|p| p.element())),
        None => index.property(pom, name).map(|p| p.element()),
    };

    let result = match target {
        Some(target) => resolve(target, visiting),
        None => {
            tracing::debug!(
                "Unresolved placeholder ${{{name}}} in {}",
                index.path(pom).display()
            );
            Ok(None)
        }
    };
    visiting.pop();
    result
}
