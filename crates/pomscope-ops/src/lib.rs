pub mod ops_artifacts;
pub mod ops_check;
pub mod ops_deps;
pub mod ops_list;
pub mod ops_setup;
pub mod ops_show;

use std::path::{Path, PathBuf};

use serde::Serialize;

use pomscope_maven::{Pom, PomIndex};
use pomscope_util::errors::PomscopeError;
use pomscope_util::fs::normalize_path;

/// Find the POM a command argument refers to.
///
/// An existing file (or a folder holding a `pom.xml`) selects that POM.
/// Relative paths are tried against the working directory, then `root`.
/// Otherwise the text is matched against full coordinates, then
/// `group:artifact`.
pub fn select_pom<'a>(index: &'a PomIndex, root: &Path, selector: &str) -> miette::Result<Pom<'a>> {
    for candidate in candidate_paths(root, selector) {
        match index.pom_by_path(&candidate) {
            Some(id) => return Ok(index.pom(id)),
            None => tracing::debug!("{} is not an indexed POM", candidate.display()),
        }
    }

    for matches in [index.find(selector), index.find_short(selector)] {
        if let Some(&first) = matches.first() {
            if matches.len() > 1 {
                tracing::warn!(
                    "{selector} matches {} POMs, using {}",
                    matches.len(),
                    index.path(first).display()
                );
            }
            return Ok(index.pom(first));
        }
    }

    Err(PomscopeError::NotFound {
        message: format!("No POM matches '{selector}'"),
    }
    .into())
}

fn candidate_paths(root: &Path, selector: &str) -> Vec<PathBuf> {
    let given = Path::new(selector);
    let mut bases = Vec::new();
    if given.is_absolute() {
        bases.push(given.to_path_buf());
    } else {
        if let Ok(cwd) = std::env::current_dir() {
            bases.push(cwd.join(given));
        }
        bases.push(root.join(given));
    }

    bases
        .into_iter()
        .filter_map(|path| {
            let path = if path.is_dir() {
                path.join("pom.xml")
            } else {
                path
            };
            path.is_file().then(|| absolute(&path))
        })
        .collect()
}

fn absolute(path: &Path) -> PathBuf {
    normalize_path(&std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
}

/// Pretty-print a report as JSON on stdout.
pub fn print_json<T: Serialize>(report: &T) -> miette::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| PomscopeError::Generic {
        message: format!("Failed to serialize report: {e}"),
    })?;
    println!("{json}");
    Ok(())
}

/// Display form of a path relative to `root` when it lies inside it.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
