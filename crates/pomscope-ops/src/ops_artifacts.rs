//! Operation: match a POM's project dependencies against local repositories.

use serde::Serialize;

use pomscope_maven::{Coordinate, LocalRepository, Pom, ProtoPom};

use crate::ops_setup::Session;

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactReport {
    pub dependency: String,
    pub scope: String,
    pub jars: Vec<String>,
    /// No jar satisfied the version, so every version of the artifact is listed.
    pub fallback: bool,
}

/// One report per project dependency (scope `compile` or `provided`).
pub fn artifacts(pom: Pom<'_>, repositories: &[LocalRepository]) -> Vec<ArtifactReport> {
    pom.project_dependencies()
        .into_iter()
        .map(|dep| {
            let coordinate = Coordinate::of(&dep);
            let mut jars = Vec::new();
            let mut fallback = false;
            for repo in repositories {
                let found = repo.find_artifacts(&coordinate);
                fallback |= found.iter().any(|j| !j.precisely_matches(&coordinate));
                jars.extend(found.iter().map(|j| j.path.display().to_string()));
            }
            if jars.is_empty() {
                tracing::debug!("No jar found for {coordinate}");
            }
            ArtifactReport {
                dependency: coordinate.to_string(),
                scope: dep.scope_string(),
                jars,
                fallback,
            }
        })
        .collect()
}

pub fn print_artifacts(session: &Session, pom: Pom<'_>, json: bool) -> miette::Result<()> {
    if session.repositories.is_empty() {
        tracing::warn!("No local repository found; pass --repo to add one");
    }
    let reports = artifacts(pom, &session.repositories);
    if json {
        return crate::print_json(&reports);
    }

    println!("{}", pom.coordinate());
    for report in &reports {
        let note = if report.fallback { "  (no exact version)" } else { "" };
        println!("  {} [{}]{note}", report.dependency, report.scope);
        if report.jars.is_empty() {
            println!("    (not found)");
        }
        for jar in &report.jars {
            println!("    {jar}");
        }
    }
    Ok(())
}
