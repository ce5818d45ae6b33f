//! Operation: the dependency table of one POM.

use serde::Serialize;

use pomscope_maven::{Pom, ProtoPom, VersionSpec};

use crate::ops_setup::Session;

#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub group: Option<String>,
    pub artifact: Option<String>,
    pub version: String,
    /// `absent`, `hard` or `soft`.
    pub version_kind: &'static str,
    /// The version came from dependency management rather than the declaration.
    pub managed: bool,
    pub scope: String,
    /// Needed to compile the project (`compile` or `provided`).
    pub project: bool,
    /// Passed on to dependents (`compile`).
    pub exported: bool,
    /// POMs in the tree satisfying the dependency.
    pub poms: Vec<String>,
}

pub fn dependencies(pom: Pom<'_>) -> Vec<DependencyReport> {
    pom.dependencies()
        .into_iter()
        .map(|dep| {
            let version = dep.version_string();
            let managed = dep.explicit_version().is_none() && !version.is_empty();
            DependencyReport {
                group: dep.group(),
                artifact: dep.artifact(),
                version_kind: match VersionSpec::parse(&version) {
                    VersionSpec::Absent => "absent",
                    VersionSpec::Hard(_) => "hard",
                    VersionSpec::Soft(_) => "soft",
                },
                version,
                managed,
                scope: dep.scope_string(),
                project: dep.is_project_dependency(),
                exported: dep.is_exported(),
                poms: pom
                    .poms_for_dependency(&dep)
                    .iter()
                    .map(|p| p.path().display().to_string())
                    .collect(),
            }
        })
        .collect()
}

pub fn print_deps(session: &Session, pom: Pom<'_>, json: bool) -> miette::Result<()> {
    let reports = dependencies(pom);
    if json {
        return crate::print_json(&reports);
    }
    if reports.is_empty() {
        println!("{} declares no dependencies", pom.coordinate());
        return Ok(());
    }

    let rows: Vec<(String, &DependencyReport)> = reports
        .iter()
        .map(|r| {
            let coordinate = format!(
                "{}:{}:{}",
                r.group.as_deref().unwrap_or("?"),
                r.artifact.as_deref().unwrap_or("?"),
                r.version
            );
            (coordinate, r)
        })
        .collect();
    let width = rows.iter().map(|(c, _)| c.len()).max().unwrap_or(0);

    println!("{}", pom.coordinate());
    for (coordinate, report) in &rows {
        let mut flags = Vec::new();
        if report.project {
            flags.push("project");
        }
        if report.exported {
            flags.push("exported");
        }
        if report.managed {
            flags.push("managed");
        }
        let local = match report.poms.first() {
            Some(path) => format!("  -> {}", crate::display_path(session.root(), path.as_ref())),
            None => String::new(),
        };
        println!(
            "  {coordinate:<width$}  {:<8}  {}{local}",
            report.scope,
            flags.join(",")
        );
    }
    Ok(())
}
