//! Operation: report parent cycles and values that did not resolve.

use serde::Serialize;

use pomscope_maven::{PomElement, PomIndex, ProtoPom};
use pomscope_util::errors::PomscopeError;

use crate::ops_setup::Session;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub poms: usize,
    /// Each cycle as `a -> b -> a`.
    pub cycles: Vec<String>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub path: String,
    pub coordinate: String,
    /// Slash-separated element path, e.g. `project/dependencies/dependency/version`.
    pub element: String,
    pub message: String,
}

impl CheckReport {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

pub fn check(index: &PomIndex) -> CheckReport {
    let mut report = CheckReport {
        poms: index.len(),
        cycles: index.cycle_errors().iter().map(cycle_chain).collect(),
        issues: Vec::new(),
    };

    for pom in index.poms() {
        let coordinate = pom.coordinate();
        let mut issue = |element: PomElement<'_>, message: String| {
            report.issues.push(Issue {
                path: pom.path().display().to_string(),
                coordinate: coordinate.clone(),
                element: element_path(element),
                message,
            });
        };

        for element in pom.element().descendants() {
            if element.has_children() || !element.is_placeholder() {
                continue;
            }
            if let Err(e) = element.try_value() {
                issue(element, e.to_string());
            } else if element.value().is_none() {
                issue(element, format!("Unresolved placeholder {}", element.raw_text()));
            }
        }

        if pom.version_string().is_empty() {
            issue(pom.element(), "Project has no version".to_string());
        }
        for dep in pom.dependencies() {
            if dep.version_string().is_empty() {
                issue(
                    dep.element(),
                    format!("No version for {}", dep.short_coordinate()),
                );
            }
        }
    }
    report
}

fn cycle_chain(error: &PomscopeError) -> String {
    match error {
        PomscopeError::CyclicParent { chain } => chain.clone(),
        other => other.to_string(),
    }
}

fn element_path(element: PomElement<'_>) -> String {
    let mut tags = vec![element.tag()];
    let mut current = element.xml_parent();
    while let Some(parent) = current {
        tags.push(parent.tag());
        current = parent.xml_parent();
    }
    tags.reverse();
    tags.join("/")
}

pub fn print_check(session: &Session, json: bool) -> miette::Result<CheckReport> {
    let report = check(&session.index);
    if json {
        crate::print_json(&report)?;
        return Ok(report);
    }

    println!("Checked {} POMs", report.poms);
    for cycle in &report.cycles {
        println!("error: cyclic parent: {cycle}");
    }
    for issue in &report.issues {
        println!(
            "warning: {} ({}): {} at {}",
            crate::display_path(session.root(), issue.path.as_ref()),
            issue.coordinate,
            issue.message,
            issue.element
        );
    }
    if report.cycles.is_empty() && report.issues.is_empty() {
        println!("No problems found");
    }
    Ok(report)
}
