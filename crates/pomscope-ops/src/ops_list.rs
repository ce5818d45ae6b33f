//! Operation: list every indexed POM.

use serde::Serialize;

use pomscope_maven::{PomIndex, ProtoPom};

use crate::ops_setup::Session;

#[derive(Debug, Clone, Serialize)]
pub struct PomSummary {
    pub coordinate: String,
    pub path: String,
    pub parent: Option<String>,
    pub in_cycle: bool,
}

/// One summary per POM, in index (path) order.
pub fn list(index: &PomIndex) -> Vec<PomSummary> {
    index
        .poms()
        .map(|pom| PomSummary {
            coordinate: pom.coordinate(),
            path: pom.path().display().to_string(),
            parent: pom.parent().map(|p| p.coordinate()),
            in_cycle: index.in_cycle(pom.id()),
        })
        .collect()
}

pub fn print_list(session: &Session, json: bool) -> miette::Result<()> {
    let mut summaries = list(&session.index);
    if json {
        return crate::print_json(&summaries);
    }
    if summaries.is_empty() {
        println!("No POMs found under {}", session.root().display());
        return Ok(());
    }
    for summary in &mut summaries {
        summary.path = crate::display_path(session.root(), summary.path.as_ref());
    }
    let width = summaries.iter().map(|s| s.coordinate.len()).max().unwrap_or(0);
    for summary in &summaries {
        let marker = if summary.in_cycle { "  (parent cycle)" } else { "" };
        println!("{:<width$}  {}{marker}", summary.coordinate, summary.path);
    }
    Ok(())
}
