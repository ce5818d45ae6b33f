//! Operation: describe one POM with everything it inherits.

use serde::Serialize;

use pomscope_maven::{Pom, ProtoPom};

use crate::ops_setup::Session;

#[derive(Debug, Clone, Serialize)]
pub struct PomReport {
    pub path: String,
    pub coordinate: String,
    pub name: Option<String>,
    pub parent: Option<String>,
    /// `<parent><relativePath>`, as declared.
    pub parent_relative_path: Option<String>,
    /// Paths of the POMs matching the `<parent>` coordinate.
    pub parent_poms: Vec<String>,
    pub in_cycle: bool,
    pub properties: Vec<PropertyReport>,
    pub modules: Vec<String>,
    pub source_directory: String,
    pub repositories: Vec<RepositoryReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    pub name: String,
    pub value: Option<String>,
    pub raw: String,
    /// Coordinate of the POM declaring it.
    pub declared_in: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    pub kind: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
}

pub fn describe(pom: Pom<'_>) -> PomReport {
    let properties = pom
        .properties()
        .into_iter()
        .map(|p| PropertyReport {
            name: p.name().to_string(),
            value: p.value(),
            raw: p.raw_text().to_string(),
            declared_in: p.declaring_pom().coordinate(),
        })
        .collect();
    let repositories = pom
        .declared_repositories()
        .into_iter()
        .map(|r| RepositoryReport {
            kind: r.element().tag().to_string(),
            id: r.id(),
            name: r.name(),
            url: r.url(),
        })
        .collect();

    PomReport {
        path: pom.path().display().to_string(),
        coordinate: pom.coordinate(),
        name: pom.name(),
        parent: pom.parent().map(|p| p.coordinate()),
        parent_relative_path: pom.parent().and_then(|p| p.relative_path()),
        parent_poms: pom
            .parent_poms()
            .iter()
            .map(|p| p.path().display().to_string())
            .collect(),
        in_cycle: pom.index().in_cycle(pom.id()),
        properties,
        modules: pom.modules(),
        source_directory: pom.source_directory().display().to_string(),
        repositories,
    }
}

pub fn print_show(session: &Session, pom: Pom<'_>, json: bool) -> miette::Result<()> {
    let report = describe(pom);
    if json {
        return crate::print_json(&report);
    }

    let root = session.root();
    println!("{}", report.coordinate);
    println!("  file:    {}", crate::display_path(root, report.path.as_ref()));
    if let Some(ref name) = report.name {
        println!("  name:    {name}");
    }
    match (&report.parent, report.parent_poms.first()) {
        (Some(parent), Some(path)) => {
            println!("  parent:  {parent} ({})", crate::display_path(root, path.as_ref()))
        }
        (Some(parent), None) => println!("  parent:  {parent} (not in tree)"),
        (None, _) => {}
    }
    if report.in_cycle {
        println!("  warning: part of a parent cycle");
    }
    println!(
        "  sources: {}",
        crate::display_path(root, report.source_directory.as_ref())
    );

    if !report.modules.is_empty() {
        println!("  modules:");
        for module in &report.modules {
            println!("    {module}");
        }
    }
    if !report.properties.is_empty() {
        println!("  properties:");
        for property in &report.properties {
            let value = property.value.as_deref().unwrap_or(&property.raw);
            if property.declared_in == report.coordinate {
                println!("    {} = {value}", property.name);
            } else {
                println!("    {} = {value}  (from {})", property.name, property.declared_in);
            }
        }
    }
    if !report.repositories.is_empty() {
        println!("  repositories:");
        for repo in &report.repositories {
            println!(
                "    {} {} {}",
                repo.kind,
                repo.id.as_deref().unwrap_or("-"),
                repo.url.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pomscope_core::snapshot::Snapshot;
    use pomscope_maven::PomIndex;

    use super::*;

    #[test]
    fn report_lists_inherited_properties() {
        let snapshot = Snapshot::builder("/w")
            .file_with_contents(
                "pom.xml",
                r#"<project><groupId>g</groupId><artifactId>root</artifactId><version>1</version>
                <properties><a>1</a><b>2</b></properties></project>"#,
            )
            .file_with_contents(
                "child/pom.xml",
                r#"<project><parent><groupId>g</groupId><artifactId>root</artifactId><version>1</version></parent>
                <artifactId>child</artifactId><properties><b>3</b></properties></project>"#,
            )
            .build();
        let index = PomIndex::build(&snapshot);
        let report = describe(index.pom(index.find("g:child:1")[0]));

        assert_eq!(report.parent.as_deref(), Some("g:root:1"));
        assert_eq!(report.parent_poms, vec!["/w/pom.xml"]);
        assert_eq!(report.source_directory, "/w/child/src/main/java");
        let props: Vec<(&str, Option<&str>, &str)> = report
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_deref(), p.declared_in.as_str()))
            .collect();
        assert_eq!(
            props,
            vec![("a", Some("1"), "g:root:1"), ("b", Some("3"), "g:child:1")]
        );
    }
}
