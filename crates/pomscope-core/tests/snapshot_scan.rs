use std::fs;
use std::path::Path;

use pomscope_core::config::{ScanConfig, SnapshotConfig};
use pomscope_core::snapshot::Snapshot;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn names(snap: &Snapshot) -> Vec<String> {
    snap.files()
        .map(|f| {
            snap.file_path(f)
                .strip_prefix(snap.root_path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn scan_collects_files_in_sorted_order() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "b/pom.xml", "<project/>");
    write(tmp.path(), "a/pom.xml", "<project/>");
    write(tmp.path(), "a/src/main/java/A.java", "class A {}");

    let snap = Snapshot::scan(tmp.path(), &ScanConfig::default()).unwrap();
    assert_eq!(
        names(&snap),
        vec!["a/pom.xml", "a/src/main/java/A.java", "b/pom.xml"]
    );
}

#[test]
fn scan_skips_default_excludes() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pom.xml", "<project/>");
    write(tmp.path(), "target/classes/pom.xml", "<project/>");
    write(tmp.path(), "module/target/pom.xml", "<project/>");
    write(tmp.path(), ".git/config", "");

    let snap = Snapshot::scan(tmp.path(), &ScanConfig::default()).unwrap();
    assert_eq!(names(&snap), vec!["pom.xml"]);
}

#[test]
fn scan_honours_configured_excludes() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "keep/pom.xml", "<project/>");
    write(tmp.path(), "generated/pom.xml", "<project/>");
    let config = SnapshotConfig::parse("[scan]\nexclude = [\"generated\"]\n").unwrap();

    let snap = Snapshot::scan(tmp.path(), &config.scan).unwrap();
    assert_eq!(names(&snap), vec!["keep/pom.xml"]);
}

#[test]
fn scan_reads_file_contents_from_disk() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pom.xml", "<project><artifactId>x</artifactId></project>");

    let snap = Snapshot::scan(tmp.path(), &ScanConfig::default()).unwrap();
    let pom = snap.xml_files()[0];
    let doc = snap.parse_xml(pom).unwrap();
    let artifact = doc.child(doc.root(), "artifactId").unwrap();
    assert_eq!(doc.text(artifact), "x");
}

#[test]
fn scan_of_missing_root_fails() {
    let tmp = TempDir::new().unwrap();
    let result = Snapshot::scan(&tmp.path().join("nope"), &ScanConfig::default());
    assert!(result.is_err());
}

#[test]
fn scanned_folders_answer_containment() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app/src/main/java/App.java", "");
    write(tmp.path(), "app/pom.xml", "<project/>");

    let snap = Snapshot::scan(tmp.path(), &ScanConfig::default()).unwrap();
    let java = snap
        .files()
        .find(|&f| snap.file_name(f) == "App.java")
        .unwrap();
    let src = snap
        .folder_by_path(&snap.root_path().join("app/src"))
        .unwrap();
    assert!(snap.folder_contains(src, java));
    assert_eq!(snap.files_under(src), vec![java]);
}

#[cfg(unix)]
mod symlinks {
    use std::os::unix::fs::symlink;

    use super::*;

    fn following() -> ScanConfig {
        ScanConfig {
            exclude: vec![],
            follow_symlinks: true,
        }
    }

    #[test]
    fn scan_skips_symlinks_by_default() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write(tmp.path(), "pom.xml", "<project/>");
        write(outside.path(), "pom.xml", "<project/>");
        symlink(outside.path(), tmp.path().join("linked")).unwrap();

        let snap = Snapshot::scan(tmp.path(), &ScanConfig::default()).unwrap();
        assert_eq!(names(&snap), vec!["pom.xml"]);
    }

    #[test]
    fn scan_follows_symlinks_when_enabled() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write(tmp.path(), "pom.xml", "<project/>");
        write(outside.path(), "lib/pom.xml", "<project/>");
        symlink(outside.path(), tmp.path().join("linked")).unwrap();

        let snap = Snapshot::scan(tmp.path(), &following()).unwrap();
        assert_eq!(names(&snap), vec!["linked/lib/pom.xml", "pom.xml"]);
    }

    #[test]
    fn scan_terminates_on_symlink_loops() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "pom.xml", "<project/>");
        write(tmp.path(), "sub/pom.xml", "<project/>");
        symlink(tmp.path(), tmp.path().join("a")).unwrap();
        symlink(tmp.path(), tmp.path().join("b")).unwrap();
        symlink(tmp.path(), tmp.path().join("sub/up")).unwrap();

        let snap = Snapshot::scan(tmp.path(), &following()).unwrap();
        assert_eq!(names(&snap), vec!["pom.xml", "sub/pom.xml"]);
    }
}
