use std::path::PathBuf;

use pomscope_util::errors::PomscopeError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = PomscopeError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_config_error_display() {
    let err = PomscopeError::Config {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Config error: bad syntax");
}

#[test]
fn test_xml_error_display() {
    let err = PomscopeError::Xml {
        path: PathBuf::from("/work/pom.xml"),
        message: "unexpected end".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Failed to parse XML in /work/pom.xml: unexpected end"
    );
}

#[test]
fn test_cyclic_parent_display() {
    let err = PomscopeError::CyclicParent {
        chain: "com.a:a:1 -> com.b:b:1 -> com.a:a:1".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cyclic parent POM reference: com.a:a:1 -> com.b:b:1 -> com.a:a:1"
    );
}

#[test]
fn test_cyclic_property_display() {
    let err = PomscopeError::CyclicProperty {
        name: "lib.version".to_string(),
    };
    assert_eq!(err.to_string(), "Cyclic property reference: ${lib.version}");
}

#[test]
fn test_not_found_display() {
    let err = PomscopeError::NotFound {
        message: "No POM matches 'x:y'".to_string(),
    };
    assert_eq!(err.to_string(), "No POM matches 'x:y'");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: PomscopeError = io_err.into();
    assert!(matches!(err, PomscopeError::Io(_)));
}
