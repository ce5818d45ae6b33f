use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all pomscope operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PomscopeError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed configuration (e.g. pomscope.toml).
    #[error("Config error: {message}")]
    #[diagnostic(help("Check pomscope.toml and ~/.pomscope/config.toml for syntax errors"))]
    Config { message: String },

    /// An XML file could not be parsed into an element tree.
    #[error("Failed to parse XML in {}: {message}", .path.display())]
    Xml { path: PathBuf, message: String },

    /// A POM's parent chain leads back to itself.
    #[error("Cyclic parent POM reference: {chain}")]
    #[diagnostic(help("Parent coordinates must not form a loop"))]
    CyclicParent { chain: String },

    /// A `${...}` placeholder resolves back to itself.
    #[error("Cyclic property reference: ${{{name}}}")]
    CyclicProperty { name: String },

    /// A requested POM, file or repository does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
