//! CLI argument definitions for pomscope.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pomscope",
    version,
    about = "Inspect Maven POM semantics of a source tree",
    long_about = "pomscope reconstructs effective Maven coordinates, properties, dependency \
                  scopes and versions for every pom.xml in a directory tree, and matches \
                  dependencies against jars in local Maven repositories."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub tree: TreeArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Root of the tree to scan [default: nearest folder with a pomscope.toml, else the current directory]
    #[arg(long, global = true, env = "POMSCOPE_ROOT")]
    pub root: Option<PathBuf>,

    /// Additional local Maven repository (repeatable)
    #[arg(long = "repo", global = true)]
    pub repos: Vec<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every POM with its effective coordinate
    List,

    /// Show a POM's coordinate, parent, properties and repositories
    Show {
        /// POM path, group:artifact:version or group:artifact
        pom: String,
    },

    /// Show a POM's dependencies with resolved versions and scopes
    Deps {
        /// POM path, group:artifact:version or group:artifact
        pom: String,
    },

    /// Match a POM's project dependencies against local repository jars
    Artifacts {
        /// POM path, group:artifact:version or group:artifact
        pom: String,
    },

    /// Report parent cycles and unresolved values
    Check,
}

pub fn parse() -> Cli {
    Cli::parse()
}
