//! Command dispatch and handler modules.

mod artifacts;
mod check;
mod deps;
mod list;
mod show;

use miette::Result;

use pomscope_ops::ops_setup::{self, Session};
use pomscope_util::errors::PomscopeError;

use crate::cli::{Cli, Command, TreeArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let session = open(&cli.tree)?;
    let json = cli.tree.json;
    match cli.command {
        Command::List => list::exec(&session, json),
        Command::Show { pom } => show::exec(&session, &pom, json),
        Command::Deps { pom } => deps::exec(&session, &pom, json),
        Command::Artifacts { pom } => artifacts::exec(&session, &pom, json),
        Command::Check => check::exec(&session, json),
    }
}

fn open(args: &TreeArgs) -> Result<Session> {
    let root = match args.root {
        Some(ref root) => root.clone(),
        None => {
            let cwd = std::env::current_dir().map_err(PomscopeError::Io)?;
            ops_setup::default_root(&cwd)
        }
    };
    Session::open(&root, &args.repos)
}
