//! Handler for `pomscope deps`.

use miette::Result;

use pomscope_ops::ops_setup::Session;
use pomscope_ops::{ops_deps, select_pom};

pub fn exec(session: &Session, selector: &str, json: bool) -> Result<()> {
    let pom = select_pom(&session.index, session.root(), selector)?;
    ops_deps::print_deps(session, pom, json)
}
