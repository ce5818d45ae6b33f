//! Handler for `pomscope artifacts`.

use miette::Result;

use pomscope_ops::ops_setup::Session;
use pomscope_ops::{ops_artifacts, select_pom};

pub fn exec(session: &Session, selector: &str, json: bool) -> Result<()> {
    let pom = select_pom(&session.index, session.root(), selector)?;
    ops_artifacts::print_artifacts(session, pom, json)
}
