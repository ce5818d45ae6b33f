//! Handler for `pomscope show`.

use miette::Result;

use pomscope_ops::ops_setup::Session;
use pomscope_ops::{ops_show, select_pom};

pub fn exec(session: &Session, selector: &str, json: bool) -> Result<()> {
    let pom = select_pom(&session.index, session.root(), selector)?;
    ops_show::print_show(session, pom, json)
}
