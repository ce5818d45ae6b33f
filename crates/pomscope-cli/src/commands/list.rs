//! Handler for `pomscope list`.

use miette::Result;

use pomscope_ops::ops_list;
use pomscope_ops::ops_setup::Session;

pub fn exec(session: &Session, json: bool) -> Result<()> {
    ops_list::print_list(session, json)
}
