//! Handler for `pomscope check`.

use miette::Result;

use pomscope_ops::ops_check;
use pomscope_ops::ops_setup::Session;
use pomscope_util::errors::PomscopeError;

pub fn exec(session: &Session, json: bool) -> Result<()> {
    let report = ops_check::print_check(session, json)?;
    if report.has_cycles() {
        return Err(PomscopeError::Generic {
            message: format!("{} parent cycle(s) found", report.cycles.len()),
        }
        .into());
    }
    Ok(())
}
