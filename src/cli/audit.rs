//! Audit command: show the tail of the audit log

use super::AppContext;
use crate::error::FluxoResult;

/// Print the most recent audit entries, oldest first
pub fn handle_audit(ctx: &AppContext, limit: usize) -> FluxoResult<()> {
    let entries = ctx.audit().read_recent(limit)?;

    if entries.is_empty() {
        println!("Nenhum registro de auditoria.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
