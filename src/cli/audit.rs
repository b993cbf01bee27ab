//! Audit CLI command
//!
//! Shows the most recent catalog changes from the audit log.

use clap::Args;

use crate::error::LibraryResult;
use crate::storage::Storage;

/// Arguments for `audit`
#[derive(Args)]
pub struct AuditArgs {
    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle `audit`
pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> LibraryResult<()> {
    let entries = storage.audit().read_recent(args.limit)?;

    if entries.is_empty() {
        println!("No catalog changes recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
