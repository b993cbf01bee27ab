//! Audit logging system for shelf
//!
//! Records every successful catalog mutation (add, loan, return, remove) with
//! before/after snapshots in an append-only, line-delimited JSON log.
//!
//! - `AuditEntry`: one logged operation with timestamp, ISBN and snapshots.
//! - `AuditLogger`: appends entries to the log file and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
