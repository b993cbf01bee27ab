//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod backup;
pub mod book;
pub mod export;

pub use audit::{handle_audit_command, AuditArgs};
pub use backup::{handle_backup_command, BackupCommands};
pub use book::{
    handle_book_command, handle_loan_command, handle_return_command, handle_search_command,
    handle_stats_command, BookCommands, SearchArgs, StatsArgs,
};
pub use export::{handle_export_command, ExportArgs, ExportFormat};
