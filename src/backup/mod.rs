//! Backup system for shelf
//!
//! Provides rolling backups of the catalog file with configurable retention
//! policies and restore functionality.
//!
//! # Backup Format
//!
//! Backups are stored as JSON files with the following structure:
//! - `schema_version`: Version for migration support
//! - `created_at`: Timestamp when backup was created
//! - `catalog`: The list of book records, exactly as persisted
//!
//! # Retention Policy
//!
//! By default, the system keeps:
//! - 30 daily backups
//! - 12 monthly backups (backups taken on the first of a month)
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf::backup::{BackupManager, RestoreManager};
//! use shelf::config::{paths::LibraryPaths, settings::BackupRetention};
//!
//! let paths = LibraryPaths::new()?;
//! let backup_manager = BackupManager::new(paths.clone(), BackupRetention::default());
//! let (backup_path, _expired) = backup_manager.create_backup_with_retention()?;
//!
//! let restore_manager = RestoreManager::new(paths);
//! let result = restore_manager.restore_from_file(&backup_path)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager, BACKUP_SCHEMA_VERSION};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
