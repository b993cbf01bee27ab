//! Storage layer for shelf
//!
//! Provides JSON file storage with atomic writes, a per-process write lock
//! for catalog mutations, and the audit trail of those mutations.

pub mod catalog;
pub mod file_io;
pub mod init;

pub use catalog::{CatalogRepository, LoadReport};
pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use init::initialize_storage;

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::config::paths::LibraryPaths;
use crate::error::{LibraryError, LibraryResult};
use crate::models::Book;

/// Main storage coordinator
pub struct Storage {
    paths: LibraryPaths,
    pub catalog: CatalogRepository,
    audit: AuditLogger,
    /// Held for the whole check, mutate, persist sequence of an operation
    writes: Mutex<()>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LibraryPaths) -> Result<Self, LibraryError> {
        paths.ensure_directories()?;

        Ok(Self {
            catalog: CatalogRepository::new(paths.catalog_file()),
            audit: AuditLogger::new(paths.audit_log()),
            writes: Mutex::new(()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> LibraryResult<LoadReport> {
        self.catalog.load()
    }

    /// Load the catalog, falling back to an empty one if the file is unreadable
    ///
    /// The unreadable file is renamed to `catalog.json.corrupt-<timestamp>`
    /// first so that the next save cannot overwrite it. If it cannot be moved
    /// aside the catalog still starts empty, but every save is refused so the
    /// original file stays as it is.
    pub fn load_or_recover(&self) -> LibraryResult<LoadReport> {
        self.load_or_recover_at(Utc::now())
    }

    fn load_or_recover_at(&self, now: DateTime<Utc>) -> LibraryResult<LoadReport> {
        match self.catalog.load() {
            Ok(report) => Ok(report),
            Err(LibraryError::Persistence(reason)) => {
                let source = self.catalog.path().to_path_buf();
                let quarantine = source.with_extension(format!(
                    "json.corrupt-{}",
                    now.format("%Y%m%d-%H%M%S")
                ));

                match std::fs::rename(&source, &quarantine) {
                    Ok(()) => tracing::warn!(
                        error = %reason,
                        moved_to = %quarantine.display(),
                        "catalog file unreadable, starting with an empty catalog"
                    ),
                    Err(e) => {
                        tracing::warn!(
                            error = %reason,
                            rename_error = %e,
                            path = %source.display(),
                            "catalog file unreadable and could not be moved aside, saves disabled"
                        );
                        self.catalog.block_saves(format!(
                            "{} is unreadable and could not be moved aside: {}",
                            source.display(),
                            e
                        ));
                    }
                }

                self.catalog.clear()?;
                Ok(LoadReport::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Save all data to disk
    pub fn save_all(&self) -> LibraryResult<()> {
        self.catalog.save()
    }

    /// Serialize mutating operations
    pub fn lock_writes(&self) -> LibraryResult<MutexGuard<'_, ()>> {
        self.writes
            .lock()
            .map_err(|e| LibraryError::Persistence(format!("Failed to acquire write lock: {}", e)))
    }

    /// Record an added book in the audit log
    pub fn log_add(&self, book: &Book) {
        self.write_audit(AuditEntry::added(book));
    }

    /// Record a loan or return in the audit log
    pub fn log_change(
        &self,
        operation: Operation,
        before: &Book,
        after: &Book,
        diff_summary: Option<String>,
    ) {
        self.write_audit(AuditEntry::changed(operation, before, after, diff_summary));
    }

    /// Record a removed book in the audit log
    pub fn log_remove(&self, book: &Book) {
        self.write_audit(AuditEntry::removed(book));
    }

    // Runs after the catalog is persisted; failures are only logged.
    fn write_audit(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            tracing::warn!(error = %e, operation = %entry.operation, isbn = %entry.isbn, "failed to write audit entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert_eq!(storage.catalog.count().unwrap(), 0);
    }

    #[test]
    fn test_load_or_recover_moves_corrupt_file_aside() {
        let (temp_dir, storage) = create_test_storage();
        let catalog_file = storage.paths().catalog_file();
        fs::write(&catalog_file, "{ this is not json").unwrap();

        let report = storage.load_or_recover().unwrap();
        assert_eq!(report, LoadReport::default());
        assert_eq!(storage.catalog.count().unwrap(), 0);
        assert!(!catalog_file.exists());

        let quarantined: Vec<_> = fs::read_dir(temp_dir.path().join("data"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(quarantined.len(), 1);
        assert_eq!(
            fs::read_to_string(quarantined[0].path()).unwrap(),
            "{ this is not json"
        );
    }

    #[test]
    fn test_load_or_recover_refuses_saves_when_file_cannot_move() {
        let (_temp_dir, storage) = create_test_storage();
        let catalog_file = storage.paths().catalog_file();
        fs::write(&catalog_file, "{ this is not json").unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let quarantine = catalog_file.with_extension("json.corrupt-20240101-120000");
        fs::create_dir(&quarantine).unwrap();
        fs::write(quarantine.join("occupied"), "").unwrap();

        let report = storage.load_or_recover_at(now).unwrap();
        assert_eq!(report, LoadReport::default());
        assert_eq!(storage.catalog.count().unwrap(), 0);

        storage
            .catalog
            .insert(Book::new("978-1", "The Hobbit", "J.R.R. Tolkien"))
            .unwrap();
        let result = storage.save_all();
        assert!(matches!(result, Err(LibraryError::Persistence(_))));
        assert_eq!(
            fs::read_to_string(&catalog_file).unwrap(),
            "{ this is not json"
        );
    }

    #[test]
    fn test_audit_entries_written() {
        let (_temp_dir, storage) = create_test_storage();
        let book = Book::new("978-1", "The Hobbit", "J.R.R. Tolkien");

        storage.log_add(&book);
        storage.log_remove(&book);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Remove);
    }
}
