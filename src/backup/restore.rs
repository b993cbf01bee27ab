//! Backup restoration for shelf
//!
//! Handles restoring the catalog from backup archives.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::paths::LibraryPaths;
use crate::error::{LibraryError, LibraryResult};
use crate::models::{Book, BookRecord};
use crate::storage::write_json_atomic;

use super::manager::{BackupArchive, BACKUP_SCHEMA_VERSION};

/// Handles restoring from backups
pub struct RestoreManager {
    paths: LibraryPaths,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: LibraryPaths) -> Self {
        Self { paths }
    }

    /// Restore the catalog from a backup file
    ///
    /// This overwrites the current catalog file. Records that fail
    /// validation are dropped, the same way loading drops them.
    pub fn restore_from_file(&self, backup_path: &Path) -> LibraryResult<RestoreResult> {
        let archive = BackupArchive::read(backup_path)?;
        self.restore_from_archive(&archive)
    }

    /// Restore the catalog from a parsed backup archive
    pub fn restore_from_archive(&self, archive: &BackupArchive) -> LibraryResult<RestoreResult> {
        check_schema(archive)?;
        let (books, skipped) = decode_catalog(&archive.catalog)?;

        self.paths.ensure_directories()?;
        let records: Vec<BookRecord> = books.iter().map(Book::to_record).collect();
        write_json_atomic(self.paths.catalog_file(), &records)?;

        tracing::info!(
            restored = books.len(),
            skipped,
            backup_date = %archive.created_at,
            "catalog restored from backup"
        );

        Ok(RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            books_restored: books.len(),
            records_skipped: skipped,
        })
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> LibraryResult<ValidationResult> {
        let archive = BackupArchive::read(backup_path)?;
        check_schema(&archive)?;
        let (books, skipped) = decode_catalog(&archive.catalog)?;

        Ok(ValidationResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            book_count: books.len(),
            malformed_count: skipped,
        })
    }
}

fn check_schema(archive: &BackupArchive) -> LibraryResult<()> {
    if archive.schema_version > BACKUP_SCHEMA_VERSION {
        return Err(LibraryError::Backup(format!(
            "Backup schema v{} is newer than supported v{}",
            archive.schema_version, BACKUP_SCHEMA_VERSION
        )));
    }
    Ok(())
}

/// Decode archived records, returning the valid books and how many were dropped
fn decode_catalog(catalog: &serde_json::Value) -> LibraryResult<(Vec<Book>, usize)> {
    let records = catalog
        .as_array()
        .ok_or_else(|| LibraryError::Backup("Backup catalog is not a list of records".into()))?;

    let mut seen = HashSet::new();
    let mut books = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for value in records {
        match Book::from_value(value.clone()) {
            Ok(book) if seen.insert(book.isbn.clone()) => books.push(book),
            Ok(_) | Err(_) => skipped += 1,
        }
    }

    Ok((books, skipped))
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// Schema version of the restored backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: DateTime<Utc>,
    /// Books written to the catalog
    pub books_restored: usize,
    /// Archived records that were dropped
    pub records_skipped: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored {} book(s) from backup of {}",
            self.books_restored,
            self.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
        );
        if self.records_skipped > 0 {
            summary.push_str(&format!(" ({} malformed record(s) skipped)", self.records_skipped));
        }
        summary
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    /// Schema version of the backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: DateTime<Utc>,
    /// Valid book records in the archive
    pub book_count: usize,
    /// Records that would be dropped on restore
    pub malformed_count: usize,
}

impl ValidationResult {
    /// Check if every archived record is valid
    pub fn is_complete(&self) -> bool {
        self.malformed_count == 0
    }

    /// Get a summary of the archive contents
    pub fn summary(&self) -> String {
        if self.is_complete() {
            format!(
                "Complete backup (v{}): {} book(s)",
                self.schema_version, self.book_count
            )
        } else {
            format!(
                "Partial backup (v{}): {} book(s), {} malformed record(s)",
                self.schema_version, self.book_count, self.malformed_count
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::manager::BackupManager;
    use crate::config::settings::BackupRetention;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_env() -> (RestoreManager, BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let backup_manager = BackupManager::new(paths.clone(), BackupRetention::default());
        let restore_manager = RestoreManager::new(paths);

        (restore_manager, backup_manager, temp_dir)
    }

    fn write_catalog(paths: &LibraryPaths, books: &[Book]) {
        let records: Vec<BookRecord> = books.iter().map(Book::to_record).collect();
        write_json_atomic(paths.catalog_file(), &records).unwrap();
    }

    fn loaned_book() -> Book {
        let mut book = Book::with_genre("978-2", "1984", "George Orwell", "Dystopia");
        book.lend("Alice", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .unwrap();
        book
    }

    #[test]
    fn test_restore_from_backup() {
        let (restore_manager, backup_manager, _temp) = create_test_env();
        let books = vec![Book::new("978-1", "The Hobbit", "Tolkien"), loaned_book()];
        write_catalog(&restore_manager.paths, &books);

        let backup_path = backup_manager.create_backup().unwrap();
        write_catalog(&restore_manager.paths, &[]);

        let result = restore_manager.restore_from_file(&backup_path).unwrap();
        assert_eq!(result.books_restored, 2);
        assert_eq!(result.records_skipped, 0);

        let restored: Vec<serde_json::Value> =
            crate::storage::read_json(restore_manager.paths.catalog_file()).unwrap();
        let restored: Vec<Book> = restored
            .into_iter()
            .map(|v| Book::from_value(v).unwrap())
            .collect();
        assert_eq!(restored, books);
    }

    #[test]
    fn test_restore_drops_malformed_records() {
        let (restore_manager, _backup_manager, temp) = create_test_env();
        let archive = BackupArchive {
            schema_version: 1,
            created_at: Utc::now(),
            catalog: json!([
                {"isbn": "1", "title": "Kept", "author": "A", "genre": "G", "status": "AVAILABLE"},
                {"isbn": "", "title": "No ISBN", "author": "A", "genre": "G", "status": "AVAILABLE"},
                {"isbn": "1", "title": "Duplicate", "author": "A", "genre": "G", "status": "AVAILABLE"},
                "not a record"
            ]),
        };

        let result = restore_manager.restore_from_archive(&archive).unwrap();
        assert_eq!(result.books_restored, 1);
        assert_eq!(result.records_skipped, 3);
        assert!(result.summary().contains("3 malformed"));
        assert!(temp.path().join("data").join("catalog.json").exists());
    }

    #[test]
    fn test_restore_rejects_non_list_catalog() {
        let (restore_manager, _backup_manager, _temp) = create_test_env();
        let archive = BackupArchive {
            schema_version: 1,
            created_at: Utc::now(),
            catalog: json!({"accounts": []}),
        };

        let result = restore_manager.restore_from_archive(&archive);
        assert!(matches!(result, Err(LibraryError::Backup(_))));
    }

    #[test]
    fn test_restore_rejects_newer_schema() {
        let (restore_manager, _backup_manager, _temp) = create_test_env();
        let archive = BackupArchive {
            schema_version: BACKUP_SCHEMA_VERSION + 1,
            created_at: Utc::now(),
            catalog: json!([]),
        };

        assert!(restore_manager.restore_from_archive(&archive).is_err());
    }

    #[test]
    fn test_validate_backup() {
        let (restore_manager, backup_manager, _temp) = create_test_env();
        write_catalog(&restore_manager.paths, &[loaned_book()]);

        let backup_path = backup_manager.create_backup().unwrap();
        let result = restore_manager.validate_backup(&backup_path).unwrap();

        assert_eq!(result.schema_version, 1);
        assert_eq!(result.book_count, 1);
        assert!(result.is_complete());
        assert!(result.summary().contains("Complete backup"));
    }

    #[test]
    fn test_validate_unreadable_backup() {
        let (restore_manager, _backup_manager, temp) = create_test_env();
        let path = temp.path().join("backups").join("backup-20240101-000000.json");
        fs::write(&path, "garbage").unwrap();

        assert!(matches!(
            restore_manager.validate_backup(&path),
            Err(LibraryError::Backup(_))
        ));
    }

    #[test]
    fn test_restore_recreates_data_dir() {
        let (restore_manager, backup_manager, temp) = create_test_env();
        write_catalog(&restore_manager.paths, &[Book::new("978-1", "The Hobbit", "Tolkien")]);
        let backup_path = backup_manager.create_backup().unwrap();

        fs::remove_dir_all(temp.path().join("data")).unwrap();

        restore_manager.restore_from_file(&backup_path).unwrap();
        assert!(restore_manager.paths.catalog_file().exists());
    }
}
