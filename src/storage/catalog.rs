//! Catalog repository for JSON storage
//!
//! Holds the in-memory collection of books in insertion order and mirrors it
//! to catalog.json. The file is read whole and rewritten whole.

use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{LibraryError, LibraryResult};
use crate::models::Book;

use super::file_io::{read_json, write_json_atomic};

/// Outcome of reading the catalog file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records turned into books
    pub loaded: usize,
    /// Records dropped because they were malformed or repeated an ISBN
    pub skipped: usize,
}

/// Repository for catalog persistence
pub struct CatalogRepository {
    path: PathBuf,
    data: RwLock<Vec<Book>>,
    saves_blocked: OnceLock<String>,
}

impl CatalogRepository {
    /// Create a new, empty catalog repository backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
            saves_blocked: OnceLock::new(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> LibraryResult<RwLockReadGuard<'_, Vec<Book>>> {
        self.data
            .read()
            .map_err(|e| LibraryError::Persistence(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LibraryResult<RwLockWriteGuard<'_, Vec<Book>>> {
        self.data
            .write()
            .map_err(|e| LibraryError::Persistence(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load the catalog from disk, replacing the in-memory collection
    ///
    /// A missing file yields an empty catalog. A file that is not a JSON array
    /// is a persistence error and leaves memory untouched. Individual records
    /// that fail to parse, or repeat an ISBN already loaded, are skipped.
    pub fn load(&self) -> LibraryResult<LoadReport> {
        let values: Vec<serde_json::Value> = read_json(&self.path)?;

        let mut books: Vec<Book> = Vec::with_capacity(values.len());
        let mut report = LoadReport::default();

        for (index, value) in values.into_iter().enumerate() {
            match Book::from_value(value) {
                Ok(book) if books.iter().any(|b| b.isbn == book.isbn) => {
                    tracing::warn!(index, isbn = %book.isbn, "skipping record with duplicate ISBN");
                    report.skipped += 1;
                }
                Ok(book) => {
                    books.push(book);
                    report.loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed catalog record");
                    report.skipped += 1;
                }
            }
        }

        *self.write()? = books;

        tracing::debug!(
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "catalog loaded"
        );
        Ok(report)
    }

    /// Refuse every later save with `reason`. The first reason given sticks.
    pub fn block_saves(&self, reason: impl Into<String>) {
        let _ = self.saves_blocked.set(reason.into());
    }

    /// Save the whole catalog to disk
    pub fn save(&self) -> LibraryResult<()> {
        if let Some(reason) = self.saves_blocked.get() {
            return Err(LibraryError::Persistence(format!(
                "saving is disabled: {}",
                reason
            )));
        }
        let data = self.read()?;
        write_json_atomic(&self.path, data.as_slice())?;
        tracing::debug!(path = %self.path.display(), count = data.len(), "catalog saved");
        Ok(())
    }

    /// Get a book by exact ISBN
    pub fn get(&self, isbn: &str) -> LibraryResult<Option<Book>> {
        Ok(self.read()?.iter().find(|b| b.isbn == isbn).cloned())
    }

    /// Check whether an ISBN is present
    pub fn contains(&self, isbn: &str) -> LibraryResult<bool> {
        Ok(self.read()?.iter().any(|b| b.isbn == isbn))
    }

    /// Get all books in insertion order
    pub fn get_all(&self) -> LibraryResult<Vec<Book>> {
        Ok(self.read()?.clone())
    }

    /// Get the books matching a predicate, in insertion order
    pub fn find_all<F>(&self, predicate: F) -> LibraryResult<Vec<Book>>
    where
        F: Fn(&Book) -> bool,
    {
        Ok(self.read()?.iter().filter(|book| predicate(*book)).cloned().collect())
    }

    /// Append a new book. Fails if the ISBN is already present.
    pub fn insert(&self, book: Book) -> LibraryResult<()> {
        let mut data = self.write()?;
        if data.iter().any(|b| b.isbn == book.isbn) {
            return Err(LibraryError::DuplicateIsbn(book.isbn));
        }
        data.push(book);
        Ok(())
    }

    /// Replace the stored book with the same ISBN, keeping its position
    pub fn update(&self, book: Book) -> LibraryResult<()> {
        let mut data = self.write()?;
        match data.iter_mut().find(|b| b.isbn == book.isbn) {
            Some(slot) => {
                *slot = book;
                Ok(())
            }
            None => Err(LibraryError::book_not_found(book.isbn)),
        }
    }

    /// Remove a book by ISBN, returning it if it was present
    pub fn delete(&self, isbn: &str) -> LibraryResult<Option<Book>> {
        let mut data = self.write()?;
        Ok(data
            .iter()
            .position(|b| b.isbn == isbn)
            .map(|index| data.remove(index)))
    }

    /// Drop every book from memory without touching the file
    pub fn clear(&self) -> LibraryResult<()> {
        self.write()?.clear();
        Ok(())
    }

    /// Count books
    pub fn count(&self) -> LibraryResult<usize> {
        Ok(self.read()?.len())
    }
}
