//! CSV Export functionality
//!
//! Exports the catalog to CSV, one row per book in the persisted record
//! layout.

use std::io::Write;

use crate::error::{LibraryError, LibraryResult};
use crate::storage::Storage;

/// Export all books to CSV
pub fn export_books_csv<W: Write>(storage: &Storage, writer: &mut W) -> LibraryResult<()> {
    let books = storage.catalog.get_all()?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    if books.is_empty() {
        csv_writer
            .write_record([
                "isbn", "title", "author", "genre", "status", "borrower", "loan_date", "due_date",
            ])
            .map_err(|e| LibraryError::Export(e.to_string()))?;
    }

    for book in &books {
        csv_writer
            .serialize(book.to_record())
            .map_err(|e| LibraryError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| LibraryError::Export(e.to_string()))?;

    Ok(())
}
