//! JSON Export functionality
//!
//! Exports the complete catalog to JSON format with schema versioning.

use std::collections::BTreeSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, LibraryResult};
use crate::models::Book;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full catalog export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// All books, in catalog order
    pub books: Vec<Book>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub book_count: usize,
    pub available_count: usize,
    pub loaned_count: usize,
    /// Number of distinct genres
    pub genre_count: usize,
}

impl CatalogExport {
    /// Create a new export from storage
    pub fn from_storage(storage: &Storage) -> LibraryResult<Self> {
        let books = storage.catalog.get_all()?;

        let available_count = books.iter().filter(|b| b.is_available()).count();
        let genre_count = books
            .iter()
            .map(|b| b.genre.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let metadata = ExportMetadata {
            book_count: books.len(),
            available_count,
            loaned_count: books.len() - available_count,
            genre_count,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            books,
            metadata,
        })
    }
}

/// Export the full catalog to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> LibraryResult<()> {
    let export = CatalogExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| LibraryError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| LibraryError::Export(e.to_string()))?;
    Ok(())
}
