//! YAML Export functionality
//!
//! Exports the complete catalog to YAML format for human-readable backup.

use std::io::Write;

use crate::error::{LibraryError, LibraryResult};
use crate::export::json::CatalogExport;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> LibraryError {
    LibraryError::Export(e.to_string())
}

/// Export the full catalog to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> LibraryResult<()> {
    let export = CatalogExport::from_storage(storage)?;

    writeln!(writer, "# shelf catalog export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer, "# Books: {}", export.metadata.book_count).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)?;

    Ok(())
}
