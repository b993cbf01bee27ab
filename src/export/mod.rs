//! Export module for shelf
//!
//! Provides catalog export in multiple formats:
//! - CSV: One row per book (spreadsheet-compatible)
//! - JSON: Machine-readable full catalog export
//! - YAML: Human-readable full catalog export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_books_csv;
pub use json::{export_full_json, CatalogExport, ExportMetadata, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
