//! CLI commands for catalog export
//!
//! Writes the catalog to a file or stdout in the chosen format.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{LibraryError, LibraryResult};
use crate::export::{export_books_csv, export_full_json, export_full_yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV, one row per book
    Csv,
    /// JSON, full catalog with metadata
    Json,
    /// YAML, full catalog with metadata (human-readable)
    Yaml,
}

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(value_enum)]
    pub format: ExportFormat,

    /// Output file path (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Handle `export`
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> LibraryResult<()> {
    match &args.output {
        Some(output) => {
            let file = File::create(output).map_err(|e| {
                LibraryError::Export(format!("Failed to create file {}: {}", output.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(storage, &mut writer, &args)?;
            writer
                .flush()
                .map_err(|e| LibraryError::Export(e.to_string()))?;

            let count = storage.catalog.count()?;
            println!("Exported {} book(s) to: {}", count, output.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(storage, &mut writer, &args)?;
            writer
                .flush()
                .map_err(|e| LibraryError::Export(e.to_string()))?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(storage: &Storage, writer: &mut W, args: &ExportArgs) -> LibraryResult<()> {
    match args.format {
        ExportFormat::Csv => export_books_csv(storage, writer),
        ExportFormat::Json => export_full_json(storage, writer, !args.compact),
        ExportFormat::Yaml => export_full_yaml(storage, writer),
    }
}
