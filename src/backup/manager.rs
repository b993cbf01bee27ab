//! Backup manager for shelf
//!
//! Handles rolling backups of the catalog with configurable retention
//! policies. Backups are stored as dated JSON archives.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::LibraryPaths;
use crate::config::settings::BackupRetention;
use crate::error::{LibraryError, LibraryResult};

/// Current backup archive schema
pub const BACKUP_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
    /// Whether this is a monthly backup (kept longer)
    pub is_monthly: bool,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    /// Schema version for migration support
    pub schema_version: u32,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// The catalog file contents, a list of book records
    pub catalog: serde_json::Value,
}

impl BackupArchive {
    /// Read and parse an archive file
    pub fn read(path: &Path) -> LibraryResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| LibraryError::Backup(format!("Failed to read backup file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LibraryError::Backup(format!("Failed to parse backup file: {}", e)))
    }
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: LibraryPaths,
    retention: BackupRetention,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: LibraryPaths, retention: BackupRetention) -> Self {
        let backup_dir = paths.backup_dir();
        Self {
            backup_dir,
            paths,
            retention,
        }
    }

    /// Create a backup of the catalog file
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> LibraryResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            LibraryError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = BackupArchive {
            schema_version: BACKUP_SCHEMA_VERSION,
            created_at: now,
            catalog: read_catalog_value(&self.paths.catalog_file())?,
        };

        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| LibraryError::Json(format!("Failed to serialize backup: {}", e)))?;

        fs::write(&backup_path, json)
            .map_err(|e| LibraryError::Io(format!("Failed to write backup file: {}", e)))?;

        tracing::info!(path = %backup_path.display(), "backup created");
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> LibraryResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| LibraryError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| LibraryError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Enforce retention policy by deleting old backups
    pub fn enforce_retention(&self) -> LibraryResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        let (monthly, daily): (Vec<_>, Vec<_>) =
            backups.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        for backup in expired {
            fs::remove_file(&backup.path)
                .map_err(|e| LibraryError::Io(format!("Failed to delete old backup: {}", e)))?;
            tracing::debug!(path = %backup.path.display(), "expired backup deleted");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce retention policy
    pub fn create_backup_with_retention(&self) -> LibraryResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> LibraryResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;

    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        // First-of-month backups are kept under the monthly quota
        is_monthly: created_at.day() == 1,
    })
}

/// Read the catalog file as a generic Value; a missing file is an empty catalog
fn read_catalog_value(path: &Path) -> LibraryResult<serde_json::Value> {
    if !path.exists() {
        return Ok(serde_json::Value::Array(Vec::new()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| LibraryError::Io(format!("Failed to read catalog for backup: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| LibraryError::Json(format!("Failed to parse catalog for backup: {}", e)))
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    let (date_part, time_part, millis) = match parts.as_slice() {
        [date, time] => (*date, *time, 0),
        [date, time, millis] => (*date, *time, millis.parse().ok()?),
        _ => return None,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        date_part[0..4].parse().ok()?,
        date_part[4..6].parse().ok()?,
        date_part[6..8].parse().ok()?,
    )?;
    let time = NaiveTime::from_hms_milli_opt(
        time_part[0..2].parse().ok()?,
        time_part[2..4].parse().ok()?,
        time_part[4..6].parse().ok()?,
        millis,
    )?;

    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}
