//! User settings for shelf
//!
//! Manages operator preferences: backup retention, display date format,
//! whether a fresh catalog is seeded with examples, and the log level.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::LibraryPaths;
use crate::error::LibraryError;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// User settings for shelf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Date format used when printing loan dates (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Seed an empty catalog with example books on `init`
    #[serde(default = "default_seed_examples")]
    pub seed_examples: bool,

    /// Default tracing filter when `SHELF_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_seed_examples() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_retention: BackupRetention::default(),
            date_format: default_date_format(),
            seed_examples: default_seed_examples(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LibraryPaths) -> Result<Self, LibraryError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LibraryError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LibraryError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            settings.validate()?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Reject values that would fail later, when they are used
    pub fn validate(&self) -> Result<(), LibraryError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(LibraryError::Config(format!(
                "invalid date_format '{}': not a strftime format",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LibraryPaths) -> Result<(), LibraryError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LibraryError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LibraryError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.seed_examples);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.backup_retention.daily_count, 30);
        assert_eq!(settings.backup_retention.monthly_count, 12);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.seed_examples = false;
        settings.date_format = "%d/%m/%Y".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.seed_examples);
        assert_eq!(loaded.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"seed_examples": false}"#).unwrap();
        assert!(!settings.seed_examples);
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_load_without_file_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(temp_dir.path().to_path_buf());

        let _ = Settings::load_or_create(&paths).unwrap();
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_invalid_date_format_is_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"date_format": "%Q"}"#).unwrap();

        let result = Settings::load_or_create(&paths);
        assert!(matches!(result, Err(LibraryError::Config(_))));
    }

    #[test]
    fn test_validate_accepts_common_formats() {
        for format in ["%Y-%m-%d", "%d/%m/%Y", "%b %e, %Y", "due %A"] {
            let settings = Settings {
                date_format: format.into(),
                ..Settings::default()
            };
            assert!(settings.validate().is_ok(), "{}", format);
        }
    }
}
