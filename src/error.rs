//! Custom error types for shelf
//!
//! This module defines the error hierarchy for the catalog using thiserror
//! for ergonomic error definitions. Every failure is returned to the caller;
//! nothing in the library terminates the process.

use thiserror::Error;

/// The main error type for catalog operations
#[derive(Error, Debug)]
pub enum LibraryError {
    /// A required text field was empty or whitespace-only
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A book with this ISBN is already in the catalog
    #[error("A book with ISBN '{0}' already exists")]
    DuplicateIsbn(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Loan attempted on a book that is already out
    #[error("Book '{isbn}' is already on loan to {borrower}")]
    AlreadyLoaned { isbn: String, borrower: String },

    /// Return attempted on a book that is on the shelf
    #[error("Book '{0}' is not on loan")]
    NotLoaned(String),

    /// Removal attempted on a book that is out
    #[error("Book '{isbn}' is on loan to {borrower} and cannot be removed until it is returned")]
    BookOnLoan { isbn: String, borrower: String },

    /// A persisted record could not be turned into a book
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Reading or writing the catalog file failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside the catalog file
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Backup and restore errors
    #[error("Backup error: {0}")]
    Backup(String),
}

impl LibraryError {
    /// Create a "not found" error for books
    pub fn book_not_found(isbn: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Book",
            identifier: isbn.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for catalog operations
pub type LibraryResult<T> = Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LibraryError::InvalidInput("Title cannot be empty".into());
        assert_eq!(err.to_string(), "Invalid input: Title cannot be empty");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_not_found_error() {
        let err = LibraryError::book_not_found("978-1");
        assert_eq!(err.to_string(), "Book not found: 978-1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_book_on_loan_error() {
        let err = LibraryError::BookOnLoan {
            isbn: "978-1".into(),
            borrower: "Alice".into(),
        };
        assert_eq!(
            err.to_string(),
            "Book '978-1' is on loan to Alice and cannot be removed until it is returned"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LibraryError = io_err.into();
        assert!(matches!(err, LibraryError::Io(_)));
    }
}
