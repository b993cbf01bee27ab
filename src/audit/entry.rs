//! Audit entry data structures
//!
//! Defines the catalog operations that are audited and the entry format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Catalog operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Book was added to the catalog
    Add,
    /// Book was lent out
    Loan,
    /// Book came back
    Return,
    /// Book was removed from the catalog
    Remove,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Add => write!(f, "ADD"),
            Operation::Loan => write!(f, "LOAN"),
            Operation::Return => write!(f, "RETURN"),
            Operation::Remove => write!(f, "REMOVE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// ISBN of the affected book
    pub isbn: String,

    /// Title of the affected book
    pub title: String,

    /// Persisted record before the operation (for loans, returns, removals)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Persisted record after the operation (for adds, loans, returns)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable summary of what changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, book: &Book) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a book added to the catalog
    pub fn added(book: &Book) -> Self {
        Self {
            after: serde_json::to_value(book).ok(),
            ..Self::new(Operation::Add, book)
        }
    }

    /// Entry for a loan or return, carrying both states
    pub fn changed(
        operation: Operation,
        before: &Book,
        after: &Book,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::new(operation, after)
        }
    }

    /// Entry for a book removed from the catalog
    pub fn removed(book: &Book) -> Self {
        Self {
            before: serde_json::to_value(book).ok(),
            ..Self::new(Operation::Remove, book)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.isbn,
            self.title
        );

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
