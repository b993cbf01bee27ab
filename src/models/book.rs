//! Book model
//!
//! A book is one catalog entry. Its loan state lives in an optional [`Loan`],
//! so a book is either on the shelf with no loan fields at all, or out on loan
//! with a borrower, a loan date and a due date fourteen days later.
//!
//! On disk a book is a flat [`BookRecord`]; conversion in both directions goes
//! through serde so every serialized `Book` has the persisted shape.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LibraryError;

/// Number of days a book stays out before it is due
pub const LOAN_PERIOD_DAYS: u64 = 14;

/// Genre assigned when none is given
pub const DEFAULT_GENRE: &str = "General";

/// Date format used in persisted records
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Availability of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    /// On the shelf
    #[default]
    Available,
    /// Lent to a borrower
    Loaned,
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
            Self::Loaned => write!(f, "Loaned"),
        }
    }
}

/// An active loan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    borrower: String,
    loan_date: NaiveDate,
    due_date: NaiveDate,
}

impl Loan {
    /// Start a loan on `loan_date`; the due date is derived from it.
    /// Returns `None` when the due date falls past the last representable date.
    pub fn new(borrower: impl Into<String>, loan_date: NaiveDate) -> Option<Self> {
        let due_date = loan_date.checked_add_days(Days::new(LOAN_PERIOD_DAYS))?;
        Some(Self {
            borrower: borrower.into(),
            loan_date,
            due_date,
        })
    }

    pub fn borrower(&self) -> &str {
        &self.borrower
    }

    pub fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Whether the loan is past its due date on `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.due_date
    }
}

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BookRecord", try_from = "BookRecord")]
pub struct Book {
    /// Unique identifier within the catalog
    pub isbn: String,

    /// Book title
    pub title: String,

    /// Author name
    pub author: String,

    /// Genre, used for grouping in statistics
    pub genre: String,

    loan: Option<Loan>,
}

impl Book {
    /// Create a new available book with the default genre
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self::with_genre(isbn, title, author, DEFAULT_GENRE)
    }

    /// Create a new available book with a genre
    pub fn with_genre(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            loan: None,
        }
    }

    pub fn status(&self) -> BookStatus {
        if self.loan.is_some() {
            BookStatus::Loaned
        } else {
            BookStatus::Available
        }
    }

    pub fn is_available(&self) -> bool {
        self.loan.is_none()
    }

    /// The active loan, if the book is out
    pub fn loan(&self) -> Option<&Loan> {
        self.loan.as_ref()
    }

    pub fn borrower(&self) -> Option<&str> {
        self.loan.as_ref().map(Loan::borrower)
    }

    /// Lend the book. On error the book is left unchanged.
    pub fn lend(
        &mut self,
        borrower: impl Into<String>,
        loan_date: NaiveDate,
    ) -> Result<(), LibraryError> {
        if let Some(existing) = &self.loan {
            return Err(LibraryError::AlreadyLoaned {
                isbn: self.isbn.clone(),
                borrower: existing.borrower.clone(),
            });
        }
        let loan = Loan::new(borrower, loan_date).ok_or_else(|| {
            LibraryError::InvalidInput(format!(
                "Due date for a loan starting {} is out of range",
                loan_date.format(RECORD_DATE_FORMAT)
            ))
        })?;
        self.loan = Some(loan);
        Ok(())
    }

    /// Take the book back, returning the loan that ended
    pub fn take_back(&mut self) -> Option<Loan> {
        self.loan.take()
    }

    /// Validate the required text fields
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.isbn.trim().is_empty() {
            return Err(BookValidationError::EmptyIsbn);
        }
        if self.title.trim().is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if self.author.trim().is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        if let Some(loan) = &self.loan {
            if loan.borrower.trim().is_empty() {
                return Err(BookValidationError::EmptyBorrower);
            }
        }
        Ok(())
    }

    /// Convert to the persisted record form
    pub fn to_record(&self) -> BookRecord {
        BookRecord::from(self.clone())
    }

    /// Rebuild a book from one JSON value of the catalog file
    pub fn from_value(value: serde_json::Value) -> Result<Self, LibraryError> {
        let record: BookRecord = serde_json::from_value(value)
            .map_err(|e| LibraryError::MalformedRecord(e.to_string()))?;
        Book::try_from(record)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] '{}' by {} - ", self.isbn, self.title, self.author)?;
        match &self.loan {
            None => write!(f, "Available"),
            Some(loan) => write!(
                f,
                "On loan to {} (due {})",
                loan.borrower,
                loan.due_date.format(RECORD_DATE_FORMAT)
            ),
        }
    }
}

/// Validation errors for books
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyIsbn,
    EmptyTitle,
    EmptyAuthor,
    EmptyBorrower,
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIsbn => write!(f, "ISBN cannot be empty"),
            Self::EmptyTitle => write!(f, "Title cannot be empty"),
            Self::EmptyAuthor => write!(f, "Author cannot be empty"),
            Self::EmptyBorrower => write!(f, "Borrower name cannot be empty"),
        }
    }
}

impl std::error::Error for BookValidationError {}

/// Persisted form of a book: one object in `catalog.json`
///
/// Loan fields are empty strings while the book is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookRecord {
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default)]
    pub borrower: String,
    #[serde(default)]
    pub loan_date: String,
    #[serde(default)]
    pub due_date: String,
}

fn default_genre() -> String {
    DEFAULT_GENRE.to_string()
}

impl From<Book> for BookRecord {
    fn from(book: Book) -> Self {
        let status = book.status();
        let (borrower, loan_date, due_date) = match book.loan {
            Some(loan) => (
                loan.borrower,
                loan.loan_date.format(RECORD_DATE_FORMAT).to_string(),
                loan.due_date.format(RECORD_DATE_FORMAT).to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        Self {
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            genre: book.genre,
            status,
            borrower,
            loan_date,
            due_date,
        }
    }
}

impl TryFrom<BookRecord> for Book {
    type Error = LibraryError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let malformed = |reason: String| {
            LibraryError::MalformedRecord(format!("record '{}': {}", record.isbn, reason))
        };

        let loan = match record.status {
            BookStatus::Available => {
                if !record.borrower.is_empty()
                    || !record.loan_date.is_empty()
                    || !record.due_date.is_empty()
                {
                    return Err(malformed("available book carries loan fields".into()));
                }
                None
            }
            BookStatus::Loaned => {
                if record.borrower.trim().is_empty() {
                    return Err(malformed("loaned book has no borrower".into()));
                }
                let loan_date = parse_record_date(&record.loan_date)
                    .map_err(|e| malformed(format!("loan_date: {}", e)))?;
                let due_date = parse_record_date(&record.due_date)
                    .map_err(|e| malformed(format!("due_date: {}", e)))?;

                let loan = Loan::new(record.borrower.clone(), loan_date).ok_or_else(|| {
                    malformed(format!(
                        "loan_date {} leaves no room for a due date",
                        record.loan_date
                    ))
                })?;
                if loan.due_date != due_date {
                    return Err(malformed(format!(
                        "due_date {} is not {} days after loan_date {}",
                        record.due_date, LOAN_PERIOD_DAYS, record.loan_date
                    )));
                }
                Some(loan)
            }
        };

        let book = Book {
            isbn: record.isbn.clone(),
            title: record.title.clone(),
            author: record.author.clone(),
            genre: record.genre.clone(),
            loan,
        };
        book.validate().map_err(|e| malformed(e.to_string()))?;
        Ok(book)
    }
}

fn parse_record_date(value: &str) -> Result<NaiveDate, String> {
    if value.is_empty() {
        return Err("missing".into());
    }
    NaiveDate::parse_from_str(value, RECORD_DATE_FORMAT).map_err(|e| format!("'{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_book_is_available() {
        let book = Book::new("978-1", "The Hobbit", "J.R.R. Tolkien");
        assert_eq!(book.genre, DEFAULT_GENRE);
        assert_eq!(book.status(), BookStatus::Available);
        assert!(book.loan().is_none());
        assert!(book.borrower().is_none());
    }

    #[test]
    fn test_lend_sets_due_date() {
        let mut book = Book::new("978-1", "The Hobbit", "J.R.R. Tolkien");
        book.lend("Alice", date(2024, 1, 1)).unwrap();

        let loan = book.loan().unwrap();
        assert_eq!(book.status(), BookStatus::Loaned);
        assert_eq!(loan.borrower(), "Alice");
        assert_eq!(loan.due_date(), date(2024, 1, 15));
    }

    #[test]
    fn test_lend_twice_keeps_first_loan() {
        let mut book = Book::new("978-1", "The Hobbit", "J.R.R. Tolkien");
        book.lend("Alice", date(2024, 1, 1)).unwrap();

        let result = book.lend("Bob", date(2024, 2, 1));
        assert!(matches!(
            result,
            Err(LibraryError::AlreadyLoaned { ref borrower, .. }) if borrower == "Alice"
        ));
        assert_eq!(book.borrower(), Some("Alice"));
        assert_eq!(book.loan().unwrap().loan_date(), date(2024, 1, 1));
    }

    #[test]
    fn test_loan_at_last_date_has_no_due_date() {
        assert!(Loan::new("Alice", NaiveDate::MAX).is_none());
        assert!(Loan::new("Alice", NaiveDate::MAX - Days::new(LOAN_PERIOD_DAYS)).is_some());
    }

    #[test]
    fn test_lend_out_of_range_leaves_book_available() {
        let mut book = Book::new("978-1", "The Hobbit", "J.R.R. Tolkien");
        let result = book.lend("Alice", NaiveDate::MAX);

        assert!(matches!(result, Err(LibraryError::InvalidInput(_))));
        assert!(book.is_available());
    }

    #[test]
    fn test_take_back() {
        let mut book = Book::new("978-1", "The Hobbit", "J.R.R. Tolkien");
        assert!(book.take_back().is_none());

        book.lend("Alice", date(2024, 1, 1)).unwrap();
        let ended = book.take_back().unwrap();
        assert_eq!(ended.borrower(), "Alice");
        assert!(book.is_available());
    }

    #[test]
    fn test_overdue() {
        let loan = Loan::new("Alice", date(2024, 1, 1)).unwrap();
        assert!(!loan.is_overdue(date(2024, 1, 15)));
        assert!(loan.is_overdue(date(2024, 1, 16)));
    }

    #[test]
    fn test_display() {
        let mut book = Book::new("978-1", "The Hobbit", "J.R.R. Tolkien");
        assert_eq!(
            book.to_string(),
            "[978-1] 'The Hobbit' by J.R.R. Tolkien - Available"
        );

        book.lend("Alice", date(2024, 1, 1)).unwrap();
        assert_eq!(
            book.to_string(),
            "[978-1] 'The Hobbit' by J.R.R. Tolkien - On loan to Alice (due 2024-01-15)"
        );
    }

    #[test]
    fn test_serialize_available_has_empty_loan_fields() {
        let book = Book::with_genre("978-1", "The Hobbit", "J.R.R. Tolkien", "Fantasy");
        let value = serde_json::to_value(&book).unwrap();

        assert_eq!(
            value,
            json!({
                "isbn": "978-1",
                "title": "The Hobbit",
                "author": "J.R.R. Tolkien",
                "genre": "Fantasy",
                "status": "AVAILABLE",
                "borrower": "",
                "loan_date": "",
                "due_date": ""
            })
        );
    }

    #[test]
    fn test_loaned_record_round_trip() {
        let mut book = Book::with_genre("978-1", "The Hobbit", "J.R.R. Tolkien", "Fantasy");
        book.lend("Alice", date(2024, 1, 1)).unwrap();

        let record = book.to_record();
        assert_eq!(record.status, BookStatus::Loaned);
        assert_eq!(record.loan_date, "2024-01-01");
        assert_eq!(record.due_date, "2024-01-15");

        let restored = Book::try_from(record.clone()).unwrap();
        assert_eq!(restored, book);
        assert_eq!(restored.to_record(), record);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let result = Book::from_value(json!({ "title": "No ISBN", "author": "Someone" }));
        assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
    }

    #[test]
    fn test_missing_optional_fields_take_defaults() {
        let book = Book::from_value(json!({
            "isbn": "978-1",
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien"
        }))
        .unwrap();
        assert_eq!(book.genre, DEFAULT_GENRE);
        assert!(book.is_available());
    }

    #[test]
    fn test_unknown_field_is_malformed() {
        let result = Book::from_value(json!({
            "isbn": "978-1",
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "shelf": "B3"
        }));
        assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
    }

    #[test]
    fn test_empty_title_is_malformed() {
        let result = Book::from_value(json!({
            "isbn": "978-1",
            "title": "  ",
            "author": "J.R.R. Tolkien"
        }));
        assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
    }

    #[test]
    fn test_loaned_without_dates_is_malformed() {
        let result = Book::from_value(json!({
            "isbn": "978-1",
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "status": "LOANED",
            "borrower": "Alice"
        }));
        assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
    }

    #[test]
    fn test_wrong_due_date_is_malformed() {
        let result = Book::from_value(json!({
            "isbn": "978-1",
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "status": "LOANED",
            "borrower": "Alice",
            "loan_date": "2024-01-01",
            "due_date": "2024-01-20"
        }));
        assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
    }

    #[test]
    fn test_available_with_borrower_is_malformed() {
        let result = Book::from_value(json!({
            "isbn": "978-1",
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "status": "AVAILABLE",
            "borrower": "Alice"
        }));
        assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let result = Book::from_value(json!({
            "isbn": "978-1",
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "status": "LOST"
        }));
        assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
    }

    #[test]
    fn test_loan_date_without_room_for_due_date_is_malformed() {
        let last = NaiveDate::MAX.format(RECORD_DATE_FORMAT).to_string();
        let result = Book::from_value(json!({
            "isbn": "978-1",
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "status": "LOANED",
            "borrower": "Alice",
            "loan_date": last,
            "due_date": last
        }));
        assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
    }
}
