//! Catalog service
//!
//! Provides the business rules of the catalog: adding and removing books,
//! lending and returning them, searching, and statistics. Every successful
//! mutation is saved to disk before the call returns.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::audit::Operation;
use crate::error::{LibraryError, LibraryResult};
use crate::models::{Book, DEFAULT_GENRE, RECORD_DATE_FORMAT};
use crate::storage::Storage;

/// Service for catalog management
pub struct CatalogService<'a> {
    storage: &'a Storage,
}

/// Counts computed from the current catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStatistics {
    pub total: usize,
    pub available: usize,
    pub loaned: usize,
    /// Genre -> number of books. Genres are grouped exactly as written.
    pub genres: BTreeMap<String, usize>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a new available book
    ///
    /// ISBN, title, author and genre are trimmed. A missing or blank genre
    /// becomes the default genre.
    pub fn add_book(
        &self,
        isbn: &str,
        title: &str,
        author: &str,
        genre: Option<&str>,
    ) -> LibraryResult<Book> {
        let genre = genre
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(DEFAULT_GENRE);
        let book = Book::with_genre(isbn.trim(), title.trim(), author.trim(), genre);

        book.validate()
            .map_err(|e| LibraryError::InvalidInput(e.to_string()))?;

        let _guard = self.storage.lock_writes()?;

        if self.storage.catalog.contains(&book.isbn)? {
            return Err(LibraryError::DuplicateIsbn(book.isbn));
        }

        self.storage.catalog.insert(book.clone())?;
        self.storage.catalog.save()?;

        self.storage.log_add(&book);
        tracing::info!(isbn = %book.isbn, title = %book.title, "book added");

        Ok(book)
    }

    /// Remove a book that is on the shelf
    pub fn remove_book(&self, isbn: &str) -> LibraryResult<Book> {
        let _guard = self.storage.lock_writes()?;

        let book = self.require(isbn)?;
        if let Some(loan) = book.loan() {
            return Err(LibraryError::BookOnLoan {
                isbn: book.isbn.clone(),
                borrower: loan.borrower().to_string(),
            });
        }

        self.storage.catalog.delete(isbn)?;
        self.storage.catalog.save()?;

        self.storage.log_remove(&book);
        tracing::info!(isbn = %book.isbn, "book removed");

        Ok(book)
    }

    /// Lend a book to `borrower`, starting on `loan_date` or today
    pub fn loan_book(
        &self,
        isbn: &str,
        borrower: &str,
        loan_date: Option<NaiveDate>,
    ) -> LibraryResult<Book> {
        let _guard = self.storage.lock_writes()?;

        let mut book = self.require(isbn)?;

        let borrower = borrower.trim();
        if borrower.is_empty() {
            return Err(LibraryError::InvalidInput(
                "Borrower name cannot be empty".into(),
            ));
        }

        let before = book.clone();
        let loan_date = loan_date.unwrap_or_else(|| Local::now().date_naive());
        book.lend(borrower, loan_date)?;

        self.storage.catalog.update(book.clone())?;
        self.storage.catalog.save()?;

        let summary = book.loan().map(|loan| {
            format!(
                "lent to {} on {}, due {}",
                loan.borrower(),
                loan.loan_date().format(RECORD_DATE_FORMAT),
                loan.due_date().format(RECORD_DATE_FORMAT)
            )
        });
        self.storage
            .log_change(Operation::Loan, &before, &book, summary);
        tracing::info!(isbn = %book.isbn, borrower, "book loaned");

        Ok(book)
    }

    /// Take a loaned book back
    pub fn return_book(&self, isbn: &str) -> LibraryResult<Book> {
        let _guard = self.storage.lock_writes()?;

        let mut book = self.require(isbn)?;
        let before = book.clone();
        let ended = book
            .take_back()
            .ok_or_else(|| LibraryError::NotLoaned(book.isbn.clone()))?;

        self.storage.catalog.update(book.clone())?;
        self.storage.catalog.save()?;

        let summary = format!(
            "returned by {} (lent {})",
            ended.borrower(),
            ended.loan_date().format(RECORD_DATE_FORMAT)
        );
        self.storage
            .log_change(Operation::Return, &before, &book, Some(summary));
        tracing::info!(isbn = %book.isbn, borrower = ended.borrower(), "book returned");

        Ok(book)
    }

    /// Get a book by exact ISBN
    pub fn get(&self, isbn: &str) -> LibraryResult<Option<Book>> {
        self.storage.catalog.get(isbn.trim())
    }

    /// List every book in insertion order
    pub fn list(&self) -> LibraryResult<Vec<Book>> {
        self.storage.catalog.get_all()
    }

    /// List books on the shelf
    pub fn list_available(&self) -> LibraryResult<Vec<Book>> {
        self.storage.catalog.find_all(Book::is_available)
    }

    /// List books out on loan
    pub fn list_loaned(&self) -> LibraryResult<Vec<Book>> {
        self.storage.catalog.find_all(|b| !b.is_available())
    }

    /// List loaned books whose due date is before `today`
    pub fn list_overdue(&self, today: NaiveDate) -> LibraryResult<Vec<Book>> {
        self.storage
            .catalog
            .find_all(|b| b.loan().is_some_and(|loan| loan.is_overdue(today)))
    }

    /// Case-insensitive substring search over title, author and ISBN
    ///
    /// Leading and trailing whitespace in the query is ignored, so an empty
    /// or whitespace-only query matches every book.
    pub fn search(&self, query: &str) -> LibraryResult<Vec<Book>> {
        let needle = query.trim().to_lowercase();
        self.storage.catalog.find_all(|b| {
            contains_folded(&b.title, &needle)
                || contains_folded(&b.author, &needle)
                || contains_folded(&b.isbn, &needle)
        })
    }

    /// Case-insensitive substring search over titles only
    pub fn search_by_title(&self, query: &str) -> LibraryResult<Vec<Book>> {
        let needle = query.trim().to_lowercase();
        self.storage
            .catalog
            .find_all(|b| contains_folded(&b.title, &needle))
    }

    /// Case-insensitive substring search over authors only
    pub fn search_by_author(&self, query: &str) -> LibraryResult<Vec<Book>> {
        let needle = query.trim().to_lowercase();
        self.storage
            .catalog
            .find_all(|b| contains_folded(&b.author, &needle))
    }

    /// Compute statistics from the current catalog
    pub fn statistics(&self) -> LibraryResult<CatalogStatistics> {
        let books = self.storage.catalog.get_all()?;

        let mut stats = CatalogStatistics {
            total: books.len(),
            ..Default::default()
        };
        for book in &books {
            if book.is_available() {
                stats.available += 1;
            } else {
                stats.loaned += 1;
            }
            *stats.genres.entry(book.genre.clone()).or_insert(0) += 1;
        }

        Ok(stats)
    }

    /// Count books
    pub fn count(&self) -> LibraryResult<usize> {
        self.storage.catalog.count()
    }

    fn require(&self, isbn: &str) -> LibraryResult<Book> {
        let isbn = isbn.trim();
        self.storage
            .catalog
            .get(isbn)?
            .ok_or_else(|| LibraryError::book_not_found(isbn))
    }
}

/// `needle` must already be lowercase
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
