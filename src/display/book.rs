//! Book display formatting
//!
//! Formats books and catalog statistics for terminal output in table and
//! detail views.

use chrono::NaiveDate;

use crate::models::Book;
use crate::services::CatalogStatistics;

fn width_of<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.chars().count())
}

/// Format a list of books as a table
///
/// `today` marks overdue loans; dates use `date_format`.
pub fn format_book_list(books: &[Book], today: NaiveDate, date_format: &str) -> String {
    if books.is_empty() {
        return "No books found.".to_string();
    }

    let isbn_width = width_of(books.iter().map(|b| b.isbn.as_str()), "ISBN");
    let title_width = width_of(books.iter().map(|b| b.title.as_str()), "Title");
    let author_width = width_of(books.iter().map(|b| b.author.as_str()), "Author");
    let genre_width = width_of(books.iter().map(|b| b.genre.as_str()), "Genre");

    let mut output = String::new();
    output.push_str(&format!(
        "{:<isbn_width$}  {:<title_width$}  {:<author_width$}  {:<genre_width$}  {}\n",
        "ISBN", "Title", "Author", "Genre", "Status",
    ));
    output.push_str(&format!(
        "{:-<isbn_width$}  {:-<title_width$}  {:-<author_width$}  {:-<genre_width$}  {:-<10}\n",
        "", "", "", "", "",
    ));

    for book in books {
        let status = match book.loan() {
            None => "Available".to_string(),
            Some(loan) => {
                let mut s = format!(
                    "Loaned to {} until {}",
                    loan.borrower(),
                    loan.due_date().format(date_format)
                );
                if loan.is_overdue(today) {
                    s.push_str(" (OVERDUE)");
                }
                s
            }
        };

        output.push_str(&format!(
            "{:<isbn_width$}  {:<title_width$}  {:<author_width$}  {:<genre_width$}  {}\n",
            book.isbn, book.title, book.author, book.genre, status,
        ));
    }

    let loaned = books.iter().filter(|b| !b.is_available()).count();
    output.push_str(&format!("\n{} book(s), {} on loan\n", books.len(), loaned));

    output
}

/// Format a single book's details
pub fn format_book_details(book: &Book, today: NaiveDate, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Book: {}\n", book.title));
    output.push_str(&format!("  ISBN:      {}\n", book.isbn));
    output.push_str(&format!("  Author:    {}\n", book.author));
    output.push_str(&format!("  Genre:     {}\n", book.genre));
    output.push_str(&format!("  Status:    {}\n", book.status()));

    if let Some(loan) = book.loan() {
        output.push_str(&format!("  Borrower:  {}\n", loan.borrower()));
        output.push_str(&format!(
            "  Loaned:    {}\n",
            loan.loan_date().format(date_format)
        ));
        output.push_str(&format!(
            "  Due:       {}{}\n",
            loan.due_date().format(date_format),
            if loan.is_overdue(today) { " (OVERDUE)" } else { "" }
        ));
    }

    output
}

/// Format catalog statistics
pub fn format_statistics(stats: &CatalogStatistics) -> String {
    let mut output = String::new();

    output.push_str("Catalog Statistics\n");
    output.push_str("==================\n");
    output.push_str(&format!("  Total books:  {}\n", stats.total));
    output.push_str(&format!("  Available:    {}\n", stats.available));
    output.push_str(&format!("  On loan:      {}\n", stats.loaned));

    if !stats.genres.is_empty() {
        let genre_width = width_of(stats.genres.keys().map(String::as_str), "Genre");
        output.push_str("\nBy genre:\n");
        for (genre, count) in &stats.genres {
            output.push_str(&format!("  {:<genre_width$}  {:>5}\n", genre, count));
        }
    }

    output
}
