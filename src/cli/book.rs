//! Book CLI commands
//!
//! Implements CLI commands for catalog management, search and statistics.

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use crate::config::settings::Settings;
use crate::display::{format_book_details, format_book_list, format_statistics};
use crate::error::{LibraryError, LibraryResult};
use crate::services::CatalogService;
use crate::storage::Storage;

/// Book subcommands
#[derive(Subcommand)]
pub enum BookCommands {
    /// Add a book to the catalog
    Add {
        /// ISBN (unique key)
        isbn: String,
        /// Title
        title: String,
        /// Author
        author: String,
        /// Genre (defaults to "General")
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Remove a book that is not on loan
    Remove {
        /// ISBN
        isbn: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Show book details
    Show {
        /// ISBN
        isbn: String,
    },
    /// List books
    List {
        /// Only books on the shelf
        #[arg(long, conflicts_with_all = ["loaned", "overdue"])]
        available: bool,
        /// Only books out on loan
        #[arg(long, conflicts_with = "overdue")]
        loaned: bool,
        /// Only loans past their due date
        #[arg(long)]
        overdue: bool,
    },
}

/// Arguments for `search`
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for; empty matches every book
    #[arg(default_value = "")]
    pub query: String,
    /// Match titles only
    #[arg(long, conflicts_with = "author")]
    pub title: bool,
    /// Match authors only
    #[arg(long)]
    pub author: bool,
}

/// Arguments for `stats`
#[derive(Args)]
pub struct StatsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle a book command
pub fn handle_book_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BookCommands,
) -> LibraryResult<()> {
    let service = CatalogService::new(storage);
    let today = Local::now().date_naive();

    match cmd {
        BookCommands::Add {
            isbn,
            title,
            author,
            genre,
        } => {
            let book = service.add_book(&isbn, &title, &author, genre.as_deref())?;
            println!("Added: {}", book);
        }

        BookCommands::Remove { isbn, force } => {
            let book = service
                .get(&isbn)?
                .ok_or_else(|| LibraryError::book_not_found(isbn.trim()))?;

            if !force {
                println!("About to remove: {}", book);
                println!("Use --force to confirm removal");
                return Ok(());
            }

            let removed = service.remove_book(&isbn)?;
            println!("Removed: '{}' by {}", removed.title, removed.author);
        }

        BookCommands::Show { isbn } => {
            let book = service
                .get(&isbn)?
                .ok_or_else(|| LibraryError::book_not_found(isbn.trim()))?;
            print!("{}", format_book_details(&book, today, &settings.date_format));
        }

        BookCommands::List {
            available,
            loaned,
            overdue,
        } => {
            let books = if available {
                service.list_available()?
            } else if loaned {
                service.list_loaned()?
            } else if overdue {
                service.list_overdue(today)?
            } else {
                service.list()?
            };
            println!("{}", format_book_list(&books, today, &settings.date_format));
        }
    }

    Ok(())
}

/// Handle `search`
pub fn handle_search_command(
    storage: &Storage,
    settings: &Settings,
    args: SearchArgs,
) -> LibraryResult<()> {
    let service = CatalogService::new(storage);

    let books = if args.title {
        service.search_by_title(&args.query)?
    } else if args.author {
        service.search_by_author(&args.query)?
    } else {
        service.search(&args.query)?
    };

    println!(
        "{}",
        format_book_list(&books, Local::now().date_naive(), &settings.date_format)
    );
    Ok(())
}

/// Handle `loan`
pub fn handle_loan_command(
    storage: &Storage,
    settings: &Settings,
    isbn: &str,
    borrower: &str,
    date: Option<&str>,
) -> LibraryResult<()> {
    let loan_date = date.map(parse_date).transpose()?;
    let book = CatalogService::new(storage).loan_book(isbn, borrower, loan_date)?;

    if let Some(loan) = book.loan() {
        println!(
            "Loaned '{}' to {}. Due back {}.",
            book.title,
            loan.borrower(),
            loan.due_date().format(&settings.date_format)
        );
    }
    Ok(())
}

/// Handle `return`
pub fn handle_return_command(storage: &Storage, isbn: &str) -> LibraryResult<()> {
    let book = CatalogService::new(storage).return_book(isbn)?;
    println!("Returned: '{}' is available again.", book.title);
    Ok(())
}

/// Handle `stats`
pub fn handle_stats_command(storage: &Storage, args: StatsArgs) -> LibraryResult<()> {
    let stats = CatalogService::new(storage).statistics()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", format_statistics(&stats));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date argument
fn parse_date(value: &str) -> LibraryResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        LibraryError::InvalidInput(format!(
            "Invalid date '{}', expected YYYY-MM-DD",
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert!(parse_date("01/01/2024").unwrap_err().is_invalid_input());
        assert!(parse_date("2024-02-30").is_err());
    }
}
