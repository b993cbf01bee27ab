//! Core data models for shelf
//!
//! This module contains the data structures of the catalog domain: books,
//! their loan state, and the flat record form they are persisted in.

pub mod book;

pub use book::{
    Book, BookRecord, BookStatus, BookValidationError, Loan, DEFAULT_GENRE, LOAN_PERIOD_DAYS,
    RECORD_DATE_FORMAT,
};
