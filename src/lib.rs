//! shelf - Terminal-based book catalog with loan tracking
//!
//! This library provides the core functionality for the shelf application:
//! a single-user catalog of books keyed by ISBN, with loan and return
//! tracking, search, and statistics, persisted to a JSON file.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (books, loans, persisted records)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `backup`: Backup and restore management
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf::config::paths::LibraryPaths;
//! use shelf::services::CatalogService;
//! use shelf::storage::Storage;
//!
//! let storage = Storage::new(LibraryPaths::new()?)?;
//! storage.load_or_recover()?;
//!
//! let catalog = CatalogService::new(&storage);
//! catalog.add_book("978-0-261-10221-7", "The Hobbit", "J.R.R. Tolkien", Some("Fantasy"))?;
//! catalog.loan_book("978-0-261-10221-7", "Alice", None)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::LibraryError;
