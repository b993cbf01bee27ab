//! Service layer for shelf
//!
//! The service layer provides the catalog's business rules on top of the
//! storage layer, handling validation, loan state and derived counts.

pub mod catalog;

pub use catalog::{CatalogService, CatalogStatistics};
