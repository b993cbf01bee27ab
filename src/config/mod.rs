//! Configuration module for shelf
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Operator settings persistence

pub mod paths;
pub mod settings;

pub use paths::LibraryPaths;
pub use settings::Settings;
