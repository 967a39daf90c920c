//! MongoDB connection management and operations.
//!
//! This module provides:
//! - `ConnectionManager`: Core connection management and the blocking driver calls
//! - `source`: The `CollectionSource` seam consumed by statistics, browsing, search and export
//! - `ops`: Database operations (documents, stats, search, export)
//! - `types`: Shared types for all operations

pub mod manager;
pub mod ops;
pub mod source;
pub mod types;

pub use manager::ConnectionManager;
pub use source::{CollectionSource, MongoCollection};
pub use types::{CollectionStats, FindDocumentsOptions};
