//! Explore MongoDB collections: browse pages, search, sample field statistics
//! and export JSON.
//!
//! The sampled collection report lives in [`stats`]; everything it reads goes
//! through the [`connection::CollectionSource`] trait.

pub mod bson;
pub mod connection;
pub mod error;
pub mod models;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
