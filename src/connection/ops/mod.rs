//! Database operations split into focused modules.

pub mod documents;
pub mod export;
pub mod search;
pub mod stats;
