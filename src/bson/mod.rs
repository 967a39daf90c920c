//! BSON utilities for value classification and formatting.

mod formatter;
mod kind;

pub use formatter::*;
pub use kind::*;
