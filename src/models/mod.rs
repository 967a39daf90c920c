pub mod connection;

pub use connection::{ConnectionTarget, SavedConnection};
