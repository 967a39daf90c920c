//! Explorer state: settings, persisted configuration, pagination and the session.

pub mod config;
pub mod pagination;
pub mod session;
pub mod settings;

pub use config::ConfigManager;
pub use pagination::Pagination;
pub use session::ExplorerSession;
pub use settings::AppSettings;
