//! Application settings with persistence.

use serde::{Deserialize, Serialize};

use crate::state::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::stats::DEFAULT_SAMPLE_LIMIT;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u64,
    /// Documents sampled for the collection report.
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub default_export_folder: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            sample_limit: default_sample_limit(),
            connect_timeout_secs: default_connect_timeout_secs(),
            default_export_folder: String::new(),
        }
    }
}

fn default_items_per_page() -> u64 {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_sample_limit() -> usize {
    DEFAULT_SAMPLE_LIMIT
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl AppSettings {
    pub fn connect_timeout(&self) -> Option<std::time::Duration> {
        (self.connect_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.connect_timeout_secs))
    }
}
