//! Explorer session: the current selection, page cursor and last report.

use crate::connection::source::CollectionSource;
use crate::error::Result;
use crate::state::pagination::Pagination;
use crate::stats::{CollectionReport, compute_report};

/// Everything the explorer remembers between user actions.
///
/// The report is computed when a different collection is selected or a
/// refresh is requested, and is kept until then.
#[derive(Debug, Clone, Default)]
pub struct ExplorerSession {
    database: Option<String>,
    collection: Option<String>,
    pagination: Pagination,
    report: Option<CollectionReport>,
    show_report: bool,
}

impl ExplorerSession {
    pub fn new(items_per_page: u64) -> Self {
        Self { pagination: Pagination::new(items_per_page), ..Default::default() }
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    /// Last computed report, whether or not it is currently shown.
    pub fn report(&self) -> Option<&CollectionReport> {
        self.report.as_ref()
    }

    /// The report, if it has not been dismissed.
    pub fn visible_report(&self) -> Option<&CollectionReport> {
        self.report.as_ref().filter(|_| self.show_report)
    }

    /// Switch database; drops the collection selection and its report.
    pub fn select_database(&mut self, database: &str) {
        if self.database.as_deref() == Some(database) {
            return;
        }
        self.database = Some(database.to_string());
        self.collection = None;
        self.report = None;
        self.show_report = false;
        self.pagination.reset();
    }

    fn is_selected(&self, source: &dyn CollectionSource) -> bool {
        self.database.as_deref() == Some(source.database())
            && self.collection.as_deref() == Some(source.name())
    }

    /// Select the collection behind `source`.
    ///
    /// A change of collection recomputes and shows the report and resets the
    /// page cursor; re-selecting the current collection does nothing. Returns
    /// whether the selection changed. On failure the previous selection stays.
    pub fn select_collection(
        &mut self,
        source: &dyn CollectionSource,
        sample_limit: usize,
    ) -> Result<bool> {
        if self.is_selected(source) {
            return Ok(false);
        }
        self.refresh_report(source, sample_limit)?;
        Ok(true)
    }

    /// Recompute the report and show it.
    ///
    /// A source other than the selected collection becomes the selection, as
    /// with `select_collection`, so the report always matches the selection.
    pub fn refresh_report(
        &mut self,
        source: &dyn CollectionSource,
        sample_limit: usize,
    ) -> Result<&CollectionReport> {
        let report = compute_report(source, sample_limit).inspect_err(|e| {
            log::error!("Failed to compute statistics for {}: {}", source.name(), e);
        })?;

        if !self.is_selected(source) {
            self.database = Some(source.database().to_string());
            self.collection = Some(source.name().to_string());
            self.pagination.reset();
        }
        self.show_report = true;
        Ok(self.report.insert(report))
    }

    pub fn dismiss_report(&mut self) {
        self.show_report = false;
    }
}
