//! In-memory `CollectionSource` for unit tests.

use std::cell::RefCell;

use mongodb::bson::{Bson, Document};

use crate::connection::source::CollectionSource;
use crate::connection::types::CollectionStats;
use crate::error::{Error, Result};

/// Operations a `MemoryCollection` can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Count,
    Find,
    Distinct,
    Stats,
}

pub struct MemoryCollection {
    database: String,
    name: String,
    documents: Vec<Document>,
    stats: CollectionStats,
    fail_on: Option<Op>,
    calls: RefCell<Vec<Op>>,
}

impl MemoryCollection {
    pub fn new(database: &str, name: &str, documents: Vec<Document>) -> Self {
        Self {
            database: database.to_string(),
            name: name.to_string(),
            documents,
            stats: CollectionStats::default(),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_stats(mut self, stats: CollectionStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn failing_on(mut self, op: Op) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.borrow().clone()
    }

    fn record(&self, op: Op) -> Result<()> {
        self.calls.borrow_mut().push(op);
        if self.fail_on == Some(op) {
            return Err(Error::BackendUnavailable(format!("connection refused during {op:?}")));
        }
        Ok(())
    }
}

// Supports the filter shapes this crate issues: `{}`, `{f: {$exists: b}}` and `{f: value}`.
fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, condition)| match condition {
        Bson::Document(op) if op.contains_key("$exists") => {
            op.get_bool("$exists").unwrap_or(true) == document.contains_key(field)
        }
        Bson::Document(op) => panic!("unsupported operator in test filter: {op}"),
        value => document.get(field) == Some(value),
    })
}

fn project(document: &Document, projection: &Document) -> Document {
    let include_id = projection.get("_id").is_none_or(|v| v != &Bson::Int32(0));
    let mut out = Document::new();
    for (key, value) in document {
        let selected = if key == "_id" {
            include_id
        } else {
            matches!(projection.get(key), Some(Bson::Int32(1)))
        };
        if selected {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}

impl CollectionSource for MemoryCollection {
    fn database(&self) -> &str {
        &self.database
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn count_documents(&self, filter: Document) -> Result<u64> {
        self.record(Op::Count)?;
        Ok(self.documents.iter().filter(|d| matches(d, &filter)).count() as u64)
    }

    fn find(
        &self,
        filter: Document,
        projection: Option<Document>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Document>> {
        self.record(Op::Find)?;
        let limit = if limit > 0 { limit as usize } else { usize::MAX };
        Ok(self
            .documents
            .iter()
            .filter(|d| matches(d, &filter))
            .skip(skip as usize)
            .take(limit)
            .map(|d| match &projection {
                Some(projection) => project(d, projection),
                None => d.clone(),
            })
            .collect())
    }

    fn distinct(&self, field: &str, filter: Option<Document>) -> Result<Vec<Bson>> {
        self.record(Op::Distinct)?;
        let filter = filter.unwrap_or_default();
        let mut values: Vec<Bson> = Vec::new();
        for document in self.documents.iter().filter(|d| matches(d, &filter)) {
            match document.get(field) {
                Some(value) if !values.contains(value) => values.push(value.clone()),
                _ => {}
            }
        }
        Ok(values)
    }

    fn collection_stats(&self) -> Result<CollectionStats> {
        self.record(Op::Stats)?;
        Ok(self.stats.clone())
    }
}
