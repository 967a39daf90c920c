//! The collection seam consumed by statistics, browsing, search and export.

use mongodb::Client;
use mongodb::bson::{Bson, Document};

use crate::connection::ConnectionManager;
use crate::connection::types::{CollectionStats, FindDocumentsOptions};
use crate::error::Result;

/// Read-only access to one collection of the backing document store.
///
/// Every call is blocking and delegates to the store's query engine.
pub trait CollectionSource {
    /// Database the collection lives in.
    fn database(&self) -> &str;

    /// Collection name.
    fn name(&self) -> &str;

    fn count_documents(&self, filter: Document) -> Result<u64>;

    /// Documents in natural order. A `limit` of `0` means no limit.
    fn find(
        &self,
        filter: Document,
        projection: Option<Document>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Document>>;

    /// Distinct values of `field`, computed server side.
    fn distinct(&self, field: &str, filter: Option<Document>) -> Result<Vec<Bson>>;

    fn collection_stats(&self) -> Result<CollectionStats>;
}

/// A collection on a live MongoDB server.
pub struct MongoCollection<'a> {
    manager: &'a ConnectionManager,
    client: Client,
    database: String,
    collection: String,
}

impl<'a> MongoCollection<'a> {
    pub fn new(
        manager: &'a ConnectionManager,
        client: Client,
        database: &str,
        collection: &str,
    ) -> Self {
        Self {
            manager,
            client,
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }
}

impl CollectionSource for MongoCollection<'_> {
    fn database(&self) -> &str {
        &self.database
    }

    fn name(&self) -> &str {
        &self.collection
    }

    fn count_documents(&self, filter: Document) -> Result<u64> {
        self.manager.count_documents(&self.client, &self.database, &self.collection, filter)
    }

    fn find(
        &self,
        filter: Document,
        projection: Option<Document>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Document>> {
        self.manager.find_documents(
            &self.client,
            &self.database,
            &self.collection,
            FindDocumentsOptions { filter: Some(filter), projection, skip, limit },
        )
    }

    fn distinct(&self, field: &str, filter: Option<Document>) -> Result<Vec<Bson>> {
        self.manager.distinct_values(&self.client, &self.database, &self.collection, field, filter)
    }

    fn collection_stats(&self) -> Result<CollectionStats> {
        self.manager.collection_stats(&self.client, &self.database, &self.collection)
    }
}
