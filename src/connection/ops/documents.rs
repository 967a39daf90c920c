//! Document read operations and page browsing.

use mongodb::Client;
use mongodb::bson::{Bson, Document, doc};
use serde::Serialize;

use crate::connection::ConnectionManager;
use crate::connection::source::CollectionSource;
use crate::connection::types::FindDocumentsOptions;
use crate::error::Result;
use crate::state::Pagination;

impl ConnectionManager {
    /// Find documents in a collection with skip/limit/projection (runs in Tokio runtime)
    pub fn find_documents(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        opts: FindDocumentsOptions,
    ) -> Result<Vec<Document>> {
        use futures::TryStreamExt;

        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        let filter = opts.filter.unwrap_or_default();

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);

            let mut options = mongodb::options::FindOptions::default();
            // The server takes skip as a signed 64-bit value.
            options.skip = (opts.skip > 0).then_some(opts.skip.min(i64::MAX as u64));
            options.limit = (opts.limit > 0).then_some(opts.limit);
            options.projection = opts.projection;

            let cursor = coll.find(filter).with_options(options).await?;
            let documents: Vec<Document> = cursor.try_collect().await?;
            Ok(documents)
        })
    }

    /// Count documents matching a filter (runs in Tokio runtime)
    pub fn count_documents(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<u64> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let count = coll.count_documents(filter).await?;
            Ok(count)
        })
    }

    /// Distinct values of a field, computed server side (runs in Tokio runtime)
    pub fn distinct_values(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        field: &str,
        filter: Option<Document>,
    ) -> Result<Vec<Bson>> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        let field = field.to_string();

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let values = coll.distinct(&field, filter.unwrap_or_default()).await?;
            Ok(values)
        })
    }
}

/// One page of a collection as shown in the document table.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    /// Union of the documents' keys, in first-seen order.
    pub columns: Vec<String>,
    pub page: u64,
    pub total_pages: u64,
    pub document_count: u64,
}

/// Fetch the page `pagination` points at, together with the page count.
pub fn browse_page(source: &dyn CollectionSource, pagination: &Pagination) -> Result<DocumentPage> {
    let document_count = source.count_documents(doc! {})?;
    let documents =
        source.find(doc! {}, None, pagination.skip(), pagination.items_per_page() as i64)?;

    let mut columns: Vec<String> = Vec::new();
    for document in &documents {
        for key in document.keys() {
            if !columns.iter().any(|column| column == key) {
                columns.push(key.clone());
            }
        }
    }

    Ok(DocumentPage {
        documents,
        columns,
        page: pagination.page(),
        total_pages: pagination.total_pages(document_count),
        document_count,
    })
}
