//! Collection statistics operations.

use mongodb::Client;
use mongodb::bson::doc;

use crate::connection::ConnectionManager;
use crate::connection::types::CollectionStats;
use crate::error::Result;

impl ConnectionManager {
    /// Fetch collection size metrics via `collStats` (runs in Tokio runtime)
    pub fn collection_stats(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
    ) -> Result<CollectionStats> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        self.runtime.block_on(async {
            let db = client.database(&database);
            let stats = db.run_command(doc! { "collStats": collection }).await?;
            Ok(CollectionStats::from_document(&stats))
        })
    }
}
