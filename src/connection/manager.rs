//! Core ConnectionManager struct and basic connection methods.

use std::time::Duration;

use mongodb::Client;
use mongodb::bson::doc;
use tokio::runtime::Runtime;

use crate::connection::source::MongoCollection;
use crate::error::{Error, Result};
use crate::models::ConnectionTarget;

/// Databases hidden from the database picker.
pub const SYSTEM_DATABASES: &[&str] = &["admin", "local", "config"];

/// Owns the Tokio runtime that turns every async driver call into a blocking one.
pub struct ConnectionManager {
    /// Tokio runtime for MongoDB async operations
    pub(crate) runtime: Runtime,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new() -> Result<Self> {
        let runtime = Runtime::new()?;
        Ok(Self { runtime })
    }

    /// Connect and ping the server (runs in Tokio runtime).
    ///
    /// With a timeout, a server that never answers surfaces as `Error::Timeout`
    /// instead of stalling the caller indefinitely.
    pub fn connect(&self, target: &ConnectionTarget, timeout: Option<Duration>) -> Result<Client> {
        let uri = target.uri();
        log::debug!("Connecting to {}", target.display_name());
        self.runtime.block_on(async {
            let fut = async {
                let client = Client::with_uri_str(&uri).await?;
                client.database("admin").run_command(doc! { "ping": 1 }).await?;
                Ok::<Client, mongodb::error::Error>(client)
            };

            let client = match timeout {
                Some(timeout) => match tokio::time::timeout(timeout, fut).await {
                    Ok(result) => result?,
                    Err(_) => return Err(Error::Timeout("Connection timed out".to_string())),
                },
                None => fut.await?,
            };

            log::info!("Connected to {}", target.display_name());
            Ok(client)
        })
    }

    /// List user databases, hiding `admin`, `local` and `config` (runs in Tokio runtime)
    pub fn list_databases(&self, client: &Client) -> Result<Vec<String>> {
        let client = client.clone();
        self.runtime.block_on(async {
            let mut databases: Vec<String> = client
                .list_database_names()
                .await?
                .into_iter()
                .filter(|name| !SYSTEM_DATABASES.contains(&name.as_str()))
                .collect();
            databases.sort_unstable_by_key(|name| name.to_lowercase());
            Ok(databases)
        })
    }

    /// List collections in a database (runs in Tokio runtime)
    pub fn list_collections(&self, client: &Client, database: &str) -> Result<Vec<String>> {
        let client = client.clone();
        let database = database.to_string();
        self.runtime.block_on(async {
            let db = client.database(&database);
            let mut collections = db.list_collection_names().await?;
            collections.sort_unstable_by_key(|name| name.to_lowercase());
            Ok(collections)
        })
    }

    /// Handle to one collection, usable wherever a `CollectionSource` is expected.
    pub fn collection<'a>(
        &'a self,
        client: &Client,
        database: &str,
        collection: &str,
    ) -> MongoCollection<'a> {
        MongoCollection::new(self, client.clone(), database, collection)
    }
}
