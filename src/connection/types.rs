use std::collections::BTreeMap;

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// Options for a paginated/projected find
#[derive(Clone, Debug, Default)]
pub struct FindDocumentsOptions {
    pub filter: Option<Document>,
    pub projection: Option<Document>,
    pub skip: u64,
    /// `0` means no limit.
    pub limit: i64,
}

/// Raw size metrics reported by `collStats`, in bytes.
///
/// Any metric missing from the server response reads as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub size: f64,
    pub avg_obj_size: f64,
    pub storage_size: f64,
    pub total_index_size: f64,
    pub index_sizes: BTreeMap<String, f64>,
}

impl CollectionStats {
    /// Read the metrics out of a `collStats` command response.
    pub fn from_document(stats: &Document) -> Self {
        let index_sizes = stats
            .get_document("indexSizes")
            .map(|sizes| {
                sizes
                    .iter()
                    .map(|(name, value)| (name.clone(), numeric(Some(value))))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            size: numeric(stats.get("size")),
            avg_obj_size: numeric(stats.get("avgObjSize")),
            storage_size: numeric(stats.get("storageSize")),
            total_index_size: numeric(stats.get("totalIndexSize")),
            index_sizes,
        }
    }
}

// collStats mixes int32, int64 and double depending on server version and magnitude.
fn numeric(value: Option<&Bson>) -> f64 {
    match value {
        Some(Bson::Int32(n)) => *n as f64,
        Some(Bson::Int64(n)) => *n as f64,
        Some(Bson::Double(n)) => *n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::*;

    #[test]
    fn reads_mixed_numeric_types() {
        let stats = CollectionStats::from_document(&doc! {
            "size": 2048_i32,
            "avgObjSize": 512.5,
            "storageSize": 4096_i64,
            "totalIndexSize": 8192_i32,
            "indexSizes": { "_id_": 4096_i32, "name_1": 4096_i64 },
        });

        assert_eq!(stats.size, 2048.0);
        assert_eq!(stats.avg_obj_size, 512.5);
        assert_eq!(stats.storage_size, 4096.0);
        assert_eq!(stats.total_index_size, 8192.0);
        assert_eq!(stats.index_sizes.len(), 2);
    }

    #[test]
    fn missing_metrics_default_to_zero() {
        let stats = CollectionStats::from_document(&doc! { "ok": 1 });
        assert_eq!(stats, CollectionStats::default());
    }
}
