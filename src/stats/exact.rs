//! Exact single-field analysis, computed by the server over the whole collection.

use mongodb::bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

use crate::bson::bson_canonical_string;
use crate::connection::source::CollectionSource;
use crate::error::Result;

/// Distinct values listed in `FieldAnalysis::sample_values`.
pub const SAMPLE_VALUE_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAnalysis {
    pub field: String,
    pub document_count: u64,
    pub presence_count: u64,
    pub coverage_pct: f64,
    pub distinct_count: u64,
    pub sample_values: Vec<String>,
}

/// Coverage and cardinality of `field` across the entire collection.
///
/// Unlike the sampled report this costs a full `distinct` on the server.
pub fn analyze_field_exact(source: &dyn CollectionSource, field: &str) -> Result<FieldAnalysis> {
    let document_count = source.count_documents(doc! {})?;

    let mut exists = Document::new();
    exists.insert(field, doc! { "$exists": true });
    let presence_count = source.count_documents(exists)?;

    let coverage_pct = if document_count > 0 {
        presence_count as f64 / document_count as f64 * 100.0
    } else {
        0.0
    };

    let values: Vec<Bson> = source.distinct(field, None)?;
    let sample_values =
        values.iter().take(SAMPLE_VALUE_LIMIT).map(bson_canonical_string).collect();

    Ok(FieldAnalysis {
        field: field.to_string(),
        document_count,
        presence_count,
        coverage_pct,
        distinct_count: values.len() as u64,
        sample_values,
    })
}
